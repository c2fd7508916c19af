//! Registry listing and per-type schema description.

use serde::Serialize;
use tabled::Tabled;

use akaform_core::{AttributeInfo, Provider};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct TypeEntry {
    name: &'static str,
    kind: &'static str,
}

#[derive(Tabled)]
struct TypeRow {
    #[tabled(rename = "Type")]
    name: &'static str,
    #[tabled(rename = "Kind")]
    kind: &'static str,
}

pub fn list(provider: &Provider, global: &GlobalOpts) -> Result<(), CliError> {
    let entries: Vec<TypeEntry> = provider
        .resource_types()
        .into_iter()
        .map(|name| TypeEntry {
            name,
            kind: "resource",
        })
        .chain(
            provider
                .data_source_types()
                .into_iter()
                .map(|name| TypeEntry {
                    name,
                    kind: "data source",
                }),
        )
        .collect();

    let out = output::render_list(global.output, &entries, |e| TypeRow {
        name: e.name,
        kind: e.kind,
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub fn describe(provider: &Provider, type_name: &str, global: &GlobalOpts) -> Result<(), CliError> {
    // Resource types first; data source names never collide with them.
    let schema = match provider.resource(type_name) {
        Ok(resource) => resource.schema().describe(),
        Err(_) => provider.data_source(type_name)?.schema().describe(),
    };

    let out = output::render_list(global.output, &schema, AttributeInfo::clone)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
