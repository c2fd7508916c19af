//! Shared helpers for command handlers.

use std::path::Path;

use serde_json::{Map, Value};

use akaform_core::{AttrType, ResourceData, Schema};

use crate::cli::AttributeArgs;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON object file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<Map<String, Value>, CliError> {
    let contents = std::fs::read_to_string(path)?;
    match serde_json::from_str(&contents) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CliError::Validation {
            field: "from-file".into(),
            reason: "expected a JSON object of attributes".into(),
        }),
        Err(e) => Err(CliError::Validation {
            field: "from-file".into(),
            reason: format!("invalid JSON: {e}"),
        }),
    }
}

/// Parse one `--set name=value` pair against the schema.
///
/// String attributes take the raw text; every other type is parsed as JSON.
fn parse_set(schema: &Schema, pair: &str) -> Result<(String, Value), CliError> {
    let (name, raw) = pair.split_once('=').ok_or_else(|| CliError::Validation {
        field: "set".into(),
        reason: format!("expected NAME=VALUE, got '{pair}'"),
    })?;
    let name = name.trim();
    let attr = schema.get(name).ok_or_else(|| CliError::Validation {
        field: name.to_owned(),
        reason: "not an attribute of this type".into(),
    })?;

    let value = if attr.ty == AttrType::String {
        Value::String(raw.to_owned())
    } else {
        serde_json::from_str(raw).map_err(|e| CliError::Validation {
            field: name.to_owned(),
            reason: format!("expected {} value: {e}", attr.ty),
        })?
    };
    Ok((name.to_owned(), value))
}

/// Merge `--from-file` and `--set` input into state bound to `schema`.
pub fn collect_attributes(schema: &Schema, args: &AttributeArgs) -> Result<ResourceData, CliError> {
    let mut attributes = match &args.from_file {
        Some(path) => read_json_file(path)?,
        None => Map::new(),
    };
    for pair in &args.set {
        let (name, value) = parse_set(schema, pair)?;
        attributes.insert(name, value);
    }
    Ok(ResourceData::from_attributes(schema, attributes)?)
}
