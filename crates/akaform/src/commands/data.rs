//! Data source queries.

use akaform_core::Provider;

use crate::cli::{GlobalOpts, WriteArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    provider: &Provider,
    args: WriteArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let source = provider.data_source(&args.type_name)?;
    let schema = source.schema();
    let mut data = util::collect_attributes(schema, &args.attributes)?;
    schema.apply_defaults(&mut data);
    schema.validate(&data)?;

    source.read(&mut data).await?;

    let out = output::render_state(global.output, &data)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
