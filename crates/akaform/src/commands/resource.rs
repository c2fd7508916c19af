//! Resource lifecycle handlers: create, read, update, delete, import.

use tracing::info;

use akaform_core::{CoreError, Provider, Resource, ResourceData, apply_update};

use crate::cli::{GlobalOpts, IdArgs, WriteArgs};
use crate::error::CliError;
use crate::output;

use super::util;

/// Fill defaults, then run schema validation and the plan-time checks.
fn plan(resource: &dyn Resource, data: &mut ResourceData) -> Result<(), CliError> {
    let schema = resource.schema();
    schema.apply_defaults(data);
    schema.validate(data)?;
    resource.customize_diff(data)?;
    Ok(())
}

fn print_state(data: &ResourceData, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_state(global.output, data)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// A read that clears the id means the remote object is gone.
fn ensure_present(data: &ResourceData, type_name: &str, id: &str) -> Result<(), CliError> {
    if data.id().is_none() {
        return Err(CoreError::NotFound {
            entity_type: type_name.to_owned(),
            identifier: id.to_owned(),
        }
        .into());
    }
    Ok(())
}

pub async fn create(
    provider: &Provider,
    args: WriteArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let resource = provider.resource(&args.type_name)?;
    let mut data = util::collect_attributes(resource.schema(), &args.attributes)?;
    plan(resource.as_ref(), &mut data)?;

    resource.create(&mut data).await?;
    info!(type_name = %args.type_name, id = data.id().unwrap_or_default(), "created");
    print_state(&data, global)
}

pub async fn read(provider: &Provider, args: IdArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let resource = provider.resource(&args.type_name)?;
    let mut data =
        util::collect_attributes(resource.schema(), &args.attributes)?.with_id(args.id.clone());

    resource.read(&mut data).await?;
    ensure_present(&data, &args.type_name, &args.id)?;
    print_state(&data, global)
}

pub async fn update(
    provider: &Provider,
    args: IdArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let resource = provider.resource(&args.type_name)?;
    let mut data =
        util::collect_attributes(resource.schema(), &args.attributes)?.with_id(args.id.clone());
    plan(resource.as_ref(), &mut data)?;

    if apply_update(resource.as_ref(), &mut data).await? {
        info!(type_name = %args.type_name, id = %args.id, "updated");
    } else {
        info!(type_name = %args.type_name, id = %args.id, "no changes");
    }
    print_state(&data, global)
}

pub async fn delete(
    provider: &Provider,
    args: IdArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let resource = provider.resource(&args.type_name)?;
    let mut data =
        util::collect_attributes(resource.schema(), &args.attributes)?.with_id(args.id.clone());

    if !util::confirm(
        &format!("Delete {} '{}'?", args.type_name, args.id),
        global.yes,
    )? {
        return Err(CliError::NotConfirmed {
            action: format!("delete {}", args.type_name),
        });
    }

    resource.delete(&mut data).await?;
    info!(type_name = %args.type_name, id = %args.id, "deleted");
    if !global.quiet {
        eprintln!("Deleted {} '{}'", args.type_name, args.id);
    }
    Ok(())
}

pub async fn import(
    provider: &Provider,
    args: IdArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let resource = provider.resource(&args.type_name)?;
    let mut data =
        util::collect_attributes(resource.schema(), &args.attributes)?.with_id(args.id.clone());

    resource.import(&mut data).await?;
    resource.read(&mut data).await?;
    ensure_present(&data, &args.type_name, &args.id)?;
    print_state(&data, global)
}
