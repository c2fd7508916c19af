//! Command handlers and dispatch.

pub mod config_cmd;
pub mod data;
pub mod resource;
pub mod schema;
pub mod util;

use akaform_core::Provider;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a provider-backed command to its handler.
pub async fn dispatch(
    cmd: Command,
    provider: &Provider,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Resources => schema::list(provider, global),
        Command::Schema { type_name } => schema::describe(provider, &type_name, global),
        Command::Create(args) => resource::create(provider, args, global).await,
        Command::Read(args) => resource::read(provider, args, global).await,
        Command::Update(args) => resource::update(provider, args, global).await,
        Command::Delete(args) => resource::delete(provider, args, global).await,
        Command::Import(args) => resource::import(provider, args, global).await,
        Command::Data(args) => data::handle(provider, args, global).await,
        Command::Config(_) | Command::Completions(_) => unreachable!("handled before dispatch"),
    }
}
