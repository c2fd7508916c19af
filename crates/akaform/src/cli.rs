//! Clap derive structures for the `akaform` CLI.
//!
//! Defines the command tree, global flags, and shared argument groups.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// akaform -- drive Akamai AppSec, GTM and Cloudlets resources
#[derive(Debug, Parser)]
#[command(
    name = "akaform",
    version,
    about = "Manage Akamai AppSec, GTM and Cloudlets resources from the command line",
    long_about = "Runs the create/read/update/delete lifecycle of provider resources\n\
        against the Akamai APIs, authenticating with EdgeGrid credentials\n\
        from a configuration profile.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "AKAFORM_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "AKAFORM_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "AKAFORM_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "AKAFORM_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List registered resource and data source types
    #[command(alias = "types")]
    Resources,

    /// Describe the attributes of a resource or data source type
    Schema {
        /// Type name, e.g. akamai_appsec_rule
        type_name: String,
    },

    /// Create a resource
    Create(WriteArgs),

    /// Read a resource by id
    Read(IdArgs),

    /// Update an existing resource
    Update(IdArgs),

    /// Delete a resource
    #[command(alias = "rm")]
    Delete(IdArgs),

    /// Import an existing remote object by id
    Import(IdArgs),

    /// Query a data source
    Data(WriteArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Attribute input ──────────────────────────────────────────────────

/// Declared attributes, from a JSON file and/or `--set` pairs.
#[derive(Debug, Args)]
pub struct AttributeArgs {
    /// Set an attribute: name=value (JSON values accepted for non-string types)
    #[arg(long = "set", short = 's', value_name = "NAME=VALUE")]
    pub set: Vec<String>,

    /// Read attributes from a JSON object file; --set entries override it
    #[arg(long, short = 'f', value_name = "PATH")]
    pub from_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct WriteArgs {
    /// Type name, e.g. akamai_appsec_rule
    pub type_name: String,

    #[command(flatten)]
    pub attributes: AttributeArgs,
}

#[derive(Debug, Args)]
pub struct IdArgs {
    /// Type name, e.g. akamai_gtm_cidrmap
    pub type_name: String,

    /// Resource id, e.g. 43253:test_policy:12345
    pub id: String,

    #[command(flatten)]
    pub attributes: AttributeArgs,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// List configured profiles
    Profiles,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
