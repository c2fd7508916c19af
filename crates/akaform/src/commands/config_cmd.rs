//! Config subcommand handlers.

use serde::Serialize;
use tabled::Tabled;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

fn mask(value: Option<&String>) -> Option<&'static str> {
    value.map(|_| "****")
}

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(
        out,
        "gtm_poll_interval_secs = {}",
        cfg.defaults.gtm_poll_interval_secs
    );
    let _ = writeln!(out, "gtm_poll_attempts = {}", cfg.defaults.gtm_poll_attempts);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "host = \"{}\"", p.host);
        let _ = writeln!(out, "client_token = \"{}\"", p.client_token);
        if let Some(masked) = mask(p.client_secret.as_ref()) {
            let _ = writeln!(out, "client_secret = \"{masked}\"");
        }
        if let Some(ref env) = p.client_secret_env {
            let _ = writeln!(out, "client_secret_env = \"{env}\"");
        }
        if let Some(masked) = mask(p.access_token.as_ref()) {
            let _ = writeln!(out, "access_token = \"{masked}\"");
        }
        if let Some(ref env) = p.access_token_env {
            let _ = writeln!(out, "access_token_env = \"{env}\"");
        }
        if let Some(max_body) = p.max_body {
            let _ = writeln!(out, "max_body = {max_body}");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }
    out
}

#[derive(Serialize)]
struct ProfileEntry {
    name: String,
    host: String,
    default: bool,
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Default")]
    default: String,
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            output::print_output(format_config_redacted(&cfg).trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let active = config::active_profile_name(global, &cfg);
            let mut entries: Vec<ProfileEntry> = cfg
                .profiles
                .iter()
                .map(|(name, p)| ProfileEntry {
                    name: name.clone(),
                    host: p.host.clone(),
                    default: *name == active,
                })
                .collect();
            entries.sort_by(|a, b| a.name.cmp(&b.name));

            let out = output::render_list(global.output, &entries, |e| ProfileRow {
                name: e.name.clone(),
                host: e.host.clone(),
                default: if e.default { "*".into() } else { String::new() },
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
