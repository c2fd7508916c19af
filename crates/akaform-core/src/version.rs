// ── Configuration version resolution ──
//
// Reads always go against the latest version of a security configuration.
// Writes need a version that is not activated on either network: when the
// latest version is the staging or production version, a fresh version is
// cloned from it.

use akaform_api::AppSec;
use akaform_api::appsec::{CreateConfigurationVersionCloneRequest, GetConfigurationRequest};
use tracing::{debug, error};

use crate::error::CoreError;

fn lookup_failed(what: &'static str, config_id: i64, source: akaform_api::Error) -> CoreError {
    error!(config_id, "failed to resolve {what}: {source}");
    CoreError::RemoteLookupFailed {
        what,
        config_id,
        source,
    }
}

/// Latest version number of configuration `config_id`.
pub async fn resolve_latest(appsec: &dyn AppSec, config_id: i64) -> Result<i64, CoreError> {
    let config = appsec
        .get_configuration(GetConfigurationRequest { config_id })
        .await
        .map_err(|e| lookup_failed("latest version", config_id, e))?;
    debug!(config_id, version = config.latest_version, "resolved latest version");
    Ok(config.latest_version)
}

/// A version of `config_id` that may be edited, cloning one if needed.
///
/// `resource_kind` only labels the log output.
pub async fn resolve_modifiable(
    appsec: &dyn AppSec,
    config_id: i64,
    resource_kind: &str,
) -> Result<i64, CoreError> {
    let config = appsec
        .get_configuration(GetConfigurationRequest { config_id })
        .await
        .map_err(|e| lookup_failed("modifiable version", config_id, e))?;
    let latest = config.latest_version;

    if !config.latest_is_activated() {
        debug!(config_id, version = latest, resource_kind, "latest version is editable");
        return Ok(latest);
    }

    let created = appsec
        .create_configuration_version_clone(CreateConfigurationVersionCloneRequest {
            config_id,
            create_from_version: latest,
            rule_update: false,
        })
        .await
        .map_err(|e| lookup_failed("new configuration version", config_id, e))?;

    debug!(
        config_id,
        based_on = latest,
        version = created.version,
        resource_kind,
        "cloned new editable version"
    );
    Ok(created.version)
}
