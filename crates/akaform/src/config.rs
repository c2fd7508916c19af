//! CLI configuration: thin wrapper around `akaform_config` shared types.
//!
//! Resolves the active profile with `GlobalOpts` overrides and builds the
//! `Provider`. Without a profile, the provider is built over an offline
//! facade so local-only commands (schemas, Cloudlets match rules) work.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use akaform_api::appsec::{
    CreateConfigurationVersionCloneRequest, CreateConfigurationVersionCloneResponse,
    GetAdvancedSettingsPrefetchRequest, GetAdvancedSettingsPrefetchResponse,
    GetConfigurationRequest, GetConfigurationResponse, GetCustomRuleActionsRequest,
    GetCustomRuleActionsResponse, GetRuleRequest, GetRuleResponse, GetSelectableHostnamesRequest,
    GetSelectableHostnamesResponse, GetWAFModeRequest, GetWAFModeResponse,
    UpdateAdvancedSettingsPrefetchRequest, UpdateAdvancedSettingsPrefetchResponse,
    UpdateConditionExceptionRequest, UpdateConditionExceptionResponse, UpdateRuleRequest,
    UpdateRuleResponse,
};
use akaform_api::gtm::{
    CreateCidrMapRequest, CreateCidrMapResponse, CreateDatacenterResponse,
    CreateMapsDefaultDatacenterRequest, Datacenter, DeleteCidrMapRequest, DeleteCidrMapResponse,
    GetCidrMapRequest, GetCidrMapResponse, GetDatacenterRequest, GetDomainStatusRequest,
    GetDomainStatusResponse, UpdateCidrMapRequest, UpdateCidrMapResponse,
};
use akaform_api::{AppSec, Error as ApiError, Gtm, TlsMode};
use akaform_core::{ClientConfig, Provider, ProviderOptions};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use akaform_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, profile_to_client_config,
};

// ── Profile resolution ──────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Translate a `Profile` + global flags into a `ClientConfig`.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<ClientConfig, CliError> {
    let mut config = profile_to_client_config(profile, profile_name, defaults)?;
    if global.insecure {
        config.tls = TlsMode::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    Ok(config)
}

/// Build the provider for the active profile.
pub fn build_provider(global: &GlobalOpts) -> Result<Provider, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        let client_config = resolve_profile(profile, &profile_name, &cfg.defaults, global)?;
        return Ok(Provider::connect(&client_config)?);
    }

    // An explicitly requested profile must exist.
    if global.profile.is_some() {
        let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
        available.sort();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: if available.is_empty() {
                "(none)".into()
            } else {
                available.join(", ")
            },
        });
    }

    debug!(profile = %profile_name, "no profile configured, using offline facades");
    let offline = Arc::new(Offline {
        profile: profile_name,
    });
    Ok(Provider::new(
        Arc::clone(&offline) as Arc<dyn AppSec>,
        offline,
        ProviderOptions {
            gtm_poll_interval: Duration::from_secs(cfg.defaults.gtm_poll_interval_secs),
            gtm_poll_attempts: cfg.defaults.gtm_poll_attempts,
        },
    ))
}

// ── Offline facade ──────────────────────────────────────────────────

/// Facade for runs without credentials. Every remote call fails with an
/// authentication error naming the profile.
struct Offline {
    profile: String,
}

impl Offline {
    fn fail<T>(&self) -> Result<T, ApiError> {
        Err(ApiError::Authentication {
            message: format!("no credentials configured for profile '{}'", self.profile),
        })
    }
}

#[async_trait]
impl AppSec for Offline {
    async fn get_configuration(
        &self,
        _req: GetConfigurationRequest,
    ) -> Result<GetConfigurationResponse, ApiError> {
        self.fail()
    }

    async fn create_configuration_version_clone(
        &self,
        _req: CreateConfigurationVersionCloneRequest,
    ) -> Result<CreateConfigurationVersionCloneResponse, ApiError> {
        self.fail()
    }

    async fn get_waf_mode(&self, _req: GetWAFModeRequest) -> Result<GetWAFModeResponse, ApiError> {
        self.fail()
    }

    async fn get_rule(&self, _req: GetRuleRequest) -> Result<GetRuleResponse, ApiError> {
        self.fail()
    }

    async fn update_rule(&self, _req: UpdateRuleRequest) -> Result<UpdateRuleResponse, ApiError> {
        self.fail()
    }

    async fn update_rule_condition_exception(
        &self,
        _req: UpdateConditionExceptionRequest,
    ) -> Result<UpdateConditionExceptionResponse, ApiError> {
        self.fail()
    }

    async fn get_custom_rule_actions(
        &self,
        _req: GetCustomRuleActionsRequest,
    ) -> Result<GetCustomRuleActionsResponse, ApiError> {
        self.fail()
    }

    async fn get_advanced_settings_prefetch(
        &self,
        _req: GetAdvancedSettingsPrefetchRequest,
    ) -> Result<GetAdvancedSettingsPrefetchResponse, ApiError> {
        self.fail()
    }

    async fn update_advanced_settings_prefetch(
        &self,
        _req: UpdateAdvancedSettingsPrefetchRequest,
    ) -> Result<UpdateAdvancedSettingsPrefetchResponse, ApiError> {
        self.fail()
    }

    async fn get_selectable_hostnames(
        &self,
        _req: GetSelectableHostnamesRequest,
    ) -> Result<GetSelectableHostnamesResponse, ApiError> {
        self.fail()
    }
}

#[async_trait]
impl Gtm for Offline {
    async fn get_cidr_map(&self, _req: GetCidrMapRequest) -> Result<GetCidrMapResponse, ApiError> {
        self.fail()
    }

    async fn create_cidr_map(
        &self,
        _req: CreateCidrMapRequest,
    ) -> Result<CreateCidrMapResponse, ApiError> {
        self.fail()
    }

    async fn update_cidr_map(
        &self,
        _req: UpdateCidrMapRequest,
    ) -> Result<UpdateCidrMapResponse, ApiError> {
        self.fail()
    }

    async fn delete_cidr_map(
        &self,
        _req: DeleteCidrMapRequest,
    ) -> Result<DeleteCidrMapResponse, ApiError> {
        self.fail()
    }

    async fn get_datacenter(&self, _req: GetDatacenterRequest) -> Result<Datacenter, ApiError> {
        self.fail()
    }

    async fn create_maps_default_datacenter(
        &self,
        _req: CreateMapsDefaultDatacenterRequest,
    ) -> Result<CreateDatacenterResponse, ApiError> {
        self.fail()
    }

    async fn get_domain_status(
        &self,
        _req: GetDomainStatusRequest,
    ) -> Result<GetDomainStatusResponse, ApiError> {
        self.fail()
    }
}
