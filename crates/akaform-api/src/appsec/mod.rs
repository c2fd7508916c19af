// AppSec (Application Security v1) facade
//
// `AppSec` is the seam the provider core talks to; `AppSecClient` is the
// EdgeGrid-backed implementation. Tests substitute recording fakes.

pub mod client;
pub mod types;

use async_trait::async_trait;

use crate::error::Error;

pub use client::AppSecClient;
pub use types::*;

/// Typed request/response operations against the AppSec API.
#[async_trait]
pub trait AppSec: Send + Sync {
    async fn get_configuration(
        &self,
        req: GetConfigurationRequest,
    ) -> Result<GetConfigurationResponse, Error>;

    async fn create_configuration_version_clone(
        &self,
        req: CreateConfigurationVersionCloneRequest,
    ) -> Result<CreateConfigurationVersionCloneResponse, Error>;

    async fn get_waf_mode(&self, req: GetWAFModeRequest) -> Result<GetWAFModeResponse, Error>;

    async fn get_rule(&self, req: GetRuleRequest) -> Result<GetRuleResponse, Error>;

    async fn update_rule(&self, req: UpdateRuleRequest) -> Result<UpdateRuleResponse, Error>;

    async fn update_rule_condition_exception(
        &self,
        req: UpdateConditionExceptionRequest,
    ) -> Result<UpdateConditionExceptionResponse, Error>;

    async fn get_custom_rule_actions(
        &self,
        req: GetCustomRuleActionsRequest,
    ) -> Result<GetCustomRuleActionsResponse, Error>;

    async fn get_advanced_settings_prefetch(
        &self,
        req: GetAdvancedSettingsPrefetchRequest,
    ) -> Result<GetAdvancedSettingsPrefetchResponse, Error>;

    async fn update_advanced_settings_prefetch(
        &self,
        req: UpdateAdvancedSettingsPrefetchRequest,
    ) -> Result<UpdateAdvancedSettingsPrefetchResponse, Error>;

    async fn get_selectable_hostnames(
        &self,
        req: GetSelectableHostnamesRequest,
    ) -> Result<GetSelectableHostnamesResponse, Error>;
}
