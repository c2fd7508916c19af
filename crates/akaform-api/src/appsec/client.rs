// Hand-crafted async HTTP client for the AppSec API.
//
// Base path: /appsec/v1/
// Auth: EdgeGrid (via `Session`)

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::AppSec;
use super::types::{
    CreateConfigurationVersionCloneRequest, CreateConfigurationVersionCloneResponse,
    GetAdvancedSettingsPrefetchRequest, GetAdvancedSettingsPrefetchResponse,
    GetConfigurationRequest, GetConfigurationResponse, GetCustomRuleActionsRequest,
    GetCustomRuleActionsResponse,
    GetRuleRequest, GetRuleResponse, GetSelectableHostnamesRequest,
    GetSelectableHostnamesResponse, GetWAFModeRequest, GetWAFModeResponse,
    UpdateAdvancedSettingsPrefetchRequest, UpdateAdvancedSettingsPrefetchResponse,
    UpdateConditionExceptionRequest, UpdateConditionExceptionResponse, UpdateRuleBody,
    UpdateRuleRequest, UpdateRuleResponse,
};
use crate::error::Error;
use crate::session::Session;

/// EdgeGrid-backed AppSec client.
#[derive(Clone)]
pub struct AppSecClient {
    session: Arc<Session>,
}

impl AppSecClient {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    // ── Path builders ────────────────────────────────────────────────

    fn version_path(config_id: i64, version: i64) -> String {
        format!("appsec/v1/configs/{config_id}/versions/{version}")
    }

    fn policy_path(config_id: i64, version: i64, policy_id: &str) -> String {
        format!(
            "{}/security-policies/{policy_id}",
            Self::version_path(config_id, version)
        )
    }

    fn rule_path(config_id: i64, version: i64, policy_id: &str, rule_id: i64) -> String {
        format!(
            "{}/rules/{rule_id}",
            Self::policy_path(config_id, version, policy_id)
        )
    }
}

#[async_trait]
impl AppSec for AppSecClient {
    // ── Configurations ───────────────────────────────────────────────

    async fn get_configuration(
        &self,
        req: GetConfigurationRequest,
    ) -> Result<GetConfigurationResponse, Error> {
        self.session
            .get(&format!("appsec/v1/configs/{}", req.config_id))
            .await
    }

    async fn create_configuration_version_clone(
        &self,
        req: CreateConfigurationVersionCloneRequest,
    ) -> Result<CreateConfigurationVersionCloneResponse, Error> {
        debug!(
            config_id = req.config_id,
            from = req.create_from_version,
            "cloning configuration version"
        );
        self.session
            .post(&format!("appsec/v1/configs/{}/versions", req.config_id), &req)
            .await
    }

    // ── WAF mode ─────────────────────────────────────────────────────

    async fn get_waf_mode(&self, req: GetWAFModeRequest) -> Result<GetWAFModeResponse, Error> {
        self.session
            .get(&format!(
                "{}/mode",
                Self::policy_path(req.config_id, req.version, &req.policy_id)
            ))
            .await
    }

    // ── Rules ────────────────────────────────────────────────────────

    async fn get_rule(&self, req: GetRuleRequest) -> Result<GetRuleResponse, Error> {
        self.session
            .get(&Self::rule_path(
                req.config_id,
                req.version,
                &req.policy_id,
                req.rule_id,
            ))
            .await
    }

    async fn update_rule(&self, req: UpdateRuleRequest) -> Result<UpdateRuleResponse, Error> {
        let body = UpdateRuleBody {
            action: &req.action,
            condition_exception: req.json_payload_raw.as_deref(),
        };
        let bytes = serde_json::to_vec(&body).map_err(|e| Error::Deserialization {
            message: format!("failed to encode rule update: {e}"),
            body: String::new(),
        })?;
        self.session
            .put_raw(
                &Self::rule_path(req.config_id, req.version, &req.policy_id, req.rule_id),
                bytes,
            )
            .await
    }

    async fn update_rule_condition_exception(
        &self,
        req: UpdateConditionExceptionRequest,
    ) -> Result<UpdateConditionExceptionResponse, Error> {
        let path = format!(
            "{}/condition-exception",
            Self::rule_path(req.config_id, req.version, &req.policy_id, req.rule_id)
        );
        self.session.put(&path, &req.body()).await
    }

    // ── Custom rules ─────────────────────────────────────────────────

    async fn get_custom_rule_actions(
        &self,
        req: GetCustomRuleActionsRequest,
    ) -> Result<GetCustomRuleActionsResponse, Error> {
        let path = format!(
            "{}/custom-rules",
            Self::policy_path(req.config_id, req.version, &req.policy_id)
        );
        let mut actions: GetCustomRuleActionsResponse = self.session.get(&path).await?;
        if req.rule_id != 0 {
            actions.retain(|a| a.rule_id == req.rule_id);
        }
        Ok(actions)
    }

    // ── Advanced settings ────────────────────────────────────────────

    async fn get_advanced_settings_prefetch(
        &self,
        req: GetAdvancedSettingsPrefetchRequest,
    ) -> Result<GetAdvancedSettingsPrefetchResponse, Error> {
        self.session
            .get(&format!(
                "{}/advanced-settings/prefetch",
                Self::version_path(req.config_id, req.version)
            ))
            .await
    }

    async fn update_advanced_settings_prefetch(
        &self,
        req: UpdateAdvancedSettingsPrefetchRequest,
    ) -> Result<UpdateAdvancedSettingsPrefetchResponse, Error> {
        self.session
            .put(
                &format!(
                    "{}/advanced-settings/prefetch",
                    Self::version_path(req.config_id, req.version)
                ),
                &req.body(),
            )
            .await
    }

    // ── Hostnames ────────────────────────────────────────────────────

    async fn get_selectable_hostnames(
        &self,
        req: GetSelectableHostnamesRequest,
    ) -> Result<GetSelectableHostnamesResponse, Error> {
        self.session
            .get(&format!(
                "{}/selectable-hostnames",
                Self::version_path(req.config_id, req.version)
            ))
            .await
    }
}
