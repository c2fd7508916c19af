// akamai_appsec_rule
//
// Action and condition/exception of one WAF rule in a security policy.
// The id is `configID:securityPolicyID:ruleID`.

use std::sync::Arc;

use akaform_api::AppSec;
use akaform_api::appsec::{
    GetRuleRequest, GetWAFModeRequest, UpdateConditionExceptionRequest, UpdateRuleRequest,
};
use async_trait::async_trait;
use tracing::{debug, error};

use crate::error::CoreError;
use crate::id::RuleId;
use crate::provider::Resource;
use crate::schema::{
    Attribute, ResourceData, Schema, json_equivalent, optional, string_is_json, validate_actions,
};
use crate::version::{resolve_latest, resolve_modifiable};
use crate::waf::{RuleChange, WafMode, plan_delete, plan_update};

pub const TYPE_NAME: &str = "akamai_appsec_rule";

pub struct AppSecRuleResource {
    appsec: Arc<dyn AppSec>,
    schema: Schema,
}

impl AppSecRuleResource {
    pub fn new(appsec: Arc<dyn AppSec>) -> Self {
        let schema = Schema::new()
            .attr("config_id", Attribute::required_int())
            .attr("security_policy_id", Attribute::required_string())
            .attr("rule_id", Attribute::required_int())
            .attr(
                "rule_action",
                Attribute::optional_string()
                    .computed()
                    .with_validator(validate_actions())
                    .with_description("Ignored when the policy is in automatic (ASE_AUTO) mode"),
            )
            .attr(
                "condition_exception",
                Attribute::optional_string()
                    .with_default("")
                    .with_validator(string_is_json())
                    .with_diff_suppress(json_equivalent)
                    .with_description("JSON conditions and exceptions for the rule"),
            );
        Self { appsec, schema }
    }

    fn declared_id(data: &ResourceData) -> Result<RuleId, CoreError> {
        Ok(RuleId {
            config_id: data.get_int("config_id")?,
            policy_id: data.get_string("security_policy_id")?,
            rule_id: data.get_int("rule_id")?,
        })
    }

    async fn waf_mode(&self, id: &RuleId, version: i64) -> Result<WafMode, CoreError> {
        let resp = self
            .appsec
            .get_waf_mode(GetWAFModeRequest {
                config_id: id.config_id,
                version,
                policy_id: id.policy_id.clone(),
            })
            .await
            .map_err(|e| {
                error!("calling 'getWAFMode': {e}");
                CoreError::operation("calling 'getWAFMode'", e)
            })?;
        Ok(WafMode::parse(&resp.mode))
    }

    /// Issue the one mutating call a `RuleChange` stands for.
    async fn apply(&self, id: &RuleId, version: i64, change: RuleChange) -> Result<(), CoreError> {
        match change {
            RuleChange::Automatic { exception } => {
                let resp = self
                    .appsec
                    .update_rule_condition_exception(UpdateConditionExceptionRequest {
                        config_id: id.config_id,
                        version,
                        policy_id: id.policy_id.clone(),
                        rule_id: id.rule_id,
                        conditions: exception.conditions,
                        exception: exception.exception,
                        advanced_exceptions_list: exception.advanced_exceptions_list,
                    })
                    .await
                    .map_err(|e| {
                        error!("calling 'UpdateRuleConditionException': {e}");
                        CoreError::operation("calling 'UpdateRuleConditionException'", e)
                    })?;
                debug!(?resp, "calling 'UpdateRuleConditionException' response");
            }
            RuleChange::Manual { action, raw } => {
                let resp = self
                    .appsec
                    .update_rule(UpdateRuleRequest {
                        config_id: id.config_id,
                        version,
                        policy_id: id.policy_id.clone(),
                        rule_id: id.rule_id,
                        action,
                        json_payload_raw: raw,
                    })
                    .await
                    .map_err(|e| {
                        error!("calling 'UpdateRule': {e}");
                        CoreError::operation("calling 'UpdateRule'", e)
                    })?;
                debug!(?resp, "calling 'UpdateRule' response");
            }
        }
        Ok(())
    }

    /// Shared body of create and update.
    async fn upsert(&self, id: &RuleId, data: &ResourceData) -> Result<(), CoreError> {
        let condition_exception =
            optional(data.get_string("condition_exception"))?.unwrap_or_default();

        let version = resolve_modifiable(self.appsec.as_ref(), id.config_id, "rule").await?;
        let mode = self.waf_mode(id, version).await?;

        let action = if mode.is_automatic() {
            String::new()
        } else {
            data.get_string("rule_action")?
        };
        let change = plan_update(&mode, &action, &condition_exception)?;
        self.apply(id, version, change).await
    }

    async fn create_inner(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        let id = Self::declared_id(data)?;
        let encoded = id.encode()?;
        self.upsert(&id, data).await?;
        data.set_id(encoded);
        self.read_inner(data).await
    }

    async fn read_inner(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        let id = RuleId::parse(data.require_id()?)?;
        let version = resolve_latest(self.appsec.as_ref(), id.config_id).await?;

        let rule = self
            .appsec
            .get_rule(GetRuleRequest {
                config_id: id.config_id,
                version,
                policy_id: id.policy_id.clone(),
                rule_id: id.rule_id,
            })
            .await
            .map_err(|e| {
                error!("calling 'getRule': {e}");
                CoreError::operation("calling 'getRule'", e)
            })?;

        data.set("config_id", id.config_id)?;
        data.set("security_policy_id", id.policy_id.as_str())?;
        data.set("rule_id", id.rule_id)?;
        data.set("rule_action", rule.action.as_str())?;

        if let Some(ce) = rule
            .condition_exception
            .as_ref()
            .filter(|ce| !ce.is_empty())
        {
            let json = serde_json::to_string(ce)
                .map_err(|e| CoreError::Internal(format!("encoding condition_exception: {e}")))?;
            data.set("condition_exception", json)?;
        }
        Ok(())
    }

    async fn update_inner(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        let id = RuleId::parse(data.require_id()?)?;
        self.upsert(&id, data).await?;
        self.read_inner(data).await
    }

    async fn delete_inner(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        let id = RuleId::parse(data.require_id()?)?;
        let version = resolve_modifiable(self.appsec.as_ref(), id.config_id, "rule").await?;
        let mode = self.waf_mode(&id, version).await?;
        self.apply(&id, version, plan_delete(&mode)).await?;
        data.clear_id();
        Ok(())
    }
}

#[async_trait]
impl Resource for AppSecRuleResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn create(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        debug!(product = "APPSEC", operation = "resourceRuleCreate", "in resourceRuleCreate");
        self.create_inner(data)
            .await
            .map_err(|e| CoreError::operation("resourceRuleCreate", e))
    }

    async fn read(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        debug!(product = "APPSEC", operation = "resourceRuleRead", "in resourceRuleRead");
        self.read_inner(data)
            .await
            .map_err(|e| CoreError::operation("resourceRuleRead", e))
    }

    async fn update(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        debug!(product = "APPSEC", operation = "resourceRuleUpdate", "in resourceRuleUpdate");
        self.update_inner(data)
            .await
            .map_err(|e| CoreError::operation("resourceRuleUpdate", e))
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        debug!(product = "APPSEC", operation = "resourceRuleDelete", "in resourceRuleDelete");
        self.delete_inner(data)
            .await
            .map_err(|e| CoreError::operation("resourceRuleDelete", e))
    }

    async fn import(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        RuleId::parse(data.require_id()?)?;
        Ok(())
    }

    fn customize_diff(&self, data: &ResourceData) -> Result<(), CoreError> {
        verify_id_unchanged(data)
    }
}

/// An existing rule cannot move to another config, policy or rule id.
pub fn verify_id_unchanged(data: &ResourceData) -> Result<(), CoreError> {
    let Some(id) = data.id() else {
        return Ok(());
    };
    let current = RuleId::parse(id)?;

    let checks = [
        ("config_id", optional(data.get_int("config_id"))?.map(|v| v == current.config_id)),
        (
            "security_policy_id",
            optional(data.get_string("security_policy_id"))?.map(|v| v == current.policy_id),
        ),
        ("rule_id", optional(data.get_int("rule_id"))?.map(|v| v == current.rule_id)),
    ];
    for (name, same) in checks {
        if same == Some(false) {
            return Err(CoreError::validation(format!(
                "{name} value cannot be changed: {id} must be removed and created again"
            )));
        }
    }
    Ok(())
}
