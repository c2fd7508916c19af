// ── AppSec request / response types ──
//
// Request structs carry path parameters (and body fields where the endpoint
// takes one); response structs mirror the JSON the AppSec v1 API returns.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::value::RawValue;

// ── Configuration ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetConfigurationRequest {
    pub config_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetConfigurationResponse {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub latest_version: i64,
    #[serde(default)]
    pub staging_version: Option<i64>,
    #[serde(default)]
    pub production_version: Option<i64>,
}

impl GetConfigurationResponse {
    /// `true` when the latest version is the one activated on staging or
    /// production, which makes it read-only.
    pub fn latest_is_activated(&self) -> bool {
        self.staging_version == Some(self.latest_version)
            || self.production_version == Some(self.latest_version)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConfigurationVersionCloneRequest {
    #[serde(skip)]
    pub config_id: i64,
    pub create_from_version: i64,
    pub rule_update: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConfigurationVersionCloneResponse {
    #[serde(default)]
    pub config_id: i64,
    pub version: i64,
    #[serde(default)]
    pub based_on: Option<i64>,
}

// ── WAF mode ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetWAFModeRequest {
    pub config_id: i64,
    pub version: i64,
    pub policy_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetWAFModeResponse {
    #[serde(default)]
    pub current: String,
    pub mode: String,
    #[serde(default)]
    pub eval: Option<String>,
}

// ── Rules ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetRuleRequest {
    pub config_id: i64,
    pub version: i64,
    pub policy_id: String,
    pub rule_id: i64,
}

/// Conditions and exceptions attached to a rule.
///
/// The inner structures are passed through untouched; the provider only
/// needs to know whether each part is present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleConditionException {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<Value>,
    #[serde(
        default,
        rename = "advancedExceptions",
        skip_serializing_if = "Option::is_none"
    )]
    pub advanced_exceptions_list: Option<Value>,
}

impl RuleConditionException {
    pub fn is_empty(&self) -> bool {
        fn blank(v: Option<&Value>) -> bool {
            match v {
                None | Some(Value::Null) => true,
                Some(Value::Array(a)) => a.is_empty(),
                Some(Value::Object(o)) => o.is_empty(),
                Some(_) => false,
            }
        }
        blank(self.conditions.as_ref())
            && blank(self.exception.as_ref())
            && blank(self.advanced_exceptions_list.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetRuleResponse {
    #[serde(default)]
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_exception: Option<RuleConditionException>,
}

impl GetRuleResponse {
    pub fn is_empty_condition_exception(&self) -> bool {
        self.condition_exception
            .as_ref()
            .is_none_or(RuleConditionException::is_empty)
    }
}

/// Rule action update. `json_payload_raw` is forwarded verbatim as the
/// `conditionException` member of the request body.
#[derive(Debug, Clone)]
pub struct UpdateRuleRequest {
    pub config_id: i64,
    pub version: i64,
    pub policy_id: String,
    pub rule_id: i64,
    pub action: String,
    pub json_payload_raw: Option<Box<RawValue>>,
}

impl PartialEq for UpdateRuleRequest {
    fn eq(&self, other: &Self) -> bool {
        self.config_id == other.config_id
            && self.version == other.version
            && self.policy_id == other.policy_id
            && self.rule_id == other.rule_id
            && self.action == other.action
            && self.json_payload_raw.as_ref().map(|r| r.get())
                == other.json_payload_raw.as_ref().map(|r| r.get())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateRuleBody<'a> {
    pub action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_exception: Option<&'a RawValue>,
}

pub type UpdateRuleResponse = GetRuleResponse;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateConditionExceptionRequest {
    pub config_id: i64,
    pub version: i64,
    pub policy_id: String,
    pub rule_id: i64,
    pub conditions: Option<Value>,
    pub exception: Option<Value>,
    pub advanced_exceptions_list: Option<Value>,
}

impl UpdateConditionExceptionRequest {
    pub(crate) fn body(&self) -> RuleConditionException {
        RuleConditionException {
            conditions: self.conditions.clone(),
            exception: self.exception.clone(),
            advanced_exceptions_list: self.advanced_exceptions_list.clone(),
        }
    }
}

pub type UpdateConditionExceptionResponse = RuleConditionException;

// ── Custom rule actions ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetCustomRuleActionsRequest {
    pub config_id: i64,
    pub version: i64,
    pub policy_id: String,
    /// 0 = all custom rules.
    pub rule_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRuleAction {
    pub action: String,
    #[serde(rename = "id")]
    pub rule_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

pub type GetCustomRuleActionsResponse = Vec<CustomRuleAction>;

// ── Advanced settings: prefetch ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetAdvancedSettingsPrefetchRequest {
    pub config_id: i64,
    pub version: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedSettingsPrefetch {
    pub all_extensions: bool,
    pub enable_app_layer: bool,
    pub enable_rate_controls: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
}

pub type GetAdvancedSettingsPrefetchResponse = AdvancedSettingsPrefetch;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateAdvancedSettingsPrefetchRequest {
    pub config_id: i64,
    pub version: i64,
    pub all_extensions: bool,
    pub enable_app_layer: bool,
    pub enable_rate_controls: bool,
    pub extensions: Option<Vec<String>>,
}

impl UpdateAdvancedSettingsPrefetchRequest {
    pub(crate) fn body(&self) -> AdvancedSettingsPrefetch {
        AdvancedSettingsPrefetch {
            all_extensions: self.all_extensions,
            enable_app_layer: self.enable_app_layer,
            enable_rate_controls: self.enable_rate_controls,
            extensions: self.extensions.clone(),
        }
    }
}

pub type UpdateAdvancedSettingsPrefetchResponse = AdvancedSettingsPrefetch;

// ── Selectable hostnames ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetSelectableHostnamesRequest {
    pub config_id: i64,
    pub version: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectableHostname {
    pub hostname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSelectableHostnamesResponse {
    #[serde(default)]
    pub available_set: Vec<SelectableHostname>,
    #[serde(default)]
    pub error_set: Vec<SelectableHostname>,
    #[serde(default)]
    pub protect: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_condition_exception_detection() {
        let rule: GetRuleResponse = serde_json::from_value(json!({ "action": "alert" })).unwrap();
        assert!(rule.is_empty_condition_exception());

        let rule: GetRuleResponse = serde_json::from_value(json!({
            "action": "alert",
            "conditionException": { "conditions": [] }
        }))
        .unwrap();
        assert!(rule.is_empty_condition_exception());

        let rule: GetRuleResponse = serde_json::from_value(json!({
            "action": "alert",
            "conditionException": {
                "exception": { "headerCookieOrParamValues": ["abc"] }
            }
        }))
        .unwrap();
        assert!(!rule.is_empty_condition_exception());
    }

    #[test]
    fn advanced_exceptions_use_api_name() {
        let ce = RuleConditionException {
            advanced_exceptions_list: Some(json!({ "conditionOperator": "AND" })),
            ..RuleConditionException::default()
        };
        let encoded = serde_json::to_value(&ce).unwrap();
        assert_eq!(
            encoded,
            json!({ "advancedExceptions": { "conditionOperator": "AND" } })
        );
    }

    #[test]
    fn activated_latest_version() {
        let mut config: GetConfigurationResponse = serde_json::from_value(json!({
            "id": 43253,
            "latestVersion": 7,
            "stagingVersion": 6,
            "productionVersion": 5
        }))
        .unwrap();
        assert!(!config.latest_is_activated());

        config.staging_version = Some(7);
        assert!(config.latest_is_activated());
    }
}
