// ── WAF-mode-dependent rule changes ──
//
// Under automatic (ASE_AUTO) mode Akamai owns rule actions; only the
// condition/exception block may be written. Under every other mode the
// action and the condition/exception travel together in one rule update.
// The mode is inspected once per operation and turned into a `RuleChange`.

use std::str::FromStr;

use akaform_api::appsec::RuleConditionException;
use serde_json::value::RawValue;

use crate::error::CoreError;

/// Web application firewall mode of a security policy.
#[derive(Debug, Clone, PartialEq, Eq, strum::Display, strum::EnumString)]
pub enum WafMode {
    #[strum(serialize = "ASE_AUTO")]
    AseAuto,
    #[strum(serialize = "ASE_MANUAL")]
    AseManual,
    #[strum(serialize = "KRS")]
    Krs,
    #[strum(default)]
    Other(String),
}

impl WafMode {
    pub fn parse(mode: &str) -> Self {
        Self::from_str(mode).unwrap_or_else(|_| Self::Other(mode.to_owned()))
    }

    pub fn is_automatic(&self) -> bool {
        matches!(self, Self::AseAuto)
    }
}

/// The single remote mutation an operation will issue.
#[derive(Debug, Clone)]
pub enum RuleChange {
    /// `update_rule_condition_exception` with this body.
    Automatic { exception: RuleConditionException },
    /// `update_rule` with this action and condition-exception bytes.
    Manual {
        action: String,
        raw: Option<Box<RawValue>>,
    },
}

impl PartialEq for RuleChange {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Automatic { exception: a }, Self::Automatic { exception: b }) => a == b,
            (
                Self::Manual {
                    action: a,
                    raw: ra,
                },
                Self::Manual {
                    action: b,
                    raw: rb,
                },
            ) => a == b && ra.as_ref().map(|r| r.get()) == rb.as_ref().map(|r| r.get()),
            _ => false,
        }
    }
}

fn is_blank_json(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return true;
    }
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Null) => true,
        Ok(serde_json::Value::Object(o)) => o.is_empty(),
        _ => false,
    }
}

/// Plan a create/update.
///
/// `condition_exception` is the declared JSON text (empty when unset).
pub fn plan_update(
    mode: &WafMode,
    action: &str,
    condition_exception: &str,
) -> Result<RuleChange, CoreError> {
    if mode.is_automatic() {
        let exception = if condition_exception.trim().is_empty() {
            RuleConditionException::default()
        } else {
            serde_json::from_str(condition_exception).map_err(|e| {
                CoreError::validation(format!("condition_exception is not valid: {e}"))
            })?
        };
        return Ok(RuleChange::Automatic { exception });
    }

    validate_action_and_condition_exception(action, condition_exception)?;

    let raw = if condition_exception.trim().is_empty() {
        None
    } else {
        Some(
            RawValue::from_string(condition_exception.to_owned()).map_err(|e| {
                CoreError::validation(format!("condition_exception is not valid JSON: {e}"))
            })?,
        )
    };
    Ok(RuleChange::Manual {
        action: action.to_owned(),
        raw,
    })
}

/// Plan a delete: clear the exceptions in automatic mode, disable the rule
/// otherwise.
pub fn plan_delete(mode: &WafMode) -> RuleChange {
    if mode.is_automatic() {
        RuleChange::Automatic {
            exception: RuleConditionException::default(),
        }
    } else {
        RuleChange::Manual {
            action: "none".into(),
            raw: None,
        }
    }
}

/// A rule that takes no action cannot carry conditions or exceptions.
pub fn validate_action_and_condition_exception(
    action: &str,
    condition_exception: &str,
) -> Result<(), CoreError> {
    validate_action(action)?;
    if action == "none" && !is_blank_json(condition_exception) {
        return Err(CoreError::InvalidActionCombination {
            action: action.to_owned(),
            reason: "a condition or exception cannot be set when the action is \"none\"".into(),
        });
    }
    Ok(())
}

/// Accepted rule actions: `alert`, `deny`, `none`, `deny_custom_<n>`.
pub fn validate_action(action: &str) -> Result<(), CoreError> {
    let custom = action
        .strip_prefix("deny_custom_")
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()));
    if custom || matches!(action, "alert" | "deny" | "none") {
        Ok(())
    } else {
        Err(CoreError::validation(format!(
            "rule_action must be one of alert, deny, none or deny_custom_<id>, got {action:?}"
        )))
    }
}
