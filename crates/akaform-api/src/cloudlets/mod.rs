// Cloudlets policy match-rule types
//
// Match rules are assembled locally and handed to policy versions as JSON;
// these types fix the wire shape (`matchRules`, `matchURL`, `checkIPs`, …).

use serde::{Deserialize, Serialize};

/// `objectMatchValue`, discriminated by its `type` member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ObjectMatchValue {
    Simple {
        value: Vec<String>,
    },
    Object {
        name: String,
        name_case_sensitive: bool,
        name_has_wildcard: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        options: Option<ObjectMatchValueOptions>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMatchValueOptions {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value: Vec<String>,
    pub value_has_wildcard: bool,
    pub value_case_sensitive: bool,
    pub value_escaped: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCriteria {
    pub match_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub match_value: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub match_operator: String,
    pub case_sensitive: bool,
    pub negate: bool,
    #[serde(default, rename = "checkIPs", skip_serializing_if = "String::is_empty")]
    pub check_ips: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_match_value: Option<ObjectMatchValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardSettings {
    #[serde(default, rename = "pathAndQS", skip_serializing_if = "String::is_empty")]
    pub path_and_qs: String,
    pub use_incoming_query_string: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub origin_id: String,
}

/// Forward Rewrite match rule (`frMatchRule`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRuleFr {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub start: i64,
    pub end: i64,
    #[serde(default, rename = "matchURL", skip_serializing_if = "String::is_empty")]
    pub match_url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<MatchCriteria>,
    pub forward_settings: ForwardSettings,
    pub disabled: bool,
}

/// Visitor Prioritization match rule (`vpMatchRule`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRuleVp {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub start: i64,
    pub end: i64,
    #[serde(default, rename = "matchURL", skip_serializing_if = "String::is_empty")]
    pub match_url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<MatchCriteria>,
    pub pass_through_percent: f64,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MatchRule {
    #[serde(rename = "frMatchRule")]
    ForwardRewrite(MatchRuleFr),
    #[serde(rename = "vpMatchRule")]
    VisitorPrioritization(MatchRuleVp),
}

impl MatchRule {
    /// The wire `type` discriminator.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::ForwardRewrite(_) => "frMatchRule",
            Self::VisitorPrioritization(_) => "vpMatchRule",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRules {
    pub match_rules: Vec<MatchRule>,
}
