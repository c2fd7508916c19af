// Cloudlets match-rule data sources
//
// `akamai_cloudlets_forward_rewrite_match_rule` and
// `akamai_cloudlets_visitor_prioritization_match_rule` turn declared match
// rules into the JSON document a cloudlet policy version expects. Nothing
// is sent to the API; the id is the SHA-256 of the rendered JSON.

use akaform_api::cloudlets::{
    ForwardSettings, MatchCriteria, MatchRule, MatchRuleFr, MatchRuleVp, MatchRules,
    ObjectMatchValue, ObjectMatchValueOptions,
};
use async_trait::async_trait;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::CoreError;
use crate::provider::DataSource;
use crate::schema::{AttrType, Attribute, ResourceData, Schema, float_between, one_of, optional};

pub const FORWARD_REWRITE_TYPE_NAME: &str = "akamai_cloudlets_forward_rewrite_match_rule";
pub const VISITOR_PRIORITIZATION_TYPE_NAME: &str =
    "akamai_cloudlets_visitor_prioritization_match_rule";

const OBJECT_MATCH_VALUE_TYPES: &[&str] = &["simple", "object"];
const MATCH_OPERATORS: &[&str] = &["contains", "exists", "equals", ""];
const CHECK_IPS: &[&str] = &["CONNECTING_IP", "XFF_HEADERS", "CONNECTING_IP XFF_HEADERS", ""];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRuleKind {
    ForwardRewrite,
    VisitorPrioritization,
}

impl MatchRuleKind {
    fn rule_type(self) -> &'static str {
        match self {
            Self::ForwardRewrite => "frMatchRule",
            Self::VisitorPrioritization => "vpMatchRule",
        }
    }
}

pub struct CloudletsMatchRuleDataSource {
    kind: MatchRuleKind,
    schema: Schema,
}

// ── Schema ───────────────────────────────────────────────────────────

fn object_match_value_type() -> AttrType {
    AttrType::block([
        ("type", AttrType::String),
        ("name", AttrType::String),
        ("name_case_sensitive", AttrType::Bool),
        ("name_has_wildcard", AttrType::Bool),
        ("value", AttrType::list_of(AttrType::String)),
        (
            "options",
            AttrType::block([
                ("value", AttrType::list_of(AttrType::String)),
                ("value_has_wildcard", AttrType::Bool),
                ("value_case_sensitive", AttrType::Bool),
                ("value_escaped", AttrType::Bool),
            ]),
        ),
    ])
}

fn matches_type() -> AttrType {
    AttrType::list_of(AttrType::block([
        ("match_type", AttrType::String),
        ("match_value", AttrType::String),
        ("match_operator", AttrType::String),
        ("case_sensitive", AttrType::Bool),
        ("negate", AttrType::Bool),
        ("check_ips", AttrType::String),
        ("object_match_value", object_match_value_type()),
    ]))
}

fn rule_type(kind: MatchRuleKind) -> AttrType {
    let mut fields = vec![
        ("type", AttrType::String),
        ("name", AttrType::String),
        ("start", AttrType::Int),
        ("end", AttrType::Int),
        ("match_url", AttrType::String),
        ("matches", matches_type()),
        ("disabled", AttrType::Bool),
    ];
    match kind {
        MatchRuleKind::ForwardRewrite => fields.push((
            "forward_settings",
            AttrType::block([
                ("path_and_qs", AttrType::String),
                ("use_incoming_query_string", AttrType::Bool),
                ("origin_id", AttrType::String),
            ]),
        )),
        MatchRuleKind::VisitorPrioritization => {
            fields.push(("pass_through_percent", AttrType::Float));
        }
    }
    AttrType::block(fields)
}

impl CloudletsMatchRuleDataSource {
    fn new(kind: MatchRuleKind) -> Self {
        let schema = Schema::new()
            .attr(
                "match_rules",
                Attribute::optional(AttrType::list_of(rule_type(kind)))
                    .with_description("A list of rules for policy"),
            )
            .attr(
                "json",
                Attribute::computed_only(AttrType::String)
                    .with_description("The match rules as JSON"),
            );
        Self { kind, schema }
    }

    pub fn forward_rewrite() -> Self {
        Self::new(MatchRuleKind::ForwardRewrite)
    }

    pub fn visitor_prioritization() -> Self {
        Self::new(MatchRuleKind::VisitorPrioritization)
    }

    pub fn kind(&self) -> MatchRuleKind {
        self.kind
    }

    fn parse_rule(&self, index: usize, value: &Value) -> Result<MatchRule, CoreError> {
        let rule = Block::new(format!("match_rules.{index}"), value)?;
        let matches = rule
            .list("matches")
            .iter()
            .enumerate()
            .map(|(i, m)| parse_match(&rule.child(&format!("matches.{i}")), m))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(match self.kind {
            MatchRuleKind::ForwardRewrite => {
                let forward_settings = match rule.get("forward_settings") {
                    Some(v) => {
                        let fs = Block::new(rule.child("forward_settings"), v)?;
                        ForwardSettings {
                            path_and_qs: fs.string("path_and_qs"),
                            use_incoming_query_string: fs.bool("use_incoming_query_string"),
                            origin_id: fs.string("origin_id"),
                        }
                    }
                    None => ForwardSettings::default(),
                };
                MatchRule::ForwardRewrite(MatchRuleFr {
                    name: rule.string("name"),
                    start: rule.int("start"),
                    end: rule.int("end"),
                    match_url: rule.string("match_url"),
                    matches,
                    forward_settings,
                    disabled: rule.bool("disabled"),
                })
            }
            MatchRuleKind::VisitorPrioritization => {
                let percent = rule.required("pass_through_percent")?;
                float_between(-1.0, 100.0)("pass_through_percent", percent)
                    .map_err(CoreError::validation)?;
                MatchRule::VisitorPrioritization(MatchRuleVp {
                    name: rule.string("name"),
                    start: rule.int("start"),
                    end: rule.int("end"),
                    match_url: rule.string("match_url"),
                    matches,
                    pass_through_percent: percent.as_f64().unwrap_or_default(),
                    disabled: rule.bool("disabled"),
                })
            }
        })
    }

    fn read_inner(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        let declared = optional(data.get_list("match_rules"))?
            .cloned()
            .unwrap_or_default();

        let match_rules = declared
            .iter()
            .enumerate()
            .map(|(i, v)| self.parse_rule(i, v))
            .collect::<Result<Vec<_>, _>>()?;

        let json = serde_json::to_string_pretty(&MatchRules { match_rules })
            .map_err(|e| CoreError::Internal(format!("encoding match rules: {e}")))?;

        let typed: Vec<Value> = declared
            .into_iter()
            .map(|mut v| {
                if let Some(obj) = v.as_object_mut() {
                    obj.insert("type".into(), Value::from(self.kind.rule_type()));
                }
                v
            })
            .collect();
        data.set("match_rules", typed)?;
        data.set("json", json.as_str())?;
        data.set_id(sha256_hex(&json));
        Ok(())
    }
}

#[async_trait]
impl DataSource for CloudletsMatchRuleDataSource {
    fn type_name(&self) -> &'static str {
        match self.kind {
            MatchRuleKind::ForwardRewrite => FORWARD_REWRITE_TYPE_NAME,
            MatchRuleKind::VisitorPrioritization => VISITOR_PRIORITIZATION_TYPE_NAME,
        }
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn read(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        debug!(product = "Cloudlets", data_source = self.type_name(), "reading match rules");
        self.read_inner(data)
    }
}

fn sha256_hex(text: &str) -> String {
    Sha256::digest(text.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

// ── Nested block access ──────────────────────────────────────────────

/// A nested block plus its dotted path, for error messages.
struct Block<'a> {
    path: String,
    fields: &'a Map<String, Value>,
}

impl<'a> Block<'a> {
    fn new(path: String, value: &'a Value) -> Result<Self, CoreError> {
        let fields = value
            .as_object()
            .ok_or_else(|| CoreError::validation(format!("{path}: expected block")))?;
        Ok(Self { path, fields })
    }

    fn child(&self, name: &str) -> String {
        format!("{}.{name}", self.path)
    }

    fn get(&self, name: &str) -> Option<&'a Value> {
        self.fields.get(name).filter(|v| !v.is_null())
    }

    fn required(&self, name: &str) -> Result<&'a Value, CoreError> {
        self.get(name).ok_or_else(|| {
            CoreError::validation(format!(
                "Missing required argument: the argument \"{}\" is required",
                self.child(name)
            ))
        })
    }

    fn string(&self, name: &str) -> String {
        self.get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned()
    }

    fn bool(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or_default()
    }

    fn int(&self, name: &str) -> i64 {
        self.get(name).and_then(Value::as_i64).unwrap_or_default()
    }

    fn list(&self, name: &str) -> &'a [Value] {
        self.get(name)
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice)
    }

    fn strings(&self, name: &str) -> Vec<String> {
        self.list(name)
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect()
    }
}

fn check_one_of(
    allowed: &'static [&'static str],
    name: &str,
    value: &str,
) -> Result<(), CoreError> {
    one_of(allowed)(name, &Value::from(value)).map_err(CoreError::validation)
}

fn parse_match(path: &str, value: &Value) -> Result<MatchCriteria, CoreError> {
    let m = Block::new(path.to_owned(), value)?;

    let match_operator = m.string("match_operator");
    check_one_of(MATCH_OPERATORS, "match_operator", &match_operator)?;
    let check_ips = m.string("check_ips");
    check_one_of(CHECK_IPS, "check_ips", &check_ips)?;

    let object_match_value = match m.get("object_match_value") {
        Some(v) => Some(parse_object_match_value(&m.child("object_match_value"), v)?),
        None => None,
    };

    Ok(MatchCriteria {
        match_type: m.string("match_type"),
        match_value: m.string("match_value"),
        match_operator,
        case_sensitive: m.bool("case_sensitive"),
        negate: m.bool("negate"),
        check_ips,
        object_match_value,
    })
}

fn parse_object_match_value(path: &str, value: &Value) -> Result<ObjectMatchValue, CoreError> {
    let omv = Block::new(path.to_owned(), value)?;
    let ty = omv
        .required("type")?
        .as_str()
        .unwrap_or_default()
        .to_owned();
    check_one_of(OBJECT_MATCH_VALUE_TYPES, "type", &ty)?;

    if ty == "simple" {
        return Ok(ObjectMatchValue::Simple {
            value: omv.strings("value"),
        });
    }

    let options = match omv.get("options") {
        Some(v) => {
            let o = Block::new(omv.child("options"), v)?;
            Some(ObjectMatchValueOptions {
                value: o.strings("value"),
                value_has_wildcard: o.bool("value_has_wildcard"),
                value_case_sensitive: o.bool("value_case_sensitive"),
                value_escaped: o.bool("value_escaped"),
            })
        }
        None => None,
    };
    Ok(ObjectMatchValue::Object {
        name: omv.string("name"),
        name_case_sensitive: omv.bool("name_case_sensitive"),
        name_has_wildcard: omv.bool("name_has_wildcard"),
        options,
    })
}
