// ── Declarative schema and resource data ──
//
// Every adapter declares its attributes once; the host (CLI or tests) hands
// the adapter a `ResourceData` bound to that schema. Values are held as
// `serde_json::Value`s and type-checked on the way in.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::waf;

// ── Types ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum AttrType {
    Int,
    Float,
    Bool,
    String,
    List(Box<AttrType>),
    /// Nested block with its own named fields.
    Block(BTreeMap<&'static str, AttrType>),
}

impl AttrType {
    pub fn list_of(inner: AttrType) -> Self {
        Self::List(Box::new(inner))
    }

    pub fn block(fields: impl IntoIterator<Item = (&'static str, AttrType)>) -> Self {
        Self::Block(fields.into_iter().collect())
    }

    /// `true` when `value` is an acceptable value of this type.
    /// `null` is accepted everywhere and means "unset".
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null)
            | (Self::Bool, Value::Bool(_))
            | (Self::String, Value::String(_))
            | (Self::Float, Value::Number(_)) => true,
            (Self::Int, Value::Number(n)) => n.is_i64(),
            (Self::List(inner), Value::Array(items)) => items.iter().all(|v| inner.accepts(v)),
            (Self::Block(fields), Value::Object(obj)) => obj
                .iter()
                .all(|(k, v)| fields.get(k.as_str()).is_some_and(|t| t.accepts(v))),
            _ => false,
        }
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Bool => f.write_str("bool"),
            Self::String => f.write_str("string"),
            Self::List(inner) => write!(f, "list({inner})"),
            Self::Block(fields) => {
                f.write_str("block{")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {ty}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Attribute-level validator: `(attribute name, value) -> Ok | message`.
pub type Validator = Arc<dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync>;

/// Returns `true` when a change from `old` to `new` should not be reported.
pub type DiffSuppressFn = fn(old: &str, new: &str) -> bool;

// ── Attribute ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Attribute {
    pub ty: AttrType,
    pub required: bool,
    pub computed: bool,
    pub default: Option<Value>,
    pub description: &'static str,
    validators: Vec<Validator>,
    diff_suppress: Option<DiffSuppressFn>,
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("ty", &self.ty)
            .field("required", &self.required)
            .field("computed", &self.computed)
            .field("default", &self.default)
            .field("validators", &self.validators.len())
            .field("diff_suppress", &self.diff_suppress.is_some())
            .finish_non_exhaustive()
    }
}

impl Attribute {
    fn new(ty: AttrType, required: bool, computed: bool) -> Self {
        Self {
            ty,
            required,
            computed,
            default: None,
            description: "",
            validators: Vec::new(),
            diff_suppress: None,
        }
    }

    pub fn required(ty: AttrType) -> Self {
        Self::new(ty, true, false)
    }

    pub fn optional(ty: AttrType) -> Self {
        Self::new(ty, false, false)
    }

    /// Set only by the adapter, never by the user.
    pub fn computed_only(ty: AttrType) -> Self {
        Self::new(ty, false, true)
    }

    pub fn required_int() -> Self {
        Self::required(AttrType::Int)
    }

    pub fn required_string() -> Self {
        Self::required(AttrType::String)
    }

    pub fn required_bool() -> Self {
        Self::required(AttrType::Bool)
    }

    pub fn optional_int() -> Self {
        Self::optional(AttrType::Int)
    }

    pub fn optional_string() -> Self {
        Self::optional(AttrType::String)
    }

    pub fn optional_bool() -> Self {
        Self::optional(AttrType::Bool)
    }

    /// Optional attribute that the adapter fills in when left unset.
    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn with_diff_suppress(mut self, f: DiffSuppressFn) -> Self {
        self.diff_suppress = Some(f);
        self
    }

    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }
}

// ── Schema ───────────────────────────────────────────────────────────

/// Flattened attribute description, used when printing a schema.
#[derive(Debug, Clone, PartialEq, Serialize, tabled::Tabled)]
pub struct AttributeInfo {
    #[tabled(rename = "Attribute")]
    pub name: String,
    #[tabled(rename = "Type")]
    #[serde(rename = "type")]
    pub ty: String,
    #[tabled(rename = "Required")]
    pub required: bool,
    #[tabled(rename = "Computed")]
    pub computed: bool,
    #[tabled(rename = "Default")]
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default: String,
    #[tabled(rename = "Description")]
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct Schema {
    attributes: BTreeMap<&'static str, Attribute>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attr(mut self, name: &'static str, attribute: Attribute) -> Self {
        self.attributes.insert(name, attribute);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Attribute)> {
        self.attributes.iter().map(|(k, v)| (*k, v))
    }

    pub fn describe(&self) -> Vec<AttributeInfo> {
        self.iter()
            .map(|(name, a)| AttributeInfo {
                name: name.to_owned(),
                ty: a.ty.to_string(),
                required: a.required,
                computed: a.computed,
                default: a.default.as_ref().map(Value::to_string).unwrap_or_default(),
                description: a.description.to_owned(),
            })
            .collect()
    }

    /// Fill unset attributes that declare a default.
    pub fn apply_defaults(&self, data: &mut ResourceData) {
        for (name, attr) in self.iter() {
            if let Some(default) = &attr.default {
                if data.get(name).is_none() {
                    data.attributes.insert(name.to_owned(), default.clone());
                }
            }
        }
    }

    /// Check required attributes, value types, and per-attribute validators.
    pub fn validate(&self, data: &ResourceData) -> Result<(), CoreError> {
        for (name, attr) in self.iter() {
            match data.get(name) {
                None if attr.required => {
                    return Err(CoreError::validation(format!(
                        "the argument \"{name}\" is required, but no definition was found"
                    )));
                }
                None => {}
                Some(value) => {
                    if !attr.ty.accepts(value) {
                        return Err(CoreError::validation(format!(
                            "{name}: expected {}, got {value}",
                            attr.ty
                        )));
                    }
                    for validator in &attr.validators {
                        validator(name, value).map_err(CoreError::validation)?;
                    }
                }
            }
        }
        for name in data.attributes.keys() {
            if !self.attributes.contains_key(name.as_str()) {
                return Err(CoreError::validation(format!(
                    "an argument named \"{name}\" is not expected here"
                )));
            }
        }
        Ok(())
    }

    /// Whether a change of string attribute `name` from `old` to `new` is
    /// cosmetic and should not be reported.
    pub fn suppress_diff(&self, name: &str, old: &str, new: &str) -> bool {
        self.get(name)
            .and_then(|a| a.diff_suppress)
            .is_some_and(|f| f(old, new))
    }

    /// Declared attributes whose value differs from `current`.
    ///
    /// A string attribute missing from `current` compares as `""`, so a
    /// suppress function can treat an empty declaration as unchanged.
    pub fn changed_attributes(
        &self,
        current: &ResourceData,
        declared: &ResourceData,
    ) -> Vec<&'static str> {
        self.iter()
            .filter(|(name, _)| {
                let Some(new) = declared.get(name) else {
                    return false;
                };
                match (current.get(name), new) {
                    (Some(old), new) if old == new => false,
                    (old, Value::String(new)) => {
                        let old = old.and_then(Value::as_str).unwrap_or_default();
                        !self.suppress_diff(name, old, new)
                    }
                    _ => true,
                }
            })
            .map(|(name, _)| name)
            .collect()
    }
}

// ── ResourceData ─────────────────────────────────────────────────────

/// The declared/observed state of one resource instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceData {
    id: Option<String>,
    attributes: Map<String, Value>,
    #[serde(skip)]
    types: BTreeMap<&'static str, AttrType>,
}

impl ResourceData {
    /// Empty state bound to `schema`.
    pub fn new(schema: &Schema) -> Self {
        Self {
            id: None,
            attributes: Map::new(),
            types: schema.iter().map(|(k, a)| (k, a.ty.clone())).collect(),
        }
    }

    /// State bound to `schema` and pre-populated with `attributes`.
    pub fn from_attributes(schema: &Schema, attributes: Map<String, Value>) -> Result<Self, CoreError> {
        let mut data = Self::new(schema);
        for (name, value) in attributes {
            data.set(&name, value)?;
        }
        Ok(data)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    // ── Identity ─────────────────────────────────────────────────────

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// The id, or a validation error when the resource has none.
    pub fn require_id(&self) -> Result<&str, CoreError> {
        self.id()
            .ok_or_else(|| CoreError::validation("resource has no id"))
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Mark the resource as gone.
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    // ── Attribute access ─────────────────────────────────────────────

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn into_attributes(self) -> Map<String, Value> {
        self.attributes
    }

    /// Raw lookup; `null` counts as unset.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name).filter(|v| !v.is_null())
    }

    fn lookup(&self, name: &str) -> Result<&Value, CoreError> {
        self.get(name).ok_or_else(|| CoreError::AttributeNotFound {
            name: name.to_owned(),
        })
    }

    fn mismatch(name: &str, expected: &str, value: &Value) -> CoreError {
        CoreError::validation(format!("{name}: expected {expected}, got {value}"))
    }

    pub fn get_int(&self, name: &str) -> Result<i64, CoreError> {
        let value = self.lookup(name)?;
        value
            .as_i64()
            .ok_or_else(|| Self::mismatch(name, "int", value))
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, CoreError> {
        let value = self.lookup(name)?;
        value
            .as_bool()
            .ok_or_else(|| Self::mismatch(name, "bool", value))
    }

    pub fn get_string(&self, name: &str) -> Result<String, CoreError> {
        let value = self.lookup(name)?;
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| Self::mismatch(name, "string", value))
    }

    pub fn get_list(&self, name: &str) -> Result<&Vec<Value>, CoreError> {
        let value = self.lookup(name)?;
        value
            .as_array()
            .ok_or_else(|| Self::mismatch(name, "list", value))
    }

    pub fn get_string_list(&self, name: &str) -> Result<Vec<String>, CoreError> {
        self.get_list(name)?
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| Self::mismatch(name, "list(string)", v))
            })
            .collect()
    }

    pub fn get_block(&self, name: &str) -> Result<&Map<String, Value>, CoreError> {
        let value = self.lookup(name)?;
        value
            .as_object()
            .ok_or_else(|| Self::mismatch(name, "block", value))
    }

    /// Store `value` under `name`, checking it against the declared type.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), CoreError> {
        let value = value.into();
        let Some(ty) = self.types.get(name) else {
            return Err(CoreError::ValueSetFailed {
                name: name.to_owned(),
                message: "attribute is not declared in the schema".into(),
            });
        };
        if !ty.accepts(&value) {
            return Err(CoreError::ValueSetFailed {
                name: name.to_owned(),
                message: format!("expected {ty}, got {value}"),
            });
        }
        self.attributes.insert(name.to_owned(), value);
        Ok(())
    }
}

/// Turn the not-found sentinel into `None`; every other error stays an error.
pub fn optional<T>(result: Result<T, CoreError>) -> Result<Option<T>, CoreError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(CoreError::AttributeNotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

// ── Validators ───────────────────────────────────────────────────────

/// `alert`, `deny`, `none` or `deny_custom_<n>`.
pub fn validate_actions() -> Validator {
    Arc::new(|name, value| {
        let action = value.as_str().unwrap_or_default();
        waf::validate_action(action).map_err(|_| {
            format!("{name}: expected one of [alert deny none deny_custom_<id>], got {action:?}")
        })
    })
}

/// The value must be empty or parse as JSON.
pub fn string_is_json() -> Validator {
    Arc::new(|name, value| {
        let text = value.as_str().unwrap_or_default();
        if text.trim().is_empty() {
            return Ok(());
        }
        serde_json::from_str::<Value>(text)
            .map(|_| ())
            .map_err(|e| format!("{name}: contains an invalid JSON: {e}"))
    })
}

pub fn one_of(allowed: &'static [&'static str]) -> Validator {
    Arc::new(move |name, value| {
        let text = value.as_str().unwrap_or_default();
        if allowed.contains(&text) {
            Ok(())
        } else {
            Err(format!(
                "expected {name} to be one of [{}], got {text}",
                allowed.join(" ")
            ))
        }
    })
}

pub fn float_between(min: f64, max: f64) -> Validator {
    Arc::new(move |name, value| match value.as_f64() {
        Some(v) if (min..=max).contains(&v) => Ok(()),
        Some(v) => Err(format!(
            "expected {name} to be in the range ({min:.6} - {max:.6}), got {v:.6}"
        )),
        None => Err(format!("expected type of {name} to be float")),
    })
}

// ── Diff suppression ─────────────────────────────────────────────────

/// Semantic JSON equality: key order and whitespace do not matter.
/// Falls back to string equality when either side is not JSON.
pub fn json_equivalent(old: &str, new: &str) -> bool {
    if old.trim().is_empty() || new.trim().is_empty() {
        return old.trim().is_empty() && new.trim().is_empty();
    }
    match (
        serde_json::from_str::<Value>(old),
        serde_json::from_str::<Value>(new),
    ) {
        (Ok(a), Ok(b)) => a == b,
        _ => old == new,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn schema() -> Schema {
        Schema::new()
            .attr("config_id", Attribute::required_int())
            .attr(
                "rule_action",
                Attribute::optional_string()
                    .computed()
                    .with_validator(validate_actions()),
            )
            .attr(
                "condition_exception",
                Attribute::optional_string()
                    .with_default("")
                    .with_validator(string_is_json())
                    .with_diff_suppress(json_equivalent),
            )
            .attr("extensions", Attribute::optional(AttrType::list_of(AttrType::String)))
    }

    #[test]
    fn changed_attributes_ignores_equivalent_json() {
        let schema = schema();
        let current = ResourceData::from_attributes(
            &schema,
            json!({ "config_id": 1, "condition_exception": r#"{"a":1,"b":[1,2]}"# })
                .as_object()
                .unwrap()
                .clone(),
        )
        .unwrap();
        let declared = ResourceData::from_attributes(
            &schema,
            json!({ "config_id": 1, "condition_exception": r#"{ "b": [1, 2], "a": 1 }"# })
                .as_object()
                .unwrap()
                .clone(),
        )
        .unwrap();

        assert!(schema.changed_attributes(&current, &declared).is_empty());

        let mut changed = declared.clone();
        changed.set("config_id", 2).unwrap();
        changed.set("rule_action", "deny").unwrap();
        assert_eq!(
            schema.changed_attributes(&current, &changed),
            vec!["config_id", "rule_action"]
        );
    }

    #[test]
    fn typed_getters() {
        let s = schema();
        let mut data = ResourceData::new(&s);
        data.set("config_id", 43253).unwrap();
        data.set("extensions", json!(["js", "css"])).unwrap();

        assert_eq!(data.get_int("config_id").unwrap(), 43253);
        assert_eq!(data.get_string_list("extensions").unwrap(), vec!["js", "css"]);
        assert!(matches!(
            data.get_string("rule_action"),
            Err(CoreError::AttributeNotFound { .. })
        ));
        assert!(matches!(
            data.get_string("config_id"),
            Err(CoreError::Validation { .. })
        ));
        assert_eq!(optional(data.get_string("rule_action")).unwrap(), None);
    }

    #[test]
    fn set_rejects_unknown_and_mistyped_values() {
        let s = schema();
        let mut data = ResourceData::new(&s);
        assert!(matches!(
            data.set("nope", 1),
            Err(CoreError::ValueSetFailed { .. })
        ));
        assert!(matches!(
            data.set("config_id", "abc"),
            Err(CoreError::ValueSetFailed { .. })
        ));
    }

    #[test]
    fn validate_required_and_validators() {
        let s = schema();
        let data = ResourceData::new(&s);
        assert!(s.validate(&data).is_err());

        let mut data = ResourceData::new(&s);
        data.set("config_id", 1).unwrap();
        data.set("rule_action", "deny_custom_622918").unwrap();
        s.apply_defaults(&mut data);
        s.validate(&data).unwrap();
        assert_eq!(data.get_string("condition_exception").unwrap(), "");

        data.set("rule_action", "block").unwrap();
        assert!(s.validate(&data).is_err());

        data.set("rule_action", "alert").unwrap();
        data.set("condition_exception", "{not json").unwrap();
        assert!(s.validate(&data).is_err());
    }

    #[test]
    fn one_of_and_float_between_messages() {
        let v = one_of(&["simple", "object"]);
        assert_eq!(
            v("type", &json!("invalid_type")).unwrap_err(),
            "expected type to be one of [simple object], got invalid_type"
        );
        let v = float_between(-1.0, 100.0);
        assert!(v("pass_through_percent", &json!(50.5)).is_ok());
        assert_eq!(
            v("pass_through_percent", &json!(-2)).unwrap_err(),
            "expected pass_through_percent to be in the range (-1.000000 - 100.000000), got -2.000000"
        );
    }

    #[test]
    fn json_equivalence_ignores_key_order() {
        assert!(json_equivalent(r#"{"a":1,"b":[1,2]}"#, r#"{ "b": [1, 2], "a": 1 }"#));
        assert!(!json_equivalent(r#"{"a":1}"#, r#"{"a":2}"#));
        assert!(json_equivalent("", "  "));
        assert!(!json_equivalent("", "{}"));

        let s = schema();
        assert!(s.suppress_diff("condition_exception", r#"{"x":1}"#, r#"{ "x" : 1 }"#));
        assert!(!s.suppress_diff("rule_action", "alert", "alert "));
    }

    #[test]
    fn block_types() {
        let ty = AttrType::block([
            ("datacenter_id", AttrType::Int),
            ("blocks", AttrType::list_of(AttrType::String)),
        ]);
        assert!(ty.accepts(&json!({ "datacenter_id": 1, "blocks": ["1.2.3.4/24"] })));
        assert!(!ty.accepts(&json!({ "datacenter_id": "x" })));
        assert!(!ty.accepts(&json!({ "unknown": 1 })));
        assert_eq!(ty.to_string(), "block{blocks: list(string), datacenter_id: int}");
    }
}
