#![allow(clippy::unwrap_used)]
// AppSec resource adapters driven against a recording fake facade.

mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};

use akaform_api::appsec::{
    AdvancedSettingsPrefetch, CreateConfigurationVersionCloneRequest, GetRuleResponse,
    RuleConditionException, UpdateAdvancedSettingsPrefetchRequest,
    UpdateConditionExceptionRequest, UpdateRuleRequest,
};
use akaform_core::resources::verify_id_unchanged;
use akaform_core::{CoreError, Provider, Resource, ResourceData, apply_update};

use common::{AppSecCall, CONFIG_ID, FakeAppSec, FakeGtm, POLICY_ID, RULE_ID};

// ── Helpers ─────────────────────────────────────────────────────────

fn setup(waf_mode: &str) -> (Arc<FakeAppSec>, Provider) {
    setup_with(FakeAppSec::new(waf_mode))
}

fn setup_with(appsec: FakeAppSec) -> (Arc<FakeAppSec>, Provider) {
    let appsec = Arc::new(appsec);
    let provider = common::provider(Arc::clone(&appsec), Arc::new(FakeGtm::new()));
    (appsec, provider)
}

fn object(value: Value) -> Map<String, Value> {
    value.as_object().unwrap().clone()
}

fn declared(resource: &dyn Resource, attrs: Value) -> ResourceData {
    let schema = resource.schema();
    let mut data = ResourceData::from_attributes(schema, object(attrs)).unwrap();
    schema.apply_defaults(&mut data);
    schema.validate(&data).unwrap();
    data
}

fn rule_attrs(action: &str, condition_exception: &str) -> Value {
    json!({
        "config_id": CONFIG_ID,
        "security_policy_id": POLICY_ID,
        "rule_id": RULE_ID,
        "rule_action": action,
        "condition_exception": condition_exception,
    })
}

const CONDITION_EXCEPTION: &str =
    r#"{"conditions":[{"type":"extensionMatch","extensions":["test"],"positiveMatch":true}]}"#;

// ── akamai_appsec_rule ──────────────────────────────────────────────

#[tokio::test]
async fn test_rule_create_manual_mode_issues_one_update() {
    let (appsec, provider) = setup("ASE_MANUAL");
    let rule = provider.resource("akamai_appsec_rule").unwrap();
    let mut data = declared(rule.as_ref(), rule_attrs("alert", ""));

    rule.create(&mut data).await.unwrap();

    assert_eq!(data.id(), Some("43253:test_policy:12345"));
    assert_eq!(
        appsec.mutations(),
        vec![AppSecCall::UpdateRule(UpdateRuleRequest {
            config_id: CONFIG_ID,
            version: 7,
            policy_id: POLICY_ID.into(),
            rule_id: RULE_ID,
            action: "alert".into(),
            json_payload_raw: None,
        })]
    );
    assert_eq!(data.get_string("rule_action").unwrap(), "alert");
}

#[tokio::test]
async fn test_rule_create_forwards_condition_exception_verbatim() {
    let (appsec, provider) = setup("KRS");
    let rule = provider.resource("akamai_appsec_rule").unwrap();
    let mut data = declared(rule.as_ref(), rule_attrs("deny", CONDITION_EXCEPTION));

    rule.create(&mut data).await.unwrap();

    let mutations = appsec.mutations();
    assert_eq!(mutations.len(), 1);
    let AppSecCall::UpdateRule(req) = &mutations[0] else {
        panic!("expected UpdateRule, got {mutations:?}");
    };
    assert_eq!(req.action, "deny");
    assert_eq!(
        req.json_payload_raw.as_ref().map(|r| r.get()),
        Some(CONDITION_EXCEPTION)
    );
}

#[tokio::test]
async fn test_rule_create_automatic_mode_only_writes_condition_exception() {
    let (appsec, provider) = setup("ASE_AUTO");
    let rule = provider.resource("akamai_appsec_rule").unwrap();
    let mut data = declared(rule.as_ref(), rule_attrs("deny", CONDITION_EXCEPTION));

    rule.create(&mut data).await.unwrap();

    assert_eq!(
        appsec.mutations(),
        vec![AppSecCall::UpdateConditionException(
            UpdateConditionExceptionRequest {
                config_id: CONFIG_ID,
                version: 7,
                policy_id: POLICY_ID.into(),
                rule_id: RULE_ID,
                conditions: Some(json!([{
                    "type": "extensionMatch",
                    "extensions": ["test"],
                    "positiveMatch": true
                }])),
                exception: None,
                advanced_exceptions_list: None,
            }
        )]
    );
}

#[tokio::test]
async fn test_rule_action_none_with_exception_is_rejected_before_mutation() {
    let (appsec, provider) = setup("ASE_MANUAL");
    let rule = provider.resource("akamai_appsec_rule").unwrap();
    let mut data = declared(rule.as_ref(), rule_attrs("none", CONDITION_EXCEPTION));

    let err = rule.create(&mut data).await.unwrap_err();

    assert!(
        matches!(err.root(), CoreError::InvalidActionCombination { .. }),
        "got: {err}"
    );
    assert!(err.to_string().starts_with("resourceRuleCreate: "));
    assert!(appsec.mutations().is_empty());
    assert_eq!(data.id(), None);
}

#[tokio::test]
async fn test_rule_action_none_with_empty_exception_is_accepted() {
    let (appsec, provider) = setup("ASE_MANUAL");
    let rule = provider.resource("akamai_appsec_rule").unwrap();
    let mut data = declared(rule.as_ref(), rule_attrs("none", "{}"));

    rule.create(&mut data).await.unwrap();

    assert_eq!(appsec.mutations().len(), 1);
}

#[tokio::test]
async fn test_rule_write_clones_activated_version() {
    let mut fake = FakeAppSec::new("ASE_MANUAL");
    fake.config.staging_version = Some(7);
    let (appsec, provider) = setup_with(fake);
    let rule = provider.resource("akamai_appsec_rule").unwrap();
    let mut data = declared(rule.as_ref(), rule_attrs("alert", ""));

    rule.create(&mut data).await.unwrap();

    let mutations = appsec.mutations();
    assert_eq!(
        mutations[0],
        AppSecCall::CloneVersion(CreateConfigurationVersionCloneRequest {
            config_id: CONFIG_ID,
            create_from_version: 7,
            rule_update: false,
        })
    );
    let AppSecCall::UpdateRule(req) = &mutations[1] else {
        panic!("expected UpdateRule, got {mutations:?}");
    };
    assert_eq!(req.version, 8);
}

#[tokio::test]
async fn test_rule_version_lookup_failure_propagates() {
    let mut fake = FakeAppSec::new("ASE_MANUAL");
    fake.config_fails = true;
    let (appsec, provider) = setup_with(fake);
    let rule = provider.resource("akamai_appsec_rule").unwrap();
    let mut data = declared(rule.as_ref(), rule_attrs("alert", ""));

    let err = rule.create(&mut data).await.unwrap_err();

    assert!(
        matches!(
            err.root(),
            CoreError::RemoteLookupFailed {
                config_id: CONFIG_ID,
                ..
            }
        ),
        "got: {err}"
    );
    assert!(appsec.mutations().is_empty());
}

#[tokio::test]
async fn test_rule_read_populates_condition_exception() {
    let mut fake = FakeAppSec::new("ASE_MANUAL");
    fake.rule = GetRuleResponse {
        action: "deny".into(),
        condition_exception: Some(RuleConditionException {
            exception: Some(json!({ "headerCookieOrParamValues": ["abc"] })),
            ..RuleConditionException::default()
        }),
    };
    let (appsec, provider) = setup_with(fake);
    let rule = provider.resource("akamai_appsec_rule").unwrap();
    let mut data = ResourceData::new(rule.schema()).with_id("43253:test_policy:12345");

    rule.read(&mut data).await.unwrap();

    assert_eq!(data.get_int("config_id").unwrap(), CONFIG_ID);
    assert_eq!(data.get_string("security_policy_id").unwrap(), POLICY_ID);
    assert_eq!(data.get_int("rule_id").unwrap(), RULE_ID);
    assert_eq!(data.get_string("rule_action").unwrap(), "deny");
    let ce: Value = serde_json::from_str(&data.get_string("condition_exception").unwrap()).unwrap();
    assert_eq!(ce, json!({ "exception": { "headerCookieOrParamValues": ["abc"] } }));
    assert!(appsec.mutations().is_empty());
}

#[tokio::test]
async fn test_rule_read_leaves_empty_condition_exception_unset() {
    let (_appsec, provider) = setup("ASE_MANUAL");
    let rule = provider.resource("akamai_appsec_rule").unwrap();
    let mut data = ResourceData::new(rule.schema()).with_id("43253:test_policy:12345");

    rule.read(&mut data).await.unwrap();

    assert!(data.get("condition_exception").is_none());
}

#[tokio::test]
async fn test_rule_read_rejects_malformed_id() {
    let (_appsec, provider) = setup("ASE_MANUAL");
    let rule = provider.resource("akamai_appsec_rule").unwrap();
    let mut data = ResourceData::new(rule.schema()).with_id("43253:test_policy");

    let err = rule.read(&mut data).await.unwrap_err();

    assert!(
        matches!(err.root(), CoreError::InvalidIdFormat { .. }),
        "got: {err}"
    );
}

#[tokio::test]
async fn test_rule_delete_manual_mode_disables_rule() {
    let (appsec, provider) = setup("ASE_MANUAL");
    let rule = provider.resource("akamai_appsec_rule").unwrap();
    let mut data = declared(rule.as_ref(), rule_attrs("alert", "")).with_id("43253:test_policy:12345");

    rule.delete(&mut data).await.unwrap();

    assert_eq!(
        appsec.mutations(),
        vec![AppSecCall::UpdateRule(UpdateRuleRequest {
            config_id: CONFIG_ID,
            version: 7,
            policy_id: POLICY_ID.into(),
            rule_id: RULE_ID,
            action: "none".into(),
            json_payload_raw: None,
        })]
    );
    assert_eq!(data.id(), None);
}

#[tokio::test]
async fn test_rule_delete_automatic_mode_clears_condition_exception() {
    let (appsec, provider) = setup("ASE_AUTO");
    let rule = provider.resource("akamai_appsec_rule").unwrap();
    let mut data = ResourceData::new(rule.schema()).with_id("43253:test_policy:12345");

    rule.delete(&mut data).await.unwrap();

    assert_eq!(
        appsec.mutations(),
        vec![AppSecCall::UpdateConditionException(
            UpdateConditionExceptionRequest {
                config_id: CONFIG_ID,
                version: 7,
                policy_id: POLICY_ID.into(),
                rule_id: RULE_ID,
                ..UpdateConditionExceptionRequest::default()
            }
        )]
    );
    assert_eq!(data.id(), None);
}

#[tokio::test]
async fn test_rule_update_uses_id_from_state() {
    let (appsec, provider) = setup("ASE_MANUAL");
    let rule = provider.resource("akamai_appsec_rule").unwrap();
    let mut data = declared(rule.as_ref(), rule_attrs("deny", "")).with_id("43253:test_policy:12345");

    rule.update(&mut data).await.unwrap();

    let mutations = appsec.mutations();
    assert_eq!(mutations.len(), 1);
    assert!(matches!(&mutations[0], AppSecCall::UpdateRule(r) if r.action == "deny"));
}

fn fake_with_exception(action: &str) -> FakeAppSec {
    let mut fake = FakeAppSec::new("ASE_MANUAL");
    fake.rule = GetRuleResponse {
        action: action.into(),
        condition_exception: Some(RuleConditionException {
            exception: Some(json!({
                "headerCookieOrParamValues": ["abc"],
                "specificHeaderCookieOrParamNames": [],
            })),
            ..RuleConditionException::default()
        }),
    };
    fake
}

#[tokio::test]
async fn test_rule_update_skips_reordered_condition_exception() {
    let (appsec, provider) = setup_with(fake_with_exception("deny"));
    let rule = provider.resource("akamai_appsec_rule").unwrap();
    let reordered = r#"{ "exception": {
        "specificHeaderCookieOrParamNames": [],
        "headerCookieOrParamValues": ["abc"] } }"#;
    let mut data = declared(rule.as_ref(), rule_attrs("deny", reordered))
        .with_id("43253:test_policy:12345");

    let updated = apply_update(rule.as_ref(), &mut data).await.unwrap();

    assert!(!updated);
    assert!(appsec.mutations().is_empty(), "got: {:?}", appsec.mutations());
    assert_eq!(data.id(), Some("43253:test_policy:12345"));
}

#[tokio::test]
async fn test_rule_update_applies_real_change() {
    let (appsec, provider) = setup_with(fake_with_exception("deny"));
    let rule = provider.resource("akamai_appsec_rule").unwrap();
    let exception =
        r#"{"exception":{"headerCookieOrParamValues":["abc"],"specificHeaderCookieOrParamNames":[]}}"#;
    let mut data = declared(rule.as_ref(), rule_attrs("alert", exception))
        .with_id("43253:test_policy:12345");

    let updated = apply_update(rule.as_ref(), &mut data).await.unwrap();

    assert!(updated);
    let mutations = appsec.mutations();
    assert_eq!(mutations.len(), 1);
    assert!(matches!(&mutations[0], AppSecCall::UpdateRule(r) if r.action == "alert"));
}

#[test]
fn test_rule_identity_cannot_change() {
    let appsec = Arc::new(FakeAppSec::new("ASE_MANUAL"));
    let provider = common::provider(appsec, Arc::new(FakeGtm::new()));
    let rule = provider.resource("akamai_appsec_rule").unwrap();

    let unchanged = declared(rule.as_ref(), rule_attrs("alert", "")).with_id("43253:test_policy:12345");
    assert!(verify_id_unchanged(&unchanged).is_ok());
    assert!(rule.customize_diff(&unchanged).is_ok());

    let moved = declared(
        rule.as_ref(),
        json!({
            "config_id": CONFIG_ID,
            "security_policy_id": POLICY_ID,
            "rule_id": 999,
        }),
    )
    .with_id("43253:test_policy:12345");
    let err = rule.customize_diff(&moved).unwrap_err();
    assert!(err.to_string().contains("rule_id value cannot be changed"), "got: {err}");
}

#[tokio::test]
async fn test_rule_import_validates_id() {
    let (_appsec, provider) = setup("ASE_MANUAL");
    let rule = provider.resource("akamai_appsec_rule").unwrap();

    let mut good = ResourceData::new(rule.schema()).with_id("43253:test_policy:12345");
    rule.import(&mut good).await.unwrap();

    let mut bad = ResourceData::new(rule.schema()).with_id("43253");
    assert!(rule.import(&mut bad).await.is_err());
}

// ── akamai_appsec_advanced_settings_prefetch ────────────────────────

fn prefetch_attrs() -> Value {
    json!({
        "config_id": CONFIG_ID,
        "enable_app_layer": true,
        "all_extensions": false,
        "enable_rate_controls": false,
        "extensions": ["cgi", "jsp"],
    })
}

#[tokio::test]
async fn test_prefetch_create_writes_latest_version() {
    let mut fake = FakeAppSec::new("ASE_MANUAL");
    fake.prefetch = AdvancedSettingsPrefetch {
        all_extensions: false,
        enable_app_layer: true,
        enable_rate_controls: false,
        extensions: Some(vec!["cgi".into(), "jsp".into()]),
    };
    let (appsec, provider) = setup_with(fake);
    let prefetch = provider
        .resource("akamai_appsec_advanced_settings_prefetch")
        .unwrap();
    let mut data = declared(prefetch.as_ref(), prefetch_attrs());

    prefetch.create(&mut data).await.unwrap();

    assert_eq!(data.id(), Some("43253"));
    assert_eq!(
        appsec.mutations(),
        vec![AppSecCall::UpdatePrefetch(UpdateAdvancedSettingsPrefetchRequest {
            config_id: CONFIG_ID,
            version: 7,
            all_extensions: false,
            enable_app_layer: true,
            enable_rate_controls: false,
            extensions: Some(vec!["cgi".into(), "jsp".into()]),
        })]
    );
    assert_eq!(
        data.get_string_list("extensions").unwrap(),
        vec!["cgi".to_owned(), "jsp".to_owned()]
    );
}

#[tokio::test]
async fn test_prefetch_delete_resets_settings() {
    let (appsec, provider) = setup("ASE_MANUAL");
    let prefetch = provider
        .resource("akamai_appsec_advanced_settings_prefetch")
        .unwrap();
    let mut data = declared(prefetch.as_ref(), prefetch_attrs()).with_id("43253");

    prefetch.delete(&mut data).await.unwrap();

    assert_eq!(
        appsec.mutations(),
        vec![AppSecCall::UpdatePrefetch(UpdateAdvancedSettingsPrefetchRequest {
            config_id: CONFIG_ID,
            version: 7,
            ..UpdateAdvancedSettingsPrefetchRequest::default()
        })]
    );
    assert_eq!(data.id(), None);
}

#[tokio::test]
async fn test_prefetch_import_sets_config_id() {
    let (_appsec, provider) = setup("ASE_MANUAL");
    let prefetch = provider
        .resource("akamai_appsec_advanced_settings_prefetch")
        .unwrap();
    let mut data = ResourceData::new(prefetch.schema()).with_id("43253");

    prefetch.import(&mut data).await.unwrap();

    assert_eq!(data.get_int("config_id").unwrap(), CONFIG_ID);
}
