// Recording fakes for the AppSec and GTM facades.
//
// Every call is appended to a shared log so tests can assert on the exact
// sequence of remote operations an adapter issued.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use akaform_api::Error;
use akaform_api::appsec::{
    AdvancedSettingsPrefetch, CreateConfigurationVersionCloneRequest,
    CreateConfigurationVersionCloneResponse, CustomRuleAction, GetAdvancedSettingsPrefetchRequest,
    GetConfigurationRequest, GetConfigurationResponse, GetCustomRuleActionsRequest,
    GetRuleRequest, GetRuleResponse, GetSelectableHostnamesRequest,
    GetSelectableHostnamesResponse, GetWAFModeRequest, GetWAFModeResponse,
    RuleConditionException, UpdateAdvancedSettingsPrefetchRequest,
    UpdateConditionExceptionRequest, UpdateRuleRequest,
};
use akaform_api::gtm::{
    CidrMap, CreateCidrMapRequest, CreateCidrMapResponse, CreateDatacenterResponse,
    CreateMapsDefaultDatacenterRequest, Datacenter, DeleteCidrMapRequest, GetCidrMapRequest,
    GetDatacenterRequest, GetDomainStatusRequest, ResponseStatus, UpdateCidrMapRequest,
    UpdateCidrMapResponse,
};
use akaform_api::{AppSec, Gtm};
use akaform_core::{Provider, ProviderOptions};
use async_trait::async_trait;

pub const CONFIG_ID: i64 = 43253;
pub const POLICY_ID: &str = "test_policy";
pub const RULE_ID: i64 = 12345;
pub const DOMAIN: &str = "gtm_terra_testdomain.akadns.net";

pub fn not_found() -> Error {
    Error::Api {
        status: 404,
        title: "Not Found".into(),
        detail: None,
        problem_type: None,
    }
}

pub fn server_error() -> Error {
    Error::Api {
        status: 500,
        title: "Internal Server Error".into(),
        detail: Some("upstream unavailable".into()),
        problem_type: None,
    }
}

// ── AppSec ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum AppSecCall {
    GetConfiguration(i64),
    CloneVersion(CreateConfigurationVersionCloneRequest),
    GetWafMode(GetWAFModeRequest),
    GetRule(GetRuleRequest),
    UpdateRule(UpdateRuleRequest),
    UpdateConditionException(UpdateConditionExceptionRequest),
    GetCustomRuleActions(GetCustomRuleActionsRequest),
    GetPrefetch(GetAdvancedSettingsPrefetchRequest),
    UpdatePrefetch(UpdateAdvancedSettingsPrefetchRequest),
    GetSelectableHostnames(GetSelectableHostnamesRequest),
}

impl AppSecCall {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::CloneVersion(_)
                | Self::UpdateRule(_)
                | Self::UpdateConditionException(_)
                | Self::UpdatePrefetch(_)
        )
    }
}

pub struct FakeAppSec {
    pub config: GetConfigurationResponse,
    pub config_fails: bool,
    pub cloned_version: i64,
    pub waf_mode: String,
    pub rule: GetRuleResponse,
    pub custom_rule_actions: Vec<CustomRuleAction>,
    pub prefetch: AdvancedSettingsPrefetch,
    pub hostnames: GetSelectableHostnamesResponse,
    calls: Mutex<Vec<AppSecCall>>,
}

impl FakeAppSec {
    /// Config 43253 whose latest version 7 is not activated anywhere.
    pub fn new(waf_mode: &str) -> Self {
        Self {
            config: GetConfigurationResponse {
                id: CONFIG_ID,
                name: "Example".into(),
                description: None,
                latest_version: 7,
                staging_version: Some(6),
                production_version: Some(5),
            },
            config_fails: false,
            cloned_version: 8,
            waf_mode: waf_mode.to_owned(),
            rule: GetRuleResponse {
                action: "alert".into(),
                condition_exception: None,
            },
            custom_rule_actions: Vec::new(),
            prefetch: AdvancedSettingsPrefetch::default(),
            hostnames: GetSelectableHostnamesResponse::default(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<AppSecCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<AppSecCall> {
        self.calls()
            .into_iter()
            .filter(AppSecCall::is_mutation)
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: AppSecCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl AppSec for FakeAppSec {
    async fn get_configuration(
        &self,
        req: GetConfigurationRequest,
    ) -> Result<GetConfigurationResponse, Error> {
        self.record(AppSecCall::GetConfiguration(req.config_id));
        if self.config_fails {
            return Err(server_error());
        }
        Ok(self.config.clone())
    }

    async fn create_configuration_version_clone(
        &self,
        req: CreateConfigurationVersionCloneRequest,
    ) -> Result<CreateConfigurationVersionCloneResponse, Error> {
        self.record(AppSecCall::CloneVersion(req));
        Ok(CreateConfigurationVersionCloneResponse {
            config_id: req.config_id,
            version: self.cloned_version,
            based_on: Some(req.create_from_version),
        })
    }

    async fn get_waf_mode(&self, req: GetWAFModeRequest) -> Result<GetWAFModeResponse, Error> {
        self.record(AppSecCall::GetWafMode(req));
        Ok(GetWAFModeResponse {
            current: self.waf_mode.clone(),
            mode: self.waf_mode.clone(),
            eval: None,
        })
    }

    async fn get_rule(&self, req: GetRuleRequest) -> Result<GetRuleResponse, Error> {
        self.record(AppSecCall::GetRule(req));
        Ok(self.rule.clone())
    }

    async fn update_rule(&self, req: UpdateRuleRequest) -> Result<GetRuleResponse, Error> {
        let action = req.action.clone();
        self.record(AppSecCall::UpdateRule(req));
        Ok(GetRuleResponse {
            action,
            condition_exception: None,
        })
    }

    async fn update_rule_condition_exception(
        &self,
        req: UpdateConditionExceptionRequest,
    ) -> Result<RuleConditionException, Error> {
        self.record(AppSecCall::UpdateConditionException(req));
        Ok(RuleConditionException::default())
    }

    async fn get_custom_rule_actions(
        &self,
        req: GetCustomRuleActionsRequest,
    ) -> Result<Vec<CustomRuleAction>, Error> {
        self.record(AppSecCall::GetCustomRuleActions(req));
        Ok(self.custom_rule_actions.clone())
    }

    async fn get_advanced_settings_prefetch(
        &self,
        req: GetAdvancedSettingsPrefetchRequest,
    ) -> Result<AdvancedSettingsPrefetch, Error> {
        self.record(AppSecCall::GetPrefetch(req));
        Ok(self.prefetch.clone())
    }

    async fn update_advanced_settings_prefetch(
        &self,
        req: UpdateAdvancedSettingsPrefetchRequest,
    ) -> Result<AdvancedSettingsPrefetch, Error> {
        let body = AdvancedSettingsPrefetch {
            all_extensions: req.all_extensions,
            enable_app_layer: req.enable_app_layer,
            enable_rate_controls: req.enable_rate_controls,
            extensions: req.extensions.clone(),
        };
        self.record(AppSecCall::UpdatePrefetch(req));
        Ok(body)
    }

    async fn get_selectable_hostnames(
        &self,
        req: GetSelectableHostnamesRequest,
    ) -> Result<GetSelectableHostnamesResponse, Error> {
        self.record(AppSecCall::GetSelectableHostnames(req));
        Ok(self.hostnames.clone())
    }
}

// ── GTM ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum GtmCall {
    GetCidrMap(GetCidrMapRequest),
    CreateCidrMap(CreateCidrMapRequest),
    UpdateCidrMap(UpdateCidrMapRequest),
    DeleteCidrMap(DeleteCidrMapRequest),
    GetDatacenter(GetDatacenterRequest),
    CreateMapsDefaultDatacenter(CreateMapsDefaultDatacenterRequest),
    GetDomainStatus(GetDomainStatusRequest),
}

/// In-memory GTM domain holding at most one CIDR map.
pub struct FakeGtm {
    pub map: Mutex<Option<CidrMap>>,
    /// Datacenter ids that exist in the domain.
    pub datacenters: Mutex<Vec<i64>>,
    /// Propagation status attached to every mutation response.
    pub mutation_status: String,
    pub mutation_message: String,
    /// Statuses returned by successive domain-status polls; the last repeats.
    pub domain_statuses: Mutex<VecDeque<String>>,
    /// Makes `create_cidr_map` fail at the transport level.
    pub create_fails: bool,
    calls: Mutex<Vec<GtmCall>>,
}

impl FakeGtm {
    pub fn new() -> Self {
        Self {
            map: Mutex::new(None),
            datacenters: Mutex::new(vec![3131, 3132]),
            mutation_status: "PENDING".into(),
            mutation_message: String::new(),
            domain_statuses: Mutex::new(VecDeque::from(["COMPLETE".to_owned()])),
            create_fails: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<GtmCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn set_domain_statuses(&self, statuses: &[&str]) {
        *self.domain_statuses.lock().unwrap() =
            statuses.iter().map(|s| (*s).to_owned()).collect();
    }

    fn record(&self, call: GtmCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn status(&self) -> ResponseStatus {
        ResponseStatus {
            change_id: "93a48b86-4fc3-4a5f-9ca2-036835034cc6".into(),
            message: self.mutation_message.clone(),
            passing_validation: true,
            propagation_status: self.mutation_status.clone(),
            ..ResponseStatus::default()
        }
    }
}

#[async_trait]
impl Gtm for FakeGtm {
    async fn get_cidr_map(&self, req: GetCidrMapRequest) -> Result<CidrMap, Error> {
        let found = self
            .map
            .lock()
            .unwrap()
            .clone()
            .filter(|m| m.name == req.map_name);
        self.record(GtmCall::GetCidrMap(req));
        found.ok_or_else(not_found)
    }

    async fn create_cidr_map(
        &self,
        req: CreateCidrMapRequest,
    ) -> Result<CreateCidrMapResponse, Error> {
        let map = req.cidr_map.clone();
        self.record(GtmCall::CreateCidrMap(req));
        if self.create_fails {
            return Err(server_error());
        }
        *self.map.lock().unwrap() = Some(map.clone());
        Ok(CreateCidrMapResponse {
            resource: Some(map),
            status: Some(self.status()),
        })
    }

    async fn update_cidr_map(
        &self,
        req: UpdateCidrMapRequest,
    ) -> Result<UpdateCidrMapResponse, Error> {
        *self.map.lock().unwrap() = Some(req.cidr_map.clone());
        self.record(GtmCall::UpdateCidrMap(req));
        Ok(UpdateCidrMapResponse {
            status: Some(self.status()),
        })
    }

    async fn delete_cidr_map(
        &self,
        req: DeleteCidrMapRequest,
    ) -> Result<UpdateCidrMapResponse, Error> {
        *self.map.lock().unwrap() = None;
        self.record(GtmCall::DeleteCidrMap(req));
        Ok(UpdateCidrMapResponse {
            status: Some(self.status()),
        })
    }

    async fn get_datacenter(&self, req: GetDatacenterRequest) -> Result<Datacenter, Error> {
        let exists = self.datacenters.lock().unwrap().contains(&req.datacenter_id);
        let id = req.datacenter_id;
        self.record(GtmCall::GetDatacenter(req));
        if !exists {
            return Err(not_found());
        }
        Ok(Datacenter {
            datacenter_id: id,
            nickname: format!("dc_{id}"),
            city: None,
            country: None,
        })
    }

    async fn create_maps_default_datacenter(
        &self,
        req: CreateMapsDefaultDatacenterRequest,
    ) -> Result<CreateDatacenterResponse, Error> {
        self.datacenters.lock().unwrap().push(5400);
        self.record(GtmCall::CreateMapsDefaultDatacenter(req));
        Ok(CreateDatacenterResponse {
            resource: Some(Datacenter {
                datacenter_id: 5400,
                nickname: "default datacenter".into(),
                city: None,
                country: None,
            }),
            status: Some(self.status()),
        })
    }

    async fn get_domain_status(
        &self,
        req: GetDomainStatusRequest,
    ) -> Result<ResponseStatus, Error> {
        self.record(GtmCall::GetDomainStatus(req));
        let mut statuses = self.domain_statuses.lock().unwrap();
        let status = if statuses.len() > 1 {
            statuses.pop_front().unwrap_or_default()
        } else {
            statuses.front().cloned().unwrap_or_default()
        };
        Ok(ResponseStatus {
            message: if status == "DENIED" {
                "Request could not be completed. Invalid credentials.".into()
            } else {
                String::new()
            },
            propagation_status: status,
            ..ResponseStatus::default()
        })
    }
}

// ── Provider ─────────────────────────────────────────────────────────

/// Poll quickly so propagation waits do not slow the suite.
pub fn fast_options() -> ProviderOptions {
    ProviderOptions {
        gtm_poll_interval: std::time::Duration::from_millis(1),
        gtm_poll_attempts: 3,
    }
}

pub fn provider(appsec: Arc<FakeAppSec>, gtm: Arc<FakeGtm>) -> Provider {
    Provider::new(appsec, gtm, fast_options())
}
