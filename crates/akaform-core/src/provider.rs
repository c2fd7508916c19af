// ── Provider: adapter registry ──
//
// The provider is an ordinary value holding the API facades; every adapter
// it hands out shares them. Nothing here is global, so tests build a
// provider over recording fakes and the CLI builds one from a profile.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use akaform_api::{AppSec, AppSecClient, Gtm, GtmClient, Session};
use async_trait::async_trait;
use tracing::debug;

use crate::config::ClientConfig;
use crate::data_sources::{
    CloudletsMatchRuleDataSource, CustomRuleActionsDataSource, SelectableHostnamesDataSource,
};
use crate::error::CoreError;
use crate::resources::{
    AdvancedSettingsPrefetchResource, AppSecRuleResource, GtmCidrMapResource,
};
use crate::schema::{ResourceData, Schema};

// ── Adapter traits ───────────────────────────────────────────────────

/// A managed remote object with a create/read/update/delete lifecycle.
#[async_trait]
pub trait Resource: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> &Schema;

    /// Create the remote object and set the id. Ends with a read.
    async fn create(&self, data: &mut ResourceData) -> Result<(), CoreError>;

    /// Refresh `data` from the remote object. Clears the id if it is gone.
    async fn read(&self, data: &mut ResourceData) -> Result<(), CoreError>;

    async fn update(&self, data: &mut ResourceData) -> Result<(), CoreError>;

    /// Remove or neutralise the remote object and clear the id.
    async fn delete(&self, data: &mut ResourceData) -> Result<(), CoreError>;

    /// Adopt an existing remote object by id. The host reads afterwards.
    async fn import(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        data.require_id()?;
        Ok(())
    }

    /// Reject planned changes the remote API cannot express.
    fn customize_diff(&self, _data: &ResourceData) -> Result<(), CoreError> {
        Ok(())
    }
}

/// A read-only query that fills computed attributes.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> &Schema;

    async fn read(&self, data: &mut ResourceData) -> Result<(), CoreError>;
}

/// Bring an existing object to the declared state in `data`.
///
/// Reads the current state first and skips the remote update when no
/// declared attribute differs (after diff suppression); `data` then holds
/// the current state. Returns whether an update was issued.
pub async fn apply_update(
    resource: &dyn Resource,
    data: &mut ResourceData,
) -> Result<bool, CoreError> {
    let id = data.require_id()?.to_owned();
    let schema = resource.schema();
    let mut current = ResourceData::new(schema).with_id(id.clone());
    resource.read(&mut current).await?;
    if current.id().is_none() {
        return Err(CoreError::NotFound {
            entity_type: resource.type_name().to_owned(),
            identifier: id,
        });
    }

    let changed = schema.changed_attributes(&current, data);
    if changed.is_empty() {
        debug!(type_name = resource.type_name(), %id, "no changes; skipping update");
        *data = current;
        return Ok(false);
    }
    debug!(type_name = resource.type_name(), %id, ?changed, "updating");
    resource.update(data).await?;
    Ok(true)
}

// ── Provider ─────────────────────────────────────────────────────────

/// Tunables shared by adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOptions {
    pub gtm_poll_interval: Duration,
    pub gtm_poll_attempts: u32,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            gtm_poll_interval: Duration::from_secs(15),
            gtm_poll_attempts: 40,
        }
    }
}

pub struct Provider {
    resources: BTreeMap<&'static str, Arc<dyn Resource>>,
    data_sources: BTreeMap<&'static str, Arc<dyn DataSource>>,
}

impl Provider {
    /// Register every adapter over the given facades.
    pub fn new(appsec: Arc<dyn AppSec>, gtm: Arc<dyn Gtm>, options: ProviderOptions) -> Self {
        let resources: Vec<Arc<dyn Resource>> = vec![
            Arc::new(AppSecRuleResource::new(Arc::clone(&appsec))),
            Arc::new(AdvancedSettingsPrefetchResource::new(Arc::clone(&appsec))),
            Arc::new(GtmCidrMapResource::new(Arc::clone(&gtm), options)),
        ];
        let data_sources: Vec<Arc<dyn DataSource>> = vec![
            Arc::new(CustomRuleActionsDataSource::new(Arc::clone(&appsec))),
            Arc::new(SelectableHostnamesDataSource::new(appsec)),
            Arc::new(CloudletsMatchRuleDataSource::forward_rewrite()),
            Arc::new(CloudletsMatchRuleDataSource::visitor_prioritization()),
        ];

        Self {
            resources: resources.into_iter().map(|r| (r.type_name(), r)).collect(),
            data_sources: data_sources
                .into_iter()
                .map(|d| (d.type_name(), d))
                .collect(),
        }
    }

    /// Build EdgeGrid-backed facades from a client config.
    pub fn connect(config: &ClientConfig) -> Result<Self, CoreError> {
        let session = Arc::new(Session::new(config.credentials.clone(), &config.transport())?);
        debug!(base_url = %session.base_url(), "provider session ready");

        Ok(Self::new(
            Arc::new(AppSecClient::new(Arc::clone(&session))),
            Arc::new(GtmClient::new(session)),
            ProviderOptions {
                gtm_poll_interval: config.gtm_poll_interval,
                gtm_poll_attempts: config.gtm_poll_attempts,
            },
        ))
    }

    pub fn resource(&self, type_name: &str) -> Result<Arc<dyn Resource>, CoreError> {
        self.resources
            .get(type_name)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                entity_type: "resource type".into(),
                identifier: type_name.to_owned(),
            })
    }

    pub fn data_source(&self, type_name: &str) -> Result<Arc<dyn DataSource>, CoreError> {
        self.data_sources
            .get(type_name)
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                entity_type: "data source type".into(),
                identifier: type_name.to_owned(),
            })
    }

    pub fn resource_types(&self) -> Vec<&'static str> {
        self.resources.keys().copied().collect()
    }

    pub fn data_source_types(&self) -> Vec<&'static str> {
        self.data_sources.keys().copied().collect()
    }
}
