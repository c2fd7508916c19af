// akamai_appsec_advanced_settings_prefetch
//
// Prefetch settings of a security configuration. One instance per
// configuration; the id is the config id.

use std::sync::Arc;

use akaform_api::AppSec;
use akaform_api::appsec::{
    GetAdvancedSettingsPrefetchRequest, UpdateAdvancedSettingsPrefetchRequest,
};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error};

use crate::error::CoreError;
use crate::id::parse_int_part;
use crate::provider::Resource;
use crate::schema::{AttrType, Attribute, ResourceData, Schema, optional};
use crate::version::{resolve_latest, resolve_modifiable};

pub const TYPE_NAME: &str = "akamai_appsec_advanced_settings_prefetch";

pub struct AdvancedSettingsPrefetchResource {
    appsec: Arc<dyn AppSec>,
    schema: Schema,
}

impl AdvancedSettingsPrefetchResource {
    pub fn new(appsec: Arc<dyn AppSec>) -> Self {
        let schema = Schema::new()
            .attr("config_id", Attribute::required_int())
            .attr(
                "enable_app_layer",
                Attribute::required_bool()
                    .with_description("Whether to enable prefetch requests"),
            )
            .attr(
                "all_extensions",
                Attribute::required_bool()
                    .with_description("Whether to enable prefetch requests for all extensions"),
            )
            .attr(
                "enable_rate_controls",
                Attribute::required_bool()
                    .with_description("Whether to enable prefetch requests for rate controls"),
            )
            .attr(
                "extensions",
                Attribute::optional(AttrType::list_of(AttrType::String))
                    .with_description("File extensions for which prefetch requests are enabled"),
            );
        Self { appsec, schema }
    }

    /// Resolve an editable version into `req` and send it.
    async fn write(&self, mut req: UpdateAdvancedSettingsPrefetchRequest) -> Result<(), CoreError> {
        req.version =
            resolve_modifiable(self.appsec.as_ref(), req.config_id, "prefetchSetting").await?;
        self.appsec
            .update_advanced_settings_prefetch(req)
            .await
            .map_err(|e| {
                error!("calling 'updateAdvancedSettingsPrefetch': {e}");
                CoreError::operation("calling 'updateAdvancedSettingsPrefetch'", e)
            })?;
        Ok(())
    }

    fn declared(
        data: &ResourceData,
        config_id: i64,
    ) -> Result<UpdateAdvancedSettingsPrefetchRequest, CoreError> {
        Ok(UpdateAdvancedSettingsPrefetchRequest {
            config_id,
            version: 0,
            all_extensions: data.get_bool("all_extensions")?,
            enable_app_layer: data.get_bool("enable_app_layer")?,
            enable_rate_controls: data.get_bool("enable_rate_controls")?,
            extensions: optional(data.get_string_list("extensions"))?,
        })
    }

    fn config_id_from_id(data: &ResourceData) -> Result<i64, CoreError> {
        parse_int_part(data.require_id()?, "configID")
    }

    async fn create_inner(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        let config_id = data.get_int("config_id")?;
        self.write(Self::declared(data, config_id)?).await?;
        data.set_id(config_id.to_string());
        self.read_inner(data).await
    }

    async fn read_inner(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        let config_id = Self::config_id_from_id(data)?;
        let version = resolve_latest(self.appsec.as_ref(), config_id).await?;

        let prefetch = self
            .appsec
            .get_advanced_settings_prefetch(GetAdvancedSettingsPrefetchRequest {
                config_id,
                version,
            })
            .await
            .map_err(|e| {
                error!("calling 'getAdvancedSettingsPrefetch': {e}");
                CoreError::operation("calling 'getAdvancedSettingsPrefetch'", e)
            })?;

        data.set("config_id", config_id)?;
        data.set("enable_app_layer", prefetch.enable_app_layer)?;
        data.set("all_extensions", prefetch.all_extensions)?;
        data.set("enable_rate_controls", prefetch.enable_rate_controls)?;
        data.set(
            "extensions",
            prefetch.extensions.map_or(Value::Null, Value::from),
        )?;
        Ok(())
    }

    async fn update_inner(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        let config_id = Self::config_id_from_id(data)?;
        self.write(Self::declared(data, config_id)?).await?;
        self.read_inner(data).await
    }

    async fn delete_inner(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        let config_id = Self::config_id_from_id(data)?;
        self.write(UpdateAdvancedSettingsPrefetchRequest {
            config_id,
            ..UpdateAdvancedSettingsPrefetchRequest::default()
        })
        .await?;
        data.clear_id();
        Ok(())
    }
}

#[async_trait]
impl Resource for AdvancedSettingsPrefetchResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn create(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        debug!(
            product = "APPSEC",
            operation = "resourceAdvancedSettingsPrefetchCreate",
            "in resourceAdvancedSettingsPrefetchCreate"
        );
        self.create_inner(data)
            .await
            .map_err(|e| CoreError::operation("resourceAdvancedSettingsPrefetchCreate", e))
    }

    async fn read(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        debug!(
            product = "APPSEC",
            operation = "resourceAdvancedSettingsPrefetchRead",
            "in resourceAdvancedSettingsPrefetchRead"
        );
        self.read_inner(data)
            .await
            .map_err(|e| CoreError::operation("resourceAdvancedSettingsPrefetchRead", e))
    }

    async fn update(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        debug!(
            product = "APPSEC",
            operation = "resourceAdvancedSettingsPrefetchUpdate",
            "in resourceAdvancedSettingsPrefetchUpdate"
        );
        self.update_inner(data)
            .await
            .map_err(|e| CoreError::operation("resourceAdvancedSettingsPrefetchUpdate", e))
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        debug!(
            product = "APPSEC",
            operation = "resourceAdvancedSettingsPrefetchDelete",
            "in resourceAdvancedSettingsPrefetchDelete"
        );
        self.delete_inner(data)
            .await
            .map_err(|e| CoreError::operation("resourceAdvancedSettingsPrefetchDelete", e))
    }

    async fn import(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        let config_id = Self::config_id_from_id(data)?;
        data.set("config_id", config_id)
    }
}
