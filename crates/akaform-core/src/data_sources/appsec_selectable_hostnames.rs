// akamai_appsec_selectable_hostnames
//
// Hostnames that may be added to the match targets of a security
// configuration.

use std::sync::Arc;

use akaform_api::AppSec;
use akaform_api::appsec::{GetSelectableHostnamesRequest, GetSelectableHostnamesResponse};
use async_trait::async_trait;
use serde_json::Value;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::{debug, error};

use crate::error::CoreError;
use crate::provider::DataSource;
use crate::schema::{AttrType, Attribute, ResourceData, Schema};
use crate::version::resolve_latest;

pub const TYPE_NAME: &str = "akamai_appsec_selectable_hostnames";

#[derive(Tabled)]
struct HostnameRow {
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "Config")]
    config: String,
}

pub struct SelectableHostnamesDataSource {
    appsec: Arc<dyn AppSec>,
    schema: Schema,
}

impl SelectableHostnamesDataSource {
    pub fn new(appsec: Arc<dyn AppSec>) -> Self {
        let schema = Schema::new()
            .attr(
                "config_id",
                Attribute::required_int()
                    .with_description("Unique identifier of the security configuration"),
            )
            .attr(
                "hostnames",
                Attribute::computed_only(AttrType::list_of(AttrType::String))
                    .with_description("List of selectable hostnames"),
            )
            .attr(
                "hostnames_json",
                Attribute::computed_only(AttrType::String)
                    .with_description("JSON representation of the selectable hostnames"),
            )
            .attr(
                "output_text",
                Attribute::computed_only(AttrType::String).with_description("Text representation"),
            );
        Self { appsec, schema }
    }
}

fn hostnames(resp: &GetSelectableHostnamesResponse) -> Vec<String> {
    resp.available_set
        .iter()
        .map(|h| h.hostname.clone())
        .collect()
}

fn render_hostnames(resp: &GetSelectableHostnamesResponse) -> String {
    let rows = resp.available_set.iter().map(|h| HostnameRow {
        hostname: h.hostname.clone(),
        config: h
            .config_name
            .clone()
            .or_else(|| h.config_id.map(|id| id.to_string()))
            .unwrap_or_default(),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

#[async_trait]
impl DataSource for SelectableHostnamesDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn read(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        debug!(
            product = "APPSEC",
            operation = "dataSourceSelectableHostnamesRead",
            "in dataSourceSelectableHostnamesRead"
        );

        let config_id = data.get_int("config_id")?;
        let version = resolve_latest(self.appsec.as_ref(), config_id).await?;

        let resp = self
            .appsec
            .get_selectable_hostnames(GetSelectableHostnamesRequest { config_id, version })
            .await
            .map_err(|e| {
                error!("calling 'getSelectableHostnames': {e}");
                CoreError::operation("calling 'getSelectableHostnames'", e)
            })?;

        let json = serde_json::to_string(&resp)
            .map_err(|e| CoreError::Internal(format!("encoding selectable hostnames: {e}")))?;

        data.set("hostnames", Value::from(hostnames(&resp)))?;
        data.set("hostnames_json", json)?;
        data.set("output_text", render_hostnames(&resp))?;
        data.set_id(config_id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use akaform_api::appsec::SelectableHostname;

    use super::*;

    fn response() -> GetSelectableHostnamesResponse {
        GetSelectableHostnamesResponse {
            available_set: vec![
                SelectableHostname {
                    hostname: "www.example.com".into(),
                    config_id: Some(43253),
                    config_name: Some("Example".into()),
                },
                SelectableHostname {
                    hostname: "api.example.com".into(),
                    config_id: None,
                    config_name: None,
                },
            ],
            error_set: Vec::new(),
            protect: true,
        }
    }

    #[test]
    fn hostnames_come_from_the_available_set() {
        assert_eq!(
            hostnames(&response()),
            vec!["www.example.com".to_owned(), "api.example.com".to_owned()]
        );
    }

    #[test]
    fn table_names_the_owning_config() {
        let text = render_hostnames(&response());
        assert!(text.contains("www.example.com"));
        assert!(text.contains("Example"));
    }
}
