// akamai_appsec_custom_rule_actions
//
// Lists the actions assigned to custom rules in a security policy and
// renders them as a table into `output_text`.

use std::sync::Arc;

use akaform_api::AppSec;
use akaform_api::appsec::{CustomRuleAction, GetCustomRuleActionsRequest};
use async_trait::async_trait;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::{debug, error};

use crate::error::CoreError;
use crate::provider::DataSource;
use crate::schema::{AttrType, Attribute, ResourceData, Schema, optional};
use crate::version::resolve_latest;

pub const TYPE_NAME: &str = "akamai_appsec_custom_rule_actions";

#[derive(Tabled)]
struct CustomRuleActionRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Action")]
    action: String,
}

impl From<&CustomRuleAction> for CustomRuleActionRow {
    fn from(a: &CustomRuleAction) -> Self {
        Self {
            id: a.rule_id,
            name: a.name.clone(),
            action: a.action.clone(),
        }
    }
}

/// Render custom rule actions as a rounded table.
pub fn render_custom_rule_actions(actions: &[CustomRuleAction]) -> String {
    let rows: Vec<CustomRuleActionRow> = actions.iter().map(CustomRuleActionRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

pub struct CustomRuleActionsDataSource {
    appsec: Arc<dyn AppSec>,
    schema: Schema,
}

impl CustomRuleActionsDataSource {
    pub fn new(appsec: Arc<dyn AppSec>) -> Self {
        let schema = Schema::new()
            .attr(
                "config_id",
                Attribute::required_int()
                    .with_description("Unique identifier of the security configuration"),
            )
            .attr(
                "security_policy_id",
                Attribute::required_string()
                    .with_description("Unique identifier of the security policy"),
            )
            .attr(
                "custom_rule_id",
                Attribute::optional_int().with_description(
                    "Unique identifier of the custom rule for which to return information",
                ),
            )
            .attr(
                "output_text",
                Attribute::computed_only(AttrType::String).with_description("Text representation"),
            );
        Self { appsec, schema }
    }
}

#[async_trait]
impl DataSource for CustomRuleActionsDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn read(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        debug!(
            product = "APPSEC",
            operation = "dataSourceCustomRuleActionsRead",
            "in dataSourceCustomRuleActionsRead"
        );

        let config_id = data.get_int("config_id")?;
        let version = resolve_latest(self.appsec.as_ref(), config_id).await?;
        let policy_id = data.get_string("security_policy_id")?;
        let rule_id = optional(data.get_int("custom_rule_id"))?.unwrap_or(0);

        let actions = self
            .appsec
            .get_custom_rule_actions(GetCustomRuleActionsRequest {
                config_id,
                version,
                policy_id,
                rule_id,
            })
            .await
            .map_err(|e| {
                error!("calling 'getCustomRuleActions': {e}");
                CoreError::operation("calling 'getCustomRuleActions'", e)
            })?;

        data.set("output_text", render_custom_rule_actions(&actions))?;
        data.set_id(config_id.to_string());
        Ok(())
    }
}
