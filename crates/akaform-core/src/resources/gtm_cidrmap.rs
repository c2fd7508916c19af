// akamai_gtm_cidrmap
//
// A CIDR map in a GTM domain: client address blocks routed to datacenters,
// with a default datacenter for everything else. The id is
// `domain:cidrMapName`.

use std::sync::Arc;

use akaform_api::Gtm;
use akaform_api::gtm::{
    CidrAssignment, CidrMap, CreateCidrMapRequest, CreateMapsDefaultDatacenterRequest,
    DatacenterBase, DeleteCidrMapRequest, GetCidrMapRequest, GetDatacenterRequest,
    GetDomainStatusRequest, MAP_DEFAULT_DC, ResponseStatus, UpdateCidrMapRequest,
};
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::id::CidrMapId;
use crate::provider::{ProviderOptions, Resource};
use crate::schema::{AttrType, Attribute, ResourceData, Schema, optional};

pub const TYPE_NAME: &str = "akamai_gtm_cidrmap";

pub struct GtmCidrMapResource {
    gtm: Arc<dyn Gtm>,
    options: ProviderOptions,
    schema: Schema,
}

fn datacenter_type() -> AttrType {
    AttrType::block([("datacenter_id", AttrType::Int), ("nickname", AttrType::String)])
}

fn assignment_type() -> AttrType {
    AttrType::block([
        ("datacenter_id", AttrType::Int),
        ("nickname", AttrType::String),
        ("blocks", AttrType::list_of(AttrType::String)),
    ])
}

impl GtmCidrMapResource {
    pub fn new(gtm: Arc<dyn Gtm>, options: ProviderOptions) -> Self {
        let schema = Schema::new()
            .attr("domain", Attribute::required_string())
            .attr("name", Attribute::required_string())
            .attr("default_datacenter", Attribute::required(datacenter_type()))
            .attr(
                "assignment",
                Attribute::optional(AttrType::list_of(assignment_type())),
            )
            .attr(
                "wait_on_complete",
                Attribute::optional_bool()
                    .with_default(true)
                    .with_description("Wait for the change to propagate to all GTM nameservers"),
            );
        Self {
            gtm,
            options,
            schema,
        }
    }

    // ── Declared state ───────────────────────────────────────────────

    fn declared_map(data: &ResourceData, name: String) -> Result<CidrMap, CoreError> {
        Ok(CidrMap {
            name,
            default_datacenter: Some(declared_default_datacenter(data)?),
            assignments: declared_assignments(data)?,
            links: Vec::new(),
        })
    }

    fn wait_on_complete(data: &ResourceData) -> Result<bool, CoreError> {
        Ok(optional(data.get_bool("wait_on_complete"))?.unwrap_or(true))
    }

    // ── Remote helpers ───────────────────────────────────────────────

    /// The default datacenter must exist before a map can reference it.
    /// The reserved maps default (5400) is created on demand.
    async fn ensure_default_datacenter(
        &self,
        domain: &str,
        dc: &DatacenterBase,
    ) -> Result<(), CoreError> {
        match self
            .gtm
            .get_datacenter(GetDatacenterRequest {
                domain: domain.to_owned(),
                datacenter_id: dc.datacenter_id,
            })
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() && dc.datacenter_id == MAP_DEFAULT_DC => {
                info!(domain, "creating default datacenter for maps");
                self.gtm
                    .create_maps_default_datacenter(CreateMapsDefaultDatacenterRequest {
                        domain: domain.to_owned(),
                    })
                    .await?;
                Ok(())
            }
            Err(e) if e.is_not_found() => Err(CoreError::NotFound {
                entity_type: "Default Datacenter".into(),
                identifier: dc.datacenter_id.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Poll the domain until the last change has propagated.
    ///
    /// Returns `false` when the attempt budget runs out first.
    async fn wait_for_completion(&self, domain: &str) -> Result<bool, CoreError> {
        for attempt in 1..=self.options.gtm_poll_attempts {
            let status = self
                .gtm
                .get_domain_status(GetDomainStatusRequest {
                    domain: domain.to_owned(),
                })
                .await?;
            debug!(domain, attempt, status = %status.propagation_status, "domain status");
            if status.is_complete() {
                return Ok(true);
            }
            if status.is_denied() {
                return Err(CoreError::Rejected {
                    message: status.message,
                });
            }
            tokio::time::sleep(self.options.gtm_poll_interval).await;
        }
        Ok(false)
    }

    /// A change the API refused outright never reaches the domain.
    fn check_accepted(status: Option<&ResponseStatus>) -> Result<(), CoreError> {
        match status {
            Some(status) if status.is_denied() => Err(CoreError::Rejected {
                message: status.message.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Optionally wait for an accepted change to propagate.
    async fn settle(&self, domain: &str, wait: bool) -> Result<(), CoreError> {
        if wait {
            if self.wait_for_completion(domain).await? {
                info!(domain, "cidrMap change complete");
            } else {
                warn!(domain, "cidrMap change still propagating; gave up waiting");
            }
        }
        Ok(())
    }

    // ── Operations ───────────────────────────────────────────────────

    async fn create_inner(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        const OP: &str = "cidrMap Create failed";
        let domain = data.get_string("domain")?;
        let map = Self::declared_map(data, data.get_string("name")?)?;
        let wait = Self::wait_on_complete(data)?;
        if let Some(dc) = &map.default_datacenter {
            self.ensure_default_datacenter(&domain, dc)
                .await
                .map_err(|e| CoreError::operation(OP, e))?;
        }

        let resp = self
            .gtm
            .create_cidr_map(CreateCidrMapRequest {
                domain: domain.clone(),
                cidr_map: map.clone(),
            })
            .await
            .map_err(|e| CoreError::operation(OP, e))?;
        Self::check_accepted(resp.status.as_ref()).map_err(|e| CoreError::operation(OP, e))?;

        // The map exists remotely from here on.
        let name = resp.resource.map_or(map.name, |r| r.name);
        data.set_id(
            CidrMapId {
                domain: domain.clone(),
                name,
            }
            .encode()?,
        );
        self.settle(&domain, wait)
            .await
            .map_err(|e| CoreError::operation(OP, e))?;
        self.read_inner(data).await
    }

    async fn read_inner(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        let id = CidrMapId::parse(data.require_id()?)?;

        let map = match self
            .gtm
            .get_cidr_map(GetCidrMapRequest {
                domain: id.domain.clone(),
                map_name: id.name.clone(),
            })
            .await
        {
            Ok(map) => map,
            Err(e) if e.is_not_found() => {
                warn!(id = %id, "cidrMap not found; removing from state");
                data.clear_id();
                return Ok(());
            }
            Err(e) => return Err(CoreError::operation("cidrMap Read failed", e)),
        };

        let declared = optional(declared_assignments(data))?.unwrap_or_default();
        let assignments = reconcile_assignments(&declared, map.assignments);

        data.set("domain", id.domain.as_str())?;
        data.set("name", map.name.as_str())?;
        match &map.default_datacenter {
            Some(dc) => data.set(
                "default_datacenter",
                json!({ "datacenter_id": dc.datacenter_id, "nickname": dc.nickname }),
            )?,
            None => data.set("default_datacenter", Value::Null)?,
        }
        data.set(
            "assignment",
            Value::Array(assignments.iter().map(assignment_to_value).collect()),
        )?;
        if data.get("wait_on_complete").is_none() {
            data.set("wait_on_complete", true)?;
        }
        Ok(())
    }

    async fn update_inner(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        const OP: &str = "cidrMap Update failed";
        let id = CidrMapId::parse(data.require_id()?)?;
        let map = Self::declared_map(data, id.name.clone())?;
        let wait = Self::wait_on_complete(data)?;
        if let Some(dc) = &map.default_datacenter {
            self.ensure_default_datacenter(&id.domain, dc)
                .await
                .map_err(|e| CoreError::operation(OP, e))?;
        }

        let resp = self
            .gtm
            .update_cidr_map(UpdateCidrMapRequest {
                domain: id.domain.clone(),
                cidr_map: map,
            })
            .await
            .map_err(|e| CoreError::operation(OP, e))?;
        Self::check_accepted(resp.status.as_ref()).map_err(|e| CoreError::operation(OP, e))?;
        self.settle(&id.domain, wait)
            .await
            .map_err(|e| CoreError::operation(OP, e))?;
        self.read_inner(data).await
    }

    async fn delete_inner(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        const OP: &str = "cidrMap Delete failed";
        let id = CidrMapId::parse(data.require_id()?)?;
        let wait = Self::wait_on_complete(data)?;

        let resp = self
            .gtm
            .delete_cidr_map(DeleteCidrMapRequest {
                domain: id.domain.clone(),
                map_name: id.name.clone(),
            })
            .await
            .map_err(|e| CoreError::operation(OP, e))?;
        Self::check_accepted(resp.status.as_ref()).map_err(|e| CoreError::operation(OP, e))?;

        data.clear_id();
        self.settle(&id.domain, wait)
            .await
            .map_err(|e| CoreError::operation(OP, e))
    }
}

#[async_trait]
impl Resource for GtmCidrMapResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn create(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        debug!(product = "GTMv1", operation = "resourceGTMv1CidrMapCreate", "creating cidrMap");
        self.create_inner(data).await
    }

    async fn read(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        debug!(product = "GTMv1", operation = "resourceGTMv1CidrMapRead", "reading cidrMap");
        self.read_inner(data).await
    }

    async fn update(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        debug!(product = "GTMv1", operation = "resourceGTMv1CidrMapUpdate", "updating cidrMap");
        self.update_inner(data).await
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        debug!(product = "GTMv1", operation = "resourceGTMv1CidrMapDelete", "deleting cidrMap");
        self.delete_inner(data).await
    }

    async fn import(&self, data: &mut ResourceData) -> Result<(), CoreError> {
        let id = CidrMapId::parse(data.require_id()?)?;
        data.set("domain", id.domain)?;
        data.set("name", id.name)?;
        data.set("wait_on_complete", true)
    }
}

// ── Block conversion ─────────────────────────────────────────────────

fn block_int(block: &Map<String, Value>, name: &str, field: &str) -> Result<i64, CoreError> {
    block
        .get(field)
        .and_then(Value::as_i64)
        .ok_or_else(|| CoreError::validation(format!("{name}.{field}: expected int")))
}

fn block_string(block: &Map<String, Value>, field: &str) -> String {
    block
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

fn declared_default_datacenter(data: &ResourceData) -> Result<DatacenterBase, CoreError> {
    let block = data.get_block("default_datacenter")?;
    Ok(DatacenterBase {
        datacenter_id: block_int(block, "default_datacenter", "datacenter_id")?,
        nickname: block_string(block, "nickname"),
    })
}

fn declared_assignments(data: &ResourceData) -> Result<Vec<CidrAssignment>, CoreError> {
    data.get_list("assignment")?
        .iter()
        .map(|v| {
            let block = v
                .as_object()
                .ok_or_else(|| CoreError::validation("assignment: expected block"))?;
            let blocks = block
                .get("blocks")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_owned)
                        .collect()
                })
                .unwrap_or_default();
            Ok(CidrAssignment {
                datacenter: DatacenterBase {
                    datacenter_id: block_int(block, "assignment", "datacenter_id")?,
                    nickname: block_string(block, "nickname"),
                },
                blocks,
            })
        })
        .collect()
}

fn assignment_to_value(a: &CidrAssignment) -> Value {
    json!({
        "datacenter_id": a.datacenter.datacenter_id,
        "nickname": a.datacenter.nickname,
        "blocks": a.blocks,
    })
}

// ── Order reconciliation ─────────────────────────────────────────────

fn same_set(a: &[String], b: &[String]) -> bool {
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.sort();
    b.sort();
    a == b
}

/// Present `remote` in the declared order where the contents agree.
///
/// The API does not preserve the order of assignments or of the blocks
/// inside them. Blocks keep their declared order when the sets match, and
/// assignments are sorted by their declared position; assignments the
/// declaration does not mention keep their remote order at the end.
pub fn reconcile_assignments(
    declared: &[CidrAssignment],
    mut remote: Vec<CidrAssignment>,
) -> Vec<CidrAssignment> {
    let position = |id: i64| {
        declared
            .iter()
            .position(|d| d.datacenter.datacenter_id == id)
            .unwrap_or(usize::MAX)
    };

    for r in &mut remote {
        if let Some(d) = declared
            .iter()
            .find(|d| d.datacenter.datacenter_id == r.datacenter.datacenter_id)
        {
            if same_set(&d.blocks, &r.blocks) {
                r.blocks.clone_from(&d.blocks);
            }
        }
    }
    remote.sort_by_key(|r| position(r.datacenter.datacenter_id));
    remote
}
