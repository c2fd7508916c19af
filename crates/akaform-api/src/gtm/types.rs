// ── GTM (Global Traffic Management config v1) types ──

use serde::{Deserialize, Serialize};

/// Datacenter id GTM reserves for the implicit "default datacenter" of maps.
pub const MAP_DEFAULT_DC: i64 = 5400;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,
}

/// Outcome of a GTM change, returned with every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseStatus {
    #[serde(default)]
    pub change_id: String,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub passing_validation: bool,
    #[serde(default)]
    pub propagation_status: String,
    #[serde(default)]
    pub propagation_status_date: String,
}

impl ResponseStatus {
    pub fn is_denied(&self) -> bool {
        self.propagation_status == "DENIED"
    }

    pub fn is_complete(&self) -> bool {
        self.propagation_status == "COMPLETE"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatacenterBase {
    pub datacenter_id: i64,
    #[serde(default)]
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CidrAssignment {
    #[serde(flatten)]
    pub datacenter: DatacenterBase,
    #[serde(default)]
    pub blocks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CidrMap {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_datacenter: Option<DatacenterBase>,
    #[serde(default)]
    pub assignments: Vec<CidrAssignment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datacenter {
    pub datacenter_id: i64,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

// ── Requests ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetCidrMapRequest {
    pub domain: String,
    pub map_name: String,
}

pub type GetCidrMapResponse = CidrMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCidrMapRequest {
    pub domain: String,
    pub cidr_map: CidrMap,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateCidrMapResponse {
    #[serde(default)]
    pub resource: Option<CidrMap>,
    #[serde(default)]
    pub status: Option<ResponseStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCidrMapRequest {
    pub domain: String,
    pub cidr_map: CidrMap,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateCidrMapResponse {
    #[serde(default)]
    pub status: Option<ResponseStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCidrMapRequest {
    pub domain: String,
    pub map_name: String,
}

pub type DeleteCidrMapResponse = UpdateCidrMapResponse;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetDatacenterRequest {
    pub domain: String,
    pub datacenter_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMapsDefaultDatacenterRequest {
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateDatacenterResponse {
    #[serde(default)]
    pub resource: Option<Datacenter>,
    #[serde(default)]
    pub status: Option<ResponseStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetDomainStatusRequest {
    pub domain: String,
}

pub type GetDomainStatusResponse = ResponseStatus;
