// Hand-crafted async HTTP client for the GTM config API.
//
// Base path: /config-gtm/v1/domains/{domain}/
// Create and update are both a PUT on the named map.

use std::sync::Arc;

use async_trait::async_trait;

use super::Gtm;
use super::types::{
    CreateCidrMapRequest, CreateCidrMapResponse, CreateDatacenterResponse,
    CreateMapsDefaultDatacenterRequest, Datacenter, DeleteCidrMapRequest, DeleteCidrMapResponse,
    GetCidrMapRequest, GetCidrMapResponse, GetDatacenterRequest, GetDomainStatusRequest,
    GetDomainStatusResponse, UpdateCidrMapRequest, UpdateCidrMapResponse,
};
use crate::error::Error;
use crate::session::Session;

/// EdgeGrid-backed GTM client.
#[derive(Clone)]
pub struct GtmClient {
    session: Arc<Session>,
}

impl GtmClient {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    fn domain_path(domain: &str) -> String {
        format!("config-gtm/v1/domains/{domain}")
    }

    fn cidr_map_path(domain: &str, name: &str) -> String {
        format!("{}/cidr-maps/{name}", Self::domain_path(domain))
    }
}

#[async_trait]
impl Gtm for GtmClient {
    async fn get_cidr_map(&self, req: GetCidrMapRequest) -> Result<GetCidrMapResponse, Error> {
        self.session
            .get(&Self::cidr_map_path(&req.domain, &req.map_name))
            .await
    }

    async fn create_cidr_map(
        &self,
        req: CreateCidrMapRequest,
    ) -> Result<CreateCidrMapResponse, Error> {
        self.session
            .put(
                &Self::cidr_map_path(&req.domain, &req.cidr_map.name),
                &req.cidr_map,
            )
            .await
    }

    async fn update_cidr_map(
        &self,
        req: UpdateCidrMapRequest,
    ) -> Result<UpdateCidrMapResponse, Error> {
        self.session
            .put(
                &Self::cidr_map_path(&req.domain, &req.cidr_map.name),
                &req.cidr_map,
            )
            .await
    }

    async fn delete_cidr_map(
        &self,
        req: DeleteCidrMapRequest,
    ) -> Result<DeleteCidrMapResponse, Error> {
        self.session
            .delete(&Self::cidr_map_path(&req.domain, &req.map_name))
            .await
    }

    async fn get_datacenter(&self, req: GetDatacenterRequest) -> Result<Datacenter, Error> {
        self.session
            .get(&format!(
                "{}/datacenters/{}",
                Self::domain_path(&req.domain),
                req.datacenter_id
            ))
            .await
    }

    async fn create_maps_default_datacenter(
        &self,
        req: CreateMapsDefaultDatacenterRequest,
    ) -> Result<CreateDatacenterResponse, Error> {
        self.session
            .post(
                &format!(
                    "{}/datacenters/default-datacenter-for-maps",
                    Self::domain_path(&req.domain)
                ),
                &serde_json::json!({}),
            )
            .await
    }

    async fn get_domain_status(
        &self,
        req: GetDomainStatusRequest,
    ) -> Result<GetDomainStatusResponse, Error> {
        self.session
            .get(&format!(
                "{}/status/current",
                Self::domain_path(&req.domain)
            ))
            .await
    }
}
