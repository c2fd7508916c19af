// GTM (Global Traffic Management) facade

pub mod client;
pub mod types;

use async_trait::async_trait;

use crate::error::Error;

pub use client::GtmClient;
pub use types::*;

/// Typed request/response operations against the GTM config API.
#[async_trait]
pub trait Gtm: Send + Sync {
    async fn get_cidr_map(&self, req: GetCidrMapRequest) -> Result<GetCidrMapResponse, Error>;

    async fn create_cidr_map(
        &self,
        req: CreateCidrMapRequest,
    ) -> Result<CreateCidrMapResponse, Error>;

    async fn update_cidr_map(
        &self,
        req: UpdateCidrMapRequest,
    ) -> Result<UpdateCidrMapResponse, Error>;

    async fn delete_cidr_map(
        &self,
        req: DeleteCidrMapRequest,
    ) -> Result<DeleteCidrMapResponse, Error>;

    async fn get_datacenter(&self, req: GetDatacenterRequest) -> Result<Datacenter, Error>;

    async fn create_maps_default_datacenter(
        &self,
        req: CreateMapsDefaultDatacenterRequest,
    ) -> Result<CreateDatacenterResponse, Error>;

    async fn get_domain_status(
        &self,
        req: GetDomainStatusRequest,
    ) -> Result<GetDomainStatusResponse, Error>;
}
