#![allow(clippy::unwrap_used)]
// Integration tests for `GtmClient` using wiremock.

use std::sync::Arc;

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use akaform_api::gtm::{
    CidrAssignment, CidrMap, CreateCidrMapRequest, DatacenterBase, DeleteCidrMapRequest,
    GetCidrMapRequest, GetDomainStatusRequest,
};
use akaform_api::{EdgeGridCredentials, Gtm, GtmClient, Session};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, GtmClient) {
    let server = MockServer::start().await;
    let creds = EdgeGridCredentials::new(
        server.uri(),
        "akab-client",
        SecretString::from("secret".to_owned()),
        SecretString::from("akab-access".to_owned()),
    );
    let session = Session::with_client(reqwest::Client::new(), creds).unwrap();
    (server, GtmClient::new(Arc::new(session)))
}

fn status_body(propagation: &str) -> serde_json::Value {
    json!({
        "changeId": "40e36abd-bfb2-4635-9fca-62175cf17007",
        "links": [{ "rel": "self", "href": "https://example.net/status/current" }],
        "message": "Current configuration has been propagated to all GTM nameservers",
        "passingValidation": true,
        "propagationStatus": propagation,
        "propagationStatusDate": "2019-04-25T14:54:00.000+00:00"
    })
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_cidr_map_puts_named_map() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path(
            "/config-gtm/v1/domains/gtm_terra_testdomain.akadns.net/cidr-maps/tfexample_cidrmap_1",
        ))
        .and(body_partial_json(json!({
            "name": "tfexample_cidrmap_1",
            "assignments": [{ "datacenterId": 3131, "blocks": ["1.2.3.9/24"] }]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "resource": {
                "name": "tfexample_cidrmap_1",
                "defaultDatacenter": { "datacenterId": 5400, "nickname": "default datacenter" },
                "assignments": [{ "datacenterId": 3131, "nickname": "tfexample_dc_1", "blocks": ["1.2.3.9/24"] }]
            },
            "status": status_body("PENDING")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client
        .create_cidr_map(CreateCidrMapRequest {
            domain: "gtm_terra_testdomain.akadns.net".into(),
            cidr_map: CidrMap {
                name: "tfexample_cidrmap_1".into(),
                default_datacenter: Some(DatacenterBase {
                    datacenter_id: 5400,
                    nickname: "default datacenter".into(),
                }),
                assignments: vec![CidrAssignment {
                    datacenter: DatacenterBase {
                        datacenter_id: 3131,
                        nickname: "tfexample_dc_1".into(),
                    },
                    blocks: vec!["1.2.3.9/24".into()],
                }],
                links: Vec::new(),
            },
        })
        .await
        .unwrap();

    let status = resp.status.unwrap();
    assert_eq!(status.propagation_status, "PENDING");
    assert_eq!(resp.resource.unwrap().assignments.len(), 1);
}

#[tokio::test]
async fn test_get_missing_cidr_map_is_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "title": "Not Found",
            "status": 404
        })))
        .mount(&server)
        .await;

    let err = client
        .get_cidr_map(GetCidrMapRequest {
            domain: "example.akadns.net".into(),
            map_name: "missing".into(),
        })
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_and_domain_status() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/config-gtm/v1/domains/example.akadns.net/cidr-maps/m1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": status_body("PENDING") })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/config-gtm/v1/domains/example.akadns.net/status/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body("COMPLETE")))
        .mount(&server)
        .await;

    let deleted = client
        .delete_cidr_map(DeleteCidrMapRequest {
            domain: "example.akadns.net".into(),
            map_name: "m1".into(),
        })
        .await
        .unwrap();
    assert_eq!(deleted.status.unwrap().propagation_status, "PENDING");

    let status = client
        .get_domain_status(GetDomainStatusRequest {
            domain: "example.akadns.net".into(),
        })
        .await
        .unwrap();
    assert!(status.is_complete());
}
