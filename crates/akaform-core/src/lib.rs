//! Resource and data-source adapters between `akaform-api` and a host
//! (the `akaform` CLI or a test harness).
//!
//! - **[`Provider`]**: registry of every adapter, built over an [`AppSec`]
//!   and a [`Gtm`] facade. [`Provider::connect`] wires EdgeGrid clients from
//!   a [`ClientConfig`]; tests pass recording fakes to [`Provider::new`].
//!
//! - **[`Resource`] / [`DataSource`]**: the adapter contracts. Each adapter
//!   declares a [`Schema`] and mutates a [`ResourceData`] bound to it.
//!
//! - **Helpers**: composite ids ([`id`]), configuration version
//!   resolution ([`version`]), and WAF-mode-dependent rule planning
//!   ([`waf`]).
//!
//! [`AppSec`]: akaform_api::AppSec
//! [`Gtm`]: akaform_api::Gtm

pub mod config;
pub mod data_sources;
pub mod error;
pub mod id;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod version;
pub mod waf;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::ClientConfig;
pub use error::CoreError;
pub use id::{CidrMapId, RuleId};
pub use provider::{DataSource, Provider, ProviderOptions, Resource, apply_update};
pub use schema::{AttrType, Attribute, AttributeInfo, ResourceData, Schema};
pub use waf::{RuleChange, WafMode};
