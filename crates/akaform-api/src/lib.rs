// akaform-api: Async Rust client for the Akamai AppSec, GTM and Cloudlets APIs

pub mod appsec;
pub mod cloudlets;
pub mod edgegrid;
pub mod error;
pub mod gtm;
pub mod session;
pub mod transport;

pub use appsec::{AppSec, AppSecClient};
pub use edgegrid::EdgeGridCredentials;
pub use error::Error;
pub use gtm::{Gtm, GtmClient};
pub use session::Session;
pub use transport::{TlsMode, TransportConfig};
