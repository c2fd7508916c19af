// Resource adapters, one module per resource type.

pub mod appsec_advanced_settings_prefetch;
pub mod appsec_rule;
pub mod gtm_cidrmap;

pub use appsec_advanced_settings_prefetch::AdvancedSettingsPrefetchResource;
pub use appsec_rule::{AppSecRuleResource, verify_id_unchanged};
pub use gtm_cidrmap::{GtmCidrMapResource, reconcile_assignments};
