pub mod appsec_custom_rule_actions;
pub mod appsec_selectable_hostnames;
pub mod cloudlets_match_rule;

pub use appsec_custom_rule_actions::{CustomRuleActionsDataSource, render_custom_rule_actions};
pub use appsec_selectable_hostnames::SelectableHostnamesDataSource;
pub use cloudlets_match_rule::{CloudletsMatchRuleDataSource, MatchRuleKind};
