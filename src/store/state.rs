//! In-memory mirror of the routing configuration tree.
//!
//! The state is a plain value. Readers get shared references through accessors; the
//! controller replaces it wholesale through the consuming `with_*` methods, so there is
//! never a partially updated snapshot and nothing outside the crate can mutate it.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::routing::{
	Route, RouteFilter, RoutingCondition, RoutingGroup, RoutingRule, RuleAction, RuleCondition,
	RuleDetailResponse,
};
use crate::utils::{GroupedIndex, index_conditions};

/// A rule expanded for editing: filters indexed by `(type, field name)` and actions keyed
/// by action type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDetail {
	#[serde(flatten)]
	pub rule: RoutingRule,
	pub inventory_filters: GroupedIndex<RoutingCondition>,
	pub actions: IndexMap<String, RuleAction>,
}

impl RuleDetail {
	/// Index a raw rule detail response. Sort-by filters are ordered by sequence before
	/// indexing; a later action with the same type replaces an earlier one.
	pub fn from_response(response: RuleDetailResponse) -> Self {
		let inventory_filters = index_conditions(&response.inventory_filters);
		let actions = response
			.actions
			.into_iter()
			.map(|action| (action.action_type_enum_id.clone(), action))
			.collect();

		Self {
			rule: response.rule,
			inventory_filters,
			actions,
		}
	}
}

/// Snapshot of everything the presentation layer reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationTreeState {
	groups: Vec<RoutingGroup>,
	current_group: Option<RoutingGroup>,
	current_route: Option<Route>,
	rules: Vec<RoutingRule>,
	rule_details: HashMap<String, RuleDetail>,
	route_filters: GroupedIndex<RouteFilter>,
	rule_conditions: GroupedIndex<RuleCondition>,
}

impl ConfigurationTreeState {
	pub fn groups(&self) -> &[RoutingGroup] {
		&self.groups
	}

	pub fn current_group(&self) -> Option<&RoutingGroup> {
		self.current_group.as_ref()
	}

	pub fn current_route(&self) -> Option<&Route> {
		self.current_route.as_ref()
	}

	/// Flat rule list, in sequence order.
	pub fn rules(&self) -> &[RoutingRule] {
		&self.rules
	}

	pub fn rule_detail(&self, routing_rule_id: &str) -> Option<&RuleDetail> {
		self.rule_details.get(routing_rule_id)
	}

	pub fn cached_rule_count(&self) -> usize {
		self.rule_details.len()
	}

	/// Filters of the last route loaded with `load_filters`.
	pub fn route_filters(&self) -> &GroupedIndex<RouteFilter> {
		&self.route_filters
	}

	/// Conditions of the last rule loaded with `load_conditions`.
	pub fn rule_conditions(&self) -> &GroupedIndex<RuleCondition> {
		&self.rule_conditions
	}

	pub(crate) fn with_groups(self, groups: Vec<RoutingGroup>) -> Self {
		Self { groups, ..self }
	}

	pub(crate) fn with_current_group(self, current_group: Option<RoutingGroup>) -> Self {
		Self {
			current_group,
			..self
		}
	}

	pub(crate) fn with_current_route(self, current_route: Option<Route>) -> Self {
		Self {
			current_route,
			..self
		}
	}

	pub(crate) fn with_rules(self, rules: Vec<RoutingRule>) -> Self {
		Self { rules, ..self }
	}

	pub(crate) fn with_rule_detail(mut self, routing_rule_id: String, detail: RuleDetail) -> Self {
		self.rule_details.insert(routing_rule_id, detail);
		self
	}

	pub(crate) fn without_rule_details(self) -> Self {
		Self {
			rule_details: HashMap::new(),
			..self
		}
	}

	pub(crate) fn with_route_filters(self, route_filters: GroupedIndex<RouteFilter>) -> Self {
		Self {
			route_filters,
			..self
		}
	}

	pub(crate) fn with_rule_conditions(self, rule_conditions: GroupedIndex<RuleCondition>) -> Self {
		Self {
			rule_conditions,
			..self
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::utils::SORT_BY_CONDITION_TYPE;

	fn condition(kind: &str, field: &str, seq: i64) -> RoutingCondition {
		RoutingCondition {
			condition_seq_id: Some(format!("{:02}", seq)),
			condition_type_enum_id: kind.to_string(),
			field_name: field.to_string(),
			sequence_num: Some(seq),
			..Default::default()
		}
	}

	fn action(kind: &str, value: &str) -> RuleAction {
		RuleAction {
			action_type_enum_id: kind.to_string(),
			action_value: Some(value.to_string()),
			..Default::default()
		}
	}

	#[test]
	fn starts_empty() {
		let state = ConfigurationTreeState::default();
		assert!(state.groups().is_empty());
		assert!(state.current_group().is_none());
		assert!(state.current_route().is_none());
		assert!(state.rules().is_empty());
		assert_eq!(state.cached_rule_count(), 0);
		assert!(state.route_filters().is_empty());
	}

	#[test]
	fn updates_touch_only_their_field() {
		let group = RoutingGroup {
			group_id: "G1".to_string(),
			..Default::default()
		};
		let state = ConfigurationTreeState::default()
			.with_groups(vec![group.clone()])
			.with_current_group(Some(group.clone()))
			.with_rule_detail("R1".to_string(), RuleDetail::default());

		let next = state.clone().with_current_route(Some(Route::default()));
		assert_eq!(next.groups(), state.groups());
		assert_eq!(next.current_group(), Some(&group));
		assert!(next.rule_detail("R1").is_some());
		assert!(state.current_route().is_none());
	}

	#[test]
	fn invalidation_drops_every_cached_rule() {
		let state = ConfigurationTreeState::default()
			.with_rule_detail("R1".to_string(), RuleDetail::default())
			.with_rule_detail("R2".to_string(), RuleDetail::default())
			.without_rule_details();
		assert_eq!(state.cached_rule_count(), 0);
	}

	#[test]
	fn rule_detail_indexes_filters_and_actions() {
		let response = RuleDetailResponse {
			inventory_filters: vec![
				condition(SORT_BY_CONDITION_TYPE, "shipByDate", 2),
				condition("ENTCT_FILTER", "facilityGroupId", 1),
				condition(SORT_BY_CONDITION_TYPE, "orderDate", 1),
			],
			actions: vec![
				action("ORA_NEXT_RULE", "first"),
				action("ORA_MV_TO_QUEUE", "queue"),
				action("ORA_NEXT_RULE", "second"),
			],
			rule: RoutingRule {
				routing_rule_id: Some("R1".to_string()),
				..Default::default()
			},
		};

		let detail = RuleDetail::from_response(response);
		let sort_fields: Vec<&str> = detail.inventory_filters[SORT_BY_CONDITION_TYPE]
			.keys()
			.map(String::as_str)
			.collect();
		assert_eq!(sort_fields, vec!["orderDate", "shipByDate"]);
		assert_eq!(detail.actions.len(), 2);
		assert_eq!(
			detail.actions["ORA_NEXT_RULE"].action_value.as_deref(),
			Some("second")
		);
	}
}
