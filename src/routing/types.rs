//! Wire types for the order-routing service.
//!
//! Every entity keeps the attributes this crate does not interpret in a flattened `extra`
//! map, so a payload read from the service can be written back without losing fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::{Conditioned, Sequenced};

/// Attributes carried through untouched.
pub type Attributes = Map<String, Value>;

/// Top-level container of routes, scoped to a product store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingGroup {
	#[serde(default)]
	pub group_id: String,
	#[serde(default)]
	pub group_name: String,
	#[serde(default)]
	pub product_store_id: String,
	/// Epoch milliseconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_date: Option<i64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sequence_num: Option<i64>,
	#[serde(default)]
	pub routings: Vec<Route>,
	#[serde(flatten)]
	pub extra: Attributes,
}

/// One order-routing definition within a group.
///
/// `order_routing_id` is `None` on create payloads; the service assigns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub order_routing_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub group_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub routing_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sequence_num: Option<i64>,
	#[serde(flatten)]
	pub extra: Attributes,
}

/// Inventory rule, attachable to routes by reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingRule {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub routing_rule_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub order_routing_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub rule_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sequence_num: Option<i64>,
	#[serde(flatten)]
	pub extra: Attributes,
}

/// A typed, named constraint. Attached to a route it is a filter, attached to a rule
/// it is a condition; the shape is the same.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingCondition {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub condition_seq_id: Option<String>,
	pub condition_type_enum_id: String,
	pub field_name: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub operator: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub field_value: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sequence_num: Option<i64>,
	#[serde(flatten)]
	pub extra: Attributes,
}

pub type RouteFilter = RoutingCondition;
pub type RuleCondition = RoutingCondition;

/// Action executed by a rule, unique per `action_type_enum_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleAction {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub action_seq_id: Option<String>,
	pub action_type_enum_id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub action_value: Option<String>,
	#[serde(flatten)]
	pub extra: Attributes,
}

/// Rule as returned by the rule detail endpoint, before indexing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDetailResponse {
	#[serde(default)]
	pub inventory_filters: Vec<RoutingCondition>,
	#[serde(default)]
	pub actions: Vec<RuleAction>,
	#[serde(flatten)]
	pub rule: RoutingRule,
}

impl Sequenced for RoutingGroup {
	fn sequence_num(&self) -> Option<i64> {
		self.sequence_num
	}
}

impl Sequenced for Route {
	fn sequence_num(&self) -> Option<i64> {
		self.sequence_num
	}
}

impl Sequenced for RoutingRule {
	fn sequence_num(&self) -> Option<i64> {
		self.sequence_num
	}
}

impl Sequenced for RoutingCondition {
	fn sequence_num(&self) -> Option<i64> {
		self.sequence_num
	}
}

impl Conditioned for RoutingCondition {
	fn condition_type(&self) -> &str {
		&self.condition_type_enum_id
	}

	fn field_name(&self) -> &str {
		&self.field_name
	}
}

/// Store scope applied when listing groups.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupFilter {
	pub product_store_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
	pub group_name: String,
	pub product_store_id: String,
	/// Epoch milliseconds.
	pub created_date: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFilterRequest {
	pub order_routing_id: String,
	pub condition_seq_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteConditionRequest {
	pub routing_rule_id: String,
	pub condition_seq_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConditionRequest {
	pub routing_rule_id: String,
	#[serde(flatten)]
	pub condition: RoutingCondition,
}

/// Acknowledgements returned by mutating endpoints. A missing id means the call did not
/// succeed even when the transport reported success.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupAck {
	#[serde(default)]
	pub group_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingAck {
	#[serde(default)]
	pub order_routing_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleAck {
	#[serde(default)]
	pub routing_rule_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionAck {
	#[serde(default)]
	pub condition_seq_id: Option<String>,
}

/// Error types for calls against the routing service
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
	#[error("Remote error: {0}")]
	RemoteError(String),

	#[error("No data returned")]
	NoData,

	#[error("Invalid request: {0}")]
	InvalidRequest(String),

	#[error("HTTP error: {0}")]
	HttpError(#[from] reqwest::Error),

	#[error("JSON parse error: {0}")]
	JsonError(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn unknown_route_attributes_survive_a_round_trip() {
		let raw = json!({
			"orderRoutingId": "OR1",
			"routingName": "Ship from store",
			"sequenceNum": 4,
			"description": "nearest store first"
		});

		let route: Route = serde_json::from_value(raw.clone()).unwrap();
		assert_eq!(route.order_routing_id.as_deref(), Some("OR1"));
		assert_eq!(route.extra.get("description"), Some(&json!("nearest store first")));
		assert_eq!(serde_json::to_value(&route).unwrap(), raw);
	}

	#[test]
	fn rule_detail_separates_lists_from_rule_attributes() {
		let raw = json!({
			"routingRuleId": "R1",
			"ruleName": "Nearby stores",
			"assignmentEnumId": "ORA_SINGLE",
			"inventoryFilters": [
				{"conditionSeqId": "01", "conditionTypeEnumId": "ENTCT_FILTER", "fieldName": "facilityGroupId"}
			],
			"actions": [
				{"actionSeqId": "01", "actionTypeEnumId": "ORA_NEXT_RULE"}
			]
		});

		let detail: RuleDetailResponse = serde_json::from_value(raw).unwrap();
		assert_eq!(detail.rule.routing_rule_id.as_deref(), Some("R1"));
		assert_eq!(detail.inventory_filters.len(), 1);
		assert_eq!(detail.actions[0].action_type_enum_id, "ORA_NEXT_RULE");
		assert!(detail.rule.extra.contains_key("assignmentEnumId"));
		assert!(!detail.rule.extra.contains_key("inventoryFilters"));
	}

	#[test]
	fn create_payload_omits_missing_id() {
		let route = Route {
			routing_name: Some("New".to_string()),
			sequence_num: Some(1),
			..Default::default()
		};
		let value = serde_json::to_value(&route).unwrap();
		assert!(value.get("orderRoutingId").is_none());
	}
}
