use crate::routing::{
	ConditionAck, CreateConditionRequest, CreateGroupRequest, DeleteConditionRequest,
	DeleteFilterRequest, GatewayError, GroupAck, GroupFilter, Route, RouteFilter, RoutingAck,
	RoutingGroup, RoutingRule, RuleAck, RuleCondition, RuleDetailResponse,
};

/// Boundary to the routing service's CRUD endpoints.
///
/// Every call is a single request/response round trip and may fail. Implementations report
/// an explicit error indicator in the response as `Err`; acknowledgements whose id field
/// is absent are returned as-is and judged by the caller.
#[async_trait::async_trait]
pub trait RemoteConfigGateway: Send + Sync {
	async fn fetch_routing_groups(
		&self,
		filter: &GroupFilter,
	) -> Result<Vec<RoutingGroup>, GatewayError>;

	async fn create_routing_group(
		&self,
		request: &CreateGroupRequest,
	) -> Result<GroupAck, GatewayError>;

	async fn fetch_routing_group_information(
		&self,
		group_id: &str,
	) -> Result<RoutingGroup, GatewayError>;

	async fn create_order_routing(&self, route: &Route) -> Result<RoutingAck, GatewayError>;

	async fn fetch_order_routing(&self, order_routing_id: &str) -> Result<Route, GatewayError>;

	async fn create_routing_rule(&self, rule: &RoutingRule) -> Result<RuleAck, GatewayError>;

	async fn fetch_routing_filters(
		&self,
		order_routing_id: &str,
	) -> Result<Vec<RouteFilter>, GatewayError>;

	async fn delete_routing_filter(
		&self,
		request: &DeleteFilterRequest,
	) -> Result<RoutingAck, GatewayError>;

	async fn update_routing(&self, route: &Route) -> Result<RoutingAck, GatewayError>;

	async fn fetch_rule_conditions(
		&self,
		routing_rule_id: &str,
	) -> Result<Vec<RuleCondition>, GatewayError>;

	async fn delete_rule_condition(
		&self,
		request: &DeleteConditionRequest,
	) -> Result<ConditionAck, GatewayError>;

	async fn create_rule_condition(
		&self,
		request: &CreateConditionRequest,
	) -> Result<ConditionAck, GatewayError>;

	async fn fetch_rule(&self, routing_rule_id: &str) -> Result<RuleDetailResponse, GatewayError>;
}
