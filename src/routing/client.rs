//!
//! HTTP client for the order-routing service.
//!
//! Implements [`RemoteConfigGateway`] over the service's REST layout. Every response goes
//! through the same failure check ([`has_error`]) before it is decoded, so callers only ever
//! see decoded payloads or a [`GatewayError`].

use super::types::*;
use crate::store::RemoteConfigGateway;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

const BASE_URL_ENV: &str = "ORDER_ROUTING_BASE_URL";
const API_TOKEN_ENV: &str = "ORDER_ROUTING_API_TOKEN";
const TIMEOUT_ENV: &str = "ORDER_ROUTING_TIMEOUT_SECS";

/// Body keys the service uses to flag a failed request.
const ERROR_KEYS: [&str; 4] = ["errors", "errorCode", "_ERROR_MESSAGE_", "_ERROR_MESSAGE_LIST_"];

/// Connection settings for the routing service
#[derive(Debug, Clone)]
pub struct GatewayConfig {
	/// Base URL of the order-routing REST resource, e.g. `https://host/rest/s1/order-routing`.
	pub base_url: String,
	/// Bearer token sent with every request, if set.
	pub api_token: Option<String>,
	/// Per-request timeout.
	pub timeout: Duration,
}

impl Default for GatewayConfig {
	fn default() -> Self {
		Self {
			base_url: "http://localhost:8080/rest/s1/order-routing".to_string(),
			api_token: None,
			timeout: Duration::from_secs(30),
		}
	}
}

impl GatewayConfig {
	/// Defaults overridden by `ORDER_ROUTING_*` environment variables.
	pub fn from_env() -> Self {
		let mut config = Self::default();
		if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
			config.base_url = base_url;
		}
		config.api_token = std::env::var(API_TOKEN_ENV).ok().filter(|t| !t.is_empty());
		if let Some(secs) = std::env::var(TIMEOUT_ENV)
			.ok()
			.and_then(|s| s.parse::<u64>().ok())
		{
			config.timeout = Duration::from_secs(secs);
		}
		config
	}
}

/// Return the service's error message if `body` flags a failed request.
///
/// An indicator that is null, `false`, an empty string or an empty list flags nothing.
pub fn has_error(body: &Value) -> Option<String> {
	ERROR_KEYS
		.iter()
		.find_map(|key| body.get(*key).filter(|v| is_set(v)))
		.map(|indicator| match indicator {
			Value::String(message) => message.clone(),
			other => other.to_string(),
		})
}

fn is_set(indicator: &Value) -> bool {
	match indicator {
		Value::Null | Value::Bool(false) => false,
		Value::String(message) => !message.is_empty(),
		Value::Array(items) => !items.is_empty(),
		Value::Object(fields) => !fields.is_empty(),
		_ => true,
	}
}

/// REST client for the order-routing service
#[derive(Clone)]
pub struct HttpRoutingGateway {
	/// The underlying HTTP client.
	http_client: Client,
	/// Base URL without a trailing slash.
	base_url: String,
	api_token: Option<String>,
}

impl HttpRoutingGateway {
	/// Create a new gateway client.
	///
	/// # Errors
	/// Returns `GatewayError::HttpError` if the HTTP client cannot be built.
	pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
		let http_client = Client::builder().timeout(config.timeout).build()?;

		Ok(Self {
			http_client,
			base_url: config.base_url.trim_end_matches('/').to_string(),
			api_token: config.api_token.clone(),
		})
	}

	fn endpoint(&self, path: &str) -> String {
		format!("{}/{}", self.base_url, path)
	}

	/// Send a request and decode its body.
	///
	/// Non-2xx statuses and bodies carrying an error indicator are reported as
	/// `GatewayError::RemoteError`; an empty body is `GatewayError::NoData`.
	async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
		let request = match &self.api_token {
			Some(token) => request.bearer_auth(token),
			None => request,
		};

		let response = request.send().await?;
		let status = response.status();
		let text = response.text().await?;

		if !status.is_success() {
			error!("Routing service returned {}: {}", status, text);
			return Err(GatewayError::RemoteError(format!("HTTP error: {}", status)));
		}

		if text.trim().is_empty() {
			return Err(GatewayError::NoData);
		}

		let body: Value = serde_json::from_str(&text)?;
		if let Some(message) = has_error(&body) {
			return Err(GatewayError::RemoteError(message));
		}
		if body.is_null() {
			return Err(GatewayError::NoData);
		}

		debug!("Routing service response: {}", body);
		Ok(serde_json::from_value(body)?)
	}
}

#[async_trait::async_trait]
impl RemoteConfigGateway for HttpRoutingGateway {
	async fn fetch_routing_groups(
		&self,
		filter: &GroupFilter,
	) -> Result<Vec<RoutingGroup>, GatewayError> {
		let request = self.http_client.get(self.endpoint("groups")).query(filter);
		self.execute(request).await
	}

	async fn create_routing_group(
		&self,
		request: &CreateGroupRequest,
	) -> Result<GroupAck, GatewayError> {
		let request = self.http_client.post(self.endpoint("groups")).json(request);
		self.execute(request).await
	}

	async fn fetch_routing_group_information(
		&self,
		group_id: &str,
	) -> Result<RoutingGroup, GatewayError> {
		let request = self
			.http_client
			.get(self.endpoint(&format!("groups/{}", group_id)));
		self.execute(request).await
	}

	async fn create_order_routing(&self, route: &Route) -> Result<RoutingAck, GatewayError> {
		let request = self.http_client.post(self.endpoint("routings")).json(route);
		self.execute(request).await
	}

	async fn fetch_order_routing(&self, order_routing_id: &str) -> Result<Route, GatewayError> {
		let request = self
			.http_client
			.get(self.endpoint(&format!("routings/{}", order_routing_id)));
		self.execute(request).await
	}

	async fn create_routing_rule(&self, rule: &RoutingRule) -> Result<RuleAck, GatewayError> {
		let request = self.http_client.post(self.endpoint("rules")).json(rule);
		self.execute(request).await
	}

	async fn fetch_routing_filters(
		&self,
		order_routing_id: &str,
	) -> Result<Vec<RouteFilter>, GatewayError> {
		let request = self
			.http_client
			.get(self.endpoint(&format!("routings/{}/filters", order_routing_id)));
		self.execute(request).await
	}

	async fn delete_routing_filter(
		&self,
		request: &DeleteFilterRequest,
	) -> Result<RoutingAck, GatewayError> {
		let request = self
			.http_client
			.delete(self.endpoint(&format!("routings/{}/filters", request.order_routing_id)))
			.query(&[("conditionSeqId", request.condition_seq_id.as_str())]);
		self.execute(request).await
	}

	async fn update_routing(&self, route: &Route) -> Result<RoutingAck, GatewayError> {
		let order_routing_id = route.order_routing_id.as_deref().ok_or_else(|| {
			GatewayError::InvalidRequest("route update without orderRoutingId".to_string())
		})?;
		let request = self
			.http_client
			.put(self.endpoint(&format!("routings/{}", order_routing_id)))
			.json(route);
		self.execute(request).await
	}

	async fn fetch_rule_conditions(
		&self,
		routing_rule_id: &str,
	) -> Result<Vec<RuleCondition>, GatewayError> {
		let request = self
			.http_client
			.get(self.endpoint(&format!("rules/{}/conditions", routing_rule_id)));
		self.execute(request).await
	}

	async fn delete_rule_condition(
		&self,
		request: &DeleteConditionRequest,
	) -> Result<ConditionAck, GatewayError> {
		let request = self
			.http_client
			.delete(self.endpoint(&format!("rules/{}/conditions", request.routing_rule_id)))
			.query(&[("conditionSeqId", request.condition_seq_id.as_str())]);
		self.execute(request).await
	}

	async fn create_rule_condition(
		&self,
		request: &CreateConditionRequest,
	) -> Result<ConditionAck, GatewayError> {
		let request = self
			.http_client
			.post(self.endpoint(&format!("rules/{}/conditions", request.routing_rule_id)))
			.json(request);
		self.execute(request).await
	}

	async fn fetch_rule(&self, routing_rule_id: &str) -> Result<RuleDetailResponse, GatewayError> {
		let request = self
			.http_client
			.get(self.endpoint(&format!("rules/{}", routing_rule_id)));
		self.execute(request).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use wiremock::matchers::{body_partial_json, header, method, path, query_param};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	async fn gateway_for(server: &MockServer) -> HttpRoutingGateway {
		let config = GatewayConfig {
			base_url: format!("{}/rest/s1/order-routing/", server.uri()),
			api_token: Some("secret".to_string()),
			timeout: Duration::from_secs(5),
		};
		HttpRoutingGateway::new(&config).unwrap()
	}

	#[test]
	fn error_indicators_are_detected() {
		assert_eq!(
			has_error(&json!({"_ERROR_MESSAGE_": "Rule not found"})),
			Some("Rule not found".to_string())
		);
		assert!(has_error(&json!({"errors": ["bad"]})).is_some());
		assert!(has_error(&json!({"errorCode": 400})).is_some());
		assert!(has_error(&json!({"orderRoutingId": "OR1"})).is_none());
		assert!(has_error(&json!([{"groupId": "G1"}])).is_none());
	}

	#[test]
	fn empty_error_indicators_are_ignored() {
		assert!(has_error(&json!({"errors": [], "orderRoutingId": "OR1"})).is_none());
		assert!(has_error(&json!({"_ERROR_MESSAGE_": ""})).is_none());
		assert!(has_error(&json!({"errorCode": false})).is_none());
		assert!(has_error(&json!({"_ERROR_MESSAGE_LIST_": {}})).is_none());
		assert_eq!(
			has_error(&json!({"errors": [], "_ERROR_MESSAGE_": "Rule not found"})).as_deref(),
			Some("Rule not found")
		);
	}

	#[tokio::test]
	async fn lists_groups_scoped_to_store() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/rest/s1/order-routing/groups"))
			.and(query_param("productStoreId", "STORE"))
			.and(header("authorization", "Bearer secret"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!([
				{"groupId": "G1", "groupName": "Nightly", "sequenceNum": 2},
				{"groupId": "G2", "groupName": "Hourly", "sequenceNum": 1}
			])))
			.expect(1)
			.mount(&server)
			.await;

		let gateway = gateway_for(&server).await;
		let groups = gateway
			.fetch_routing_groups(&GroupFilter {
				product_store_id: "STORE".to_string(),
			})
			.await
			.unwrap();

		assert_eq!(groups.len(), 2);
		assert_eq!(groups[0].group_id, "G1");
	}

	#[tokio::test]
	async fn error_body_with_success_status_is_a_failure() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/rest/s1/order-routing/rules/R9"))
			.respond_with(
				ResponseTemplate::new(200)
					.set_body_json(json!({"_ERROR_MESSAGE_": "Rule R9 not found"})),
			)
			.mount(&server)
			.await;

		let gateway = gateway_for(&server).await;
		let err = gateway.fetch_rule("R9").await.unwrap_err();
		assert!(matches!(err, GatewayError::RemoteError(ref m) if m == "Rule R9 not found"));
	}

	#[tokio::test]
	async fn server_error_status_is_a_failure() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/rest/s1/order-routing/routings"))
			.respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
			.mount(&server)
			.await;

		let gateway = gateway_for(&server).await;
		let err = gateway
			.create_order_routing(&Route::default())
			.await
			.unwrap_err();
		assert!(matches!(err, GatewayError::RemoteError(_)));
	}

	#[tokio::test]
	async fn creates_condition_with_flattened_payload() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/rest/s1/order-routing/rules/R1/conditions"))
			.and(body_partial_json(json!({
				"routingRuleId": "R1",
				"conditionTypeEnumId": "ENTCT_FILTER",
				"fieldName": "distance"
			})))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({"conditionSeqId": "05"})))
			.expect(1)
			.mount(&server)
			.await;

		let gateway = gateway_for(&server).await;
		let ack = gateway
			.create_rule_condition(&CreateConditionRequest {
				routing_rule_id: "R1".to_string(),
				condition: RoutingCondition {
					condition_type_enum_id: "ENTCT_FILTER".to_string(),
					field_name: "distance".to_string(),
					field_value: Some("50".to_string()),
					..Default::default()
				},
			})
			.await
			.unwrap();
		assert_eq!(ack.condition_seq_id.as_deref(), Some("05"));
	}

	#[tokio::test]
	async fn deletes_filter_by_sequence_id() {
		let server = MockServer::start().await;
		Mock::given(method("DELETE"))
			.and(path("/rest/s1/order-routing/routings/OR1/filters"))
			.and(query_param("conditionSeqId", "02"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({"orderRoutingId": "OR1"})))
			.expect(1)
			.mount(&server)
			.await;

		let gateway = gateway_for(&server).await;
		let ack = gateway
			.delete_routing_filter(&DeleteFilterRequest {
				order_routing_id: "OR1".to_string(),
				condition_seq_id: "02".to_string(),
			})
			.await
			.unwrap();
		assert_eq!(ack.order_routing_id.as_deref(), Some("OR1"));
	}

	#[tokio::test]
	async fn update_requires_route_id() {
		let server = MockServer::start().await;
		let gateway = gateway_for(&server).await;
		let err = gateway.update_routing(&Route::default()).await.unwrap_err();
		assert!(matches!(err, GatewayError::InvalidRequest(_)));
	}
}
