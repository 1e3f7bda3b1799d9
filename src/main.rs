use order_routing_sync::routing::{GatewayConfig, HttpRoutingGateway};
use order_routing_sync::store::{LoggingEventHandler, ReferenceData, StoreConfig, SyncController};
use order_routing_sync::utils::sort_by_entries;
use tracing::{error, info, warn};

const PRODUCT_STORE_ENV: &str = "ORDER_ROUTING_PRODUCT_STORE_ID";
const REFERENCE_DATA_ENV: &str = "ORDER_ROUTING_REFERENCE_DATA";

/// Read the lookup tables from the JSON file named by `ORDER_ROUTING_REFERENCE_DATA`.
fn load_reference_data() -> ReferenceData {
	let Ok(path) = std::env::var(REFERENCE_DATA_ENV) else {
		return ReferenceData::default();
	};

	let parsed = std::fs::read_to_string(&path)
		.map_err(|e| e.to_string())
		.and_then(|raw| serde_json::from_str(&raw).map_err(|e| e.to_string()));
	match parsed {
		Ok(reference_data) => reference_data,
		Err(e) => {
			warn!("Ignoring reference data at {}: {}", path, e);
			ReferenceData::default()
		}
	}
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::from_default_env()
				.add_directive(tracing::Level::INFO.into()),
		)
		.with_target(false)
		.with_thread_ids(false)
		.with_thread_names(false)
		.with_file(false)
		.with_line_number(false)
		.with_timer(tracing_subscriber::fmt::time::time())
		.init();

	info!("Starting order routing sync");

	let gateway_config = GatewayConfig::from_env();
	let mut store_config = StoreConfig::default();
	if let Ok(product_store_id) = std::env::var(PRODUCT_STORE_ENV) {
		store_config.product_store_id = product_store_id;
	}

	let gateway = match HttpRoutingGateway::new(&gateway_config) {
		Ok(gateway) => gateway,
		Err(e) => {
			error!("Failed to create routing gateway: {}", e);
			return;
		}
	};

	info!(
		"Using routing service at {} for store {}",
		gateway_config.base_url, store_config.product_store_id
	);

	let mut controller = SyncController::new(Box::new(gateway), store_config)
		.with_reference_data(load_reference_data());
	controller.register_handler(Box::new(LoggingEventHandler));

	controller.list_groups().await;
	let groups = controller.state().groups();
	info!("Fetched {} routing groups", groups.len());

	let Some(first_group_id) = groups.first().map(|group| group.group_id.clone()) else {
		info!("No routing groups found");
		return;
	};

	controller.load_group(&first_group_id).await;
	let first_route_id = match controller.state().current_group() {
		Some(group) => {
			info!(
				"Group {} ({}) has {} routes",
				group.group_id,
				group.group_name,
				group.routings.len()
			);
			for route in &group.routings {
				info!(
					"  [{}] {} {}",
					route.sequence_num.unwrap_or_default(),
					route.order_routing_id.as_deref().unwrap_or("-"),
					route.routing_name.as_deref().unwrap_or("")
				);
			}
			group
				.routings
				.first()
				.and_then(|route| route.order_routing_id.clone())
		}
		None => {
			error!("Failed to load routing group {}", first_group_id);
			None
		}
	};

	let Some(order_routing_id) = first_route_id else {
		return;
	};

	controller.load_filters(&order_routing_id).await;
	let reference = controller.reference_data();
	for filter in sort_by_entries(controller.state().route_filters()) {
		info!(
			"Route {} sorts by {}",
			order_routing_id,
			reference
				.enum_description(&filter.field_name)
				.unwrap_or(filter.field_name.as_str())
		);
	}
}
