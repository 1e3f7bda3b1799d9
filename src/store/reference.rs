//! Read-only reference data (enumerations, facilities, shipping methods, facility groups).
//!
//! Loaded once by whoever bootstraps the store and never written afterwards. Entries are
//! kept as opaque JSON since nothing here interprets them.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

pub type LookupTable = HashMap<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceData {
	#[serde(default)]
	enums: LookupTable,
	#[serde(default)]
	facilities: LookupTable,
	#[serde(default)]
	shipping_methods: LookupTable,
	#[serde(default)]
	facility_groups: LookupTable,
}

impl ReferenceData {
	pub fn new(
		enums: LookupTable,
		facilities: LookupTable,
		shipping_methods: LookupTable,
		facility_groups: LookupTable,
	) -> Self {
		Self {
			enums,
			facilities,
			shipping_methods,
			facility_groups,
		}
	}

	pub fn enums(&self) -> &LookupTable {
		&self.enums
	}

	pub fn facilities(&self) -> &LookupTable {
		&self.facilities
	}

	pub fn shipping_methods(&self) -> &LookupTable {
		&self.shipping_methods
	}

	pub fn facility_groups(&self) -> &LookupTable {
		&self.facility_groups
	}

	/// Human readable description of an enumeration id, if known.
	pub fn enum_description(&self, enum_id: &str) -> Option<&str> {
		self.enums
			.get(enum_id)
			.and_then(|entry| entry.get("description"))
			.and_then(Value::as_str)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn loads_from_json_with_missing_tables() {
		let data: ReferenceData = serde_json::from_value(json!({
			"enums": {
				"ENTCT_SORT_BY": {"enumId": "ENTCT_SORT_BY", "description": "Sort by"}
			},
			"facilities": {
				"BROADWAY": {"facilityId": "BROADWAY", "facilityName": "Broadway"}
			}
		}))
		.unwrap();

		assert_eq!(data.enum_description("ENTCT_SORT_BY"), Some("Sort by"));
		assert_eq!(data.enum_description("ENTCT_FILTER"), None);
		assert_eq!(data.facilities().len(), 1);
		assert!(data.shipping_methods().is_empty());
		assert!(data.facility_groups().is_empty());
	}
}
