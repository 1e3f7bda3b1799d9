use indexmap::IndexMap;
use itertools::Itertools;

use super::ordering::{Sequenced, sort_sequence};

/// Condition type whose entries carry a user-defined order and are re-sorted by
/// sequence number before indexing.
pub const SORT_BY_CONDITION_TYPE: &str = "ENTCT_SORT_BY";

/// Lookup keyed by condition type, then field name.
///
/// Inner maps preserve insertion order, which is only meaningful for the
/// [`SORT_BY_CONDITION_TYPE`] group after [`index_conditions`].
pub type GroupedIndex<T> = IndexMap<String, IndexMap<String, T>>;

/// Items addressable by a `(conditionTypeEnumId, fieldName)` pair.
pub trait Conditioned {
	fn condition_type(&self) -> &str;
	fn field_name(&self) -> &str;
}

/// Fold a flat list into a [`GroupedIndex`].
///
/// A later item with the same `(type, field name)` pair replaces the earlier one.
pub fn build_grouped_index<T, I>(items: I) -> GroupedIndex<T>
where
	T: Conditioned,
	I: IntoIterator<Item = T>,
{
	items.into_iter().fold(GroupedIndex::new(), |mut index, item| {
		let condition_type = item.condition_type().to_string();
		let field_name = item.field_name().to_string();
		index
			.entry(condition_type)
			.or_default()
			.insert(field_name, item);
		index
	})
}

/// Index a server list of filters or conditions, ordering the sort-by entries by
/// sequence number first so their insertion order follows the user-defined sequence.
pub fn index_conditions<T>(items: &[T]) -> GroupedIndex<T>
where
	T: Conditioned + Sequenced + Clone,
{
	let (sort_by, rest): (Vec<T>, Vec<T>) = items
		.iter()
		.cloned()
		.partition(|item| item.condition_type() == SORT_BY_CONDITION_TYPE);

	build_grouped_index(rest.into_iter().chain(sort_sequence(&sort_by)))
}

/// Convenience for callers that only need the sort-by entries, in display order.
pub fn sort_by_entries<T>(index: &GroupedIndex<T>) -> Vec<&T> {
	index
		.get(SORT_BY_CONDITION_TYPE)
		.map(|entries| entries.values().collect_vec())
		.unwrap_or_default()
}
