//!
//! Utility module for the routing configuration store.
//!
//! Holds the two pure reshaping primitives applied to every server response before it is
//! merged into local state: sequence ordering and grouped indexing.
/// Two-level (type, field name) lookup built from flat condition lists
pub mod grouped_index;
/// Stable ordering by the user-controlled sequence attribute
pub mod ordering;

pub use grouped_index::{
	Conditioned, GroupedIndex, SORT_BY_CONDITION_TYPE, build_grouped_index, index_conditions,
	sort_by_entries,
};
pub use ordering::{Sequenced, sort_sequence};
