use itertools::Itertools;

/// Anything carrying the numeric sequence attribute that controls user-visible order.
pub trait Sequenced {
	fn sequence_num(&self) -> Option<i64>;
}

/// Sort `items` ascending by sequence number, returning a new collection.
///
/// The sort is stable: items sharing a sequence number keep their relative input order.
/// Items without a sequence number are placed after all sequenced items, again in input
/// order. The input slice is never modified.
pub fn sort_sequence<T: Sequenced + Clone>(items: &[T]) -> Vec<T> {
	if items.len() < 2 {
		return items.to_vec();
	}

	items
		.iter()
		.cloned()
		.sorted_by_key(|item| match item.sequence_num() {
			Some(sequence_num) => (false, sequence_num),
			None => (true, 0),
		})
		.collect()
}
