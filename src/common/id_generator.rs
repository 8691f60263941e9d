use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Number of ids that can be handed out within one millisecond before the
/// generator borrows from the next one.
const SEQUENCE_SPAN: u64 = 1000;

/// Produces record ids from the millisecond clock plus the generation order.
///
/// Ids are fixed width decimal strings, so comparing them as strings gives the
/// same order as generating them. Within a process every id is strictly greater
/// than the previous one, even if the wall clock goes backwards.
#[derive(Debug, Default)]
pub struct IdGenerator {
	last: AtomicU64,
}

impl IdGenerator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn next(&self) -> String {
		let floor = (Utc::now().timestamp_millis().max(0) as u64) * SEQUENCE_SPAN;
		let previous = self
			.last
			.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(floor.max(last + 1)))
			.unwrap_or_else(|last| last);
		format!("{:019}", floor.max(previous + 1))
	}
}

#[cfg(test)]
mod tests {
	use std::{collections::HashSet, sync::Arc};

	use super::IdGenerator;

	#[test]
	fn test_ids_are_strictly_increasing() {
		let ids = IdGenerator::new();
		let generated: Vec<String> = (0..5000).map(|_| ids.next()).collect();

		for pair in generated.windows(2) {
			assert!(pair[0] < pair[1], "{} should sort before {}", pair[0], pair[1]);
			assert_eq!(pair[0].len(), pair[1].len());
		}
	}

	#[test]
	fn test_ids_are_unique_across_threads() {
		let ids = Arc::new(IdGenerator::new());
		let handles: Vec<_> = (0..4)
			.map(|_| {
				let ids = ids.clone();
				std::thread::spawn(move || (0..1000).map(|_| ids.next()).collect::<Vec<_>>())
			})
			.collect();

		let mut seen = HashSet::new();
		for handle in handles {
			for id in handle.join().unwrap() {
				assert!(seen.insert(id));
			}
		}
		assert_eq!(seen.len(), 4000);
	}
}
