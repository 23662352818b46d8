//! Subscription contract between the controller and whatever renders its state.

// self
use crate::{_prelude::*, view::ViewSnapshot};

/// Receives a snapshot after every state change the controller publishes.
///
/// Called synchronously on the task that caused the change, after internal locks are
/// released; implementations should hand the snapshot off rather than block.
pub trait ViewObserver
where
	Self: Send + Sync,
{
	/// Handles a freshly published snapshot.
	fn on_change(&self, snapshot: &ViewSnapshot);
}
impl<F> ViewObserver for F
where
	F: Fn(&ViewSnapshot) + Send + Sync,
{
	fn on_change(&self, snapshot: &ViewSnapshot) {
		self(snapshot)
	}
}

/// Handle returned by [`ViewController::subscribe`](crate::view::ViewController::subscribe).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

#[derive(Default)]
pub(crate) struct Observers {
	next: u64,
	entries: Vec<(SubscriptionId, Arc<dyn ViewObserver>)>,
}
impl Observers {
	pub(crate) fn insert(&mut self, observer: Arc<dyn ViewObserver>) -> SubscriptionId {
		let id = SubscriptionId(self.next);

		self.next += 1;
		self.entries.push((id, observer));

		id
	}

	pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
		let before = self.entries.len();

		self.entries.retain(|(entry, _)| *entry != id);

		self.entries.len() != before
	}

	pub(crate) fn listeners(&self) -> Vec<Arc<dyn ViewObserver>> {
		self.entries.iter().map(|(_, observer)| observer.clone()).collect()
	}

	pub(crate) fn len(&self) -> usize {
		self.entries.len()
	}
}
