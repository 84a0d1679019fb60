//! Became-active notifications.
//!
//! Adapters subscribe to an [`ActivationSignal`] to learn when an entry
//! becomes active, typically to drive visual show/hide and to bubble a
//! "route activated" notification upward. Receivers run synchronously, on
//! the same logical thread as the activation pass, in connection order.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::entry::EntryId;

/// Payload delivered to receivers on every became-active transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationEvent {
	/// Name of the group the activation happened in.
	pub group: String,
	/// Identity of the entry that became active.
	pub entry_id: EntryId,
	/// The pattern string that won, when the activation came from a match.
	/// `None` for fallback and forced activations.
	pub pattern: Option<String>,
}

/// Receiver function type.
pub type ReceiverFn = Arc<dyn Fn(&ActivationEvent) + Send + Sync>;

/// Handle identifying one connected receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Receiver {
	id: SubscriptionId,
	func: ReceiverFn,
}

/// Observable "became active" signal.
///
/// Cloning the signal shares the receiver list; the registry hands out
/// clones so adapters can connect before or after registration.
#[derive(Clone, Default)]
pub struct ActivationSignal {
	inner: Arc<RwLock<SignalInner>>,
}

#[derive(Default)]
struct SignalInner {
	receivers: Vec<Receiver>,
	next_id: u64,
}

impl ActivationSignal {
	/// Creates a signal with no receivers.
	pub fn new() -> Self {
		Self::default()
	}

	/// Connects a receiver; returns a handle for later disconnection.
	pub fn connect<F>(&self, receiver: F) -> SubscriptionId
	where
		F: Fn(&ActivationEvent) + Send + Sync + 'static,
	{
		let mut inner = self.inner.write();
		inner.next_id += 1;
		let id = SubscriptionId(inner.next_id);
		inner.receivers.push(Receiver {
			id,
			func: Arc::new(receiver),
		});
		id
	}

	/// Disconnects a receiver. Returns `false` when the handle was unknown.
	pub fn disconnect(&self, id: SubscriptionId) -> bool {
		let mut inner = self.inner.write();
		let before = inner.receivers.len();
		inner.receivers.retain(|r| r.id != id);
		inner.receivers.len() < before
	}

	/// Delivers an event to every connected receiver, in connection order.
	pub(crate) fn emit(&self, event: &ActivationEvent) {
		// Receivers are cloned out so a receiver may connect or disconnect
		// without deadlocking on the list lock.
		let receivers: Vec<ReceiverFn> = self
			.inner
			.read()
			.receivers
			.iter()
			.map(|r| Arc::clone(&r.func))
			.collect();
		for receiver in receivers {
			receiver(event);
		}
	}

	/// Number of connected receivers.
	pub fn receiver_count(&self) -> usize {
		self.inner.read().receivers.len()
	}
}
