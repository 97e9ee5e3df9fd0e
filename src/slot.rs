use crate::{Error, MediaHost, Registration, Subscriber};

/// A change notification from the subscription a [`MediaSlot`] had open when it fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MediaChanged {
	generation: u64,
	pub matches: bool,
}

/// The subscription owned by one facade instance.
///
/// A slot moves `Unsubscribed -> Subscribed(query)`, between `Subscribed` queries, and
/// finally to `Closed`. It holds at most one listener registration; a new subscription
/// always releases the previous registration before the new query is opened.
pub struct MediaSlot {
	host: Option<MediaHost>,
	fallback: bool,
	matches: bool,
	generation: u64,
	state: State,
}

enum State {
	Unsubscribed,
	Subscribed {
		query: String,
		subscriber: Subscriber,
		registration: Option<Registration>,
	},
	Closed,
}

impl MediaSlot {
	pub fn new(host: Option<MediaHost>, fallback: bool) -> Self {
		Self {
			host,
			fallback,
			matches: fallback,
			generation: 0,
			state: State::Unsubscribed,
		}
	}

	/// The match state the owning facade should render.
	pub fn matches(&self) -> bool {
		self.matches
	}

	pub fn host(&self) -> Option<&MediaHost> {
		self.host.as_ref()
	}

	pub fn fallback(&self) -> bool {
		self.fallback
	}

	pub fn query(&self) -> Option<&str> {
		match &self.state {
			State::Subscribed { query, .. } => Some(query.as_str()),
			_ => None,
		}
	}

	pub fn is_listening(&self) -> bool {
		matches!(&self.state, State::Subscribed { registration: Some(_), .. })
	}

	pub fn is_closed(&self) -> bool {
		matches!(&self.state, State::Closed)
	}

	/// Opens `query`, replacing (and releasing) any current subscription.
	/// The match state is reset to the new query's current value.
	/// The new subscription is not listened to until [`listen`](MediaSlot::listen) is called.
	///
	/// On failure the slot is left unsubscribed, reporting its fallback value.
	pub fn subscribe(&mut self, query: &str) -> Result<bool, Error> {
		if self.is_closed() {
			log::warn!(target: "media", "Ignoring subscription to {query:?} on a closed slot");
			return Ok(self.matches);
		}
		// Notifications raised for the previous query are stale from here on.
		self.generation += 1;
		if let State::Subscribed { query: previous, .. } = std::mem::replace(&mut self.state, State::Unsubscribed) {
			log::debug!(target: "media", "Released {previous:?}");
		}
		let subscriber = match Subscriber::open(self.host.as_ref(), query, self.fallback) {
			Ok(subscriber) => subscriber,
			Err(err) => {
				self.matches = self.fallback;
				return Err(err);
			}
		};
		self.matches = subscriber.matches();
		log::debug!(target: "media", "Subscribed to {query:?}, matches={}", self.matches);
		self.state = State::Subscribed {
			query: query.to_owned(),
			subscriber,
			registration: None,
		};
		Ok(self.matches)
	}

	/// Moves the slot to a different host, fallback, or query (e.g. a new provider or
	/// wrapper). Same as [`subscribe`](MediaSlot::subscribe): the current registration is
	/// released before anything is opened, and nothing listens until [`listen`](MediaSlot::listen).
	pub fn reconfigure(&mut self, host: Option<MediaHost>, fallback: bool, query: &str) -> Result<bool, Error> {
		if self.is_closed() {
			return self.subscribe(query);
		}
		// The open registration keeps its own handle to the host it came from.
		self.host = host;
		self.fallback = fallback;
		self.subscribe(query)
	}

	/// Registers `on_change` with the current subscription.
	/// Does nothing if there is no live subscription or a listener is already registered.
	pub fn listen<F>(&mut self, on_change: F)
	where
		F: Fn(MediaChanged) + 'static,
	{
		let generation = self.generation;
		let State::Subscribed {
			subscriber, registration, ..
		} = &mut self.state
		else {
			return;
		};
		if registration.is_none() {
			*registration = subscriber.listen(move |matches| on_change(MediaChanged { generation, matches }));
		}
	}

	/// Returns the change that brings the match state in line with the subscription's
	/// live value, if the two have drifted apart (e.g. between construction and mount).
	pub fn pending_change(&self) -> Option<MediaChanged> {
		let State::Subscribed { subscriber, .. } = &self.state else {
			return None;
		};
		let matches = subscriber.matches();
		(matches != self.matches).then_some(MediaChanged {
			generation: self.generation,
			matches,
		})
	}

	/// Applies a change notification. Returns true if the match state changed.
	/// Notifications from a released subscription are discarded.
	pub fn apply(&mut self, change: MediaChanged) -> bool {
		if change.generation != self.generation || self.is_closed() {
			return false;
		}
		if change.matches == self.matches {
			return false;
		}
		self.matches = change.matches;
		true
	}

	/// Releases the current subscription. The slot cannot be subscribed again.
	pub fn close(&mut self) {
		self.generation += 1;
		if let State::Subscribed { query, .. } = std::mem::replace(&mut self.state, State::Closed) {
			log::debug!(target: "media", "Released {query:?}");
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::MemoryHost;
	use std::{cell::RefCell, rc::Rc};

	const SMALL: &str = "(max-width: 500px)";
	const LARGE: &str = "(min-width: 500px)";

	fn slot(memory: &MemoryHost) -> MediaSlot {
		MediaSlot::new(Some(MediaHost::new(memory.clone())), false)
	}

	/// Listens on the slot, collecting every notification it receives.
	fn record(slot: &mut MediaSlot) -> Rc<RefCell<Vec<MediaChanged>>> {
		let changes = Rc::new(RefCell::new(Vec::new()));
		slot.listen({
			let changes = changes.clone();
			move |change| changes.borrow_mut().push(change)
		});
		changes
	}

	fn drain(slot: &mut MediaSlot, changes: &Rc<RefCell<Vec<MediaChanged>>>) {
		let pending = changes.borrow_mut().drain(..).collect::<Vec<_>>();
		for change in pending {
			slot.apply(change);
		}
	}

	#[test]
	fn initial_value_from_host() {
		let memory = MemoryHost::with_matches([(SMALL, true)]);
		let mut slot = slot(&memory);
		assert_eq!(slot.subscribe(SMALL), Ok(true));
		assert!(slot.matches());
		assert_eq!(slot.query(), Some(SMALL));
		assert_eq!(memory.opened(SMALL), 0);
	}

	#[test]
	fn no_surface() {
		let mut slot = MediaSlot::new(None, false);
		assert_eq!(slot.subscribe(SMALL), Ok(false));
		slot.listen(|_| {});
		assert!(!slot.is_listening());
		slot.close();
		assert!(slot.is_closed());

		let mut slot = MediaSlot::new(None, true);
		assert_eq!(slot.subscribe(SMALL), Ok(true));
		assert!(slot.pending_change().is_none());
	}

	#[test]
	fn change_is_reflected() {
		let memory = MemoryHost::default();
		let mut slot = slot(&memory);
		slot.subscribe(SMALL).unwrap();
		let changes = record(&mut slot);
		assert!(!slot.matches());

		memory.set_matches(SMALL, true);
		drain(&mut slot, &changes);
		assert!(slot.matches());

		memory.set_matches(SMALL, false);
		drain(&mut slot, &changes);
		assert!(!slot.matches());
	}

	#[test]
	fn repeated_notifications_are_idempotent() {
		let memory = MemoryHost::default();
		let mut slot = slot(&memory);
		slot.subscribe(SMALL).unwrap();
		let changes = record(&mut slot);
		memory.set_matches(SMALL, true);
		let first = changes.borrow()[0];
		assert!(slot.apply(first));
		for _ in 0..5 {
			memory.notify(SMALL);
		}
		let repeats = changes.borrow_mut().drain(1..).collect::<Vec<_>>();
		assert_eq!(repeats.len(), 5);
		for change in repeats {
			assert!(!slot.apply(change));
		}
		assert!(slot.matches());
	}

	#[test]
	fn listens_once_per_subscription() {
		let memory = MemoryHost::default();
		let mut slot = slot(&memory);
		slot.subscribe(SMALL).unwrap();
		slot.listen(|_| {});
		slot.listen(|_| {});
		assert!(slot.is_listening());
		assert_eq!(memory.opened(SMALL), 1);
		assert_eq!(memory.live_total(), 1);
	}

	#[test]
	fn resubscribe_releases_before_opening() {
		let memory = MemoryHost::with_matches([(LARGE, true)]);
		let mut slot = slot(&memory);
		slot.subscribe(SMALL).unwrap();
		let _changes = record(&mut slot);
		assert!(!slot.matches());

		assert_eq!(slot.subscribe(LARGE), Ok(true));
		assert_eq!(memory.released(SMALL), 1);
		assert_eq!(memory.live_total(), 0);
		slot.listen(|_| {});

		assert_eq!(memory.opened(SMALL), 1);
		assert_eq!(memory.released(SMALL), 1);
		assert_eq!(memory.opened(LARGE), 1);
		assert_eq!(memory.released(LARGE), 0);
		assert_eq!(memory.live_total(), 1);
		assert!(slot.matches());
	}

	#[test]
	fn stale_notifications_are_discarded() {
		let memory = MemoryHost::default();
		let mut slot = slot(&memory);
		slot.subscribe(SMALL).unwrap();
		let changes = record(&mut slot);
		// Raised before the swap, delivered after it.
		memory.set_matches(SMALL, true);
		slot.subscribe(LARGE).unwrap();
		drain(&mut slot, &changes);
		assert!(!slot.matches());
		// The released registration hears nothing further.
		memory.set_matches(SMALL, false);
		assert!(changes.borrow().is_empty());
	}

	#[test]
	fn pending_change_reconciles_mount_race() {
		let memory = MemoryHost::default();
		let mut slot = slot(&memory);
		slot.subscribe(SMALL).unwrap();
		assert!(slot.pending_change().is_none());
		// The display changes between construction and mount.
		memory.set_matches(SMALL, true);
		let change = slot.pending_change().unwrap();
		assert!(change.matches);
		assert!(slot.apply(change));
		assert!(slot.matches());
		assert!(slot.pending_change().is_none());
	}

	#[test]
	fn close_releases_exactly_once() {
		let memory = MemoryHost::default();
		let mut slot = slot(&memory);
		slot.subscribe(SMALL).unwrap();
		let changes = record(&mut slot);
		slot.close();
		assert_eq!(memory.released(SMALL), 1);
		assert_eq!(memory.live_total(), 0);

		// Closed is terminal.
		assert_eq!(slot.subscribe(LARGE), Ok(false));
		assert!(slot.is_closed());
		assert_eq!(memory.opened(LARGE), 0);
		memory.set_matches(SMALL, true);
		assert!(changes.borrow().is_empty());
	}

	#[test]
	fn reconfigure_to_another_query() {
		let memory = MemoryHost::default();
		let host = MediaHost::new(memory.clone());
		let mut slot = MediaSlot::new(Some(host.clone()), false);
		slot.subscribe(SMALL).unwrap();
		let changes = record(&mut slot);
		memory.set_matches(SMALL, true);

		assert_eq!(slot.reconfigure(Some(host), true, LARGE), Ok(false));
		assert_eq!(slot.query(), Some(LARGE));
		assert!(slot.fallback());
		assert_eq!(memory.released(SMALL), 1);
		assert_eq!(memory.live_total(), 0);
		slot.listen(|_| {});
		assert_eq!(memory.opened(LARGE), 1);
		assert_eq!(memory.live_total(), 1);
		// Raised for the old query before the swap.
		drain(&mut slot, &changes);
		assert!(!slot.matches());
		memory.set_matches(LARGE, true);
		assert!(changes.borrow().is_empty());
	}

	#[test]
	fn reconfigure_to_another_host() {
		let first = MemoryHost::with_matches([(SMALL, true)]);
		let second = MemoryHost::default();
		let mut slot = MediaSlot::new(Some(MediaHost::new(first.clone())), false);
		slot.subscribe(SMALL).unwrap();
		slot.listen(|_| {});
		assert!(slot.matches());

		let next = MediaHost::new(second.clone());
		assert_eq!(slot.reconfigure(Some(next.clone()), false, SMALL), Ok(false));
		assert_eq!(slot.host(), Some(&next));
		slot.listen(|_| {});
		assert_eq!(first.released(SMALL), 1);
		assert_eq!(first.live_total(), 0);
		assert_eq!(second.opened(SMALL), 1);

		// Losing the display surface falls back and registers nothing.
		assert_eq!(slot.reconfigure(None, true, SMALL), Ok(true));
		slot.listen(|_| {});
		assert!(!slot.is_listening());
		assert_eq!(second.released(SMALL), 1);
		assert_eq!(second.live_total(), 0);
	}

	#[test]
	fn reconfigure_after_close_is_ignored() {
		let memory = MemoryHost::default();
		let mut slot = slot(&memory);
		slot.subscribe(SMALL).unwrap();
		slot.close();
		assert_eq!(slot.reconfigure(None, true, LARGE), Ok(false));
		assert!(slot.is_closed());
		assert!(!slot.fallback());
	}

	#[test]
	fn close_without_listener_releases_nothing() {
		let memory = MemoryHost::default();
		let mut slot = slot(&memory);
		slot.subscribe(SMALL).unwrap();
		slot.close();
		assert_eq!(memory.released(SMALL), 0);
	}

	#[test]
	fn failure_falls_back() {
		let memory = MemoryHost::with_matches([(SMALL, true)]);
		memory.reject(LARGE, "SyntaxError");
		let mut slot = MediaSlot::new(Some(MediaHost::new(memory.clone())), false);
		slot.subscribe(SMALL).unwrap();
		slot.listen(|_| {});
		assert!(slot.matches());
		assert!(slot.subscribe(LARGE).is_err());
		assert!(!slot.matches());
		assert_eq!(slot.query(), None);
		assert_eq!(memory.released(SMALL), 1);
		assert_eq!(memory.live_total(), 0);
	}
}
