use super::{MatchMedia, QueryList, Registration};
use crate::Error;
use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

/// A media host whose match states are set by the application rather than a display.
///
/// Useful when rendering on a server that already knows what the client will report
/// (e.g. from client hints), and as a stand-in host in tests. Queries that were never
/// [set](MemoryHost::set_matches) report `false`.
#[derive(Clone, Default)]
pub struct MemoryHost(Rc<RefCell<State>>);

#[derive(Default)]
struct State {
	next_id: u64,
	queries: BTreeMap<String, Entry>,
}

#[derive(Default)]
struct Entry {
	matches: bool,
	rejected: Option<String>,
	listeners: BTreeMap<u64, Rc<dyn Fn()>>,
	opened: usize,
	released: usize,
}

impl MemoryHost {
	pub fn with_matches<I, S>(values: I) -> Self
	where
		I: IntoIterator<Item = (S, bool)>,
		S: Into<String>,
	{
		let host = Self::default();
		{
			let mut state = host.0.borrow_mut();
			for (query, matches) in values {
				state.queries.entry(query.into()).or_default().matches = matches;
			}
		}
		host
	}

	pub fn matches(&self, query: &str) -> bool {
		self.0.borrow().queries.get(query).map(|entry| entry.matches).unwrap_or(false)
	}

	/// Sets the match state of `query`, notifying its listeners if the value changed.
	pub fn set_matches(&self, query: &str, matches: bool) {
		let changed = {
			let mut state = self.0.borrow_mut();
			let entry = state.queries.entry(query.to_owned()).or_default();
			let changed = entry.matches != matches;
			entry.matches = matches;
			changed
		};
		if changed {
			self.notify(query);
		}
	}

	/// Raises a change notification for every listener registered on `query`,
	/// whether or not its value actually changed.
	pub fn notify(&self, query: &str) {
		let pending = {
			let state = self.0.borrow();
			let Some(entry) = state.queries.get(query) else {
				return;
			};
			entry.listeners.keys().cloned().collect::<Vec<_>>()
		};
		for id in pending {
			// A listener may release other registrations while we dispatch;
			// those must not observe this notification.
			let listener = {
				let state = self.0.borrow();
				state.queries.get(query).and_then(|entry| entry.listeners.get(&id).cloned())
			};
			if let Some(listener) = listener {
				(*listener)();
			}
		}
	}

	/// Makes every future [`match_media`](MatchMedia::match_media) for `query` fail.
	pub fn reject(&self, query: &str, reason: impl Into<String>) {
		let mut state = self.0.borrow_mut();
		state.queries.entry(query.to_owned()).or_default().rejected = Some(reason.into());
	}

	/// The number of listener registrations ever opened for `query`.
	pub fn opened(&self, query: &str) -> usize {
		self.0.borrow().queries.get(query).map(|entry| entry.opened).unwrap_or(0)
	}

	/// The number of listener registrations released for `query`.
	pub fn released(&self, query: &str) -> usize {
		self.0.borrow().queries.get(query).map(|entry| entry.released).unwrap_or(0)
	}

	/// The number of listener registrations currently open for `query`.
	pub fn live(&self, query: &str) -> usize {
		self.0.borrow().queries.get(query).map(|entry| entry.listeners.len()).unwrap_or(0)
	}

	/// The number of listener registrations currently open across all queries.
	pub fn live_total(&self) -> usize {
		self.0.borrow().queries.values().map(|entry| entry.listeners.len()).sum()
	}

	fn add_listener(&self, query: &str, listener: Rc<dyn Fn()>) -> u64 {
		let mut state = self.0.borrow_mut();
		let id = state.next_id;
		state.next_id += 1;
		let entry = state.queries.entry(query.to_owned()).or_default();
		entry.listeners.insert(id, listener);
		entry.opened += 1;
		id
	}

	fn remove_listener(&self, query: &str, id: u64) {
		let mut state = self.0.borrow_mut();
		let Some(entry) = state.queries.get_mut(query) else {
			return;
		};
		if entry.listeners.remove(&id).is_some() {
			entry.released += 1;
		}
	}
}

impl MatchMedia for MemoryHost {
	fn match_media(&self, query: &str) -> Result<Rc<dyn QueryList>, Error> {
		let state = self.0.borrow();
		if let Some(reason) = state.queries.get(query).and_then(|entry| entry.rejected.as_ref()) {
			return Err(Error::host(query, reason.clone()));
		}
		Ok(Rc::new(MemoryQuery {
			host: self.clone(),
			query: query.to_owned(),
		}))
	}
}

struct MemoryQuery {
	host: MemoryHost,
	query: String,
}

impl QueryList for MemoryQuery {
	fn query(&self) -> String {
		self.query.clone()
	}

	fn matches(&self) -> bool {
		self.host.matches(&self.query)
	}

	fn subscribe(&self, on_change: Rc<dyn Fn()>) -> Registration {
		let id = self.host.add_listener(&self.query, on_change);
		let host = self.host.clone();
		let query = self.query.clone();
		Registration::new(move || host.remove_listener(&query, id))
	}
}
