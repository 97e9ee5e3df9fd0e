use crate::{Error, MediaHost, QueryList, Registration};
use std::rc::Rc;

/// The current match state of one media query, plus the means to listen for changes.
///
/// Without a display surface there is nothing to observe: the subscriber reports its
/// fallback value and [`listen`](Subscriber::listen) registers nothing.
#[derive(Clone)]
pub struct Subscriber(Source);

#[derive(Clone)]
enum Source {
	Live(Rc<dyn QueryList>),
	Fallback(bool),
}

impl Subscriber {
	pub fn open(host: Option<&MediaHost>, query: &str, fallback: bool) -> Result<Self, Error> {
		let Some(host) = host else {
			return Ok(Self::fallback(fallback));
		};
		let list = host.match_media(query)?;
		Ok(Self(Source::Live(list)))
	}

	pub fn fallback(matches: bool) -> Self {
		Self(Source::Fallback(matches))
	}

	pub fn is_live(&self) -> bool {
		matches!(&self.0, Source::Live(_))
	}

	pub fn matches(&self) -> bool {
		match &self.0 {
			Source::Live(list) => list.matches(),
			Source::Fallback(matches) => *matches,
		}
	}

	/// Registers `on_change`, which receives the query's match state each time the host
	/// reports it may have changed. Returns `None` when there is no display surface.
	pub fn listen<F>(&self, on_change: F) -> Option<Registration>
	where
		F: Fn(bool) + 'static,
	{
		let Source::Live(list) = &self.0 else {
			return None;
		};
		let notifier = list.clone();
		let registration = list.subscribe(Rc::new(move || {
			let matches = notifier.matches();
			log::trace!(target: "media", "{:?} changed, matches={matches}", notifier.query());
			on_change(matches);
		}));
		Some(registration)
	}
}

impl std::fmt::Debug for Subscriber {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match &self.0 {
			Source::Live(list) => write!(f, "Subscriber::Live({:?})", list.query()),
			Source::Fallback(matches) => write!(f, "Subscriber::Fallback({matches})"),
		}
	}
}
