use super::{MatchMedia, QueryList, Registration};
use crate::Error;
use gloo_events::EventListener;
use std::rc::Rc;
use wasm_bindgen::{prelude::Closure, JsCast};

/// How listeners are attached to a `MediaQueryList`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListenerStyle {
	/// `addEventListener("change", ..)` / `removeEventListener`.
	#[default]
	Event,
	/// `addListener(..)` / `removeListener(..)`, for engines that predate
	/// `MediaQueryList` being an `EventTarget`.
	Legacy,
}

/// Media matching through the browser's `window.matchMedia`.
pub struct Browser {
	window: web_sys::Window,
	style: ListenerStyle,
}

impl Browser {
	pub fn new(window: web_sys::Window, style: ListenerStyle) -> Self {
		Self { window, style }
	}
}

impl MatchMedia for Browser {
	fn match_media(&self, query: &str) -> Result<Rc<dyn QueryList>, Error> {
		match self.window.match_media(query) {
			Ok(Some(list)) => Ok(Rc::new(BrowserQuery { list, style: self.style })),
			Ok(None) => Err(Error::host(query, "matchMedia returned no list")),
			Err(err) => Err(Error::host(query, format!("{err:?}"))),
		}
	}
}

struct BrowserQuery {
	list: web_sys::MediaQueryList,
	style: ListenerStyle,
}

impl QueryList for BrowserQuery {
	fn query(&self) -> String {
		self.list.media()
	}

	fn matches(&self) -> bool {
		self.list.matches()
	}

	fn subscribe(&self, on_change: Rc<dyn Fn()>) -> Registration {
		match self.style {
			ListenerStyle::Event => {
				let listener = EventListener::new(&self.list, "change", move |_event| {
					(*on_change)();
				});
				Registration::holding(listener)
			}
			ListenerStyle::Legacy => {
				let closure = Closure::<dyn Fn()>::new(move || {
					(*on_change)();
				});
				let list = self.list.clone();
				if let Err(err) = list.add_listener_with_opt_callback(Some(closure.as_ref().unchecked_ref())) {
					log::error!(target: "media::browser", "Failed to add listener to {:?}: {err:?}", list.media());
				}
				Registration::new(move || {
					if let Err(err) = list.remove_listener_with_opt_callback(Some(closure.as_ref().unchecked_ref())) {
						log::error!(target: "media::browser", "Failed to remove listener from {:?}: {err:?}", list.media());
					}
					drop(closure);
				})
			}
		}
	}
}
