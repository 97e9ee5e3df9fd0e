use crate::Error;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
mod browser;
#[cfg(target_arch = "wasm32")]
pub use browser::*;
mod memory;
pub use memory::*;

/// The entry point a display environment offers for evaluating media queries
/// (`window.matchMedia` in a browser).
pub trait MatchMedia {
	fn match_media(&self, query: &str) -> Result<Rc<dyn QueryList>, Error>;
}

/// A live view of one media query's match state.
pub trait QueryList {
	fn query(&self) -> String;

	fn matches(&self) -> bool;

	/// Registers `on_change` to be called whenever the match state may have changed.
	/// The listener stays registered until the returned [`Registration`] is dropped.
	fn subscribe(&self, on_change: Rc<dyn Fn()>) -> Registration;
}

/// An open listener registration with a [`QueryList`].
///
/// Dropping the registration releases it with the host. The release runs exactly once,
/// and no notification from this registration is delivered after the drop returns.
#[must_use = "dropping a registration releases it immediately"]
pub struct Registration {
	release: Option<Box<dyn FnOnce()>>,
}

impl Registration {
	pub fn new<F>(release: F) -> Self
	where
		F: FnOnce() + 'static,
	{
		Self {
			release: Some(Box::new(release)),
		}
	}

	/// Keeps `value` alive for as long as the registration is open,
	/// dropping it on release (e.g. an event listener guard).
	pub fn holding<T: 'static>(value: T) -> Self {
		Self::new(move || drop(value))
	}
}

impl Drop for Registration {
	fn drop(&mut self) {
		if let Some(release) = self.release.take() {
			release();
		}
	}
}

impl std::fmt::Debug for Registration {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Registration").finish_non_exhaustive()
	}
}

/// A shared handle to the media matching capability of the current environment.
/// Handles are equal when they point at the same host.
#[derive(Clone)]
pub struct MediaHost(Rc<dyn MatchMedia>);

impl PartialEq for MediaHost {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl std::fmt::Debug for MediaHost {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "MediaHost({:p})", Rc::as_ptr(&self.0))
	}
}

impl<T> From<Rc<T>> for MediaHost
where
	T: MatchMedia + 'static,
{
	fn from(value: Rc<T>) -> Self {
		Self(value)
	}
}

impl MediaHost {
	pub fn new<T: MatchMedia + 'static>(host: T) -> Self {
		Self(Rc::new(host))
	}

	/// Returns the host of the running display surface, if there is one.
	/// Server-side (any non-wasm target, or a wasm runtime without a window) this is `None`.
	pub fn detect() -> Option<Self> {
		#[cfg(target_arch = "wasm32")]
		{
			let window = web_sys::window()?;
			Some(Self::new(Browser::new(window, ListenerStyle::default())))
		}
		#[cfg(not(target_arch = "wasm32"))]
		{
			None
		}
	}
}

impl std::ops::Deref for MediaHost {
	type Target = dyn MatchMedia;

	fn deref(&self) -> &Self::Target {
		&*self.0
	}
}
