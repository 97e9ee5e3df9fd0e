use super::use_media_host;
use crate::{MediaHost, Registration, Subscriber};
use yew::prelude::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MediaOptions {
	/// The value reported when there is no display surface (e.g. server-side rendering).
	pub ssr_matches: bool,
}

/// Returns whether `query` currently matches, re-rendering the calling component when that changes.
///
/// ```ignore
/// #[function_component]
/// fn ShowMessage() -> Html {
/// 	match use_media("(max-width: 500px)", MediaOptions::default()) {
/// 		true => html!(<span>{"Is mobile"}</span>),
/// 		false => html!(<span>{"Is desktop"}</span>),
/// 	}
/// }
/// ```
#[hook]
pub fn use_media(query: impl Into<AttrValue>, options: MediaOptions) -> bool {
	let query: AttrValue = query.into();
	let host = use_media_host();
	let fallback = options.ssr_matches;

	let query_result = use_state_eq({
		let host = host.clone();
		let query = query.clone();
		move || open(host.as_ref(), &query, fallback).matches()
	});

	// Opens a listener per (query, host). Yew runs the previous teardown,
	// releasing that listener, before the effect runs for a new query.
	use_effect_with((query, host), {
		let query_result = query_result.clone();
		move |(query, host): &(AttrValue, Option<MediaHost>)| {
			let (matches, registration) = watch(host.as_ref(), query, fallback, {
				let query_result = query_result.clone();
				move |matches| query_result.set(matches)
			});
			query_result.set(matches);
			move || drop(registration)
		}
	});

	*query_result
}

/// Opens `query` and registers `on_change` for its match state.
/// Returns the current match state and the registration, which is released when dropped.
/// Without a display surface (or if the host rejects the query) nothing is registered
/// and the current state is `fallback`.
pub fn watch<F>(host: Option<&MediaHost>, query: &str, fallback: bool, on_change: F) -> (bool, Option<Registration>)
where
	F: Fn(bool) + 'static,
{
	let subscriber = open(host, query, fallback);
	let registration = subscriber.listen(on_change);
	if registration.is_some() {
		log::debug!(target: "media", "Subscribed to {query:?}");
	}
	(subscriber.matches(), registration)
}

fn open(host: Option<&MediaHost>, query: &str, fallback: bool) -> Subscriber {
	match Subscriber::open(host, query, fallback) {
		Ok(subscriber) => subscriber,
		Err(err) => {
			log::error!(target: "media", "{err}");
			Subscriber::fallback(fallback)
		}
	}
}
