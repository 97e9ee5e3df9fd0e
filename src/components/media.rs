use super::{HostBinding, MediaMsg};
use crate::MediaSlot;
use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct MediaProps {
	pub query: AttrValue,
	/// Renders the content for the current match state.
	pub render: Callback<bool, Html>,
	/// The value reported when there is no display surface.
	#[prop_or_default]
	pub ssr_matches: bool,
}

/// Renders whatever `render` returns for the current match state of `query`.
/// Changing `query` swaps the subscription over to the new query.
///
/// ```ignore
/// html! {
/// 	<Media query="(max-width: 500px)" render={Callback::from(|matches| match matches {
/// 		true => html!(<span>{"Is mobile"}</span>),
/// 		false => html!(<span>{"Is desktop"}</span>),
/// 	})} />
/// }
/// ```
pub struct Media {
	slot: MediaSlot,
	_host: HostBinding,
}

impl Media {
	/// Points the slot at `host` and the current props, then listens again.
	fn resubscribe(&mut self, ctx: &Context<Self>, host: Option<crate::MediaHost>) {
		let MediaProps { query, ssr_matches, .. } = ctx.props();
		if let Err(err) = self.slot.reconfigure(host, *ssr_matches, query) {
			log::error!(target: "media", "{err}");
		}
		self.listen(ctx);
	}

	fn listen(&mut self, ctx: &Context<Self>) {
		let link = ctx.link().clone();
		self.slot.listen(move |change| link.send_message(MediaMsg::Changed(change)));
	}
}

impl Component for Media {
	type Message = MediaMsg;
	type Properties = MediaProps;

	fn create(ctx: &Context<Self>) -> Self {
		let MediaProps { query, ssr_matches, .. } = ctx.props();
		let binding = HostBinding::resolve(ctx);
		let mut slot = MediaSlot::new(binding.host.clone(), *ssr_matches);
		if let Err(err) = slot.subscribe(query) {
			log::error!(target: "media", "{err}");
		}
		Self { slot, _host: binding }
	}

	fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
		match msg {
			MediaMsg::Changed(change) => self.slot.apply(change),
			MediaMsg::HostChanged(host) => {
				if self.slot.host() == host.as_ref() {
					return false;
				}
				log::debug!(target: "media", "Host changed for {:?}", ctx.props().query);
				self.resubscribe(ctx, host);
				true
			}
		}
	}

	fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
		let MediaProps { query, ssr_matches, .. } = ctx.props();
		if *query != old_props.query || *ssr_matches != old_props.ssr_matches {
			log::debug!(target: "media", "Query changed from {:?} to {query:?}", old_props.query);
			// Releases the old listener, then reads the new query's current value.
			let host = self.slot.host().cloned();
			self.resubscribe(ctx, host);
		}
		true
	}

	fn view(&self, ctx: &Context<Self>) -> Html {
		ctx.props().render.emit(self.slot.matches())
	}

	fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
		if !first_render {
			return;
		}
		if let Some(change) = self.slot.pending_change() {
			log::debug!(target: "media", "{:?} changed before mount", self.slot.query());
			ctx.link().send_message(MediaMsg::Changed(change));
		}
		self.listen(ctx);
	}

	fn destroy(&mut self, _ctx: &Context<Self>) {
		self.slot.close();
	}
}
