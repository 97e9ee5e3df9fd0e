use super::{HostBinding, MediaMsg};
use crate::{MediaHost, MediaSlot};
use std::{marker::PhantomData, rc::Rc};
use yew::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub struct WithMediaOptions {
	/// The name the match state is injected under.
	pub name: AttrValue,
	/// The value reported when there is no display surface.
	pub ssr_matches: bool,
}

impl Default for WithMediaOptions {
	fn default() -> Self {
		Self {
			name: AttrValue::Static("matches"),
			ssr_matches: false,
		}
	}
}

/// Wraps components so they receive the match state of `query`.
///
/// ```ignore
/// #[function_component]
/// fn Message(props: &Injected<()>) -> Html {
/// 	match props.matches() {
/// 		true => html!(<span>{"Is mobile"}</span>),
/// 		false => html!(<span>{"Is desktop"}</span>),
/// 	}
/// }
///
/// let show_message = with_media("(max-width: 500px)", WithMediaOptions::default()).wrap::<Message, ()>();
/// html!(<>{show_message.render(())}</>)
/// ```
pub fn with_media(query: impl Into<AttrValue>, options: WithMediaOptions) -> MediaWrapper {
	MediaWrapper(Rc::new(WrapperConfig {
		query: query.into(),
		name: options.name,
		ssr_matches: options.ssr_matches,
	}))
}

/// The query and options captured by [`with_media`].
#[derive(Clone, Debug)]
pub struct MediaWrapper(Rc<WrapperConfig>);

#[derive(Debug)]
struct WrapperConfig {
	query: AttrValue,
	name: AttrValue,
	ssr_matches: bool,
}

impl PartialEq for MediaWrapper {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

impl MediaWrapper {
	pub fn query(&self) -> &AttrValue {
		&self.0.query
	}

	pub fn name(&self) -> &AttrValue {
		&self.0.name
	}

	pub fn wrap<C, P>(&self) -> Wrapped<C, P>
	where
		C: BaseComponent<Properties = Injected<P>>,
		P: Clone + PartialEq + 'static,
	{
		Wrapped {
			wrapper: self.clone(),
			marker: PhantomData,
		}
	}
}

/// A component `C` wrapped by a [`MediaWrapper`].
pub struct Wrapped<C, P> {
	wrapper: MediaWrapper,
	marker: PhantomData<fn() -> (C, P)>,
}

impl<C, P> Clone for Wrapped<C, P> {
	fn clone(&self) -> Self {
		Self {
			wrapper: self.wrapper.clone(),
			marker: PhantomData,
		}
	}
}

impl<C, P> PartialEq for Wrapped<C, P> {
	fn eq(&self, other: &Self) -> bool {
		self.wrapper == other.wrapper
	}
}

impl<C, P> Wrapped<C, P>
where
	C: BaseComponent<Properties = Injected<P>>,
	P: Clone + PartialEq + 'static,
{
	/// `withMedia(Inner)`, where `Inner` is the wrapped component's type name.
	pub fn display_name(&self) -> String {
		let full = std::any::type_name::<C>();
		let base = full.split('<').next().unwrap_or(full);
		let name = base.rsplit("::").next().unwrap_or(base);
		format!("withMedia({name})")
	}

	/// Renders the wrapped component with `props`, plus the injected match state.
	pub fn render(&self, props: P) -> Html {
		html! {
			<WithMedia<C, P> wrapper={self.wrapper.clone()} inner={props} />
		}
	}
}

/// The properties a wrapped component receives:
/// its own properties (dereferenced to) and the injected match state.
#[derive(Clone, Debug, PartialEq, Properties)]
pub struct Injected<P: Clone + PartialEq> {
	pub props: P,
	pub name: AttrValue,
	pub value: bool,
}

impl<P: Clone + PartialEq> Injected<P> {
	/// The match state, if it was injected under `name`.
	pub fn get(&self, name: &str) -> Option<bool> {
		(&*self.name == name).then_some(self.value)
	}

	/// The match state, under whichever name it was injected.
	pub fn matches(&self) -> bool {
		self.value
	}
}

impl<P: Clone + PartialEq> std::ops::Deref for Injected<P> {
	type Target = P;

	fn deref(&self) -> &Self::Target {
		&self.props
	}
}

#[derive(Clone, PartialEq, Properties)]
pub struct WithMediaProps<P: Clone + PartialEq> {
	pub wrapper: MediaWrapper,
	pub inner: P,
}

/// The component produced by [`Wrapped::render`].
/// The query is the one captured by the wrapper. It is opened on creation, and again
/// only if the component is handed a different wrapper or host.
pub struct WithMedia<C, P> {
	slot: MediaSlot,
	_host: HostBinding,
	marker: PhantomData<fn() -> (C, P)>,
}

impl<C, P> WithMedia<C, P>
where
	C: BaseComponent<Properties = Injected<P>>,
	P: Clone + PartialEq + 'static,
{
	/// Points the slot at `host` and the current wrapper's query, then listens again.
	fn resubscribe(&mut self, ctx: &Context<Self>, host: Option<MediaHost>) {
		let config = &ctx.props().wrapper.0;
		if let Err(err) = self.slot.reconfigure(host, config.ssr_matches, &config.query) {
			log::error!(target: "media", "{err}");
		}
		self.listen(ctx);
	}

	fn listen(&mut self, ctx: &Context<Self>) {
		let link = ctx.link().clone();
		self.slot.listen(move |change| link.send_message(MediaMsg::Changed(change)));
	}
}

impl<C, P> Component for WithMedia<C, P>
where
	C: BaseComponent<Properties = Injected<P>>,
	P: Clone + PartialEq + 'static,
{
	type Message = MediaMsg;
	type Properties = WithMediaProps<P>;

	fn create(ctx: &Context<Self>) -> Self {
		let config = &ctx.props().wrapper.0;
		let binding = HostBinding::resolve(ctx);
		let mut slot = MediaSlot::new(binding.host.clone(), config.ssr_matches);
		if let Err(err) = slot.subscribe(&config.query) {
			log::error!(target: "media", "{err}");
		}
		Self {
			slot,
			_host: binding,
			marker: PhantomData,
		}
	}

	fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
		match msg {
			MediaMsg::Changed(change) => self.slot.apply(change),
			MediaMsg::HostChanged(host) => {
				if self.slot.host() == host.as_ref() {
					return false;
				}
				self.resubscribe(ctx, host);
				true
			}
		}
	}

	fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
		// Yew reuses this instance when a different wrapper for the same component
		// is rendered in its place, so the new wrapper's query must be opened here.
		if ctx.props().wrapper != old_props.wrapper {
			log::debug!(
				target: "media",
				"Wrapper changed from {:?} to {:?}",
				old_props.wrapper.query(),
				ctx.props().wrapper.query()
			);
			let host = self.slot.host().cloned();
			self.resubscribe(ctx, host);
		}
		true
	}

	fn view(&self, ctx: &Context<Self>) -> Html {
		let WithMediaProps { wrapper, inner } = ctx.props();
		let injected = Injected {
			props: inner.clone(),
			name: wrapper.name().clone(),
			value: self.slot.matches(),
		};
		html! {
			<C ..injected />
		}
	}

	fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
		if !first_render {
			return;
		}
		if let Some(change) = self.slot.pending_change() {
			ctx.link().send_message(MediaMsg::Changed(change));
		}
		self.listen(ctx);
	}

	fn destroy(&mut self, _ctx: &Context<Self>) {
		self.slot.close();
	}
}
