use crate::{MediaChanged, MediaHost};
use yew::{context::ContextHandle, prelude::*};

/// The media host facades below a [`MediaHostProvider`] subscribe through.
/// `None` makes them behave as though there were no display surface.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaHostContext(pub Option<MediaHost>);

#[derive(Clone, PartialEq, Properties)]
pub struct MediaHostProviderProps {
	pub host: Option<MediaHost>,
	#[prop_or_default]
	pub children: Children,
}

#[function_component]
pub fn MediaHostProvider(MediaHostProviderProps { host, children }: &MediaHostProviderProps) -> Html {
	html! {
		<ContextProvider<MediaHostContext> context={MediaHostContext(host.clone())}>
			{children.clone()}
		</ContextProvider<MediaHostContext>>
	}
}

/// The host from the nearest [`MediaHostProvider`], or the detected display surface if there is no provider.
#[hook]
pub fn use_media_host() -> Option<MediaHost> {
	let context = use_context::<MediaHostContext>();
	// Detected once per component so the host keeps its identity across renders.
	let detected = use_memo((), |_| MediaHost::detect());
	match context {
		Some(MediaHostContext(host)) => host,
		None => (*detected).clone(),
	}
}

/// Messages of the struct component facades.
#[derive(Clone, Debug, PartialEq)]
pub enum MediaMsg {
	Changed(MediaChanged),
	/// The [`MediaHostProvider`] above the component now supplies a different host.
	HostChanged(Option<MediaHost>),
}

/// A struct component's view of the host, resolved the same way [`use_media_host`] does.
/// While a provider is present, its host changes arrive as [`MediaMsg::HostChanged`].
pub(crate) struct HostBinding {
	pub host: Option<MediaHost>,
	_handle: Option<ContextHandle<MediaHostContext>>,
}

impl HostBinding {
	pub fn resolve<COMP>(ctx: &Context<COMP>) -> Self
	where
		COMP: Component<Message = MediaMsg>,
	{
		let on_change = ctx.link().callback(|MediaHostContext(host)| MediaMsg::HostChanged(host));
		match ctx.link().context::<MediaHostContext>(on_change) {
			Some((MediaHostContext(host), handle)) => Self {
				host,
				_handle: Some(handle),
			},
			None => Self {
				host: MediaHost::detect(),
				_handle: None,
			},
		}
	}
}
