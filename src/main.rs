use yew::prelude::*;
use yew_with_media::*;

const MOBILE: &str = "(max-width: 500px)";

fn describe(is_mobile: bool) -> Html {
	match is_mobile {
		true => html!(<span>{"Is mobile"}</span>),
		false => html!(<span>{"Is desktop"}</span>),
	}
}

#[function_component]
fn HookMessage() -> Html {
	describe(use_media(MOBILE, MediaOptions::default()))
}

#[function_component]
fn WrappedMessage(props: &Injected<()>) -> Html {
	describe(props.get("isMobile").unwrap_or_default())
}

/// A browser host registering through `addListener`, as older engines require.
#[cfg(target_arch = "wasm32")]
fn legacy_host() -> Option<MediaHost> {
	let window = web_sys::window()?;
	Some(MediaHost::new(Browser::new(window, ListenerStyle::Legacy)))
}

#[cfg(not(target_arch = "wasm32"))]
fn legacy_host() -> Option<MediaHost> {
	None
}

#[function_component]
fn App() -> Html {
	let wrapped = use_memo((), |_| {
		let options = WithMediaOptions {
			name: "isMobile".into(),
			..Default::default()
		};
		with_media(MOBILE, options).wrap::<WrappedMessage, ()>()
	});
	let orientation = use_state(|| AttrValue::from("(orientation: portrait)"));
	let toggle_orientation = {
		let orientation = orientation.clone();
		Callback::from(move |_: MouseEvent| {
			let next = match orientation.as_str() {
				"(orientation: portrait)" => "(orientation: landscape)",
				_ => "(orientation: portrait)",
			};
			orientation.set(AttrValue::from(next));
		})
	};
	let hosts = use_memo((), |_| (MediaHost::detect(), legacy_host()));
	let use_legacy = use_state(|| false);
	let toggle_style = {
		let use_legacy = use_legacy.clone();
		Callback::from(move |_: MouseEvent| use_legacy.set(!*use_legacy))
	};
	let host = match *use_legacy {
		true => hosts.1.clone(),
		false => hosts.0.clone(),
	};
	html! {
		<div>
			<p>{"use_media: "}<HookMessage /></p>
			<p>{format!("{}: ", wrapped.display_name())}{wrapped.render(())}</p>
			<p>
				{"Media: "}
				<Media query={MOBILE} render={Callback::from(describe)} />
			</p>
			<p>
				<button onclick={toggle_orientation}>{orientation.to_string()}</button>
				<Media query={(*orientation).clone()} render={Callback::from(|matches: bool| html!(<span>{matches.to_string()}</span>))} />
			</p>
			<p>
				<button onclick={toggle_style}>{if *use_legacy { "addListener" } else { "change event" }}</button>
				<MediaHostProvider {host}>
					<Media query={MOBILE} render={Callback::from(describe)} />
				</MediaHostProvider>
			</p>
		</div>
	}
}

#[cfg(target_arch = "wasm32")]
fn main() {
	logging::wasm::init(logging::wasm::Config::default().prefer_target());
	yew::Renderer::<App>::new().render();
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	logging::console::init(log::LevelFilter::Debug, &[])?;
	// There is no display surface here, so every facade renders its fallback.
	let rendered = yew::ServerRenderer::<App>::new().render().await;
	println!("{rendered}");
	Ok(())
}
