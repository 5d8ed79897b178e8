use gloo_net::http::Request;
use shared::ClientConfig;
use yew::prelude::*;
use yew_router::prelude::*;

mod components;
mod navigation;
mod pages;
mod services;

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Login,
    #[at("/register")]
    Register,
    #[at("/home")]
    Home,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Login => html! { <pages::login::Login /> },
        Route::Register => html! { <pages::register::Register /> },
        Route::Home => html! { <pages::home::Home /> },
        Route::NotFound => html! { <pages::login::Login /> },
    }
}

#[derive(Clone, PartialEq)]
enum ConfigState {
    Loading,
    Ready(ClientConfig),
    Failed(String),
}

#[function_component(App)]
fn app() -> Html {
    let config_state = use_state(|| ConfigState::Loading);

    {
        let config_state = config_state.clone();
        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                let next = match Request::get("/api/config").send().await {
                    Ok(resp) if resp.ok() => match resp.json::<ClientConfig>().await {
                        Ok(config) => ConfigState::Ready(config),
                        Err(e) => ConfigState::Failed(format!("Failed to parse config: {}", e)),
                    },
                    Ok(resp) => ConfigState::Failed(format!("Request failed: {}", resp.status())),
                    Err(e) => ConfigState::Failed(format!("Request error: {}", e)),
                };
                if let ConfigState::Failed(ref msg) = next {
                    log::error!("{}", msg);
                }
                config_state.set(next);
            });
            || ()
        });
    }

    match &*config_state {
        ConfigState::Loading => html! {
            <div class="login-container">
                <div class="login-card">
                    <p>{ "Loading..." }</p>
                </div>
            </div>
        },
        ConfigState::Failed(msg) => html! {
            <div class="login-container">
                <div class="login-card">
                    <p class="error">{ msg.clone() }</p>
                </div>
            </div>
        },
        ConfigState::Ready(config) => html! {
            <ContextProvider<ClientConfig> context={config.clone()}>
                <BrowserRouter>
                    <div class="container">
                        <Switch<Route> render={switch} />
                    </div>
                </BrowserRouter>
            </ContextProvider<ClientConfig>>
        },
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
