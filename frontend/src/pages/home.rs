use shared::ClientConfig;
use yew::prelude::*;

#[function_component(Home)]
pub fn home() -> Html {
    let title = use_context::<ClientConfig>()
        .map(|c| c.app_title)
        .unwrap_or_default();

    html! {
        <div class="login-container">
            <div class="login-card">
                <h1 class="login-title">{ title }</h1>
                <p>{ "You are signed in." }</p>
            </div>
        </div>
    }
}
