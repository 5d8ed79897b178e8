use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;

#[function_component(Register)]
pub fn register() -> Html {
    html! {
        <div class="login-container">
            <div class="login-card">
                <h1 class="login-title">{ "Create an account" }</h1>
                <p>{ "Registration is handled by the identity provider." }</p>
                <Link<Route> to={Route::Login} classes="btn btn-outline">
                    { "Back to sign in" }
                </Link<Route>>
            </div>
        </div>
    }
}
