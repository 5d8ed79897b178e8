use std::cell::RefCell;
use std::rc::Rc;

use shared::{ClientConfig, FormHandle, LoginForm, SubmitOutcome};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::TextField;
use crate::navigation::RouterNavigator;
use crate::services::IdentityClient;

/// Form cell shared between the render pass and the pending sign-in future.
#[derive(Clone)]
struct ScreenForm {
    form: Rc<RefCell<LoginForm>>,
    refresh: UseForceUpdateHandle,
}

impl FormHandle for ScreenForm {
    fn update<R>(&self, f: impl FnOnce(&mut LoginForm) -> R) -> R {
        let out = f(&mut *self.form.borrow_mut());
        self.refresh.force_update();
        out
    }
}

#[function_component(Login)]
pub fn login() -> Html {
    let config = use_context::<ClientConfig>();
    let form = use_mut_ref(LoginForm::new);
    let refresh = use_force_update();
    let auth = use_memo(config.clone(), |config| {
        config.clone().map(IdentityClient::new)
    });
    let navigator = use_navigator();

    let (Some(config), Some(navigator)) = (config, navigator) else {
        log::error!("Login screen rendered outside the configured router");
        return html! {};
    };
    let navigator = RouterNavigator::new(navigator);
    let handle = ScreenForm { form, refresh };

    let on_email_input = {
        let handle = handle.clone();
        Callback::from(move |value: String| handle.update(|f| f.set_email(value)))
    };

    let on_password_input = {
        let handle = handle.clone();
        Callback::from(move |value: String| handle.update(|f| f.set_password(value)))
    };

    let on_submit = {
        let handle = handle.clone();
        let auth = auth.clone();
        let navigator = navigator.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let handle = handle.clone();
            let auth = auth.clone();
            let navigator = navigator.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let Some(auth) = &*auth else {
                    return;
                };
                match shared::submit(&handle, auth, &navigator).await {
                    SubmitOutcome::SignedIn(session) => {
                        log::info!("Signed in as {}", session.user_id)
                    }
                    SubmitOutcome::Failed(err) => log::info!("Sign-in failed: {}", err.kind()),
                    SubmitOutcome::Skipped => {}
                }
            });
        })
    };

    let on_register = {
        let handle = handle.clone();
        let navigator = navigator.clone();
        Callback::from(move |_: MouseEvent| {
            shared::go_to_register(&handle, &navigator);
        })
    };

    let form = handle.form.borrow();

    html! {
        <div class="login-container">
            <div class="login-card">
                <h1 class="login-title">{ config.app_title.clone() }</h1>

                // Browser email validation is stricter than ours and would
                // swallow the submit event for inputs we accept.
                <form onsubmit={on_submit} novalidate=true>
                    <TextField
                        id="email"
                        input_type="email"
                        placeholder="Email"
                        value={form.email().to_string()}
                        error={form.email_error().map(AttrValue::Static)}
                        oninput={on_email_input}
                    />
                    <TextField
                        id="password"
                        input_type="password"
                        placeholder="Password"
                        value={form.password().to_string()}
                        error={form.password_error().map(AttrValue::Static)}
                        oninput={on_password_input}
                    />

                    if let Some(err) = form.error() {
                        <p class="error">{ err.to_string() }</p>
                    }

                    if form.is_loading() {
                        <div class="spinner" role="status" aria-label="Signing in"></div>
                    } else {
                        <button type="submit" class="btn btn-primary" disabled={!form.can_submit()}>
                            { "Sign In" }
                        </button>
                    }
                </form>

                <button
                    type="button"
                    class="btn btn-outline"
                    onclick={on_register}
                    disabled={!form.can_go_to_register()}
                >
                    { "Register" }
                </button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yew_router::history::{AnyHistory, MemoryHistory};
    use yew_router::router::Router;

    #[function_component(LoginInRouter)]
    fn login_in_router() -> Html {
        let config = ClientConfig {
            app_title: "Test Kitchen".to_string(),
            identity_provider_url: "http://localhost:9099".to_string(),
            api_key: "test-key".to_string(),
        };
        let history = AnyHistory::from(MemoryHistory::new());

        html! {
            <ContextProvider<ClientConfig> context={config}>
                <Router {history}>
                    <Login />
                </Router>
            </ContextProvider<ClientConfig>>
        }
    }

    #[tokio::test]
    async fn form_opts_out_of_browser_validation() {
        let rendered = yew::ServerRenderer::<LoginInRouter>::new().render().await;

        assert!(rendered.contains("Test Kitchen"));
        assert!(rendered.contains(r#"id="email""#));
        assert!(rendered.contains("novalidate"));
    }
}
