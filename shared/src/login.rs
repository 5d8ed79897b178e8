//! Login form state and the submit flow.
//!
//! The form is a plain record with synchronous transitions. Authentication and
//! navigation are capabilities handed in by the caller, so the same flow runs
//! under the Yew screen and under test fakes.

use std::cell::RefCell;
use std::fmt;

use async_trait::async_trait;
use log::debug;

use crate::types::{AuthError, Credentials, Screen, Session};
use crate::validation;

const FAILURE_PREFIX: &str = "Sign-in failed";

/// Identity provider boundary.
#[async_trait(?Send)]
pub trait Authenticator {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Session, AuthError>;
}

/// Screen transitions requested by the form.
pub trait Navigator {
    /// Swap the current screen for `screen`; back does not return here.
    fn replace(&self, screen: Screen);
    /// Push `screen` on top of the current one.
    fn navigate(&self, screen: Screen);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Replace(Screen),
    Push(Screen),
}

impl Navigation {
    pub fn dispatch<N: Navigator + ?Sized>(self, navigator: &N) {
        match self {
            Navigation::Replace(screen) => navigator.replace(screen),
            Navigation::Push(screen) => navigator.navigate(screen),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed or an attempt was already in flight.
    Skipped,
    SignedIn(Session),
    Failed(AuthError),
}

#[derive(Default, Clone, PartialEq, Eq)]
pub struct LoginForm {
    email: String,
    password: String,
    error: Option<String>,
    is_loading: bool,
    attempt: u32,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
        self.error = None;
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
        self.error = None;
    }

    pub fn is_valid(&self) -> bool {
        validation::is_valid_email(&self.email) && validation::is_valid_password(&self.password)
    }

    pub fn email_error(&self) -> Option<&'static str> {
        validation::email_error(&self.email)
    }

    pub fn password_error(&self) -> Option<&'static str> {
        validation::password_error(&self.password)
    }

    pub fn can_submit(&self) -> bool {
        self.is_valid() && !self.is_loading
    }

    pub fn can_go_to_register(&self) -> bool {
        !self.is_loading
    }

    /// Latches the form into the submitting state.
    ///
    /// Returns the attempt id and the credentials to authenticate with, or
    /// `None` when the form is invalid or an attempt is already running.
    pub fn begin_submit(&mut self) -> Option<(u32, Credentials)> {
        if !self.can_submit() {
            return None;
        }

        self.is_loading = true;
        self.attempt = self.attempt.wrapping_add(1);

        Some((
            self.attempt,
            Credentials {
                email: self.email.clone(),
                password: self.password.clone(),
            },
        ))
    }

    /// Records the outcome of `attempt`. `failure` is `None` on success.
    ///
    /// Settlements for an attempt that is no longer running are ignored.
    pub fn settle(&mut self, attempt: u32, failure: Option<&AuthError>) -> Option<Navigation> {
        if !self.is_loading || attempt != self.attempt {
            return None;
        }

        self.is_loading = false;

        match failure {
            None => Some(Navigation::Replace(Screen::Home)),
            Some(err) => {
                self.error = Some(failure_message(err));
                None
            }
        }
    }

    pub fn go_to_register(&self) -> Option<Navigation> {
        if self.can_go_to_register() {
            Some(Navigation::Push(Screen::Register))
        } else {
            None
        }
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("error", &self.error)
            .field("is_loading", &self.is_loading)
            .field("attempt", &self.attempt)
            .finish()
    }
}

/// Text shown under the form for a failed sign-in. Every kind shares the
/// prefix; only the detail differs.
pub fn failure_message(err: &AuthError) -> String {
    format!("{}: {}", FAILURE_PREFIX, err)
}

/// Shared access to a form that outlives a suspension point.
///
/// Implementations must not hold a borrow across calls; the submit flow
/// releases the form while `authenticate` is pending so inputs stay editable.
pub trait FormHandle {
    fn update<R>(&self, f: impl FnOnce(&mut LoginForm) -> R) -> R;
}

impl FormHandle for RefCell<LoginForm> {
    fn update<R>(&self, f: impl FnOnce(&mut LoginForm) -> R) -> R {
        f(&mut *self.borrow_mut())
    }
}

/// Runs one sign-in attempt against `auth`, navigating home on success.
pub async fn submit<F, A, N>(form: &F, auth: &A, navigator: &N) -> SubmitOutcome
where
    F: FormHandle + ?Sized,
    A: Authenticator + ?Sized,
    N: Navigator + ?Sized,
{
    let Some((attempt, credentials)) = form.update(LoginForm::begin_submit) else {
        debug!("sign-in skipped: form invalid or busy");
        return SubmitOutcome::Skipped;
    };

    debug!("sign-in attempt {} started", attempt);
    let result = auth
        .authenticate(&credentials.email, &credentials.password)
        .await;

    let navigation = form.update(|f| f.settle(attempt, result.as_ref().err()));

    match result {
        Ok(session) => {
            debug!("sign-in attempt {} succeeded", attempt);
            if let Some(navigation) = navigation {
                navigation.dispatch(navigator);
            }
            SubmitOutcome::SignedIn(session)
        }
        Err(err) => {
            debug!("sign-in attempt {} failed: {}", attempt, err.kind());
            SubmitOutcome::Failed(err)
        }
    }
}

/// Opens the registration screen unless a sign-in is running.
pub fn go_to_register<F, N>(form: &F, navigator: &N) -> bool
where
    F: FormHandle + ?Sized,
    N: Navigator + ?Sized,
{
    match form.update(|f| f.go_to_register()) {
        Some(navigation) => {
            navigation.dispatch(navigator);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use std::rc::Rc;

    fn session() -> Session {
        Session {
            user_id: "uid-1".to_string(),
            email: "user@test.com".to_string(),
            id_token: "token".to_string(),
            expires_at: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn filled(email: &str, password: &str) -> Rc<RefCell<LoginForm>> {
        let mut form = LoginForm::new();
        form.set_email(email);
        form.set_password(password);
        Rc::new(RefCell::new(form))
    }

    /// Records every call and what the form looked like while it was pending.
    struct FakeAuth {
        result: Result<Session, AuthError>,
        form: Option<Rc<RefCell<LoginForm>>>,
        calls: RefCell<Vec<(String, String)>>,
        loading_during_call: RefCell<Vec<bool>>,
    }

    impl FakeAuth {
        fn new(result: Result<Session, AuthError>) -> Self {
            Self {
                result,
                form: None,
                calls: RefCell::new(Vec::new()),
                loading_during_call: RefCell::new(Vec::new()),
            }
        }

        fn watching(mut self, form: &Rc<RefCell<LoginForm>>) -> Self {
            self.form = Some(form.clone());
            self
        }
    }

    #[async_trait(?Send)]
    impl Authenticator for FakeAuth {
        async fn authenticate(&self, email: &str, password: &str) -> Result<Session, AuthError> {
            self.calls
                .borrow_mut()
                .push((email.to_string(), password.to_string()));
            if let Some(form) = &self.form {
                self.loading_during_call
                    .borrow_mut()
                    .push(form.borrow().is_loading());
            }
            self.result.clone()
        }
    }

    /// Resolves only once the test sends a result.
    struct PendingAuth {
        rx: RefCell<Option<oneshot::Receiver<Result<Session, AuthError>>>>,
    }

    #[async_trait(?Send)]
    impl Authenticator for PendingAuth {
        async fn authenticate(&self, _email: &str, _password: &str) -> Result<Session, AuthError> {
            let rx = self.rx.borrow_mut().take().expect("authenticate called twice");
            rx.await.unwrap_or(Err(AuthError::NetworkUnavailable))
        }
    }

    #[derive(Default)]
    struct FakeNav {
        replaced: RefCell<Vec<Screen>>,
        pushed: RefCell<Vec<Screen>>,
    }

    impl Navigator for FakeNav {
        fn replace(&self, screen: Screen) {
            self.replaced.borrow_mut().push(screen);
        }

        fn navigate(&self, screen: Screen) {
            self.pushed.borrow_mut().push(screen);
        }
    }

    #[test]
    fn new_form_is_empty_and_idle() {
        let form = LoginForm::new();
        assert_eq!(form.email(), "");
        assert_eq!(form.password(), "");
        assert_eq!(form.error(), None);
        assert!(!form.is_loading());
        assert!(!form.is_valid());
    }

    #[test]
    fn valid_shape_requires_both_fields() {
        let mut form = LoginForm::new();
        form.set_email("user@test.com");
        assert!(!form.is_valid());
        form.set_password("secret");
        assert!(form.is_valid());
        form.set_email("user@test");
        assert!(!form.is_valid());
    }

    #[test]
    fn successful_sign_in_replaces_with_home_once() {
        let form = filled("user@test.com", "secret");
        let auth = FakeAuth::new(Ok(session())).watching(&form);
        let nav = FakeNav::default();

        let outcome = block_on(submit(&*form, &auth, &nav));

        assert_eq!(outcome, SubmitOutcome::SignedIn(session()));
        assert_eq!(*nav.replaced.borrow(), vec![Screen::Home]);
        assert!(nav.pushed.borrow().is_empty());
        assert_eq!(*auth.loading_during_call.borrow(), vec![true]);
        assert!(!form.borrow().is_loading());
        assert_eq!(form.borrow().error(), None);
    }

    #[test]
    fn invalid_input_never_reaches_authenticate() {
        let form = filled("bad", "x");
        let auth = FakeAuth::new(Ok(session()));
        let nav = FakeNav::default();

        let outcome = block_on(submit(&*form, &auth, &nav));

        assert_eq!(outcome, SubmitOutcome::Skipped);
        assert!(auth.calls.borrow().is_empty());
        assert!(nav.replaced.borrow().is_empty());
        assert!(!form.borrow().is_loading());
    }

    #[test]
    fn rejected_credentials_show_error_and_stay() {
        let form = filled("user@test.com", "wrong");
        let auth = FakeAuth::new(Err(AuthError::InvalidCredentials)).watching(&form);
        let nav = FakeNav::default();

        let outcome = block_on(submit(&*form, &auth, &nav));

        assert_eq!(outcome, SubmitOutcome::Failed(AuthError::InvalidCredentials));
        let form = form.borrow();
        let error = form.error().expect("error should be set");
        assert!(!error.is_empty());
        assert!(error.starts_with(FAILURE_PREFIX));
        assert!(!form.is_loading());
        assert!(nav.replaced.borrow().is_empty());
        assert!(nav.pushed.borrow().is_empty());
        assert_eq!(*auth.loading_during_call.borrow(), vec![true]);
    }

    #[test]
    fn every_failure_kind_releases_the_latch() {
        for err in [
            AuthError::InvalidCredentials,
            AuthError::NetworkUnavailable,
            AuthError::RateLimited,
            AuthError::Unknown("INTERNAL".to_string()),
        ] {
            let form = filled("user@test.com", "secret");
            let auth = FakeAuth::new(Err(err.clone()));
            let nav = FakeNav::default();

            let outcome = block_on(submit(&*form, &auth, &nav));

            assert_eq!(outcome, SubmitOutcome::Failed(err.clone()));
            assert!(!form.borrow().is_loading());
            assert_eq!(form.borrow().error(), Some(failure_message(&err).as_str()));
        }
    }

    #[test]
    fn editing_after_failure_clears_error() {
        let form = filled("user@test.com", "wrong");
        let auth = FakeAuth::new(Err(AuthError::InvalidCredentials));
        let nav = FakeNav::default();
        block_on(submit(&*form, &auth, &nav));
        assert!(form.borrow().error().is_some());

        form.borrow_mut().set_password("right");
        assert_eq!(form.borrow().error(), None);

        block_on(submit(&*form, &auth, &nav));
        assert!(form.borrow().error().is_some());

        form.borrow_mut().set_email("other@test.com");
        assert_eq!(form.borrow().error(), None);
    }

    #[test]
    fn pending_attempt_blocks_resubmit_but_not_editing() {
        let (tx, rx) = oneshot::channel();
        let form = filled("user@test.com", "secret");
        let auth = PendingAuth {
            rx: RefCell::new(Some(rx)),
        };
        let nav = FakeNav::default();

        block_on(async {
            let first = submit(&*form, &auth, &nav);
            futures::pin_mut!(first);
            assert!(futures::poll!(first.as_mut()).is_pending());

            assert!(form.borrow().is_loading());
            assert!(!form.borrow().can_submit());
            assert!(!form.borrow().can_go_to_register());

            // A second submit while pending is a no-op.
            assert_eq!(submit(&*form, &auth, &nav).await, SubmitOutcome::Skipped);
            assert!(!go_to_register(&*form, &nav));

            form.borrow_mut().set_password("changed");
            assert_eq!(form.borrow().password(), "changed");
            assert!(form.borrow().is_loading());

            tx.send(Ok(session())).unwrap();
            assert_eq!(first.await, SubmitOutcome::SignedIn(session()));
        });

        assert!(!form.borrow().is_loading());
        assert_eq!(*nav.replaced.borrow(), vec![Screen::Home]);
        assert!(nav.pushed.borrow().is_empty());
    }

    #[test]
    fn stale_settlement_is_ignored() {
        let mut form = LoginForm::new();
        form.set_email("user@test.com");
        form.set_password("secret");

        let (attempt, _) = form.begin_submit().unwrap();
        assert_eq!(form.settle(attempt + 1, None), None);
        assert!(form.is_loading());

        assert_eq!(
            form.settle(attempt, None),
            Some(Navigation::Replace(Screen::Home))
        );
        assert_eq!(form.settle(attempt, None), None);
        assert!(!form.is_loading());
    }

    #[test]
    fn register_navigation_pushes_when_idle() {
        let form = RefCell::new(LoginForm::new());
        let nav = FakeNav::default();

        assert!(go_to_register(&form, &nav));
        assert_eq!(*nav.pushed.borrow(), vec![Screen::Register]);
        assert!(nav.replaced.borrow().is_empty());
    }

    #[test]
    fn debug_never_prints_password() {
        let form = filled("user@test.com", "hunter2");
        let out = format!("{:?}", form.borrow());
        assert!(!out.contains("hunter2"));
    }
}
