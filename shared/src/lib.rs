pub mod login;
pub mod types;
pub mod validation;

pub use login::{
    failure_message, go_to_register, submit, Authenticator, FormHandle, LoginForm, Navigation,
    Navigator, SubmitOutcome,
};
pub use types::*;
