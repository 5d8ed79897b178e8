mod identity;

pub use identity::IdentityClient;
