pub(crate) mod claims;
pub(crate) mod extract;
pub(crate) mod provider;
pub(crate) mod token_service;

pub use claims::HasuraClaims;
pub use extract::AuthUser;
pub use provider::{
    FirebaseIdentityProvider, IdentityError, IdentityProvider, LocalIdentityProvider,
    VerifiedIdentity,
};
pub use token_service::{AccessToken, TokenService};
