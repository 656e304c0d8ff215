//! OAuth2 / OpenID-Connect logins.
//!
//! Google grants calendar access; Microsoft only identifies the user.

pub mod google;
pub mod microsoft;
pub mod models;

pub use google::GoogleOAuth;
pub use microsoft::MicrosoftOidc;
pub use models::{Credentials, Provider, UserProfile};
