//! OAuth token generation for the spreadsheet server.
//!
//! Implements the installed-app consent flow: a loopback redirect listener,
//! a browser-based authorization grant, PKCE, and the code-for-token
//! exchange. The resulting artifact is written in the authorized-user shape
//! the external spreadsheet server consumes.

pub mod callback;
pub mod flow;
pub mod pkce;
pub mod storage;
pub mod types;

pub use callback::CallbackServer;
pub use flow::OAuthFlow;
pub use pkce::{generate_pkce, generate_state};
pub use storage::TokenStore;
pub use types::{ClientSecrets, PkceChallenge, StoredToken, TokenResponse};
