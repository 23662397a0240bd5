//! # Formbridge
//!
//! `formbridge` wires a signup form and a login form to a token-issuing auth
//! backend. A submission suppresses the form's navigation, sends the username
//! and password as JSON to the form's endpoint and reports the outcome in a
//! shared message element. A successful login stores the returned token in
//! durable key-value storage (under `jwt` by default).
//!
//! ## Surfaces
//!
//! - [`bridge::FormBridge`] is the core, generic over the page, the storage
//!   and the HTTP transport.
//! - `browser` (only on `wasm32`) binds the core to the live DOM,
//!   `localStorage` and `fetch`.
//! - [`cli`] drives the same core from the command line, keeping the token in
//!   a file-backed store.
//!
//! Credentials and tokens pass through every layer; none of them may be logged.

pub mod bridge;
#[cfg(target_arch = "wasm32")]
pub mod browser;
#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
pub mod config;
pub mod errors;
pub mod page;
pub mod storage;
pub mod transport;

pub use bridge::{Credentials, FormBridge, FormKind, Outcome};
pub use config::BridgeConfig;
pub use errors::BridgeError;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
