//! blamelens: the client layer of an AI-agent blame browser.
//!
//! Maps source lines and edit events to the agent sessions that produced
//! them, and lets a user browse and search the session transcripts. The
//! heavy lifting (blame computation, trace scanning, transcript parsing,
//! full-text indexing) lives in a desktop backend helper reached over a
//! newline-delimited JSON channel; this crate holds the session state,
//! the search engine, the cross-view navigation, and a terminal UI.
//!
//! Module layout:
//! - [`model`]: payload types shared with the backend
//! - [`backend`]: the remote-invocation boundary and its stdio transport
//! - [`store`]: the session state store with stale-response suppression
//! - [`views`]: per-view load operations and pure view models
//! - [`search`]: the debounced cross-session search scheduler
//! - [`nav`]: cross-view navigation bridges
//! - [`tui`]: the ratatui shell

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod nav;
pub mod search;
pub mod store;
pub mod text;
pub mod tui;
pub mod util;
pub mod views;

pub use error::{LensError, Result};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
