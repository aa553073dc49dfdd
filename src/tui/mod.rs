//! Terminal user interface.
//!
//! A thin shell over the session store: key handling mutates state through
//! the view operations, and rendering consumes the pure view models. All
//! backend calls are driven to completion on a current-thread runtime, so
//! the store is only ever touched from this one thread.

mod app;
mod events;
mod render;
mod theme;

pub use app::{run, TuiOptions};
