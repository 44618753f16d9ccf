//! Terminal user interface for jot.
//!
//! The shell in `app` owns the event loop and the session state
//! machine; the screens in `views` own their form/list state.

mod app;
mod views;

pub use app::{ShellState, run};
