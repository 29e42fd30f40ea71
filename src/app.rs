//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the search state, the
//! current result list and the presentation toggles.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
