//! Stale counter library
//!
//! Counter widgets whose deferred updates either capture a stale value or
//! read the live one, and a terminal board that shows the difference.

pub mod app;
pub mod counter;
pub mod event;
pub mod scenario;
pub mod state;
pub mod ui;
