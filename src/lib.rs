//! Terminal client for a hosted study-content service: sign in, browse the
//! category tree, and read content items with attached downloads.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod session;
pub mod state;
pub mod store;
pub mod theme;
pub mod ui;
pub mod util;
