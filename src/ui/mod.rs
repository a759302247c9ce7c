//! Terminal user interface.
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling per view
//! - `render` - View rendering dispatch
//! - `login` - Sign-in / sign-up form widget
//! - `home` - Category list widget
//! - `content` - Content item widget
//! - `status` - Status bar widget

mod content;
mod home;
mod input;
mod login;
mod loop_runner;
mod render;
mod status;

pub use loop_runner::{run, Action};
