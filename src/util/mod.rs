//! Shared utilities: terminal text measurement, HTML flattening, and URL
//! validation for the OS opener.

mod html;
mod text;
mod url;

pub use html::{html_to_lines, html_to_text};
pub use text::{display_width, strip_control_chars, truncate_to_width};
pub use url::{validate_url_for_open, UrlValidationError};
