//! Client Utilities Module
//!
//! Helpers shared with the web app's pages: cookie and token lookup, email
//! validation, the version badge and toast notifications.

pub mod cookie;
pub mod email;
pub mod toast;
pub mod version;

pub use cookie::{get_cookie, resolve_token, token_cookie, ResolvedToken, TokenSource};
pub use email::is_valid_email;
pub use toast::{Toast, ToastIcon};
pub use version::{fetch_version, VersionBadge, VersionInfo};
