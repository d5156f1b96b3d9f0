//! Toast notification descriptor.
//!
//! Serialises to the option object the front-end alert library consumes.

use serde::Serialize;

/// Default display time in milliseconds.
pub const DEFAULT_TIMER_MS: u64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastIcon {
    Success,
    Error,
    Warning,
    Info,
    Question,
}

/// An auto-dismissing toast, optionally redirecting once closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub title: String,
    pub text: String,
    pub icon: ToastIcon,
    pub timer: u64,
    pub timer_progress_bar: bool,
    pub show_confirm_button: bool,
    /// Applied by the page after close, never passed to the alert library
    #[serde(skip)]
    pub redirect_url: Option<String>,
}

impl Toast {
    pub fn new(title: impl Into<String>, text: impl Into<String>, icon: ToastIcon) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            icon,
            timer: DEFAULT_TIMER_MS,
            timer_progress_bar: true,
            show_confirm_button: false,
            redirect_url: None,
        }
    }

    pub fn redirect_to(mut self, url: impl Into<String>) -> Self {
        self.redirect_url = Some(url.into());
        self
    }

    pub fn timer(mut self, ms: u64) -> Self {
        self.timer = ms;
        self
    }

    /// Where the page navigates once the toast closes, if anywhere.
    pub fn redirect_after_close(&self) -> Option<&str> {
        self.redirect_url.as_deref()
    }
}
