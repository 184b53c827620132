//! Getting idea text out of the app: clipboard, mail-style sharing, notifications.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use thiserror::Error;

pub const SHARE_SUBJECT: &str = "Check out this date idea! 💖";

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),
    #[error("Could not open share target: {0}")]
    Open(#[from] std::io::Error),
}

pub fn copy_to_clipboard(text: &str) -> Result<(), ShareError> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| ShareError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| ShareError::Clipboard(e.to_string()))?;
    tracing::debug!("Copied {} bytes to clipboard", text.len());
    Ok(())
}

/// Build a `mailto:` link carrying the idea as the message body
pub fn share_url(text: &str) -> String {
    format!(
        "mailto:?subject={}&body={}",
        utf8_percent_encode(SHARE_SUBJECT, NON_ALPHANUMERIC),
        utf8_percent_encode(text, NON_ALPHANUMERIC),
    )
}

/// Hand the idea to the system's default mail handler
pub fn share_idea(text: &str) -> Result<(), ShareError> {
    open::that_detached(share_url(text))?;
    Ok(())
}

pub fn notify(summary: &str, body: &str) -> anyhow::Result<()> {
    notify_rust::Notification::new()
        .summary(summary)
        .body(body)
        .icon("emblem-favorite")
        .show()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_url_is_encoded() {
        let url = share_url("Dinner & a movie?");
        assert!(url.starts_with("mailto:?subject=Check%20out%20this%20date%20idea%21"));
        assert!(url.ends_with("&body=Dinner%20%26%20a%20movie%3F"));
        assert!(!url.contains(' '));
    }
}
