//! User-visible notices (banner messages).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Shown when the shareable URL cannot be turned into queries.
pub const URL_PARAMS_ERROR_MESSAGE: &str = "Your URL query is incomplete. Check the URL and make sure the keyword(s), start and end dates, and collection(s) are properly specified.";

/// Shown when a sample search route points past the catalog.
pub const SAMPLE_NOT_FOUND_MESSAGE: &str =
    "That sample search does not exist. Pick one of the sample searches instead.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// A `{level, message}` pair for the banner area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    /// The single error-level notice a failed navigation produces.
    #[must_use]
    pub fn for_error(err: &Error) -> Self {
        match err {
            Error::SampleNotFound(_) => Self::error(SAMPLE_NOT_FOUND_MESSAGE),
            e if e.is_url_params_error() => Self::error(URL_PARAMS_ERROR_MESSAGE),
            other => Self::error(other.to_string()),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// Receiver of user-visible notices.
pub trait NoticeSink {
    fn notify(&mut self, notice: Notice);
}

impl NoticeSink for Vec<Notice> {
    fn notify(&mut self, notice: Notice) {
        self.push(notice);
    }
}
