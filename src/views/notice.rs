//! Transient user-facing notices

use std::fmt::Display;

/// How long a notice stays on screen
pub const NOTICE_TIMEOUT_MS: u32 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    /// Log a failed call and turn it into an error notice.
    ///
    /// `action` reads as a verb phrase: "load tickets", "delete ticket".
    pub fn report_failure(action: &str, error: &dyn Display) -> Self {
        tracing::error!(action = %action, "Request failed: {}", error);
        Self::error(format!("Failed to {}", action))
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_failure() {
        let notice = Notice::report_failure("load tickets", &"connection refused");
        assert!(notice.is_error());
        assert_eq!(notice.message, "Failed to load tickets");
    }

    #[test]
    fn test_constructors() {
        assert_eq!(Notice::success("Saved").level, NoticeLevel::Success);
        assert_eq!(Notice::warning("Careful").to_string(), "Careful");
    }
}
