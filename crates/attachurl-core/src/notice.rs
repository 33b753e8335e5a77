//! Warnings and errors raised while ingesting, routed by origin.
//!
//! API-origin notices go to the durable tracing log. Interactive-origin
//! notices are collected for the host to show the editor.

/// Where an ingestion call came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Submitted through the record-edit form.
    Interactive,
    /// Called programmatically.
    Api,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.level {
            NoticeLevel::Warning => write!(f, "warning: {}", self.message),
            NoticeLevel::Error => write!(f, "error: {}", self.message),
        }
    }
}

/// Notice sink for one request.
#[derive(Debug)]
pub struct Notices {
    origin: Origin,
    user: Vec<Notice>,
}

impl Notices {
    pub fn new(origin: Origin) -> Self {
        Self {
            origin,
            user: Vec::new(),
        }
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Warning, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message.into());
    }

    fn push(&mut self, level: NoticeLevel, message: String) {
        match (self.origin, level) {
            (Origin::Api, NoticeLevel::Warning) => tracing::warn!(origin = "api", "{}", message),
            (Origin::Api, NoticeLevel::Error) => tracing::error!(origin = "api", "{}", message),
            (Origin::Interactive, _) => {
                tracing::debug!(origin = "interactive", ?level, "{}", message);
                self.user.push(Notice { level, message });
            }
        }
    }

    /// Notices waiting to be shown to the editor (always empty for API origin).
    pub fn user_notices(&self) -> &[Notice] {
        &self.user
    }

    pub fn into_user_notices(self) -> Vec<Notice> {
        self.user
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interactive_notices_are_collected() {
        let mut n = Notices::new(Origin::Interactive);
        n.warning("full");
        n.error("bad url");
        assert_eq!(
            n.user_notices(),
            &[
                Notice {
                    level: NoticeLevel::Warning,
                    message: "full".to_string()
                },
                Notice {
                    level: NoticeLevel::Error,
                    message: "bad url".to_string()
                },
            ]
        );
        assert_eq!(n.user_notices()[1].to_string(), "error: bad url");
    }

    #[test]
    fn api_notices_go_to_log_only() {
        let mut n = Notices::new(Origin::Api);
        n.warning("full");
        n.error("bad url");
        assert!(n.user_notices().is_empty());
        assert_eq!(n.origin(), Origin::Api);
    }
}
