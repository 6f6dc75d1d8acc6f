//! Result envelope shared by every repository call.

use serde::{Deserialize, Serialize};

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

/// A message the front-end shows to the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

/// `{ data }` wrapper returned by repositories, plus the notices raised while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub data: T,
    pub notices: Vec<Notice>,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            notices: Vec::new(),
        }
    }

    /// Add a notice unless one with the same message is already present.
    pub fn notify(&mut self, notice: Notice) {
        if !self.notices.iter().any(|n| n.message == notice.message) {
            self.notices.push(notice);
        }
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notify(notice);
        self
    }

    /// Carry over another envelope's notices.
    pub fn absorb(&mut self, notices: Vec<Notice>) {
        for notice in notices {
            self.notify(notice);
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            data: f(self.data),
            notices: self.notices,
        }
    }
}

/// Payload of a successful single-record delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deleted {
    pub id: i64,
}
