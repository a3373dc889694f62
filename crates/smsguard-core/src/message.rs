//! User-submitted messages kept in the message store.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Labels accepted for stored messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLabel {
    Scam,
    Ham,
}

impl MessageLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scam => "scam",
            Self::Ham => "ham",
        }
    }
}

impl fmt::Display for MessageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid label {0:?}: expected \"scam\" or \"ham\"")]
pub struct ParseLabelError(pub String);

impl FromStr for MessageLabel {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scam" => Ok(Self::Scam),
            "ham" => Ok(Self::Ham),
            _ => Err(ParseLabelError(s.to_string())),
        }
    }
}

/// A persisted message row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: i64,
    pub label: MessageLabel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl StoredMessage {
    /// First 50 characters of the message, for listings.
    pub fn preview(&self) -> String {
        let mut chars = self.message.chars();
        let head: String = chars.by_ref().take(50).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

/// Message counts by label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageStats {
    pub total_messages: u64,
    pub scam_messages: u64,
    pub ham_messages: u64,
}
