//! KYC document-signing models

use serde::{Deserialize, Serialize};

/// Who the KYC document is created for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    pub first_name: String,
}

impl Identity {
    pub fn new(email: impl Into<String>, first_name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            first_name: first_name.into(),
        }
    }

    /// Both fields are required before a document can be requested
    pub fn is_complete(&self) -> bool {
        !self.email.trim().is_empty() && !self.first_name.trim().is_empty()
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("email".to_string(), self.email.trim().to_string()),
            ("first_name".to_string(), self.first_name.trim().to_string()),
        ]
    }
}

/// Signing status reported by the document-status endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    #[default]
    Unknown,
    Pending,
    Submitted,
    InProgress,
    Rejected,
    Completed,
}

impl KycStatus {
    /// Lenient parse; anything unrecognized is `Unknown`
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "pending" => KycStatus::Pending,
            "submitted" => KycStatus::Submitted,
            "in_progress" | "inprogress" => KycStatus::InProgress,
            "rejected" | "declined" => KycStatus::Rejected,
            "completed" | "complete" => KycStatus::Completed,
            _ => KycStatus::Unknown,
        }
    }

    /// Polling stops once one of these is reached
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            KycStatus::Completed | KycStatus::Rejected | KycStatus::Submitted
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            KycStatus::Unknown => "unknown",
            KycStatus::Pending => "pending",
            KycStatus::Submitted => "submitted",
            KycStatus::InProgress => "in_progress",
            KycStatus::Rejected => "rejected",
            KycStatus::Completed => "completed",
        }
    }
}

impl<'de> Deserialize<'de> for KycStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(KycStatus::parse(&raw))
    }
}

/// Lifecycle phase of a KYC session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KycPhase {
    /// No identity yet, or it was incomplete
    #[default]
    Uninitialized,
    /// Document creation call in flight
    Requesting,
    /// Document created; signing URL shown and/or status being polled
    Active,
    /// Terminal status reached
    Finished,
    /// Document creation failed; waits for an explicit retry
    Failed,
}

/// Observable KYC session state
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct KycSession {
    pub phase: KycPhase,
    pub signing_url: Option<String>,
    pub request_id: Option<String>,
    pub status: KycStatus,
    pub is_polling: bool,
    pub error: Option<String>,
}

impl KycSession {
    /// A signing URL is on screen and the user has not finished yet
    pub fn awaiting_signature(&self) -> bool {
        self.signing_url.is_some() && !self.status.is_terminal()
    }
}

/// Response of the document-create endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentCreated {
    pub signing_url: String,
    pub request_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(KycStatus::parse("Completed"), KycStatus::Completed);
        assert_eq!(KycStatus::parse("in-progress"), KycStatus::InProgress);
        assert_eq!(KycStatus::parse("in progress"), KycStatus::InProgress);
        assert_eq!(KycStatus::parse("pending"), KycStatus::Pending);
        assert_eq!(KycStatus::parse("whatever"), KycStatus::Unknown);

        let status: KycStatus = serde_json::from_str("\"submitted\"").unwrap();
        assert_eq!(status, KycStatus::Submitted);
    }

    #[test]
    fn test_terminal_set() {
        assert!(KycStatus::Completed.is_terminal());
        assert!(KycStatus::Rejected.is_terminal());
        assert!(KycStatus::Submitted.is_terminal());
        assert!(!KycStatus::Pending.is_terminal());
        assert!(!KycStatus::InProgress.is_terminal());
        assert!(!KycStatus::Unknown.is_terminal());
    }

    #[test]
    fn test_identity_completeness() {
        assert!(Identity::new("seller@example.com", "Ana").is_complete());
        assert!(!Identity::new("seller@example.com", " ").is_complete());
        assert!(!Identity::new("", "Ana").is_complete());
    }
}
