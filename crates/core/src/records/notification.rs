use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::require_non_blank;
use super::{Document, ValidationError};

/// Delivery state of a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    #[default]
    Pending,
    Sent,
    Read,
}

/// A message addressed to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub status: NotificationStatus,
    #[serde(default = "Utc::now")]
    pub sent_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Creates a pending notification sent now.
    pub fn new(
        user_id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            title: title.into(),
            message: message.into(),
            status: NotificationStatus::Pending,
            sent_at: Utc::now(),
            read_at: None,
        }
    }

    /// Sets the send timestamp (useful for testing).
    pub fn with_sent_at(mut self, sent_at: DateTime<Utc>) -> Self {
        self.sent_at = sent_at;
        self
    }
}

/// Partial update for a [`Notification`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NotificationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
}

impl Document for Notification {
    type Patch = NotificationPatch;

    const KIND: &'static str = "notification";
    const ENTITY_TYPE: &'static str = "Notification";
    const REQUIRED_FIELDS: &'static [&'static str] = &["userId", "title", "message"];

    fn apply_patch(&mut self, patch: NotificationPatch) {
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(message) = patch.message {
            self.message = message;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(read_at) = patch.read_at {
            self.read_at = Some(read_at);
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("userId", &self.user_id)?;
        require_non_blank("title", &self.title)?;
        require_non_blank("message", &self.message)
    }

    fn validate_patch(patch: &NotificationPatch) -> Result<(), ValidationError> {
        if let Some(title) = &patch.title {
            require_non_blank("title", title)?;
        }
        if let Some(message) = &patch.message {
            require_non_blank("message", message)?;
        }
        Ok(())
    }

    fn normalize(&mut self) {
        self.user_id = self.user_id.trim().to_string();
        self.title = self.title.trim().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_defaults_when_deserializing() {
        let notification: Notification = serde_json::from_value(json!({
            "userId": "u-1",
            "title": "Welcome",
            "message": "Your table is ready"
        }))
        .unwrap();

        assert_eq!(notification.status, NotificationStatus::Pending);
        assert!(notification.read_at.is_none());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_value(NotificationStatus::Read).unwrap(),
            json!("read")
        );
    }

    #[test]
    fn test_mark_as_read_patch() {
        let read_at = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let mut notification = Notification::new("u-1", "Welcome", "Hello");

        notification.apply_patch(NotificationPatch {
            status: Some(NotificationStatus::Read),
            read_at: Some(read_at),
            ..Default::default()
        });

        assert_eq!(notification.status, NotificationStatus::Read);
        assert_eq!(notification.read_at, Some(read_at));
        assert_eq!(notification.title, "Welcome");
    }

    #[test]
    fn test_validate_rejects_blank_message() {
        let notification = Notification::new("u-1", "Welcome", "   ");
        assert_eq!(
            notification.validate(),
            Err(ValidationError::BlankField("message"))
        );
    }

    #[test]
    fn test_validate_patch_rejects_blank_title() {
        let patch = NotificationPatch {
            title: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            Notification::validate_patch(&patch),
            Err(ValidationError::BlankField("title"))
        );
    }
}
