// SPDX-License-Identifier: MPL-2.0
//! Core notification data structures.
//!
//! Rows arrive from the backend as JSON (`snake_case` fields, RFC 3339
//! timestamps). Apart from the `read` flag, both entities are immutable on
//! the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;

/// Backend identifier of a notification, stable across refreshes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(String);

impl NotificationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NotificationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NotificationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Backend identifier of a cheating alert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(String);

impl AlertId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AlertId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AlertId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Domain event that produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    RelationshipRequest,
    CheatingAlert,
    RelationshipVerified,
    RelationshipEnded,
    PostLike,
    PostComment,
    Message,
    Follow,
}

impl NotificationType {
    /// Every variant, in display order of the settings screen.
    pub const ALL: [NotificationType; 8] = [
        NotificationType::RelationshipRequest,
        NotificationType::CheatingAlert,
        NotificationType::RelationshipVerified,
        NotificationType::RelationshipEnded,
        NotificationType::PostLike,
        NotificationType::PostComment,
        NotificationType::Message,
        NotificationType::Follow,
    ];
}

/// A notification owned by the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    id: NotificationId,
    user_id: String,
    #[serde(rename = "type")]
    kind: NotificationType,
    title: String,
    message: String,
    /// Deep-link payload (e.g. `{"post_id": "..."}`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Map<String, Value>>,
    #[serde(default)]
    read: bool,
    created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates an unread notification.
    pub fn new(
        id: impl Into<NotificationId>,
        user_id: impl Into<String>,
        kind: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            kind,
            title: title.into(),
            message: message.into(),
            data: None,
            read: false,
            created_at,
        }
    }

    /// Attaches a deep-link entry.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Marks the notification as already read.
    #[must_use]
    pub fn already_read(mut self) -> Self {
        self.read = true;
        self
    }

    #[must_use]
    pub fn id(&self) -> &NotificationId {
        &self.id
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn kind(&self) -> NotificationType {
        self.kind
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn data(&self) -> Option<&Map<String, Value>> {
        self.data.as_ref()
    }

    #[must_use]
    pub fn is_read(&self) -> bool {
        self.read
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Flips `read` to true. There is no way back.
    pub(crate) fn mark_read(&mut self) {
        self.read = true;
    }

    /// Recency order: `created_at`, then identifier for equal timestamps.
    #[must_use]
    pub fn cmp_recency(&self, other: &Self) -> Ordering {
        self.created_at
            .cmp(&other.created_at)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// A cheating alert; counted in the badge, rendered on its own screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheatingAlert {
    id: AlertId,
    #[serde(default)]
    read: bool,
    created_at: DateTime<Utc>,
}

impl CheatingAlert {
    pub fn new(id: impl Into<AlertId>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            read: false,
            created_at,
        }
    }

    #[must_use]
    pub fn already_read(mut self) -> Self {
        self.read = true;
        self
    }

    #[must_use]
    pub fn id(&self) -> &AlertId {
        &self.id
    }

    #[must_use]
    pub fn is_read(&self) -> bool {
        self.read
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub(crate) fn mark_read(&mut self) {
        self.read = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn deserializes_backend_row() {
        let json = r#"{
            "id": "3f0c",
            "user_id": "u-1",
            "type": "relationship_request",
            "title": "New request",
            "message": "Alex wants to make it official",
            "data": {"relationship_id": "r-7"},
            "read": false,
            "created_at": "2026-10-15T08:30:00Z"
        }"#;

        let notification: Notification = serde_json::from_str(json).expect("valid row");
        assert_eq!(notification.id().as_str(), "3f0c");
        assert_eq!(notification.kind(), NotificationType::RelationshipRequest);
        assert!(!notification.is_read());
        assert_eq!(
            notification.data().and_then(|d| d.get("relationship_id")),
            Some(&Value::from("r-7"))
        );
    }

    #[test]
    fn missing_data_and_read_default() {
        let json = r#"{"id":"a","user_id":"u","type":"follow","title":"t","message":"m",
            "created_at":"2026-10-15T08:30:00+02:00"}"#;
        let notification: Notification = serde_json::from_str(json).expect("valid row");
        assert!(notification.data().is_none());
        assert!(!notification.is_read());
    }

    #[test]
    fn unknown_type_is_rejected() {
        let json = r#"{"id":"a","user_id":"u","type":"poke","title":"t","message":"m",
            "created_at":"2026-10-15T08:30:00Z"}"#;
        assert!(serde_json::from_str::<Notification>(json).is_err());
    }

    #[test]
    fn recency_breaks_ties_by_id() {
        let a = Notification::new("a", "u", NotificationType::Follow, "", "", at(10));
        let b = Notification::new("b", "u", NotificationType::Follow, "", "", at(10));
        let c = Notification::new("c", "u", NotificationType::Follow, "", "", at(5));

        assert_eq!(a.cmp_recency(&b), Ordering::Less);
        assert_eq!(c.cmp_recency(&a), Ordering::Less);
    }

    #[test]
    fn builder_sets_data_and_read() {
        let n = Notification::new("a", "u", NotificationType::PostLike, "t", "m", at(0))
            .with_data("post_id", "p-1")
            .already_read();
        assert!(n.is_read());
        assert_eq!(n.data().map(|d| d.len()), Some(1));
    }

    #[test]
    fn alert_deserializes_without_read() {
        let alert: CheatingAlert =
            serde_json::from_str(r#"{"id":"al-1","created_at":"2026-10-15T08:30:00Z"}"#)
                .expect("valid alert");
        assert!(!alert.is_read());
    }
}
