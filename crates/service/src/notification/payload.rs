use serde::Serialize;

/// Topic every subscribed user listens on.
pub const BROADCAST_TOPIC: &str = "/topics/users";

/// Longest message body pushed to devices, in characters.
pub const MESSAGE_MAX_CHARS: usize = 100;

/// Classification the client app uses to render a push.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationType {
    Promotion,
    Alert,
}

impl NotificationType {
    pub const fn as_str(self) -> &'static str {
        match self {
            NotificationType::Promotion => "PROMOTION",
            NotificationType::Alert => "ALERT",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NotificationData {
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
}

/// Data-only envelope in the shape the FCM legacy HTTP API expects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PushNotification {
    pub to: String,
    pub data: NotificationData,
}

impl PushNotification {
    /// Data-only push addressed to every subscribed user.
    pub fn broadcast(data: NotificationData) -> Self {
        Self { to: BROADCAST_TOPIC.to_string(), data }
    }
}

/// First `MESSAGE_MAX_CHARS` characters of `description`; absent means empty.
pub fn brief(description: Option<&str>) -> String {
    description.unwrap_or_default().chars().take(MESSAGE_MAX_CHARS).collect()
}
