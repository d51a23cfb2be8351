//! Push notification payloads and the dispatchers that deliver them.

pub mod payload;
pub mod dispatcher;

pub use dispatcher::{DispatchError, FcmDispatcher, NotificationDispatcher};
pub use payload::{NotificationData, NotificationType, PushNotification, BROADCAST_TOPIC};
