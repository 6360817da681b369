//! Notification gateway adapters.
//!
//! - `NoopNotificationGateway` - non-production configurations
//! - `SlackNotificationGateway` - posts to Slack channels and direct messages
//! - `RecordingNotificationGateway` - captures notifications for tests

mod noop;
mod recording;
mod slack;

pub use noop::NoopNotificationGateway;
pub use recording::{RecordedNotification, RecordingNotificationGateway};
pub use slack::{SlackConfig, SlackNotificationGateway};
