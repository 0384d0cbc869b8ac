use async_trait::async_trait;

use crate::errors::CoreError;

/// Daily entry-reminder collaborator, provided by the platform shell.
/// The core only cares about this contract, never about how (or whether)
/// notifications are actually delivered.
#[async_trait]
pub trait ReminderScheduler: Send + Sync {
    /// Ask the platform for notification permission. `false` means the
    /// user (or the platform) declined.
    async fn request_permission(&self) -> Result<bool, CoreError>;

    /// Replace all scheduled reminders with one daily firing per hour.
    async fn schedule_daily(&self, hours: &[u8]) -> Result<(), CoreError>;

    /// Cancel every scheduled reminder.
    async fn cancel_all(&self) -> Result<(), CoreError>;
}

/// Scheduler for platforms without notification support. Permission is
/// always denied, so enabling reminders settles back to "off".
#[derive(Debug, Default)]
pub struct NullReminderScheduler;

impl NullReminderScheduler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ReminderScheduler for NullReminderScheduler {
    async fn request_permission(&self) -> Result<bool, CoreError> {
        Ok(false)
    }

    async fn schedule_daily(&self, _hours: &[u8]) -> Result<(), CoreError> {
        Ok(())
    }

    async fn cancel_all(&self) -> Result<(), CoreError> {
        Ok(())
    }
}
