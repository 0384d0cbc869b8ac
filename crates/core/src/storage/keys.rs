//! Storage keys for every persisted value. Kept byte-for-byte stable:
//! renaming a key silently orphans the data saved under the old one.

pub const TRANSACTIONS: &str = "@expenses_data";
pub const TRANSACTIONS_BACKUP: &str = "@expenses_data_backup";
pub const CURRENCY: &str = "@expenses_currency";
pub const THEME: &str = "@expenses_theme";
pub const REMINDERS_ENABLED: &str = "@expenses_notifications";
pub const REMINDER_HOURS: &str = "@expenses_notification_hours";
pub const CUSTOM_CATEGORIES: &str = "@expenses_custom_categories";
pub const BUDGETS: &str = "@expenses_budgets";
pub const RECURRING: &str = "@expenses_recurring";
pub const LAST_LAUNCH: &str = "@expenses_last_launch";
