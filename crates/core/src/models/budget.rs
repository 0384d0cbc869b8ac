use serde::{Deserialize, Serialize};

/// A monthly spending cap for one category, denominated in the active
/// display currency. At most one budget exists per category; setting a
/// second one replaces the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub category: String,

    /// Spending cap, always positive
    pub limit: f64,
}

/// Budget paired with what was actually spent in the current month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    pub category: String,
    pub limit: f64,

    /// Sum of this month's expenses in the category
    pub spent: f64,
}

impl BudgetProgress {
    /// True once spending exceeds the cap.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.spent > self.limit
    }
}
