use serde::{Deserialize, Serialize};

use super::transaction::TransactionKind;

/// A user-defined category with its chart color, scoped to either
/// expenses or income.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCategory {
    pub name: String,

    /// Hex color string, e.g. "#667eea"
    pub color: String,

    pub kind: TransactionKind,
}

/// Built-in expense categories, always offered before custom ones.
pub const DEFAULT_EXPENSE_CATEGORIES: [&str; 6] = [
    "Alimentation",
    "Transport",
    "Loisirs",
    "Santé",
    "Logement",
    "Autre",
];

/// Built-in income categories.
pub const DEFAULT_INCOME_CATEGORIES: [&str; 5] =
    ["Salaire", "Business", "Cadeau", "Investissement", "Autre"];

/// Chart color for a built-in category; gray for anything unknown.
#[must_use]
pub fn default_color(category: &str) -> &'static str {
    match category {
        "Alimentation" => "#ff6b6b",
        "Transport" => "#4ecdc4",
        "Loisirs" => "#45b7d1",
        "Santé" => "#96ceb4",
        "Logement" => "#feca57",
        "Salaire" => "#16a34a",
        "Business" => "#22c55e",
        "Cadeau" => "#84cc16",
        "Investissement" => "#10b981",
        _ => "#b8b8b8",
    }
}
