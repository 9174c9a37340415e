//! Free-form user profile stored independently of the ledger.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub currency: String,
    pub month_start: String,
    pub email_notifications: bool,
    pub weekly_reports: bool,
    pub budget_alerts: bool,
    pub balance_alerts: bool,
}

impl UserProfile {
    /// Upper-cased first letter of each whitespace separated name part.
    pub fn initials(&self) -> String {
        self.full_name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Updates a single field by its persisted (camelCase) or snake_case name.
    pub fn set_field(&mut self, field: &str, value: &str) -> bool {
        let flag = matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "on" | "1"
        );
        match field {
            "fullName" | "full_name" | "name" => self.full_name = value.to_string(),
            "email" => self.email = value.to_string(),
            "phone" => self.phone = value.to_string(),
            "location" => self.location = value.to_string(),
            "currency" => self.currency = value.to_string(),
            "monthStart" | "month_start" => self.month_start = value.to_string(),
            "emailNotifications" | "email_notifications" => self.email_notifications = flag,
            "weeklyReports" | "weekly_reports" => self.weekly_reports = flag,
            "budgetAlerts" | "budget_alerts" => self.budget_alerts = flag,
            "balanceAlerts" | "balance_alerts" => self.balance_alerts = flag,
            _ => return false,
        }
        true
    }
}
