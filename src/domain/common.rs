//! Shared traits and month-key helpers for plan entities.

use chrono::{Datelike, Utc};
use uuid::Uuid;

/// Exposes a stable identifier for entities stored in the plan.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Returns the current month key in `YYYY-MM` form.
pub fn current_month() -> String {
    let now = Utc::now().date_naive();
    format!("{:04}-{:02}", now.year(), now.month())
}

/// Checks that a month key is well-formed (`YYYY-MM`, month 01..=12).
pub fn is_month_key(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 7 || bytes[4] != b'-' {
        return false;
    }
    let (year, month) = (&value[..4], &value[5..]);
    if !year.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    match month.parse::<u32>() {
        Ok(m) => (1..=12).contains(&m) && month.len() == 2,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_key_validation() {
        assert!(is_month_key("2026-08"));
        assert!(is_month_key("1999-12"));
        assert!(!is_month_key("2026-13"));
        assert!(!is_month_key("2026-8"));
        assert!(!is_month_key("202608"));
        assert!(!is_month_key("abcd-01"));
    }

    #[test]
    fn current_month_is_well_formed() {
        assert!(is_month_key(&current_month()));
    }
}
