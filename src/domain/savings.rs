//! Savings pour records.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::Currency;
use crate::domain::common::Identifiable;

/// One savings deposit, split between the emergency reserve and a surplus
/// destination.
///
/// Invariant: `amount_poured == allocated_to_emergency + surplus`, where the
/// surplus is routed to `surplus_account_id` when recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsLog {
    pub id: Uuid,
    /// Month the pour is attributed to, `YYYY-MM`.
    pub month: String,
    pub amount_poured: f64,
    pub currency: Currency,
    /// Portion applied to the emergency fund counter. Zero for EUR pours
    /// unless the EUR policy flag is enabled.
    pub allocated_to_emergency: f64,
    /// Primary reserve destination.
    pub target_account_id: Uuid,
    /// Destination for the portion above the remaining emergency gap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surplus_account_id: Option<Uuid>,
    /// What this pour added to the Kz emergency counter, recorded so the
    /// reversal stays exact even if the EUR policy or rate changes later.
    #[serde(default)]
    pub counter_delta_kz: f64,
}

impl SavingsLog {
    pub fn surplus(&self) -> f64 {
        self.amount_poured - self.allocated_to_emergency
    }
}

impl Identifiable for SavingsLog {
    fn id(&self) -> Uuid {
        self.id
    }
}
