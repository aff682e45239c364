#![doc(test(attr(deny(warnings))))]

//! Kwanza Plan offers the ledger, savings allocation, and reporting
//! primitives behind a personal multi-currency finance planner, together
//! with JSON persistence and CSV export surfaces.

pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod export;
pub mod storage;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("kwanza_plan=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
        tracing::info!("Kwanza Plan tracing initialized.");
    });
}
