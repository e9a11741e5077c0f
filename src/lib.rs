#![doc(test(attr(deny(warnings))))]

//! FinVibe Core offers the ledger, period-aggregation, and interchange
//! primitives behind a personal expense/income tracker.

pub mod categories;
pub mod errors;
pub mod interchange;
pub mod ledger;
pub mod period;
pub mod stats;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("FinVibe Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
