#![doc(test(attr(deny(warnings))))]

//! FlowState offers cash-flow projection, health scoring, and scenario
//! simulation primitives over a single-account transaction ledger.

pub mod core;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("FlowState tracing initialized.");
    });
}
