#![doc(test(attr(deny(warnings))))]

//! Wizard Loop adds repeating groups of steps ("add another person") to a
//! multi-step form wizard, and splices the items those loops collect into the
//! confirmation page summary.

pub mod config;
pub mod controller;
pub mod errors;
pub mod session;
pub mod summary;
pub mod translate;
pub mod utils;

pub use config::{FieldConfig, FieldsConfig, LoopConfig, LoopData, SubStep, WizardConfig};
pub use controller::{
    EditMode, LoopController, StandardController, StepController, StepRequest, StepResponse,
    SummaryPageController,
};
pub use errors::{Result, WizardError};
pub use session::{MemorySession, SessionStore, StoredItem};
pub use translate::{Catalog, Translator};

use std::sync::Once;

/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "wizard_loop=info";

static LOGGING: Once = Once::new();

/// Sets up logging for the CLI and tests. Safe to call repeatedly; embedding
/// applications that install their own subscriber keep it.
pub fn init() {
    LOGGING.call_once(|| {
        let installed = utils::init_tracing(DEFAULT_LOG_FILTER);
        tracing::info!(
            version = env!("CARGO_PKG_VERSION"),
            own_subscriber = installed,
            "wizard_loop logging ready"
        );
    });
}
