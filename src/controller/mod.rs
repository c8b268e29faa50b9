//! Request handling for wizard steps.
//!
//! [`StandardController`] serves a plain step. [`LoopController`] and
//! [`SummaryPageController`] wrap a base controller and delegate to it
//! explicitly. [`pipeline`] runs the operations in request order against the
//! outermost controller.

pub mod base;
pub mod loop_controller;
pub mod pipeline;
pub mod request;
pub mod summary_page;

pub use base::{StandardController, StepController, StepResponse};
pub use loop_controller::LoopController;
pub use pipeline::{handle_get, handle_post, PageOutcome};
pub use request::{EditMode, FormState, Locals, RouteParams, StepOptions, StepRequest};
pub use summary_page::SummaryPageController;
