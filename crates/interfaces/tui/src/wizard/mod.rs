//! Guided setup wizard: session state, step ordering, and the TUI loop.

mod controller;
mod session;
mod steps;
mod ui;

pub use controller::WizardEvent;
pub use session::{ModelOption, SessionState, SystemInfo, MODEL_CATALOG, SAMPLE_LETTER};
pub use steps::{advance, can_advance, jump_to_install, retreat, WizardStep};
pub use ui::run_wizard;
