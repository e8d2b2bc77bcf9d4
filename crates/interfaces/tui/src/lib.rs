//! Terminal interface for the guided setup wizard.

pub mod theme;
pub mod wizard;
