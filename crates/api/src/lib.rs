//! HTTP client for the local Ollama runtime.
//!
//! Everything the wizard knows about Ollama goes through this crate: the
//! reachability probe, model listing, model pulls, and the anonymization
//! generate call.  Failures never escape as transport errors; they collapse
//! to a boolean, an empty listing, or a classified [`ApiError`].

mod client;
mod error;
mod system;

pub use client::{ModelEntry, OllamaApi, RuntimeClient, DEFAULT_BASE_URL};
pub use error::{ApiError, ANONYMIZE_FALLBACK};
pub use system::{detect_system, Arch, Os};
