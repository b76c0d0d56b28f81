//! Configuration for the analysis pipeline.
//!
//! Settings are organized into TOML-table sections. The validation
//! section mirrors the contract with the external validator: the
//! pipeline assumes validation happened, but still performs the cheap
//! checks itself before any decode attempt.

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{DetectionSettings, LoggingSettings, Settings, ValidationSettings};
