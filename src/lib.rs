pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod forms;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::LocalStorage;
pub use api::ApiClient;
pub use config::PortalConfig;
pub use crate::core::search::{filter_records, Searchable};
pub use crate::core::slip::{SchoolBranding, SlipGenerator};
pub use utils::error::{PortalError, Result};
