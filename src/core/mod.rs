pub mod search;
pub mod slip;

pub use crate::domain::ports::{ConfigProvider, SlipSource, Storage};
pub use crate::utils::error::Result;
