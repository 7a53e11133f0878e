pub mod analysis;
pub mod config;
pub mod error;
pub mod hook;
pub mod task;

pub use analysis::{Analysis, WordScore};
pub use config::{CONFIG_ENV, Config, ConfigFormat, DEFAULT_PORT, is_url_source};
pub use error::{Error, Result};
pub use hook::{HookDescriptor, SLOT_TOKENS};
pub use task::{AnalyseRequest, Segment, TaskRequest, TaskResult};
