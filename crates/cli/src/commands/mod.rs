//! CLI command implementations

mod config;
mod serve;
mod status;
mod task;

pub use config::{cmd_config_init, cmd_config_show, cmd_hooks};
pub use serve::cmd_serve;
pub use status::cmd_status;
pub use task::{cmd_analyze, cmd_task};
