pub mod lifecycle;
pub mod router;
pub mod server;
pub mod stats;

pub use lifecycle::{Daemon, DaemonConfig, LifecycleError, build_runner, is_running};
pub use router::{Request, Response, Router, RpcError};
pub use server::{Client, Server, ServerError, ShutdownHandle};
pub use stats::{CountingSource, Stats, StatsSnapshot};
