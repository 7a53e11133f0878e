pub mod assemble;
pub mod error;
pub mod fetcher;
pub mod interpret;
pub mod pipeline;
pub mod registry;
pub mod series;

#[cfg(test)]
mod __tests__;

pub use assemble::assemble;
pub use error::HookError;
pub use fetcher::{DEFAULT_FETCH_TIMEOUT, HookFetcher, HookSource, RawHookResponse};
pub use interpret::{Interpretation, KEYED_SERIES_SCALE, ResponseShape, interpret};
pub use pipeline::TaskRunner;
pub use registry::{HookRegistry, ResolvedHook};
pub use series::reduce;
