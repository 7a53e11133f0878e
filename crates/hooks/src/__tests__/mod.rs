pub mod helpers;
mod pipeline_flow;
