//! Tool catalogue and execution
//!
//! ```text
//! ToolRegistry  - the fixed Google Ads catalogue sent to the model
//! ToolExecutor  - runs calls through a ToolTransport, errors become text
//! ```

mod registry;
mod executor;

pub use registry::{definitions, ToolRegistry};
pub use executor::{ToolExecError, ToolExecResult, ToolExecutor};
