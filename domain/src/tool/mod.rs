//! Tool domain: specs, parameters, results, handlers, and the registry

pub mod handler;
pub mod params;
pub mod registry;
pub mod result;
pub mod spec;
pub mod xml;

pub use handler::ToolHandler;
pub use params::ToolParams;
pub use registry::{HandlerCtor, ToolRegistry};
pub use result::ToolResult;
pub use spec::{ModelFamily, ToolParameter, ToolSpec};
pub use xml::{ToolUse, parse_tool_use};
