// ABOUTME: Main library module for the tfx template substitution engine
// ABOUTME: Exports the template engine and CLI modules and provides the public API

pub mod cli;
pub mod template;

// Re-export commonly used types
pub use cli::{App, Args, Config};
pub use template::{
    EngineOptions, FunctionResult, InvocationError, Literal, Registry, TemplateEngine,
    TemplateError, TemplateFunction,
};

// Error handling
pub type Result<T> = anyhow::Result<T>;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
