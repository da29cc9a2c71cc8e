// ABOUTME: Template substitution module for tfx
// ABOUTME: Provides the placeholder engine, its registry, literal coercion and file helpers

pub mod engine;
pub mod error;
pub mod helpers;
pub mod literal;
pub mod placeholder;
pub mod reader;
pub mod registry;

pub use engine::{EngineOptions, TemplateEngine, DEFAULT_BUFFER_SIZE};
pub use error::{InvocationError, Result, TemplateError};
pub use literal::Literal;
pub use placeholder::{Anchors, Placeholder};
pub use reader::Encoding;
pub use registry::{FunctionResult, Registry, TemplateFunction};
