// ABOUTME: Main substitution engine
// ABOUTME: Resolves anchored placeholders against the registry and replaces them in the text

use regex::Regex;
use tracing::debug;

use super::error::{InvocationError, Result};
use super::helpers;
use super::literal::parse_arguments;
use super::placeholder::{classify, find_placeholders, Anchors, Placeholder, Resolution};
use super::reader::Encoding;
use super::registry::{Registry, TemplateFunction};

/// Default read buffer for the file helpers, 16 MiB
pub const DEFAULT_BUFFER_SIZE: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub anchors: Anchors,
    pub encoding: Encoding,
    pub buffer_size: usize,
    /// Emit per-placeholder diagnostics through `tracing`
    pub debug: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            anchors: Anchors::default(),
            encoding: Encoding::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            debug: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TemplateEngine {
    registry: Registry,
    options: EngineOptions,
    pattern: Regex,
}

impl TemplateEngine {
    /// Create an engine with `<<` / `>>` anchors and an empty registry
    pub fn new() -> Result<Self> {
        Self::with_options(EngineOptions::default())
    }

    pub fn with_options(options: EngineOptions) -> Result<Self> {
        let anchors = Anchors::new(options.anchors.left.clone(), options.anchors.right.clone())?;
        let pattern = anchors.pattern()?;

        Ok(Self {
            registry: Registry::new(),
            options,
            pattern,
        })
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Register a text variable
    pub fn register_variable(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        self.registry.register_variable(name, value)
    }

    /// Register a function callable as `<<name(args)>>`
    pub fn register_function<F>(&mut self, name: impl Into<String>, function: F) -> Result<()>
    where
        F: TemplateFunction + 'static,
    {
        self.registry.register_function(name, function)
    }

    /// Register many variables at once; see [`Registry::register_map`]
    pub fn register_map<I, K, V>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.registry.register_map(entries)
    }

    /// Register the built-in functions from [`helpers`](super::helpers)
    pub fn register_builtins(&mut self) -> Result<()> {
        helpers::register_builtins(&mut self.registry)
    }

    /// Wrap text in the configured anchors
    pub fn anchor(&self, inner: &str) -> String {
        self.options.anchors.wrap(inner)
    }

    /// Check if a string contains at least one placeholder
    pub fn has_placeholders(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Placeholders in `text` in discovery order
    pub fn placeholders<'t>(&self, text: &'t str) -> Vec<Placeholder<'t>> {
        find_placeholders(&self.pattern, text)
    }

    /// Trimmed keys of placeholders that `substitute` would leave untouched
    pub fn unresolved<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.placeholders(text)
            .into_iter()
            .filter(|placeholder| {
                matches!(
                    classify(placeholder.key, &self.registry),
                    Resolution::Unresolved(_)
                )
            })
            .map(|placeholder| placeholder.key)
            .collect()
    }

    /// Replace every resolvable placeholder in `text`.
    ///
    /// Unknown variables and functions are left as literal text. Each
    /// resolved placeholder replaces all identical anchored spans in the
    /// output at once. Errors from registered functions are returned as-is.
    pub fn substitute(&self, text: &str) -> std::result::Result<String, InvocationError> {
        let mut output = text.to_string();

        for placeholder in find_placeholders(&self.pattern, text) {
            let replacement = match classify(placeholder.key, &self.registry) {
                Resolution::Variable { name, value } => {
                    self.trace(format_args!("Found variable '{}'", name));
                    value.to_string()
                }
                Resolution::Function {
                    name,
                    function,
                    arguments,
                } => {
                    self.trace(format_args!("Found function '{}'", name));
                    let args = parse_arguments(arguments);
                    function
                        .call(&args)
                        .inspect_err(|e| {
                            self.trace(format_args!("Function '{}' failed: {}", name, e))
                        })?
                        .unwrap_or_default()
                }
                Resolution::Unresolved(reason) => {
                    self.trace(format_args!(
                        "Skipping '{}': {:?}",
                        placeholder.key, reason
                    ));
                    continue;
                }
            };

            output = output.replace(&self.anchor(placeholder.raw), &replacement);
        }

        Ok(output)
    }

    fn trace(&self, message: std::fmt::Arguments<'_>) {
        if self.options.debug {
            debug!("{}", message);
        }
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new().expect("Failed to create default template engine")
    }
}
