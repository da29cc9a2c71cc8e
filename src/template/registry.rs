// ABOUTME: Write-once registry of template variables and functions
// ABOUTME: Stores named text values and callable functions looked up during substitution

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::error::{InvocationError, Result, TemplateError};
use super::literal::Literal;

/// Outcome of a template function call; `None` renders as an empty string
pub type FunctionResult = std::result::Result<Option<String>, InvocationError>;

/// A function callable from a placeholder such as `<<name(1, 'a')>>`.
///
/// Arguments arrive already coerced and in call order. Implementations are
/// responsible for checking arity and argument types.
pub trait TemplateFunction: Send + Sync {
    fn call(&self, args: &[Literal]) -> FunctionResult;
}

impl<F> TemplateFunction for F
where
    F: Fn(&[Literal]) -> FunctionResult + Send + Sync,
{
    fn call(&self, args: &[Literal]) -> FunctionResult {
        self(args)
    }
}

/// Variables and functions live in separate namespaces, so the same name may
/// be registered once in each. Entries can never be replaced or removed.
#[derive(Clone, Default)]
pub struct Registry {
    variables: HashMap<String, String>,
    functions: HashMap<String, Arc<dyn TemplateFunction>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a text variable
    pub fn register_variable(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        let name = name.into();
        if self.variables.contains_key(&name) {
            return Err(TemplateError::DuplicateVariable(name));
        }

        self.variables.insert(name, value.into());
        Ok(())
    }

    /// Register a function
    pub fn register_function<F>(&mut self, name: impl Into<String>, function: F) -> Result<()>
    where
        F: TemplateFunction + 'static,
    {
        let name = name.into();
        if self.functions.contains_key(&name) {
            return Err(TemplateError::DuplicateFunction(name));
        }

        self.functions.insert(name, Arc::new(function));
        Ok(())
    }

    /// Register every entry as a variable, in iteration order.
    ///
    /// Stops at the first duplicate; entries registered before it are kept.
    pub fn register_map<I, K, V>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in entries {
            self.register_variable(name, value)?;
        }
        Ok(())
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn function(&self, name: &str) -> Option<&dyn TemplateFunction> {
        self.functions.get(name).map(|function| function.as_ref())
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered variables sorted by name
    pub fn variables(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self
            .variables
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        entries.sort_unstable();
        entries
    }

    /// Registered function names, sorted
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("variables", &self.variables)
            .field("functions", &self.function_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greet(_args: &[Literal]) -> FunctionResult {
        Ok(Some("hi".to_string()))
    }

    #[test]
    fn test_register_variable() {
        let mut registry = Registry::new();
        registry.register_variable("name", "nexus").unwrap();

        assert_eq!(registry.variable("name"), Some("nexus"));
        assert_eq!(registry.variable("Name"), None);
        assert_eq!(registry.variable_count(), 1);
    }

    #[test]
    fn test_duplicate_variable_rejected() {
        let mut registry = Registry::new();
        registry.register_variable("name", "first").unwrap();

        let result = registry.register_variable("name", "second");
        assert!(matches!(result, Err(TemplateError::DuplicateVariable(ref n)) if n == "name"));
        assert_eq!(registry.variable("name"), Some("first"));
    }

    #[test]
    fn test_duplicate_function_rejected() {
        let mut registry = Registry::new();
        registry.register_function("greet", greet).unwrap();

        let result = registry.register_function("greet", greet);
        assert!(matches!(result, Err(TemplateError::DuplicateFunction(_))));
    }

    #[test]
    fn test_same_name_in_both_namespaces() {
        let mut registry = Registry::new();
        registry.register_variable("greet", "hello").unwrap();
        registry.register_function("greet", greet).unwrap();

        assert!(registry.has_variable("greet"));
        assert!(registry.has_function("greet"));
        let output = registry.function("greet").unwrap().call(&[]).unwrap();
        assert_eq!(output, Some("hi".to_string()));
    }

    #[test]
    fn test_register_map_keeps_entries_before_failure() {
        let mut registry = Registry::new();
        registry.register_variable("b", "existing").unwrap();

        let entries = vec![("a", "1"), ("b", "2"), ("c", "3")];
        let result = registry.register_map(entries);

        assert!(matches!(result, Err(TemplateError::DuplicateVariable(ref n)) if n == "b"));
        assert_eq!(registry.variable("a"), Some("1"));
        assert_eq!(registry.variable("b"), Some("existing"));
        assert_eq!(registry.variable("c"), None);
    }

    #[test]
    fn test_closure_functions() {
        let mut registry = Registry::new();
        let suffix = String::from("!");
        registry
            .register_function("shout", move |args: &[Literal]| -> FunctionResult {
                Ok(args.first().map(|a| format!("{}{}", a, suffix)))
            })
            .unwrap();

        let function = registry.function("shout").unwrap();
        let output = function.call(&[Literal::String("hey".to_string())]).unwrap();
        assert_eq!(output, Some("hey!".to_string()));
        assert_eq!(registry.function_names(), vec!["shout"]);
    }
}
