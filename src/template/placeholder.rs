// ABOUTME: Placeholder discovery and classification
// ABOUTME: Finds anchored spans in text and decides whether each is a variable or a function call

use regex::Regex;

use super::error::{Result, TemplateError};
use super::registry::{Registry, TemplateFunction};

/// Left and right delimiters around a placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchors {
    pub left: String,
    pub right: String,
}

impl Anchors {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Result<Self> {
        let anchors = Self {
            left: left.into(),
            right: right.into(),
        };

        if anchors.left.is_empty() {
            return Err(TemplateError::InvalidAnchor(
                "left anchor must not be empty".to_string(),
            ));
        }
        if anchors.right.is_empty() {
            return Err(TemplateError::InvalidAnchor(
                "right anchor must not be empty".to_string(),
            ));
        }

        Ok(anchors)
    }

    /// Wrap `inner` in the anchors
    pub fn wrap(&self, inner: &str) -> String {
        format!("{}{}{}", self.left, inner, self.right)
    }

    /// Non-greedy pattern capturing the inner content of one placeholder
    pub fn pattern(&self) -> Result<Regex> {
        let pattern = format!(
            "{}(.*?){}",
            regex::escape(&self.left),
            regex::escape(&self.right)
        );
        Ok(Regex::new(&pattern)?)
    }
}

impl Default for Anchors {
    fn default() -> Self {
        Self {
            left: "<<".to_string(),
            right: ">>".to_string(),
        }
    }
}

/// One anchored span found in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'t> {
    /// Text between the anchors exactly as written
    pub raw: &'t str,
    /// `raw` with surrounding spaces removed, used for lookups
    pub key: &'t str,
}

impl<'t> Placeholder<'t> {
    pub fn new(raw: &'t str) -> Self {
        Self {
            raw,
            key: raw.trim_matches(' '),
        }
    }
}

/// Every placeholder in `text`, left to right, shortest match first
pub fn find_placeholders<'t>(pattern: &Regex, text: &'t str) -> Vec<Placeholder<'t>> {
    pattern
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .map(|inner| Placeholder::new(inner.as_str()))
        .collect()
}

/// What a placeholder key refers to
pub enum Resolution<'r, 't> {
    Variable {
        name: &'t str,
        value: &'r str,
    },
    Function {
        name: &'t str,
        function: &'r dyn TemplateFunction,
        arguments: &'t str,
    },
    Unresolved(Unresolved<'t>),
}

/// Why a placeholder was left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unresolved<'t> {
    UnknownVariable(&'t str),
    UnknownFunction(&'t str),
    NotAPlaceholder,
}

/// Classify a trimmed placeholder key against the registry.
///
/// Variable checks always run first: a key naming a variable (with or
/// without a leading `$`) or containing `$` anywhere never falls through to
/// the function branch.
pub fn classify<'r, 't>(key: &'t str, registry: &'r Registry) -> Resolution<'r, 't> {
    let name = key.strip_prefix('$').unwrap_or(key);

    if registry.has_variable(name) || key.contains('$') {
        return match registry.variable(name) {
            Some(value) => Resolution::Variable { name, value },
            None => Resolution::Unresolved(Unresolved::UnknownVariable(name)),
        };
    }

    if let Some((name, rest)) = key.split_once('(') {
        if !key.contains(')') {
            return Resolution::Unresolved(Unresolved::NotAPlaceholder);
        }

        let arguments = rest.split_once(')').map_or(rest, |(inner, _)| inner);
        return match registry.function(name) {
            Some(function) => Resolution::Function {
                name,
                function,
                arguments,
            },
            None => Resolution::Unresolved(Unresolved::UnknownFunction(name)),
        };
    }

    Resolution::Unresolved(Unresolved::NotAPlaceholder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::registry::FunctionResult;
    use crate::template::Literal;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.register_variable("name", "nexus").unwrap();
        registry
            .register_function("greet", |_: &[Literal]| -> FunctionResult {
                Ok(Some("hi".to_string()))
            })
            .unwrap();
        registry
    }

    #[test]
    fn test_find_placeholders_is_non_greedy() {
        let pattern = Anchors::default().pattern().unwrap();
        let found = find_placeholders(&pattern, "<<a>><<b>> and << c  >>");

        let raws: Vec<_> = found.iter().map(|p| p.raw).collect();
        let keys: Vec<_> = found.iter().map(|p| p.key).collect();
        assert_eq!(raws, vec!["a", "b", " c  "]);
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_find_placeholders_does_not_cross_lines() {
        let pattern = Anchors::default().pattern().unwrap();
        assert!(find_placeholders(&pattern, "<<a\nb>>").is_empty());
    }

    #[test]
    fn test_custom_anchors_are_literal() {
        let anchors = Anchors::new("{{", "}}").unwrap();
        let pattern = anchors.pattern().unwrap();
        let found = find_placeholders(&pattern, "x {{ $name }} y");

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].key, "$name");
        assert_eq!(anchors.wrap(found[0].raw), "{{ $name }}");
    }

    #[test]
    fn test_empty_anchor_rejected() {
        assert!(matches!(
            Anchors::new("", ">>"),
            Err(TemplateError::InvalidAnchor(_))
        ));
        assert!(Anchors::new("[", "").is_err());
    }

    #[test]
    fn test_classify_variables() {
        let registry = registry();

        assert!(matches!(
            classify("name", &registry),
            Resolution::Variable { value: "nexus", .. }
        ));
        assert!(matches!(
            classify("$name", &registry),
            Resolution::Variable { value: "nexus", .. }
        ));
    }

    #[test]
    fn test_dollar_takes_precedence_over_call() {
        let registry = registry();

        assert!(matches!(
            classify("greet($x)", &registry),
            Resolution::Unresolved(Unresolved::UnknownVariable("greet($x)"))
        ));
    }

    #[test]
    fn test_classify_function_call() {
        let registry = registry();

        match classify("greet(1, 2) tail", &registry) {
            Resolution::Function {
                name, arguments, ..
            } => {
                assert_eq!(name, "greet");
                assert_eq!(arguments, "1, 2");
            }
            _ => panic!("expected a function call"),
        }
    }

    #[test]
    fn test_function_name_without_parens_is_skipped() {
        let registry = registry();

        assert!(matches!(
            classify("greet", &registry),
            Resolution::Unresolved(Unresolved::NotAPlaceholder)
        ));
        assert!(matches!(
            classify("greet(", &registry),
            Resolution::Unresolved(Unresolved::NotAPlaceholder)
        ));
        assert!(matches!(
            classify("other()", &registry),
            Resolution::Unresolved(Unresolved::UnknownFunction("other"))
        ));
    }
}
