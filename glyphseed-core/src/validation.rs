//! Markup Validation - Rule/Policy Separation
//!
//! Rules produce structured violations against a parsed document summary.
//! Policy: any error-severity violation makes the document invalid;
//! warnings are recorded but never block.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::svg::is_xml_char;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkupViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<MarkupViolation>,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }

    /// `rule: message` lines for error violations.
    pub fn error_messages(&self) -> Vec<String> {
        self.violations
            .iter()
            .filter(|v| v.severity == ViolationSeverity::Error)
            .map(|v| format!("{}: {}", v.rule, v.message))
            .collect()
    }
}

/// One pass over the document, collecting what the rules check.
#[derive(Debug, Default)]
pub struct MarkupDocument {
    pub parse_error: Option<String>,
    pub root_elements: Vec<String>,
    pub root_attrs: BTreeMap<String, String>,
    pub unclosed: Vec<String>,
    /// id -> number of definitions
    pub ids: BTreeMap<String, usize>,
    /// `url(#...)` targets in document order
    pub references: Vec<String>,
    /// Byte offsets and code points of characters XML 1.0 forbids
    pub forbidden_chars: Vec<(usize, char)>,
}

impl MarkupDocument {
    pub fn parse(markup: &str) -> Self {
        let mut doc = MarkupDocument::default();
        let mut reader = Reader::from_str(markup);
        let mut stack: Vec<String> = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    doc.visit(&e, stack.is_empty());
                    stack.push(element_name(&e));
                }
                Ok(Event::Empty(e)) => doc.visit(&e, stack.is_empty()),
                Ok(Event::End(_)) => {
                    stack.pop();
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    doc.parse_error = Some(format!(
                        "{} at byte {}",
                        e,
                        reader.buffer_position()
                    ));
                    break;
                }
            }
        }

        doc.unclosed = stack;
        doc.forbidden_chars = markup
            .char_indices()
            .filter(|(_, c)| !is_xml_char(*c))
            .collect();
        doc
    }

    fn visit(&mut self, e: &BytesStart<'_>, is_root: bool) {
        if is_root {
            self.root_elements.push(element_name(e));
        }
        for attr in e.attributes().flatten() {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = String::from_utf8_lossy(&attr.value).into_owned();
            if key == "id" {
                *self.ids.entry(value.clone()).or_insert(0) += 1;
            }
            self.references.extend(url_targets(&value));
            if is_root {
                self.root_attrs.insert(key, value);
            }
        }
    }
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn url_targets(value: &str) -> Vec<String> {
    value
        .split("url(#")
        .skip(1)
        .filter_map(|rest| rest.split_once(')').map(|(id, _)| id.to_string()))
        .collect()
}

/// Validation rule trait - produces violations
pub trait MarkupRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn validate(&self, doc: &MarkupDocument, size: u32) -> Vec<MarkupViolation>;
}

fn violation(
    rule: &dyn MarkupRule,
    severity: ViolationSeverity,
    message: impl Into<String>,
    expected: Option<String>,
    actual: Option<String>,
) -> MarkupViolation {
    MarkupViolation {
        rule: rule.name().to_string(),
        severity,
        message: message.into(),
        expected,
        actual,
    }
}

// --- Concrete Rules ---

pub struct WellFormedRule;

impl MarkupRule for WellFormedRule {
    fn name(&self) -> &'static str { "well_formed" }

    fn validate(&self, doc: &MarkupDocument, _size: u32) -> Vec<MarkupViolation> {
        let mut violations = vec![];

        if let Some(err) = &doc.parse_error {
            violations.push(violation(self, ViolationSeverity::Error, "Markup does not parse", None, Some(err.clone())));
        }
        if !doc.unclosed.is_empty() {
            violations.push(violation(
                self,
                ViolationSeverity::Error,
                "Unclosed elements",
                None,
                Some(doc.unclosed.join(", ")),
            ));
        }
        if let Some((offset, c)) = doc.forbidden_chars.first() {
            violations.push(violation(
                self,
                ViolationSeverity::Error,
                format!("{} character(s) outside the XML character range", doc.forbidden_chars.len()),
                None,
                Some(format!("U+{:04X} at byte {}", u32::from(*c), offset)),
            ));
        }
        if doc.root_elements != ["svg"] {
            violations.push(violation(
                self,
                ViolationSeverity::Error,
                "Document must have a single <svg> root",
                Some("svg".to_string()),
                Some(doc.root_elements.join(", ")),
            ));
        }

        violations
    }
}

pub struct GradientRefRule;

impl MarkupRule for GradientRefRule {
    fn name(&self) -> &'static str { "gradient_refs" }

    fn validate(&self, doc: &MarkupDocument, _size: u32) -> Vec<MarkupViolation> {
        let mut violations = vec![];

        for (id, count) in doc.ids.iter().filter(|(_, c)| **c > 1) {
            violations.push(violation(
                self,
                ViolationSeverity::Error,
                format!("Id '{}' defined more than once", id),
                Some("1 definition".to_string()),
                Some(format!("{} definitions", count)),
            ));
        }
        for target in &doc.references {
            if !doc.ids.contains_key(target) {
                violations.push(violation(
                    self,
                    ViolationSeverity::Error,
                    format!("Reference to undefined id '{}'", target),
                    None,
                    None,
                ));
            }
        }
        for id in doc.ids.keys().filter(|id| !doc.references.contains(*id)) {
            violations.push(violation(
                self,
                ViolationSeverity::Warning,
                format!("Id '{}' is never referenced", id),
                None,
                None,
            ));
        }

        violations
    }
}

pub struct CanvasRule;

impl MarkupRule for CanvasRule {
    fn name(&self) -> &'static str { "canvas" }

    fn validate(&self, doc: &MarkupDocument, size: u32) -> Vec<MarkupViolation> {
        let expected = [
            ("width", size.to_string()),
            ("height", size.to_string()),
            ("viewBox", format!("0 0 {} {}", size, size)),
        ];

        expected
            .into_iter()
            .filter_map(|(attr, want)| {
                let got = doc.root_attrs.get(attr);
                (got != Some(&want)).then(|| {
                    violation(
                        self,
                        ViolationSeverity::Error,
                        format!("Root {} does not match requested size", attr),
                        Some(want),
                        got.cloned(),
                    )
                })
            })
            .collect()
    }
}

/// Validator orchestrates rules and applies policy
pub struct MarkupValidator {
    rules: Vec<Box<dyn MarkupRule>>,
}

impl MarkupValidator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(WellFormedRule),
                Box::new(GradientRefRule),
                Box::new(CanvasRule),
            ],
        }
    }

    pub fn validate(&self, markup: &str, size: u32) -> ValidationResult {
        let doc = MarkupDocument::parse(markup);
        let violations: Vec<_> = self
            .rules
            .iter()
            .flat_map(|rule| rule.validate(&doc, size))
            .collect();
        let valid = !violations.iter().any(|v| v.severity == ViolationSeverity::Error);
        ValidationResult { valid, violations }
    }
}

impl Default for MarkupValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10" viewBox="0 0 10 10"><defs><linearGradient id="g"><stop offset="0%" stop-color="red"/></linearGradient></defs><rect fill="url(#g)"/></svg>"#;

    #[test]
    fn test_good_document_passes() {
        let result = MarkupValidator::new().validate(GOOD, 10);
        assert!(result.valid, "{:?}", result.violations);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn test_mismatched_tags_fail() {
        let bad = r#"<svg width="10" height="10" viewBox="0 0 10 10"><g></svg>"#;
        let result = MarkupValidator::new().validate(bad, 10);
        assert!(!result.valid);
        assert!(result.violations.iter().any(|v| v.rule == "well_formed"));
    }

    #[test]
    fn test_control_characters_fail() {
        let bad = "<svg width=\"10\" height=\"10\" viewBox=\"0 0 10 10\"><text>a\u{0}b</text></svg>";
        let result = MarkupValidator::new().validate(bad, 10);
        assert!(!result.valid);
        let v = result
            .violations
            .iter()
            .find(|v| v.rule == "well_formed" && v.message.contains("XML character range"))
            .expect("forbidden character violation");
        assert_eq!(v.actual.as_deref(), Some("U+0000 at byte 55"));
    }

    #[test]
    fn test_unclosed_root_fails() {
        let bad = r#"<svg width="10" height="10" viewBox="0 0 10 10"><rect/>"#;
        let result = MarkupValidator::new().validate(bad, 10);
        assert!(!result.valid);
    }

    #[test]
    fn test_duplicate_and_dangling_ids() {
        let bad = r#"<svg width="10" height="10" viewBox="0 0 10 10"><defs><radialGradient id="a"/><radialGradient id="a"/></defs><rect fill="url(#a)"/><rect fill="url(#missing)"/></svg>"#;
        let result = MarkupValidator::new().validate(bad, 10);
        let errors = result.error_messages();
        assert_eq!(errors.len(), 2, "{:?}", errors);
        assert!(errors.iter().any(|m| m.contains("'a' defined more than once")));
        assert!(errors.iter().any(|m| m.contains("undefined id 'missing'")));
    }

    #[test]
    fn test_unused_id_only_warns() {
        let doc = r#"<svg width="10" height="10" viewBox="0 0 10 10"><defs><radialGradient id="spare"/></defs></svg>"#;
        let result = MarkupValidator::new().validate(doc, 10);
        assert!(result.valid);
        assert_eq!(result.violations[0].severity, ViolationSeverity::Warning);
    }

    #[test]
    fn test_canvas_size_mismatch() {
        let result = MarkupValidator::new().validate(GOOD, 64);
        assert!(!result.valid);
        assert_eq!(result.violations.iter().filter(|v| v.rule == "canvas").count(), 3);
    }

    #[test]
    fn test_url_targets() {
        assert_eq!(url_targets("url(#a) url(#b)"), vec!["a", "b"]);
        assert!(url_targets("none").is_empty());
    }
}
