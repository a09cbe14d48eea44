use serde::Deserialize;
use serde::Serialize;

use crate::errors::FormError;

/// The kind of control a field renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Password,
    Email,
}

/// Declarative configuration for one field.
///
/// Replaces attribute scraping from the rendering surface: everything a field
/// needs to know about itself is stated here once, at construction, and is
/// immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    name: String,
    kind: FieldKind,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    disabled: bool,
}

impl FieldSpec {
    /// Create a new field specification.
    ///
    /// # Arguments
    /// * `name` - Logical field name, used to address the field in a set
    /// * `kind` - Control kind
    ///
    /// # Returns
    /// FieldSpec with no label, not required, not disabled
    ///
    /// # Errors
    /// * `MissingName` - Name is empty (a configuration defect)
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Result<Self, FormError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(FormError::MissingName);
        }
        Ok(Self {
            name,
            kind,
            label: None,
            required: false,
            disabled: false,
        })
    }

    /// Set the human-readable label used in error messages.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Mark the field as required.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Mark the field as disabled.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Get the field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the control kind.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Get the label, falling back to the field name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Whether the field must be non-empty to pass the required check.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the field is excluded from collection and validation.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_rejects_empty_name() {
        assert_eq!(
            FieldSpec::new("", FieldKind::Text).unwrap_err(),
            FormError::MissingName
        );
        assert_eq!(
            FieldSpec::new("   ", FieldKind::Text).unwrap_err(),
            FormError::MissingName
        );
    }

    #[test]
    fn test_display_label_falls_back_to_name() {
        let spec = FieldSpec::new("email", FieldKind::Email).unwrap();
        assert_eq!(spec.display_label(), "email");

        let spec = spec.label("Email address");
        assert_eq!(spec.display_label(), "Email address");
    }

    #[test]
    fn test_spec_roundtrips_through_serde() {
        let spec = FieldSpec::new("password", FieldKind::Password)
            .unwrap()
            .label("Password")
            .required(true);

        let json = serde_json::to_string(&spec).unwrap();
        let back: FieldSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn test_spec_deserializes_with_defaults() {
        let spec: FieldSpec =
            serde_json::from_str(r#"{"name": "name", "kind": "text"}"#).unwrap();
        assert!(!spec.is_required());
        assert!(!spec.is_disabled());
        assert_eq!(spec.kind(), FieldKind::Text);
    }
}
