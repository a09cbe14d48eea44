use std::fmt;
use std::sync::Arc;

use crate::control::FieldControl;
use crate::spec::FieldKind;
use crate::spec::FieldSpec;

/// A configured field bound to its control.
///
/// Pairs an immutable [`FieldSpec`] with the live view binding. Values are
/// read through the control at call time; error messages are written to the
/// control's paired error slot.
#[derive(Clone)]
pub struct Field {
    spec: FieldSpec,
    control: Arc<dyn FieldControl>,
}

impl Field {
    /// Bind a specification to a control.
    ///
    /// # Arguments
    /// * `spec` - Validated field specification
    /// * `control` - View binding holding the live value and error slot
    ///
    /// # Returns
    /// Bound field
    pub fn new(spec: FieldSpec, control: Arc<dyn FieldControl>) -> Self {
        Self { spec, control }
    }

    /// Get the field name.
    pub fn name(&self) -> &str {
        self.spec.name()
    }

    /// Get the control kind.
    pub fn kind(&self) -> FieldKind {
        self.spec.kind()
    }

    /// Get the immutable specification.
    pub fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    /// Read the current value, trimmed of surrounding whitespace.
    ///
    /// Disabled fields always read as empty.
    pub fn value(&self) -> String {
        if self.spec.is_disabled() {
            return String::new();
        }
        self.control.value().trim().to_string()
    }

    /// Write a message to the paired error slot.
    pub fn report_error(&self, message: &str) {
        self.control.set_error(message);
    }

    /// Clear the paired error slot.
    pub fn clear_error(&self) {
        self.control.set_error("");
    }

    /// Read the current error-slot text.
    pub fn error(&self) -> String {
        self.control.error()
    }

    /// Run the required check: a required, empty field gets
    /// "`<label>` is required" written to its error slot.
    ///
    /// # Returns
    /// True if the check passed (field not required, or non-empty)
    pub fn check_required(&self) -> bool {
        if self.spec.is_required() && self.value().is_empty() {
            self.report_error(&format!("{} is required", self.spec.display_label()));
            false
        } else {
            true
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field").field("spec", &self.spec).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::MemoryControl;

    fn text_field(name: &str, required: bool, value: &str) -> Field {
        let spec = FieldSpec::new(name, FieldKind::Text)
            .unwrap()
            .required(required);
        Field::new(spec, Arc::new(MemoryControl::with_value(value)))
    }

    #[test]
    fn test_value_is_trimmed_at_read_time() {
        let field = text_field("name", false, "  alice \n");
        assert_eq!(field.value(), "alice");
    }

    #[test]
    fn test_value_reads_live_control_state() {
        let control = Arc::new(MemoryControl::with_value("first"));
        let spec = FieldSpec::new("name", FieldKind::Text).unwrap();
        let field = Field::new(spec, control.clone());

        assert_eq!(field.value(), "first");
        control.set_value("second");
        assert_eq!(field.value(), "second");
    }

    #[test]
    fn test_disabled_field_reads_empty() {
        let spec = FieldSpec::new("name", FieldKind::Text).unwrap().disabled(true);
        let field = Field::new(spec, Arc::new(MemoryControl::with_value("ignored")));
        assert_eq!(field.value(), "");
    }

    #[test]
    fn test_check_required_reports_and_clears() {
        let field = text_field("name", true, "   ");
        assert!(!field.check_required());
        assert_eq!(field.error(), "name is required");

        field.clear_error();
        assert_eq!(field.error(), "");
    }

    #[test]
    fn test_check_required_uses_label_when_present() {
        let spec = FieldSpec::new("confirm_password", FieldKind::Password)
            .unwrap()
            .label("Confirm password")
            .required(true);
        let field = Field::new(spec, Arc::new(MemoryControl::new()));

        assert!(!field.check_required());
        assert_eq!(field.error(), "Confirm password is required");
    }

    #[test]
    fn test_optional_empty_field_passes() {
        let field = text_field("nickname", false, "");
        assert!(field.check_required());
        assert_eq!(field.error(), "");
    }
}
