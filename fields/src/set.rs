use crate::errors::FormError;
use crate::field::Field;

/// Insertion-ordered, name-keyed collection of fields.
///
/// The unit a validator works over: one set per form section. Lookup by an
/// unknown name is a configuration defect, not a runtime condition.
#[derive(Debug, Default)]
pub struct FieldSet {
    fields: Vec<Field>,
}

impl FieldSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field to the set.
    ///
    /// # Arguments
    /// * `field` - Bound field to add
    ///
    /// # Errors
    /// * `DuplicateField` - A field with this name is already present
    pub fn insert(&mut self, field: Field) -> Result<(), FormError> {
        if self.fields.iter().any(|f| f.name() == field.name()) {
            return Err(FormError::DuplicateField(field.name().to_string()));
        }
        self.fields.push(field);
        Ok(())
    }

    /// Look up a field by name.
    ///
    /// # Errors
    /// * `UnknownField` - No field with this name (a configuration defect)
    pub fn get(&self, name: &str) -> Result<&Field, FormError> {
        self.fields
            .iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    /// Read the trimmed value of a named field.
    ///
    /// # Errors
    /// * `UnknownField` - No field with this name
    pub fn value(&self, name: &str) -> Result<String, FormError> {
        Ok(self.get(name)?.value())
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Number of fields in the set.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the set holds no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Run the required check over every field, collecting all failures.
    ///
    /// Every required, empty field gets its message in one pass; the caller
    /// decides whether to proceed based on the failure count.
    ///
    /// # Returns
    /// Number of fields that failed the check
    pub fn require_all(&self) -> usize {
        self.fields.iter().filter(|f| !f.check_required()).count()
    }

    /// Clear every field's error slot.
    pub fn clear_errors(&self) {
        for field in &self.fields {
            field.clear_error();
        }
    }

    /// Whether any field currently shows an error.
    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(|f| !f.error().is_empty())
    }
}
