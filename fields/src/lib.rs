//! Form field abstraction library
//!
//! Provides the input-widget layer for form-driven workflows:
//! - Declarative field configuration ([`FieldSpec`])
//! - A view-binding trait decoupling values from their rendering surface ([`FieldControl`])
//! - A bound field with a paired error-display slot ([`Field`])
//! - A named, insertion-ordered field collection with a required-field pass ([`FieldSet`])
//!
//! The library knows nothing about what the values mean; embedders bind each
//! field to whatever surface they render on (a DOM element, a TUI widget, an
//! in-memory control in tests) and validate on top.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use fields::Field;
//! use fields::FieldKind;
//! use fields::FieldSet;
//! use fields::FieldSpec;
//! use fields::MemoryControl;
//!
//! let spec = FieldSpec::new("name", FieldKind::Text).unwrap().required(true);
//! let control = Arc::new(MemoryControl::new());
//! control.set_value("  alice  ");
//!
//! let mut set = FieldSet::new();
//! set.insert(Field::new(spec, control)).unwrap();
//!
//! assert_eq!(set.get("name").unwrap().value(), "alice");
//! assert_eq!(set.require_all(), 0);
//! ```

pub mod control;
pub mod errors;
pub mod field;
pub mod set;
pub mod spec;

// Re-export commonly used items
pub use control::FieldControl;
pub use control::MemoryControl;
pub use errors::FormError;
pub use field::Field;
pub use set::FieldSet;
pub use spec::FieldKind;
pub use spec::FieldSpec;
