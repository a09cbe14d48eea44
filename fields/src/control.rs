use std::sync::Mutex;

/// View binding for one field.
///
/// A control is whatever surface holds the live value and displays the paired
/// error message: a DOM input with its error span, a TUI widget, or an
/// in-memory stand-in. The field layer reads through this trait at call time
/// and never caches values.
pub trait FieldControl: Send + Sync {
    /// Read the current raw content of the control.
    fn value(&self) -> String;

    /// Write the error-slot text. An empty string clears the slot.
    fn set_error(&self, message: &str);

    /// Read the current error-slot text.
    fn error(&self) -> String;
}

/// In-process control backed by mutexed strings.
///
/// The stand-in for a rendering surface in tests and headless embedders.
#[derive(Debug, Default)]
pub struct MemoryControl {
    value: Mutex<String>,
    error: Mutex<String>,
}

impl MemoryControl {
    /// Create an empty control.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a control pre-filled with a value.
    pub fn with_value(value: impl Into<String>) -> Self {
        let control = Self::new();
        control.set_value(value);
        control
    }

    /// Replace the control's content, as a user edit would.
    pub fn set_value(&self, value: impl Into<String>) {
        *self.value.lock().unwrap() = value.into();
    }
}

impl FieldControl for MemoryControl {
    fn value(&self) -> String {
        self.value.lock().unwrap().clone()
    }

    fn set_error(&self, message: &str) {
        *self.error.lock().unwrap() = message.to_string();
    }

    fn error(&self) -> String {
        self.error.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_control_holds_value_and_error() {
        let control = MemoryControl::with_value("hello");
        assert_eq!(control.value(), "hello");
        assert_eq!(control.error(), "");

        control.set_error("bad");
        assert_eq!(control.error(), "bad");

        control.set_error("");
        assert_eq!(control.error(), "");
    }
}
