use std::sync::Mutex;

use crate::auth::models::Operation;
use crate::auth::ports::ChoiceSelector;

/// In-process choice selector.
///
/// Stands in for the page's shared radio group. `select` models a working
/// group (one checked option replaces the previous); `select_many` and
/// `clear` model broken markup, which the authoriser must reject.
#[derive(Debug, Default)]
pub struct StaticChoice {
    selected: Mutex<Vec<Operation>>,
}

impl StaticChoice {
    /// Create a selector with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select exactly one operation, replacing any previous selection.
    pub fn select(&self, operation: Operation) {
        *self.selected.lock().unwrap() = vec![operation];
    }

    /// Select several operations at once.
    pub fn select_many(&self, operations: &[Operation]) {
        *self.selected.lock().unwrap() = operations.to_vec();
    }

    /// Deselect everything.
    pub fn clear(&self) {
        self.selected.lock().unwrap().clear();
    }
}

impl ChoiceSelector for StaticChoice {
    fn selected(&self) -> Vec<Operation> {
        self.selected.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_replaces_previous_choice() {
        let choice = StaticChoice::new();
        assert!(choice.selected().is_empty());

        choice.select(Operation::Login);
        choice.select(Operation::Forgot);
        assert_eq!(choice.selected(), vec![Operation::Forgot]);

        choice.clear();
        assert!(choice.selected().is_empty());
    }
}
