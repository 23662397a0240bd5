//! The markup contract the bridge consumes: input values, the message element
//! and the submit event. The browser binding implements these over the live
//! DOM; `MemoryPage` backs the CLI and tests.

use crate::errors::BridgeError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Read/write access to the elements a form bridge touches.
pub trait Page {
    /// Current value of the input element `id`, or `None` if the element is absent.
    fn input_value(&self, id: &str) -> Option<String>;

    /// Replaces the text content of element `id`.
    ///
    /// # Errors
    /// Returns `BridgeError::MissingElement` if the element is absent.
    fn set_inner_text(&self, id: &str, text: &str) -> Result<(), BridgeError>;
}

/// A submission event whose default action (navigation) can be suppressed.
pub trait SubmitIntent {
    fn prevent_default(&self);
}

/// In-memory page: a set of inputs and a set of text elements.
#[derive(Debug, Default)]
pub struct MemoryPage {
    inputs: Mutex<HashMap<String, String>>,
    texts: Mutex<HashMap<String, String>>,
}

impl MemoryPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) an input element with the given value.
    #[must_use]
    pub fn with_input(self, id: &str, value: &str) -> Self {
        self.set_input(id, value);
        self
    }

    /// Adds an empty text element, e.g. the shared message element.
    #[must_use]
    pub fn with_text_element(self, id: &str) -> Self {
        self.texts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string(), String::new());
        self
    }

    pub fn set_input(&self, id: &str, value: &str) {
        self.inputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string(), value.to_string());
    }

    /// Current text of element `id`.
    #[must_use]
    pub fn text(&self, id: &str) -> Option<String> {
        self.texts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }
}

impl Page for MemoryPage {
    fn input_value(&self, id: &str) -> Option<String> {
        self.inputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    fn set_inner_text(&self, id: &str, text: &str) -> Result<(), BridgeError> {
        let mut texts = self.texts.lock().unwrap_or_else(PoisonError::into_inner);
        match texts.get_mut(id) {
            Some(slot) => {
                text.clone_into(slot);
                Ok(())
            }
            None => Err(BridgeError::MissingElement(id.to_string())),
        }
    }
}

/// Submit event that records whether its default action was suppressed.
#[derive(Debug, Default)]
pub struct MemorySubmit {
    default_prevented: AtomicBool,
}

impl MemorySubmit {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.load(Ordering::SeqCst)
    }
}

impl SubmitIntent for MemorySubmit {
    fn prevent_default(&self) {
        self.default_prevented.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_values_are_returned_verbatim() {
        let page = MemoryPage::new()
            .with_input("signup-username", "  alice ")
            .with_input("signup-password", "");
        assert_eq!(
            page.input_value("signup-username").as_deref(),
            Some("  alice ")
        );
        assert_eq!(page.input_value("signup-password").as_deref(), Some(""));
        assert_eq!(page.input_value("login-username"), None);
    }

    #[test]
    fn set_inner_text_requires_element() {
        let page = MemoryPage::new().with_text_element("message");
        assert_eq!(page.text("message").as_deref(), Some(""));

        page.set_inner_text("message", "hello").unwrap();
        assert_eq!(page.text("message").as_deref(), Some("hello"));

        assert_eq!(
            page.set_inner_text("status", "hello"),
            Err(BridgeError::MissingElement("status".to_string()))
        );
    }

    #[test]
    fn memory_submit_records_prevent_default() {
        let event = MemorySubmit::new();
        assert!(!event.default_prevented());
        event.prevent_default();
        assert!(event.default_prevented());
    }
}
