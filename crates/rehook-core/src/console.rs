//! Diagnostic output channel.
//!
//! Components log markers here from effect bodies and cleanups. The ordered
//! marker list is the observable record of when effects ran; each marker is
//! also forwarded to the `log` facade on the `console` target.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Marker {
    pub label: String,
    pub value: Option<String>,
}

impl Marker {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: None,
        }
    }

    pub fn with_value(label: impl Into<String>, value: impl fmt::Display) -> Self {
        Self {
            label: label.into(),
            value: Some(value.to_string()),
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => write!(f, "{}: {}", self.label, v),
            None => f.write_str(&self.label),
        }
    }
}

#[derive(Clone, Default)]
pub struct Console(Rc<RefCell<Vec<Marker>>>);

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self, label: impl Into<String>) {
        self.push(Marker::new(label));
    }

    pub fn log_with(&self, label: impl Into<String>, value: impl fmt::Display) {
        self.push(Marker::with_value(label, value));
    }

    fn push(&self, marker: Marker) {
        log::info!(target: "console", "{marker}");
        self.0.borrow_mut().push(marker);
    }

    pub fn markers(&self) -> Vec<Marker> {
        self.0.borrow().clone()
    }

    /// Markers rendered as text, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.0.borrow().iter().map(ToString::to_string).collect()
    }

    /// Returns the rendered markers and empties the channel.
    pub fn drain(&self) -> Vec<String> {
        let lines = self.lines();
        self.0.borrow_mut().clear();
        lines
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.borrow().iter()).finish()
    }
}
