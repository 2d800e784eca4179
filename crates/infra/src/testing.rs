//! Test fixtures.

use chronicle_core::Event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note(pub String);

impl Event for Note {
    fn event_type(&self) -> &'static str {
        "Note"
    }
}
