//! Domain model that mirrors the single SQLite table. Kept as a plain value
//! type so the store, the form, and the list view can pass snapshots around
//! freely.

use std::fmt;

use crate::mask;

/// One stored contact. `name` is the primary key; `phone` always holds the raw
/// digits exactly as typed, without any mask punctuation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Contact {
    pub name: String,
    pub phone: String,
}

impl Contact {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }

    /// Phone number with the display mask applied. Rendering only; never
    /// written back to the database.
    pub fn formatted_phone(&self) -> String {
        mask::format(&self.phone)
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.formatted_phone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_masked_phone() {
        let contact = Contact::new("Ana", "11999990000");
        assert_eq!(contact.to_string(), "Ana (11) 99999-0000");
        assert_eq!(contact.phone, "11999990000");
    }
}
