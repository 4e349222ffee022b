use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::mask::{MaskedText, PHONE_MAX_DIGITS};
use crate::models::Contact;

/// Single-line text value with a cursor measured in characters. Screen
/// columns are derived from display width.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub(crate) fn value(&self) -> &str {
        &self.value
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(idx, _)| idx)
            .unwrap_or(self.value.len())
    }

    fn insert(mut self, ch: char) -> Self {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, ch);
        self.cursor += 1;
        self
    }

    fn backspace(mut self) -> Self {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
        self
    }

    fn delete(mut self) -> Self {
        if self.cursor < self.len() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
        self
    }

    fn move_to(mut self, cursor: usize) -> Self {
        self.cursor = cursor.min(self.len());
        self
    }

    /// Terminal cells occupied by the text before the cursor.
    pub(crate) fn cursor_column(&self) -> usize {
        self.value[..self.byte_index(self.cursor)].width()
    }

    /// Character index under terminal column `column`. A click on either
    /// half of a wide character lands before it.
    fn index_at_column(&self, column: usize) -> usize {
        let mut used = 0;
        for (index, ch) in self.value.chars().enumerate() {
            let width = ch.width().unwrap_or(0);
            if used + width > column {
                return index;
            }
            used += width;
        }
        self.len()
    }
}

/// Fields available within the contact form.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DraftField {
    #[default]
    Name,
    Phone,
}

/// Everything that can happen to the draft between two commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftMsg {
    Insert(char),
    Backspace,
    Delete,
    MoveLeft,
    MoveRight,
    Home,
    End,
    ToggleField,
    Focus(DraftField),
    /// Put the cursor under a column of the displayed text (for the phone
    /// field that is the masked text).
    PlaceCursor { field: DraftField, column: usize },
    Clear,
}

/// Unsaved form contents. Each message produces a new draft; nothing is
/// mutated behind the caller's back.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    name: TextInput,
    phone: TextInput,
    active: DraftField,
}

impl ContactDraft {
    pub fn update(self, msg: DraftMsg) -> Self {
        let active = self.active;
        match msg {
            DraftMsg::Insert(ch) => {
                if self.accepts(ch) {
                    self.map_field(active, |input| input.insert(ch))
                } else {
                    self
                }
            }
            DraftMsg::Backspace => self.map_field(active, TextInput::backspace),
            DraftMsg::Delete => self.map_field(active, TextInput::delete),
            DraftMsg::MoveLeft => self.map_field(active, |input| {
                let cursor = input.cursor.saturating_sub(1);
                input.move_to(cursor)
            }),
            DraftMsg::MoveRight => self.map_field(active, |input| {
                let cursor = input.cursor + 1;
                input.move_to(cursor)
            }),
            DraftMsg::Home => self.map_field(active, |input| input.move_to(0)),
            DraftMsg::End => self.map_field(active, |input| input.move_to(usize::MAX)),
            DraftMsg::ToggleField => {
                let next = match active {
                    DraftField::Name => DraftField::Phone,
                    DraftField::Phone => DraftField::Name,
                };
                Self {
                    active: next,
                    ..self
                }
            }
            DraftMsg::Focus(field) => Self {
                active: field,
                ..self
            },
            DraftMsg::PlaceCursor { field, column } => {
                let raw = match field {
                    DraftField::Name => self.name.index_at_column(column),
                    DraftField::Phone => MaskedText::new(self.phone.value()).to_raw(column),
                };
                Self {
                    active: field,
                    ..self
                }
                .map_field(field, |input| input.move_to(raw))
            }
            DraftMsg::Clear => Self::default(),
        }
    }

    fn accepts(&self, ch: char) -> bool {
        match self.active {
            DraftField::Name => !ch.is_control(),
            DraftField::Phone => ch.is_ascii_digit() && self.phone.len() < PHONE_MAX_DIGITS,
        }
    }

    fn map_field(mut self, field: DraftField, f: impl FnOnce(TextInput) -> TextInput) -> Self {
        match field {
            DraftField::Name => self.name = f(self.name),
            DraftField::Phone => self.phone = f(self.phone),
        }
        self
    }

    pub fn name(&self) -> &str {
        self.name.value()
    }

    /// Raw phone digits, never masked.
    pub fn phone(&self) -> &str {
        self.phone.value()
    }

    pub fn active(&self) -> DraftField {
        self.active
    }

    /// The record this draft would store on commit.
    pub fn to_contact(&self) -> Contact {
        Contact::new(self.name.value(), self.phone.value())
    }

    /// Text shown for `field`; the phone goes through the mask.
    pub(crate) fn display(&self, field: DraftField) -> String {
        match field {
            DraftField::Name => self.name.value().to_string(),
            DraftField::Phone => MaskedText::new(self.phone.value()).text,
        }
    }

    /// Cursor column, in terminal cells, within [`Self::display`].
    pub(crate) fn display_cursor(&self, field: DraftField) -> usize {
        match field {
            DraftField::Name => self.name.cursor_column(),
            DraftField::Phone => {
                MaskedText::new(self.phone.value()).to_formatted(self.phone.cursor())
            }
        }
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field_name: &str, field: DraftField) -> Line<'static> {
        let value = self.display(field);
        let is_active = self.active == field;

        let placeholder = match field {
            DraftField::Name => "<name>",
            DraftField::Phone => "<digits only>",
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        let display = if value.is_empty() && !is_active {
            placeholder.to_string()
        } else {
            value
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(draft: ContactDraft, msgs: impl IntoIterator<Item = DraftMsg>) -> ContactDraft {
        msgs.into_iter().fold(draft, ContactDraft::update)
    }

    fn typed(text: &str) -> Vec<DraftMsg> {
        text.chars().map(DraftMsg::Insert).collect()
    }

    #[test]
    fn typing_fills_the_active_field() {
        let draft = feed(ContactDraft::default(), typed("Ana"));
        let draft = feed(draft.update(DraftMsg::ToggleField), typed("11999990000"));

        assert_eq!(draft.to_contact(), Contact::new("Ana", "11999990000"));
        assert_eq!(draft.display(DraftField::Phone), "(11) 99999-0000");
    }

    #[test]
    fn phone_is_capped_and_digit_only() {
        let draft = ContactDraft::default().update(DraftMsg::Focus(DraftField::Phone));
        let draft = feed(draft, typed("(11) 9999-90000123"));
        assert_eq!(draft.phone(), "11999990000");
    }

    #[test]
    fn name_rejects_control_characters() {
        let draft = feed(ContactDraft::default(), typed("Jo\u{7}ão"));
        assert_eq!(draft.name(), "João");
    }

    #[test]
    fn editing_in_the_middle_of_a_name() {
        let draft = feed(
            ContactDraft::default(),
            typed("Jão")
                .into_iter()
                .chain([DraftMsg::MoveLeft, DraftMsg::MoveLeft, DraftMsg::Insert('o')]),
        );
        assert_eq!(draft.name(), "João");

        let draft = feed(draft, [DraftMsg::Home, DraftMsg::Delete, DraftMsg::End]);
        assert_eq!(draft.name(), "oão");
        assert_eq!(draft.display_cursor(DraftField::Name), 3);
    }

    #[test]
    fn phone_cursor_maps_through_mask() {
        let draft = ContactDraft::default().update(DraftMsg::Focus(DraftField::Phone));
        let draft = feed(draft, typed("1199999"));
        assert_eq!(draft.display(DraftField::Phone), "(11) 99999-");
        assert_eq!(draft.display_cursor(DraftField::Phone), 11);

        let draft = feed(draft, [DraftMsg::Home, DraftMsg::MoveRight, DraftMsg::MoveRight]);
        assert_eq!(draft.display_cursor(DraftField::Phone), 5);
    }

    #[test]
    fn clicking_on_mask_punctuation_lands_between_digits() {
        let draft = ContactDraft::default().update(DraftMsg::Focus(DraftField::Phone));
        let draft = feed(draft, typed("11999998888"));
        let draft = feed(
            draft,
            [
                DraftMsg::Focus(DraftField::Name),
                DraftMsg::PlaceCursor {
                    field: DraftField::Phone,
                    column: 10,
                },
            ],
        );
        assert_eq!(draft.active(), DraftField::Phone);

        let draft = draft.update(DraftMsg::Backspace);
        assert_eq!(draft.phone(), "1199998888");
    }

    #[test]
    fn wide_characters_count_two_columns() {
        let draft = feed(ContactDraft::default(), typed("李李"));
        assert_eq!(draft.display_cursor(DraftField::Name), 4);

        let draft = draft.update(DraftMsg::MoveLeft);
        assert_eq!(draft.display_cursor(DraftField::Name), 2);
    }

    #[test]
    fn clicking_a_wide_name_uses_screen_columns() {
        let draft = feed(ContactDraft::default(), typed("李李"));

        let draft = feed(
            draft,
            [
                DraftMsg::PlaceCursor {
                    field: DraftField::Name,
                    column: 2,
                },
                DraftMsg::Insert('x'),
            ],
        );
        assert_eq!(draft.name(), "李x李");
        assert_eq!(draft.display_cursor(DraftField::Name), 3);

        // The right half of a wide character still lands before it.
        let draft = draft.update(DraftMsg::PlaceCursor {
            field: DraftField::Name,
            column: 4,
        });
        assert_eq!(draft.display_cursor(DraftField::Name), 3);
    }

    #[test]
    fn clear_resets_everything() {
        let draft = feed(ContactDraft::default(), typed("Ana"));
        assert_eq!(draft.update(DraftMsg::Clear), ContactDraft::default());
    }
}
