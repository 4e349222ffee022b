//! Phone number input mask. The stored value is always the raw digit string;
//! this module only decides how that string looks on screen and how cursor
//! positions translate between the two representations.
//!
//! The mask follows the Brazilian mobile layout `(DD) DDDDD-DDDD`: two area
//! code digits, five digits, a hyphen, and the remaining four.

/// Maximum number of raw digits the phone field accepts.
pub const PHONE_MAX_DIGITS: usize = 11;

/// Render a raw digit string with the mask punctuation inserted.
///
/// Inputs of any length are accepted. Short inputs simply stop before the
/// later punctuation, and characters past the last mask position are copied
/// through untouched.
pub fn format(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    for (index, ch) in raw.chars().enumerate() {
        match index {
            0 => {
                out.push('(');
                out.push(ch);
            }
            1 => {
                out.push(ch);
                out.push_str(") ");
            }
            6 => {
                out.push(ch);
                out.push('-');
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Map a cursor offset in the raw string to the matching offset in the
/// formatted string.
pub fn raw_to_formatted_offset(offset: usize) -> usize {
    match offset {
        0 => 0,
        1 => offset + 1,
        2..=6 => offset + 3,
        _ => offset + 4,
    }
}

/// Map a cursor offset in the formatted string back to the raw string.
///
/// Offsets that land on punctuation snap to the digit boundary right before
/// it, so `formatted_to_raw_offset(raw_to_formatted_offset(o)) == o` holds for
/// every `o`.
pub fn formatted_to_raw_offset(offset: usize) -> usize {
    match offset {
        0 | 1 => 0,
        2 | 3 => offset - 1,
        4 | 5 => 2,
        6..=10 => offset - 3,
        _ => offset - 4,
    }
}

/// A raw phone value paired with its rendered form. Offsets passed through
/// this type are clamped to the bounds of the actual text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedText {
    pub text: String,
    raw_len: usize,
}

impl MaskedText {
    pub fn new(raw: &str) -> Self {
        Self {
            text: format(raw),
            raw_len: raw.chars().count(),
        }
    }

    /// Width of the rendered text in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.raw_len == 0
    }

    pub fn to_formatted(&self, raw_offset: usize) -> usize {
        raw_to_formatted_offset(raw_offset.min(self.raw_len)).min(self.len())
    }

    pub fn to_raw(&self, formatted_offset: usize) -> usize {
        formatted_to_raw_offset(formatted_offset.min(self.len())).min(self.raw_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn formats_short_inputs() {
        assert_eq!(format(""), "");
        assert_eq!(format("1"), "(1");
        assert_eq!(format("11"), "(11) ");
        assert_eq!(format("119"), "(11) 9");
        assert_eq!(format("1199999"), "(11) 99999-");
    }

    #[test]
    fn formats_full_number() {
        assert_eq!(format("11999998888"), "(11) 99999-8888");
    }

    #[test]
    fn copies_overflow_through() {
        assert_eq!(format("1199999888877"), "(11) 99999-888877");
    }

    #[test]
    fn forward_offsets_follow_punctuation() {
        let expected = [0, 2, 5, 6, 7, 8, 9, 11, 12, 13, 14, 15];
        for (raw, formatted) in expected.iter().enumerate() {
            assert_eq!(raw_to_formatted_offset(raw), *formatted, "raw offset {raw}");
        }
    }

    #[test]
    fn inverse_snaps_punctuation_to_previous_digit() {
        // "(11) 99999-8888"
        assert_eq!(formatted_to_raw_offset(1), 0);
        assert_eq!(formatted_to_raw_offset(4), 2);
        assert_eq!(formatted_to_raw_offset(5), 2);
        assert_eq!(formatted_to_raw_offset(10), 7);
        assert_eq!(formatted_to_raw_offset(11), 7);
        assert_eq!(formatted_to_raw_offset(15), 11);
    }

    #[test]
    fn masked_text_clamps_offsets() {
        let masked = MaskedText::new("119");
        assert_eq!(masked.text, "(11) 9");
        assert_eq!(masked.to_formatted(3), 6);
        assert_eq!(masked.to_formatted(9), 6);
        assert_eq!(masked.to_raw(40), 3);
        assert_eq!(masked.to_raw(3), 2);
        assert!(MaskedText::new("").is_empty());
    }

    fn punctuation_for(len: usize) -> usize {
        match len {
            0 => 0,
            1 => 1,
            2..=6 => 3,
            _ => 4,
        }
    }

    proptest! {
        #[test]
        fn format_only_inserts_punctuation(raw in "[0-9]{0,11}") {
            let formatted = format(&raw);
            prop_assert_eq!(
                formatted.chars().count(),
                raw.len() + punctuation_for(raw.len())
            );
            let digits: String = formatted.chars().filter(char::is_ascii_digit).collect();
            prop_assert_eq!(digits, raw);
        }

        #[test]
        fn forward_offset_never_shrinks(offset in 0usize..64) {
            prop_assert!(raw_to_formatted_offset(offset) >= offset);
        }

        #[test]
        fn inverse_round_trips_forward(offset in 0usize..64) {
            prop_assert_eq!(formatted_to_raw_offset(raw_to_formatted_offset(offset)), offset);
        }

        #[test]
        fn inverse_is_monotonic(offset in 0usize..64) {
            prop_assert!(formatted_to_raw_offset(offset) <= formatted_to_raw_offset(offset + 1));
        }

        #[test]
        fn forward_offset_lands_inside_text(raw in "[0-9]{0,11}") {
            let formatted = format(&raw);
            prop_assert_eq!(raw_to_formatted_offset(raw.len()), formatted.chars().count());
        }
    }
}
