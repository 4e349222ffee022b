use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};

/// Footer space reserved for status messages and instructions.
pub(crate) const FOOTER_HEIGHT: u16 = 3;
/// Title banner, one line inside a bordered box.
const HEADER_HEIGHT: u16 = 3;
/// Two field rows inside a bordered block.
const FORM_HEIGHT: u16 = 4;

/// Regions of the single screen, computed the same way for drawing and for
/// mouse hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScreenLayout {
    pub(crate) header: Rect,
    pub(crate) form: Rect,
    pub(crate) list: Rect,
    pub(crate) footer: Rect,
}

impl ScreenLayout {
    pub(crate) fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Length(FORM_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        Self {
            header: chunks[0],
            form: chunks[1],
            list: chunks[2],
            footer: chunks[3],
        }
    }

    /// Block drawn around the form; its inner area holds one row per field.
    pub(crate) fn form_block() -> Block<'static> {
        Block::default().title("New contact").borders(Borders::ALL)
    }

    pub(crate) fn form_inner(&self) -> Rect {
        Self::form_block().inner(self.form)
    }
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};

    #[test]
    fn surface_error_reports_root_cause() {
        let err = Err::<(), _>(anyhow!("disk is full"))
            .context("failed to upsert contact")
            .unwrap_err();
        assert_eq!(surface_error(&err), "disk is full");
    }

    #[test]
    fn layout_stacks_regions() {
        let layout = ScreenLayout::new(Rect::new(0, 0, 60, 20));
        assert_eq!(layout.header.height, 3);
        assert_eq!(layout.form.y, 3);
        assert_eq!(layout.form_inner(), Rect::new(1, 4, 58, 2));
        assert_eq!(layout.list, Rect::new(0, 7, 60, 10));
        assert_eq!(layout.footer.y, 17);
    }
}
