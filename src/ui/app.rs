use std::mem;
use std::sync::mpsc::{self, Receiver};

use anyhow::Result;
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::models::Contact;
use crate::store::{RecordStore, Subscription};

use super::forms::{ContactDraft, DraftField, DraftMsg};
use super::helpers::{surface_error, ScreenLayout};

/// Rows skipped by PageUp/PageDown in the contact list.
const PAGE_STEP: usize = 10;
const NAME_PREFIX: &str = "Name: ";
const PHONE_PREFIX: &str = "Phone: ";

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Application state: the store, the live contact list it feeds, and the
/// draft being typed.
pub struct App {
    store: RecordStore,
    updates: Receiver<Vec<Contact>>,
    _subscription: Subscription,
    contacts: Vec<Contact>,
    selected: usize,
    draft: ContactDraft,
    status: Option<StatusMessage>,
}

impl App {
    /// Build the app around `store`, subscribing to its contents so the list
    /// follows every write.
    pub fn new(store: RecordStore) -> Result<Self> {
        let (tx, updates) = mpsc::channel();
        let subscription = store.subscribe(move |contacts: &[Contact]| {
            let _ = tx.send(contacts.to_vec());
        })?;

        let mut app = Self {
            store,
            updates,
            _subscription: subscription,
            contacts: Vec::new(),
            selected: 0,
            draft: ContactDraft::default(),
            status: None,
        };
        app.sync_contacts();
        Ok(app)
    }

    /// Apply every pending store notification; the newest one wins.
    pub fn sync_contacts(&mut self) -> bool {
        let mut changed = false;
        while let Ok(contacts) = self.updates.try_recv() {
            self.contacts = contacts;
            changed = true;
        }
        if changed && self.selected >= self.contacts.len() {
            self.selected = self.contacts.len().saturating_sub(1);
        }
        changed
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn draft(&self) -> &ContactDraft {
        &self.draft
    }

    /// Handle one key press. Returns `true` when the app should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        match code {
            KeyCode::Esc => return Ok(true),
            KeyCode::Enter => self.commit_draft(),
            KeyCode::Tab | KeyCode::BackTab => self.apply(DraftMsg::ToggleField),
            KeyCode::Backspace => self.apply(DraftMsg::Backspace),
            KeyCode::Delete => self.apply(DraftMsg::Delete),
            KeyCode::Left => self.apply(DraftMsg::MoveLeft),
            KeyCode::Right => self.apply(DraftMsg::MoveRight),
            KeyCode::Home => self.apply(DraftMsg::Home),
            KeyCode::End => self.apply(DraftMsg::End),
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-(PAGE_STEP as isize)),
            KeyCode::PageDown => self.move_selection(PAGE_STEP as isize),
            KeyCode::Char(ch) => self.apply(DraftMsg::Insert(ch)),
            _ => {}
        }
        Ok(false)
    }

    /// Clicking a field focuses it and moves the cursor under the pointer;
    /// the wheel scrolls the list. `area` is the full terminal area.
    pub fn handle_mouse(&mut self, event: MouseEvent, area: Rect) {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let inner = ScreenLayout::new(area).form_inner();
                let within = event.column >= inner.x && event.column < inner.x + inner.width;
                if !within || inner.height < 2 {
                    return;
                }
                let offset = (event.column - inner.x) as usize;
                let hit = if event.row == inner.y {
                    Some((DraftField::Name, offset.saturating_sub(NAME_PREFIX.len())))
                } else if event.row == inner.y + 1 {
                    Some((DraftField::Phone, offset.saturating_sub(PHONE_PREFIX.len())))
                } else {
                    None
                };
                if let Some((field, column)) = hit {
                    self.apply(DraftMsg::PlaceCursor { field, column });
                }
            }
            MouseEventKind::ScrollUp => self.move_selection(-1),
            MouseEventKind::ScrollDown => self.move_selection(1),
            _ => {}
        }
    }

    fn apply(&mut self, msg: DraftMsg) {
        let draft = mem::take(&mut self.draft);
        self.draft = draft.update(msg);
    }

    /// Upsert the draft and clear it. On failure the draft stays so the user
    /// can retry, and the error is shown in the footer.
    fn commit_draft(&mut self) {
        let contact = self.draft.to_contact();
        match self.store.upsert(&contact) {
            Ok(()) => {
                self.apply(DraftMsg::Clear);
                self.sync_contacts();
                self.focus_contact(&contact.name);
                self.set_status(format!("Saved {}.", contact.name), StatusKind::Info);
            }
            Err(err) => {
                tracing::warn!(name = %contact.name, error = %err, "failed to save contact");
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
    }

    fn focus_contact(&mut self, name: &str) {
        if let Some(idx) = self.contacts.iter().position(|c| c.name == name) {
            self.selected = idx;
        }
    }

    fn move_selection(&mut self, offset: isize) {
        if self.contacts.is_empty() {
            return;
        }
        let last = self.contacts.len() - 1;
        self.selected = self.selected.saturating_add_signed(offset).min(last);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let layout = ScreenLayout::new(frame.area());

        let header = Paragraph::new(Line::from(Span::styled(
            "Contact Book",
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, layout.header);

        self.draw_form(frame, &layout);
        self.draw_contacts(frame, layout.list);
        self.draw_footer(frame, layout.footer);
    }

    fn draw_form(&self, frame: &mut Frame, layout: &ScreenLayout) {
        let block = ScreenLayout::form_block();
        frame.render_widget(block, layout.form);
        let inner = layout.form_inner();
        if inner.height == 0 {
            return;
        }

        let lines = vec![
            self.draft.build_line("Name", DraftField::Name),
            self.draft.build_line("Phone", DraftField::Phone),
        ];
        frame.render_widget(Paragraph::new(lines), inner);

        let (prefix, row) = match self.draft.active() {
            DraftField::Name => (NAME_PREFIX.len(), inner.y),
            DraftField::Phone => (PHONE_PREFIX.len(), inner.y + 1),
        };
        let column = prefix + self.draft.display_cursor(self.draft.active());
        let cursor_x = (inner.x as usize + column).min((inner.x + inner.width) as usize) as u16;
        frame.set_cursor_position((cursor_x, row.min(inner.y + inner.height - 1)));
    }

    fn draw_contacts(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!("Contacts ({})", self.contacts.len()))
            .borders(Borders::ALL);

        let header = Row::new(vec!["Name", "Phone"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows = self.contacts.iter().map(|contact| {
            Row::new(vec![
                Cell::from(contact.name.clone()),
                Cell::from(contact.formatted_phone()),
            ])
        });

        let table = Table::new(rows, [Constraint::Percentage(40), Constraint::Percentage(60)])
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().fg(Color::Yellow));

        let mut state = TableState::default();
        if !self.contacts.is_empty() {
            state.select(Some(self.selected));
        }
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let key_style = Style::default().fg(Color::Cyan);
        let instructions = Line::from(vec![
            Span::styled("Enter", key_style),
            Span::raw(" Save  "),
            Span::styled("Tab", key_style),
            Span::raw(" Switch field  "),
            Span::styled("↑/↓", key_style),
            Span::raw(" Scroll  "),
            Span::styled("Esc", key_style),
            Span::raw(" Quit"),
        ]);

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}
