//! Request form screen: the intake form plus the recent request panel.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};

use crate::lifecycle::{Field, FormState, Notification, Phase, RecentListState};
use crate::model::Priority;
use crate::tui::action::Action;
use crate::tui::app::Screen;
use crate::tui::widgets::{FieldView, draw_form, draw_notice_bar};

/// Focus order of the form rows.
const FOCUS_ORDER: [Field; 3] = [Field::CustomerEmail, Field::Description, Field::Priority];

/// UI-only state for the request form: focus and recent-list cursor.
///
/// Field values live in [`FormState`]; this screen only forwards edits.
#[derive(Debug, Clone)]
pub struct RequestFormScreen {
    focus: Field,
    selected: usize,
}

impl Default for RequestFormScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestFormScreen {
    /// Creates the screen with focus on the email field.
    pub fn new() -> Self {
        Self {
            focus: Field::CustomerEmail,
            selected: 0,
        }
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    /// Index of the highlighted recent-list row.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Handles a key event, editing `form` directly and returning an
    /// [`Action`] for anything the app must carry out.
    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        form: &mut FormState,
        recent: &RecentListState,
    ) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::F(1) => return Action::Navigate(Screen::Help),
            KeyCode::Char('r') if ctrl => return Action::RefreshRecent,
            KeyCode::Char('o') if ctrl => {
                return recent
                    .record_id(self.selected)
                    .map_or(Action::None, |id| Action::ViewRecord(id.to_string()));
            }
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                return Action::None;
            }
            KeyCode::Down => {
                let len = recent.entries().len();
                if len > 0 {
                    self.selected = (self.selected + 1).min(len - 1);
                }
                return Action::None;
            }
            _ => {}
        }

        if matches!(form.phase(), Phase::Success { .. }) {
            return self.handle_success_key(key, form);
        }

        match key.code {
            KeyCode::Tab => {
                self.cycle_focus(true);
                Action::None
            }
            KeyCode::BackTab => {
                self.cycle_focus(false);
                Action::None
            }
            KeyCode::Char('l') if ctrl => {
                form.clear();
                Action::None
            }
            KeyCode::Char(_) if ctrl => Action::None,
            KeyCode::Char(ch) => {
                self.handle_char(ch, form);
                Action::None
            }
            KeyCode::Left if self.focus == Field::Priority => {
                form.set_priority(Priority::cycle(form.inputs().priority, false));
                Action::None
            }
            KeyCode::Right if self.focus == Field::Priority => {
                form.set_priority(Priority::cycle(form.inputs().priority, true));
                Action::None
            }
            KeyCode::Backspace => {
                self.delete_char(form);
                Action::None
            }
            KeyCode::Enter if form.is_loading() => Action::None,
            KeyCode::Enter => Action::Submit,
            _ => Action::None,
        }
    }

    /// Keys while the created record is on display: view it or start over.
    fn handle_success_key(&mut self, key: KeyEvent, form: &mut FormState) -> Action {
        match key.code {
            KeyCode::Char('v') => Action::ViewCreatedRecord,
            KeyCode::Char('n') => {
                form.create_another();
                self.focus = Field::CustomerEmail;
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_char(&mut self, ch: char, form: &mut FormState) {
        match self.focus {
            Field::CustomerEmail | Field::Description => {
                let mut value = text_value(form, self.focus).to_string();
                value.push(ch);
                form.update_field(self.focus, &value);
            }
            Field::Priority => match ch.to_ascii_lowercase() {
                'l' => form.set_priority(Some(Priority::Low)),
                'm' => form.set_priority(Some(Priority::Medium)),
                'h' => form.set_priority(Some(Priority::High)),
                ' ' => form.set_priority(Priority::cycle(form.inputs().priority, true)),
                _ => {}
            },
        }
    }

    fn delete_char(&mut self, form: &mut FormState) {
        match self.focus {
            Field::CustomerEmail | Field::Description => {
                let mut value = text_value(form, self.focus).to_string();
                value.pop();
                form.update_field(self.focus, &value);
            }
            Field::Priority => form.set_priority(None),
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        let pos = FOCUS_ORDER
            .iter()
            .position(|&f| f == self.focus)
            .unwrap_or(0);
        let len = FOCUS_ORDER.len();
        let next = if forward {
            (pos + 1) % len
        } else {
            (pos + len - 1) % len
        };
        self.focus = FOCUS_ORDER[next];
    }

    /// Keeps the recent-list cursor inside the list after a refresh.
    pub fn clamp_selection(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

fn text_value(form: &FormState, field: Field) -> &str {
    match field {
        Field::CustomerEmail => &form.inputs().customer_email,
        Field::Description => &form.inputs().description,
        Field::Priority => "",
    }
}

fn field_views(screen: &RequestFormScreen, form: &FormState) -> Vec<FieldView> {
    let priority = form
        .inputs()
        .priority
        .map(|p| format!("◀ {p} ▶"))
        .unwrap_or_default();
    vec![
        FieldView {
            label: "Customer Email".to_string(),
            value: form.inputs().customer_email.clone(),
            placeholder: "name@example.com".to_string(),
            required: true,
            focused: screen.focus == Field::CustomerEmail,
        },
        FieldView {
            label: "Description".to_string(),
            value: form.inputs().description.clone(),
            placeholder: "What do you need help with?".to_string(),
            required: true,
            focused: screen.focus == Field::Description,
        },
        FieldView {
            label: "Priority".to_string(),
            value: priority,
            placeholder: "◀ select: Low / Medium / High ▶".to_string(),
            required: true,
            focused: screen.focus == Field::Priority,
        },
    ]
}

/// One-line summary of the lifecycle phase for the status row.
fn phase_line(form: &FormState) -> Line<'static> {
    match form.phase() {
        Phase::Idle => Line::from(""),
        Phase::Submitting => Line::from(Span::styled(
            "Submitting…",
            Style::default().fg(Color::Yellow),
        )),
        Phase::Success { record_id } => Line::from(vec![
            Span::styled(
                format!("Created {record_id}"),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "  v: view record  n: create another",
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Phase::Failed { .. } => Line::from(Span::styled(
            "Submission failed; edit and press Enter to retry",
            Style::default().fg(Color::Red),
        )),
    }
}

/// Renders the request form screen.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_request_form(
    screen: &RequestFormScreen,
    form: &FormState,
    recent: &RecentListState,
    notice: Option<&Notification>,
    frame: &mut Frame,
    area: Rect,
) {
    let block = Block::default()
        .title(" New Service Request ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [form_area, phase_area, error_area, recent_area, notice_area, footer_area] =
        Layout::vertical([
            Constraint::Length(9),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

    draw_form(
        &field_views(screen, form),
        form.error_message().is_some(),
        frame,
        form_area,
    );
    frame.render_widget(Paragraph::new(phase_line(form)), phase_area);

    if let Some(err) = form.error_message() {
        let error = Paragraph::new(Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(Color::Red),
        )));
        frame.render_widget(error, error_area);
    }

    draw_recent_panel(screen, recent, frame, recent_area);
    draw_notice_bar(notice, frame, notice_area);

    let footer_text = if form.is_loading() {
        "Working…  Tab: next field  Esc: quit"
    } else {
        "Tab: next  ←/→: priority  Enter: submit  Ctrl+L: clear  Ctrl+R: refresh  Ctrl+O: open  F1: help"
    };
    let footer = Paragraph::new(Line::from(footer_text)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}

/// Renders the recent requests table, its error text, or nothing.
#[mutants::skip]
fn draw_recent_panel(
    screen: &RequestFormScreen,
    recent: &RecentListState,
    frame: &mut Frame,
    area: Rect,
) {
    if let Some(err) = recent.error() {
        let error = Paragraph::new(Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(Color::Red),
        )));
        frame.render_widget(error, area);
        return;
    }
    if !recent.has_entries() {
        return;
    }

    let header = Row::new(vec!["Id", "Customer", "Priority", "Status", "Created"])
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);

    let rows: Vec<Row> = recent
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let style = if i == screen.selected() {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else {
                Style::default()
            };
            Row::new(vec![
                entry.id.clone(),
                entry.customer_email.clone(),
                entry.priority.clone(),
                entry.status.clone(),
                entry.created_at.format("%Y-%m-%d %H:%M").to_string(),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(18),
        Constraint::Min(16),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(" Recent Requests ")
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(table, area);
}
