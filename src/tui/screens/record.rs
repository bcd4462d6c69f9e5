//! Record screen: the page a route opens for one service request.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::model::ServiceRequest;
use crate::tui::action::Action;
use crate::tui::app::Screen;
use crate::tui::router::RecordRoute;

/// Load status of the routed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordLoad {
    Loading,
    Loaded(ServiceRequest),
    Missing,
    Failed(String),
}

/// State for the record screen.
#[derive(Debug, Clone)]
pub struct RecordScreen {
    route: Option<RecordRoute>,
    load: RecordLoad,
}

impl Default for RecordScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordScreen {
    pub fn new() -> Self {
        Self {
            route: None,
            load: RecordLoad::Loading,
        }
    }

    /// Points the screen at a new route; the record starts loading.
    pub fn open(&mut self, route: RecordRoute) {
        self.route = Some(route);
        self.load = RecordLoad::Loading;
    }

    /// Stores the lookup result, unless it belongs to a route no longer shown.
    pub fn set_load(&mut self, record_id: &str, load: RecordLoad) {
        if self.route.as_ref().is_some_and(|r| r.record_id == record_id) {
            self.load = load;
        }
    }

    pub fn route(&self) -> Option<&RecordRoute> {
        self.route.as_ref()
    }

    pub fn load(&self) -> &RecordLoad {
        &self.load
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Backspace => {
                Action::Navigate(Screen::RequestForm)
            }
            KeyCode::F(1) => Action::Navigate(Screen::Help),
            _ => Action::None,
        }
    }
}

fn detail_lines(record: &ServiceRequest) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Yellow);
    let row = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("{name:<16}"), label), Span::raw(value)])
    };
    vec![
        row("Customer Email", record.customer_email.clone()),
        row("Priority", record.priority.to_string()),
        row("Status", record.status.clone()),
        row(
            "Created",
            record.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        ),
        Line::from(""),
        Line::from(Span::styled("Description", label)),
        Line::from(record.description.clone()),
    ]
}

/// Renders the record screen.
#[mutants::skip]
pub fn draw_record(state: &RecordScreen, frame: &mut Frame, area: Rect) {
    let title = match state.route() {
        Some(route) => format!(" {} · {} ", route.record_type, route.record_id),
        None => " Record ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [content_area, footer_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

    let lines = match state.load() {
        RecordLoad::Loading => vec![Line::from("Loading…")],
        RecordLoad::Loaded(record) => detail_lines(record),
        RecordLoad::Missing => vec![Line::from(Span::styled(
            "Record not found",
            Style::default().fg(Color::Red),
        ))],
        RecordLoad::Failed(err) => vec![Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))],
    };
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, content_area);

    let footer = Paragraph::new("q/Esc: back to form  F1: help")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}
