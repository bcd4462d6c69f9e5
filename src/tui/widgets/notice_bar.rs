//! Notice bar widget: one-line rendering of the current [`Notification`].

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::lifecycle::{Notification, Severity};

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Success => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
    }
}

/// Renders a one-line notice: `Title: message`, plus a dismiss hint when sticky.
///
/// Renders nothing if there is no notice.
#[mutants::skip]
pub fn draw_notice_bar(notice: Option<&Notification>, frame: &mut Frame, area: Rect) {
    let Some(notice) = notice else {
        return;
    };

    let color = severity_color(notice.severity);
    let mut spans = vec![
        Span::styled(
            format!("{}: ", notice.title),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(notice.message.clone(), Style::default().fg(color)),
    ];
    if notice.is_sticky() {
        spans.push(Span::styled(
            "  (Esc to dismiss)",
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
