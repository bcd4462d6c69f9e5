//! Form widget for rendering labelled input rows.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

/// Height of one field row, including its border.
pub const ROW_HEIGHT: u16 = 3;

/// Render-time view of one input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    /// Label shown in the row's border.
    pub label: String,
    /// Current text value, or the selected option.
    pub value: String,
    /// Shown dimmed when `value` is empty.
    pub placeholder: String,
    /// Whether the field must be filled in on submit.
    pub required: bool,
    /// Whether the row has keyboard focus.
    pub focused: bool,
}

/// Renders field rows within the given area, one [`ROW_HEIGHT`] row each.
///
/// `invalid` outlines every row in red, since validation reports pass/fail
/// for the form as a whole.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_form(fields: &[FieldView], invalid: bool, frame: &mut Frame, area: Rect) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(ROW_HEIGHT))
        .collect();

    let rows = Layout::vertical(constraints).split(area);

    for (i, field) in fields.iter().enumerate() {
        let border_color = if field.focused {
            Color::Yellow
        } else if invalid {
            Color::Red
        } else {
            Color::DarkGray
        };

        let label = if field.required {
            format!("{} *", field.label)
        } else {
            field.label.clone()
        };

        let block = Block::default()
            .title(label)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));

        let mut spans = if field.value.is_empty() {
            vec![Span::styled(
                field.placeholder.clone(),
                Style::default().fg(Color::DarkGray),
            )]
        } else {
            vec![Span::raw(field.value.clone())]
        };
        if field.focused {
            spans.push(Span::styled(
                "\u{2588}",
                Style::default().add_modifier(Modifier::SLOW_BLINK),
            ));
        }

        let paragraph = Paragraph::new(Line::from(spans)).block(block);
        frame.render_widget(paragraph, rows[i]);
    }
}
