//! Reusable TUI widgets.

pub mod form;
pub mod notice_bar;

pub use form::{FieldView, draw_form};
pub use notice_bar::draw_notice_bar;

/// Flattens a rendered buffer into text, one line per row.
#[cfg(test)]
pub(crate) fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
    let mut s = String::new();
    for y in 0..buf.area.height {
        for x in 0..buf.area.width {
            s.push(buf[(x, y)].symbol().chars().next().unwrap_or(' '));
        }
        s.push('\n');
    }
    s
}
