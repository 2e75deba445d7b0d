use ratatui::layout::Rect;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::state::{BoardView, NotesIntent};

/// Centered popup for the verification note forms.
pub fn render_notes_form(frame: &mut Frame, state: &BoardView, intent: &NotesIntent) {
    let title = match intent {
        NotesIntent::Submit { .. } => "Submit for review",
        NotesIntent::Review { approve: true, .. } => "Approve task",
        NotesIntent::Review { approve: false, .. } => "Reject task",
    };

    let area = centered_rect(60, 20, frame.area());
    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(Color::Cyan))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let text = vec![
        Line::from(Span::styled(
            "Notes (Enter to send, Esc to cancel):",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(Span::raw(format!("{}▏", state.notes.content()))),
    ];

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = (area.height * percent_y / 100).max(5);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
