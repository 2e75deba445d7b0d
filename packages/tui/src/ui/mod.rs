pub mod board;
pub mod forms;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::state::{BoardView, LoadError, Mode, ToastKind};

/// Main UI rendering function
pub fn render(frame: &mut Frame, state: &BoardView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Board area (flexible)
            Constraint::Length(1), // Status bar (fixed height)
        ])
        .split(frame.area());

    let main_area = chunks[0];
    let status_area = chunks[1];

    match &state.load_error {
        Some(error) => render_load_error(frame, error, main_area),
        None if state.loading => render_loading(frame, main_area),
        None => board::render_with_area(frame, state, main_area),
    }

    render_status_bar(frame, state, status_area);
    render_toasts(frame, state, main_area);

    if let Mode::EditNotes(intent) = &state.mode {
        forms::render_notes_form(frame, state, intent);
    }
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let block = Block::default().title("Board").borders(Borders::ALL);
    let paragraph = Paragraph::new("Loading board…")
        .block(block)
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(paragraph, area);
}

/// Every failure renders a recoverable view; nothing is fatal here.
fn render_load_error(frame: &mut Frame, error: &LoadError, area: Rect) {
    let (title, text) = match error {
        LoadError::NotFound => (
            "Board - Not found",
            "This project does not exist or is not published.\n\n\
             Keyboard shortcuts:\n• 'q' - Quit"
                .to_string(),
        ),
        LoadError::Failed(message) => (
            "Board - Failed to load",
            format!("{message}\n\nKeyboard shortcuts:\n• 'r' - Retry\n• 'q' - Quit"),
        ),
    };

    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL);
    let paragraph = Paragraph::new(text)
        .block(block)
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, state: &BoardView, area: Rect) {
    let project = state
        .board
        .project
        .as_ref()
        .map(|p| p.title.as_str())
        .unwrap_or("—");
    let text = format!(
        " {} • {} tasks • ←→ column • ↑↓ task • Shift+←→ move • s submit • a/x review • q quit",
        project,
        state.board.task_count()
    );
    let bar = Paragraph::new(text).style(Style::default().fg(Color::Black).bg(Color::Gray));
    frame.render_widget(bar, area);
}

/// Toasts stack in the top-right corner of the board area.
fn render_toasts(frame: &mut Frame, state: &BoardView, area: Rect) {
    for (i, toast) in state.toasts.iter().rev().take(4).enumerate() {
        let width = (toast.text.len() as u16 + 4).min(area.width.saturating_sub(2));
        let toast_area = Rect {
            x: area.right().saturating_sub(width + 1),
            y: area.y + 1 + (i as u16 * 3),
            width,
            height: 3,
        };
        let color = match toast.kind {
            ToastKind::Info => Color::Cyan,
            ToastKind::Error => Color::Red,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        let paragraph = Paragraph::new(toast.text.as_str())
            .block(block)
            .style(Style::default().fg(color));
        frame.render_widget(Clear, toast_area);
        frame.render_widget(paragraph, toast_area);
    }
}
