use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use atelier_board::{Task, VerificationStatus};

use crate::state::BoardView;

/// Render the board columns side by side.
pub fn render_with_area(frame: &mut Frame, state: &BoardView, area: Rect) {
    let columns = state.board.columns();
    if columns.is_empty() {
        let block = Block::default().title("Board").borders(Borders::ALL);
        let paragraph = Paragraph::new("This board has no columns yet.")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(paragraph, area);
        return;
    }

    let constraints: Vec<Constraint> = columns
        .iter()
        .map(|_| Constraint::Ratio(1, columns.len() as u32))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (index, column) in columns.iter().enumerate() {
        let tasks = state.board.column_tasks(column.key());
        let is_selected_column = index == state.selected_column;

        let title = format!("{} ({})", column.title, tasks.len());
        let border_color = if is_selected_column {
            Color::Green
        } else {
            Color::DarkGray
        };
        let block = Block::default()
            .title(title)
            .title_style(Style::default().fg(border_color))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));

        let items: Vec<ListItem> = tasks
            .iter()
            .map(|task| task_item(state, task))
            .collect();

        let mut list_state = ListState::default();
        if is_selected_column && !tasks.is_empty() {
            list_state.select(Some(state.selected_task.min(tasks.len() - 1)));
        }

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::Blue).add_modifier(Modifier::BOLD))
            .highlight_symbol("» ");

        frame.render_stateful_widget(list, chunks[index], &mut list_state);
    }
}

fn task_item<'a>(state: &BoardView, task: &'a Task) -> ListItem<'a> {
    let mut title_spans = vec![Span::styled(
        task.title.as_str(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    if state.board.is_pending(task.key()) {
        // In-flight persistence marker.
        title_spans.push(Span::styled(" …", Style::default().fg(Color::Yellow)));
    }

    let mut detail_spans = vec![Span::styled(
        format!("p{}", task.priority),
        Style::default().fg(Color::DarkGray),
    )];
    if let Some(price) = task.price {
        detail_spans.push(Span::raw("  "));
        detail_spans.push(Span::styled(
            format!("${price:.0}"),
            Style::default().fg(Color::Green),
        ));
    }
    if let Some(repo) = task.repo {
        detail_spans.push(Span::raw("  "));
        let repo_color = if state.access.is_active(repo) {
            Color::DarkGray
        } else {
            // Not joinable by this user yet; moving it will be refused.
            Color::Red
        };
        detail_spans.push(Span::styled(repo.to_string(), Style::default().fg(repo_color)));
    }
    if let Some(assignee) = &task.assignee {
        detail_spans.push(Span::raw("  "));
        detail_spans.push(Span::styled(
            format!("@{}", assignee.email),
            Style::default().fg(Color::Magenta),
        ));
    }
    if let Some(badge) = verification_badge(task.verification) {
        detail_spans.push(Span::raw("  "));
        detail_spans.push(badge);
    }

    ListItem::new(Text::from(vec![
        Line::from(title_spans),
        Line::from(detail_spans),
    ]))
}

fn verification_badge(status: VerificationStatus) -> Option<Span<'static>> {
    match status {
        VerificationStatus::NotSubmitted => None,
        VerificationStatus::Submitted => Some(Span::styled(
            "in review",
            Style::default().fg(Color::Yellow),
        )),
        VerificationStatus::Approved => {
            Some(Span::styled("approved", Style::default().fg(Color::Green)))
        }
        VerificationStatus::Rejected => {
            Some(Span::styled("rejected", Style::default().fg(Color::Red)))
        }
    }
}
