use std::time::{Duration, Instant};

use atelier_board::{BoardState, RepoAccessMap, Stage, Task, VerificationStatus};

use crate::input::InputBuffer;

const TOAST_TTL: Duration = Duration::from_secs(4);

/// What the notes form will do on submit.
#[derive(Debug, Clone, PartialEq)]
pub enum NotesIntent {
    Submit { task_key: String },
    Review { task_key: String, approve: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Browse,
    EditNotes(NotesIntent),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToastKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub text: String,
    pub kind: ToastKind,
    created: Instant,
}

/// Why the board could not load; both render recoverable views.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    NotFound,
    Failed(String),
}

/// View state for one mounted board.
#[derive(Debug)]
pub struct BoardView {
    pub board: BoardState,
    pub access: RepoAccessMap,
    pub session_email: String,
    pub selected_column: usize,
    pub selected_task: usize,
    pub mode: Mode,
    pub notes: InputBuffer,
    pub toasts: Vec<Toast>,
    pub load_error: Option<LoadError>,
    pub loading: bool,
}

impl BoardView {
    pub fn new(session_email: impl Into<String>) -> Self {
        Self {
            board: BoardState::default(),
            access: RepoAccessMap::new(),
            session_email: session_email.into(),
            selected_column: 0,
            selected_task: 0,
            mode: Mode::Browse,
            notes: InputBuffer::new(),
            toasts: Vec::new(),
            load_error: None,
            loading: true,
        }
    }

    pub fn set_board(&mut self, board: BoardState) {
        self.board = board;
        self.load_error = None;
        self.loading = false;
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let columns = self.board.columns().len();
        if columns == 0 {
            self.selected_column = 0;
            self.selected_task = 0;
            return;
        }
        if self.selected_column >= columns {
            self.selected_column = columns - 1;
        }
        let tasks = self.selected_column_task_count();
        if tasks == 0 {
            self.selected_task = 0;
        } else if self.selected_task >= tasks {
            self.selected_task = tasks - 1;
        }
    }

    pub fn selected_column_key(&self) -> Option<&str> {
        self.board
            .columns()
            .get(self.selected_column)
            .map(|c| c.key())
    }

    fn selected_column_task_count(&self) -> usize {
        self.selected_column_key()
            .map(|key| self.board.column_tasks(key).len())
            .unwrap_or(0)
    }

    pub fn current_task(&self) -> Option<&Task> {
        let key = self.selected_column_key()?;
        self.board
            .column_tasks(key)
            .into_iter()
            .nth(self.selected_task)
    }

    pub fn current_task_key(&self) -> Option<String> {
        self.current_task().map(|t| t.key().to_string())
    }

    pub fn select_next_column(&mut self) {
        let columns = self.board.columns().len();
        if columns == 0 {
            return;
        }
        self.selected_column = (self.selected_column + 1) % columns;
        self.clamp_selection();
    }

    pub fn select_previous_column(&mut self) {
        let columns = self.board.columns().len();
        if columns == 0 {
            return;
        }
        self.selected_column = (self.selected_column + columns - 1) % columns;
        self.clamp_selection();
    }

    pub fn select_next_task(&mut self) {
        let tasks = self.selected_column_task_count();
        if tasks == 0 {
            return;
        }
        self.selected_task = (self.selected_task + 1) % tasks;
    }

    pub fn select_previous_task(&mut self) {
        let tasks = self.selected_column_task_count();
        if tasks == 0 {
            return;
        }
        self.selected_task = (self.selected_task + tasks - 1) % tasks;
    }

    // --- Verification gating -----------------------------------------
    //
    // The client only gates buttons on identity and status pairs; the
    // backend decides actual transition legality.

    /// The assignee may submit from an in-progress or rejected state.
    pub fn can_submit(&self, task: &Task) -> bool {
        task.is_assigned_to(&self.session_email)
            && matches!(Stage::of(&task.column), Stage::Doing | Stage::Rejected)
            && matches!(
                task.verification,
                VerificationStatus::NotSubmitted | VerificationStatus::Rejected
            )
    }

    /// The project owner may review a submitted task.
    pub fn can_review(&self, task: &Task) -> bool {
        self.board
            .project
            .as_ref()
            .is_some_and(|p| p.is_owned_by(&self.session_email))
            && task.verification == VerificationStatus::Submitted
    }

    // --- Toasts -------------------------------------------------------

    pub fn push_toast(&mut self, kind: ToastKind, text: impl Into<String>) {
        self.toasts.push(Toast {
            text: text.into(),
            kind,
            created: Instant::now(),
        });
    }

    pub fn prune_toasts(&mut self) {
        self.toasts.retain(|t| t.created.elapsed() < TOAST_TTL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_board::BoardResponse;
    use pretty_assertions::assert_eq;

    fn view() -> BoardView {
        let resp: BoardResponse = serde_json::from_str(
            r#"{
                "project": {"id":"p1","title":"Shop","ownerEmail":"owner@studio.dev","published":true},
                "columns": [
                    {"id":"todo","title":"To do","position":0},
                    {"id":"doing","title":"Doing","position":1},
                    {"id":"done","title":"Done","position":2}
                ],
                "tasks": [
                    {"id":"t1","title":"T1","columnId":"todo","priority":2},
                    {"id":"t2","title":"T2","columnId":"todo","priority":1},
                    {"id":"t3","title":"T3","columnId":"doing","priority":1,
                     "assignee":{"email":"dev@x.io"}}
                ]
            }"#,
        )
        .unwrap();
        let mut view = BoardView::new("dev@x.io");
        view.set_board(BoardState::from_snapshot(resp.normalize()));
        view
    }

    #[test]
    fn selection_follows_priority_order() {
        let view = view();
        // todo column sorts T2 (priority 1) before T1 (priority 2)
        assert_eq!(view.current_task().unwrap().title, "T2");
    }

    #[test]
    fn column_navigation_wraps() {
        let mut view = view();
        view.select_previous_column();
        assert_eq!(view.selected_column_key(), Some("done"));
        view.select_next_column();
        assert_eq!(view.selected_column_key(), Some("todo"));
    }

    #[test]
    fn task_navigation_wraps_within_the_column() {
        let mut view = view();
        view.select_next_task();
        assert_eq!(view.current_task().unwrap().title, "T1");
        view.select_next_task();
        assert_eq!(view.current_task().unwrap().title, "T2");
    }

    #[test]
    fn assignee_may_submit_from_doing() {
        let view = view();
        let task = view.board.task("t3").unwrap();
        assert!(view.can_submit(task));
        // but not someone else's task
        let other = view.board.task("t1").unwrap();
        assert!(!view.can_submit(other));
    }

    #[test]
    fn only_the_owner_reviews_submitted_tasks() {
        let mut view = view();
        let submitted: atelier_board::Task = serde_json::from_str(
            r#"{"id":"t3","title":"T3","columnId":"IN_REVIEW","verificationStatus":"SUBMITTED"}"#,
        )
        .unwrap();

        assert!(!view.can_review(&submitted));

        view.session_email = "owner@studio.dev".into();
        assert!(view.can_review(&submitted));
    }

    #[test]
    fn stale_toasts_are_pruned() {
        let mut view = view();
        view.push_toast(ToastKind::Info, "hello");
        view.prune_toasts();
        assert_eq!(view.toasts.len(), 1);
    }
}
