//! Client-side board state for one project.
//!
//! Holds the normalized column/task lists, derives per-column groupings,
//! applies optimistic local moves, and reconciles them against server
//! responses and socket pushes. All business rules beyond the two local
//! gating policies (frozen terminal column, repo access) live on the
//! backend; the reducer never invents transitions of its own.

use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use crate::events::{BoardEvent, TaskPatch};
use crate::snapshot::BoardSnapshot;
use crate::types::{Column, Project, RepoAccessMap, RepoKind, Stage, Task};

/// How a move is persisted, chosen by the source→target stage pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveAction {
    /// todo → doing: claim the task for the current user.
    Assign,
    /// doing → done: mark the task complete.
    Complete,
    /// doing → todo: release the task.
    Unassign,
    /// Server-defined custom columns: plain PATCH of the column key.
    Relocate,
}

impl MoveAction {
    pub fn endpoint(&self) -> Option<&'static str> {
        match self {
            MoveAction::Assign => Some("assign"),
            MoveAction::Complete => Some("complete"),
            MoveAction::Unassign => Some("unassign"),
            MoveAction::Relocate => None,
        }
    }
}

/// Why a move was refused locally, before any network call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoveDenied {
    #[error("task is in a terminal column and cannot move")]
    TerminalColumn,
    #[error("join the {0} repository to work on this task")]
    RepoAccessRequired(RepoKind),
    #[error("moving from '{from}' to '{to}' is not allowed")]
    IllegalTransition { from: String, to: String },
    #[error("unknown task")]
    UnknownTask,
    #[error("unknown column '{0}'")]
    UnknownColumn(String),
    #[error("a move for this task is already in flight")]
    AlreadyPending,
}

/// An optimistic move awaiting its persistence result. Holds everything
/// needed to revert exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    pub task_key: String,
    pub from: String,
    pub to: String,
    pub action: MoveAction,
}

#[derive(Debug, Clone, Default)]
pub struct BoardState {
    pub project: Option<Project>,
    columns: Vec<Column>,
    tasks: Vec<Task>,
    pending: HashMap<String, PendingMove>,
}

impl BoardState {
    pub fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        Self {
            project: snapshot.project,
            columns: snapshot.columns,
            tasks: snapshot.tasks,
            pending: HashMap::new(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn task(&self, key: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.key() == key)
    }

    fn task_mut(&mut self, key: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.key() == key)
    }

    pub fn column_by_key(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key() == key)
    }

    /// Tasks of one column, priority ascending (title as tiebreak so the
    /// ordering is stable across refreshes).
    pub fn column_tasks(&self, column_key: &str) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.column == column_key)
            .collect();
        tasks.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.title.cmp(&b.title)));
        tasks
    }

    pub fn is_pending(&self, task_key: &str) -> bool {
        self.pending.contains_key(task_key)
    }

    /// Local draggability check: terminal columns are frozen and
    /// repo-tagged tasks need an `Active` membership. Everything else is
    /// the backend's call.
    pub fn can_move(&self, task_key: &str, access: &RepoAccessMap) -> Result<(), MoveDenied> {
        let task = self.task(task_key).ok_or(MoveDenied::UnknownTask)?;
        if Stage::of(&task.column).is_terminal() {
            return Err(MoveDenied::TerminalColumn);
        }
        if let Some(repo) = task.repo {
            if !access.is_active(repo) {
                return Err(MoveDenied::RepoAccessRequired(repo));
            }
        }
        if self.pending.contains_key(task_key) {
            return Err(MoveDenied::AlreadyPending);
        }
        Ok(())
    }

    /// Pick the persistence action for a source→target pair, or refuse
    /// the pair outright.
    pub fn action_for(from: &str, to: &str) -> Result<MoveAction, MoveDenied> {
        let illegal = || MoveDenied::IllegalTransition {
            from: from.to_string(),
            to: to.to_string(),
        };
        match (Stage::of(from), Stage::of(to)) {
            (Stage::Todo, Stage::Doing) => Ok(MoveAction::Assign),
            (Stage::Doing, Stage::Done) => Ok(MoveAction::Complete),
            (Stage::Doing, Stage::Todo) => Ok(MoveAction::Unassign),
            // Nothing enters done directly from todo, nothing leaves done.
            (Stage::Todo, Stage::Done) | (Stage::Done, _) => Err(illegal()),
            // Review and rejected columns move only via the verification
            // endpoints, never by drag.
            (Stage::Review | Stage::Rejected, _) | (_, Stage::Review | Stage::Rejected) => {
                Err(illegal())
            }
            // Two distinct columns can canonicalize to the same stage;
            // there is no action for such a pair.
            (Stage::Todo, Stage::Todo) | (Stage::Doing, Stage::Doing) => Err(illegal()),
            (Stage::Other, _) | (_, Stage::Other) => Ok(MoveAction::Relocate),
        }
    }

    /// Apply a move optimistically. The returned [`PendingMove`] must be
    /// settled with [`confirm_move`](Self::confirm_move) or
    /// [`revert_move`](Self::revert_move) once persistence resolves.
    pub fn begin_move(
        &mut self,
        task_key: &str,
        to_column_key: &str,
        access: &RepoAccessMap,
    ) -> Result<PendingMove, MoveDenied> {
        self.can_move(task_key, access)?;
        if self.column_by_key(to_column_key).is_none() {
            return Err(MoveDenied::UnknownColumn(to_column_key.to_string()));
        }

        let from = self
            .task(task_key)
            .map(|t| t.column.clone())
            .ok_or(MoveDenied::UnknownTask)?;
        let action = Self::action_for(&from, to_column_key)?;

        let pending = PendingMove {
            task_key: task_key.to_string(),
            from,
            to: to_column_key.to_string(),
            action,
        };
        if let Some(task) = self.task_mut(task_key) {
            task.column = to_column_key.to_string();
        }
        debug!(task = %task_key, from = %pending.from, to = %pending.to, "optimistic move");
        self.pending.insert(task_key.to_string(), pending.clone());
        Ok(pending)
    }

    /// Settle a pending move after the backend accepted it. The server's
    /// returned task, when available, is merged so any server-side
    /// adjustments (assignee, verification) land too.
    pub fn confirm_move(&mut self, task_key: &str, server_task: Option<Task>) -> bool {
        let existed = self.pending.remove(task_key).is_some();
        if let Some(task) = server_task {
            self.merge_patch(TaskPatch::from(task));
        }
        existed
    }

    /// Roll an optimistic move back to its exact prior column.
    pub fn revert_move(&mut self, task_key: &str) -> bool {
        match self.pending.remove(task_key) {
            Some(pending) => {
                if let Some(task) = self.task_mut(task_key) {
                    task.column = pending.from;
                }
                debug!(task = %task_key, "reverted optimistic move");
                true
            }
            None => false,
        }
    }

    /// Merge an incoming socket event: known key shallow-merges, unknown
    /// key appends. Last write received wins.
    pub fn apply_event(&mut self, event: &BoardEvent) {
        debug!(kind = event.kind(), "applying board event");
        self.merge_patch(event.patch().clone());
    }

    fn merge_patch(&mut self, patch: TaskPatch) {
        let Some(key) = patch.key().map(str::to_string) else {
            debug!("dropping task payload without id or title");
            return;
        };
        match self.task_mut(&key) {
            Some(task) => patch.apply_to(task),
            None => {
                let fallback = self
                    .columns
                    .first()
                    .map(|c| c.key().to_string())
                    .unwrap_or_default();
                self.tasks.push(patch.into_task(&fallback));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::BoardResponse;
    use crate::types::{RepoJoinStatus, VerificationStatus};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn board() -> BoardState {
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
                    {"id":"t3","title":"T3","columnId":"doing","priority":1,"repo":"backend"},
                    {"id":"t4","title":"T4","columnId":"done","priority":1}
                ]
            }"#,
        )
        .unwrap();
        BoardState::from_snapshot(resp.normalize())
    }

    fn open_access() -> RepoAccessMap {
        let mut access = RepoAccessMap::new();
        access.set(RepoKind::Backend, RepoJoinStatus::Active);
        access.set(RepoKind::Frontend, RepoJoinStatus::Active);
        access.set(RepoKind::Contracts, RepoJoinStatus::Active);
        access
    }

    #[test]
    fn column_grouping_sorts_by_priority_ascending() {
        let board = board();
        let todo: Vec<&str> = board
            .column_tasks("todo")
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(todo, vec!["T2", "T1"]);
    }

    #[rstest]
    #[case("todo", "doing", MoveAction::Assign)]
    #[case("doing", "done", MoveAction::Complete)]
    #[case("doing", "todo", MoveAction::Unassign)]
    #[case("TODO", "IN_PROGRESS", MoveAction::Assign)]
    fn semantic_action_follows_the_column_pair(
        #[case] from: &str,
        #[case] to: &str,
        #[case] expected: MoveAction,
    ) {
        assert_eq!(BoardState::action_for(from, to).unwrap(), expected);
    }

    #[rstest]
    #[case("todo", "done")]
    #[case("done", "todo")]
    #[case("doing", "IN_REVIEW")]
    #[case("REJECTED", "doing")]
    fn illegal_pairs_are_refused(#[case] from: &str, #[case] to: &str) {
        assert!(BoardState::action_for(from, to).is_err());
    }

    #[test]
    fn custom_columns_fall_back_to_relocate() {
        assert_eq!(
            BoardState::action_for("backlog", "todo").unwrap(),
            MoveAction::Relocate
        );
    }

    #[test]
    fn task_count_is_conserved_across_a_move_cycle() {
        let mut board = board();
        let before = board.task_count();

        board.begin_move("t1", "doing", &open_access()).unwrap();
        assert_eq!(board.task_count(), before);

        board.revert_move("t1");
        assert_eq!(board.task_count(), before);

        board.begin_move("t1", "doing", &open_access()).unwrap();
        board.confirm_move("t1", None);
        assert_eq!(board.task_count(), before);
    }

    #[test]
    fn terminal_column_tasks_are_frozen() {
        let mut board = board();
        let denied = board.begin_move("t4", "doing", &open_access()).unwrap_err();
        assert_eq!(denied, MoveDenied::TerminalColumn);
        assert_eq!(board.task("t4").unwrap().column, "done");
    }

    #[test]
    fn repo_gated_task_without_active_membership_cannot_move() {
        let mut board = board();
        let access = RepoAccessMap::new(); // everything NONE
        let denied = board.begin_move("t3", "done", &access).unwrap_err();
        assert_eq!(denied, MoveDenied::RepoAccessRequired(RepoKind::Backend));
        assert_eq!(board.task("t3").unwrap().column, "doing");
    }

    #[test]
    fn invited_membership_is_not_enough() {
        let mut board = board();
        let mut access = RepoAccessMap::new();
        access.set(RepoKind::Backend, RepoJoinStatus::Invited);
        assert!(board.begin_move("t3", "done", &access).is_err());
    }

    #[test]
    fn optimistic_move_applies_immediately_and_reverts_exactly() {
        let mut board = board();
        let pending = board.begin_move("t1", "doing", &open_access()).unwrap();

        assert_eq!(pending.action, MoveAction::Assign);
        assert_eq!(board.task("t1").unwrap().column, "doing");
        assert!(board.is_pending("t1"));

        assert!(board.revert_move("t1"));
        assert_eq!(board.task("t1").unwrap().column, "todo");
        assert!(!board.is_pending("t1"));
    }

    #[test]
    fn second_move_on_the_same_task_waits_for_the_first() {
        let mut board = board();
        board.begin_move("t1", "doing", &open_access()).unwrap();
        let denied = board.begin_move("t1", "todo", &open_access()).unwrap_err();
        assert_eq!(denied, MoveDenied::AlreadyPending);
    }

    #[test]
    fn confirm_merges_the_server_returned_task() {
        let mut board = board();
        board.begin_move("t1", "doing", &open_access()).unwrap();

        let server_task: Task = serde_json::from_str(
            r#"{"id":"t1","title":"T1","columnId":"doing","priority":2,
                "assignee":{"email":"dev@x.io"}}"#,
        )
        .unwrap();
        board.confirm_move("t1", Some(server_task));

        let task = board.task("t1").unwrap();
        assert_eq!(task.column, "doing");
        assert_eq!(task.assignee.as_ref().unwrap().email, "dev@x.io");
        assert!(!board.is_pending("t1"));
    }

    #[test]
    fn event_for_known_task_merges_without_erasing_fields() {
        let mut board = board();
        let before = board.task_count();
        let event: BoardEvent = serde_json::from_str(
            r#"{"event":"task_updated","data":{"id":"t1","columnId":"doing"}}"#,
        )
        .unwrap();

        board.apply_event(&event);

        assert_eq!(board.task_count(), before);
        let task = board.task("t1").unwrap();
        assert_eq!(task.column, "doing");
        assert_eq!(task.title, "T1");
        assert_eq!(task.priority, 2);
    }

    #[test]
    fn event_for_unknown_task_appends_it() {
        let mut board = board();
        let before = board.task_count();
        let event: BoardEvent = serde_json::from_str(
            r#"{"event":"task_claimed","data":{"id":"t9","title":"New","columnId":"doing",
                "assignee":{"email":"dev@x.io"}}}"#,
        )
        .unwrap();

        board.apply_event(&event);

        assert_eq!(board.task_count(), before + 1);
        assert_eq!(board.task("t9").unwrap().column, "doing");
    }

    #[test]
    fn verify_event_updates_verification_state() {
        let mut board = board();
        let event: BoardEvent = serde_json::from_str(
            r#"{"event":"task_verified","data":{"id":"t3","verificationStatus":"APPROVED"}}"#,
        )
        .unwrap();

        board.apply_event(&event);

        assert_eq!(
            board.task("t3").unwrap().verification,
            VerificationStatus::Approved
        );
    }
}
