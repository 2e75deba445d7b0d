// ABOUTME: Board domain type definitions
// ABOUTME: Projects, columns, tasks, assignees, and repo access state

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Logical repository types a project can carry, at most one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoKind {
    Backend,
    Frontend,
    Contracts,
}

impl RepoKind {
    pub fn display_name(&self) -> &str {
        match self {
            RepoKind::Backend => "backend",
            RepoKind::Frontend => "frontend",
            RepoKind::Contracts => "contracts",
        }
    }
}

impl std::fmt::Display for RepoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for RepoKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "backend" => Ok(RepoKind::Backend),
            "frontend" => Ok(RepoKind::Frontend),
            "contracts" => Ok(RepoKind::Contracts),
            other => Err(format!("unknown repo kind: {other}")),
        }
    }
}

/// Membership state of the current user in one of a project's repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RepoJoinStatus {
    #[default]
    None,
    Invited,
    Active,
}

/// Per-project view of the current user's repo memberships.
///
/// Tasks tagged with a repo kind are only movable once that repo is
/// `Active` for the user.
#[derive(Debug, Clone, Default)]
pub struct RepoAccessMap {
    statuses: HashMap<RepoKind, RepoJoinStatus>,
}

impl RepoAccessMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, kind: RepoKind, status: RepoJoinStatus) {
        self.statuses.insert(kind, status);
    }

    pub fn status(&self, kind: RepoKind) -> RepoJoinStatus {
        self.statuses.get(&kind).copied().unwrap_or_default()
    }

    pub fn is_active(&self, kind: RepoKind) -> bool {
        self.status(kind) == RepoJoinStatus::Active
    }
}

/// Verification workflow state layered on top of column membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    #[default]
    NotSubmitted,
    Submitted,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignee {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoRef {
    pub kind: RepoKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A community project. Created by the generator flow, owned by its
/// creator, read-mostly after publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub owner_email: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub repos: Vec<RepoRef>,
}

impl Project {
    pub fn is_owned_by(&self, email: &str) -> bool {
        self.owner_email.eq_ignore_ascii_case(email)
    }
}

/// A workflow column. Server-defined; the client never creates or
/// deletes columns, it only keys them stably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "columnId")]
    pub alt_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub position: i32,
}

impl Column {
    /// Stable client key: id, else alternate id, else title.
    pub fn key(&self) -> &str {
        self.id
            .as_deref()
            .or(self.alt_id.as_deref())
            .unwrap_or(&self.title)
    }
}

/// A single board task. Column membership (`column`) is the single
/// source of workflow state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Lower sorts first within a column.
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub category: Option<String>,
    /// Which of the project's repos this task belongs to; gates dragging.
    #[serde(default)]
    pub repo: Option<RepoKind>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, rename = "columnId", alias = "status")]
    pub column: String,
    #[serde(default)]
    pub assignee: Option<Assignee>,
    #[serde(default, rename = "verificationStatus")]
    pub verification: VerificationStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Task {
    /// Client key for lookups: id when present, else the title.
    /// Duplicate server ids are degraded to title keys at normalization.
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.title)
    }

    pub fn is_assigned_to(&self, email: &str) -> bool {
        self.assignee
            .as_ref()
            .is_some_and(|a| a.email.eq_ignore_ascii_case(email))
    }
}

/// Canonical workflow stage of a column key, across both the simple
/// (`todo`/`doing`/`done`) and extended (`TODO`/`IN_PROGRESS`/...)
/// column vocabularies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Todo,
    Doing,
    Review,
    Done,
    Rejected,
    Other,
}

impl Stage {
    pub fn of(column_key: &str) -> Self {
        match column_key.to_ascii_lowercase().as_str() {
            "todo" => Stage::Todo,
            "doing" | "in_progress" => Stage::Doing,
            "in_review" => Stage::Review,
            "done" => Stage::Done,
            "rejected" => Stage::Rejected,
            _ => Stage::Other,
        }
    }

    /// Tasks in a terminal column are frozen; nothing moves out of done.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn column_key_falls_back_from_id_to_alt_id_to_title() {
        let full = Column {
            id: Some("c1".into()),
            alt_id: Some("alt".into()),
            title: "Todo".into(),
            position: 0,
        };
        assert_eq!(full.key(), "c1");

        let alt_only = Column {
            id: None,
            alt_id: Some("alt".into()),
            title: "Todo".into(),
            position: 0,
        };
        assert_eq!(alt_only.key(), "alt");

        let title_only = Column {
            id: None,
            alt_id: None,
            title: "Todo".into(),
            position: 0,
        };
        assert_eq!(title_only.key(), "Todo");
    }

    #[test]
    fn stage_recognizes_both_column_vocabularies() {
        assert_eq!(Stage::of("todo"), Stage::Todo);
        assert_eq!(Stage::of("TODO"), Stage::Todo);
        assert_eq!(Stage::of("doing"), Stage::Doing);
        assert_eq!(Stage::of("IN_PROGRESS"), Stage::Doing);
        assert_eq!(Stage::of("IN_REVIEW"), Stage::Review);
        assert_eq!(Stage::of("DONE"), Stage::Done);
        assert_eq!(Stage::of("REJECTED"), Stage::Rejected);
        assert_eq!(Stage::of("backlog"), Stage::Other);
        assert!(Stage::of("done").is_terminal());
        assert!(!Stage::of("doing").is_terminal());
    }

    #[test]
    fn task_deserializes_from_either_column_field() {
        let by_column_id: Task =
            serde_json::from_str(r#"{"title":"T","columnId":"todo"}"#).unwrap();
        assert_eq!(by_column_id.column, "todo");

        let by_status: Task = serde_json::from_str(r#"{"title":"T","status":"doing"}"#).unwrap();
        assert_eq!(by_status.column, "doing");
    }

    #[test]
    fn verification_status_uses_wire_casing() {
        let task: Task = serde_json::from_str(
            r#"{"title":"T","columnId":"doing","verificationStatus":"NOT_SUBMITTED"}"#,
        )
        .unwrap();
        assert_eq!(task.verification, VerificationStatus::NotSubmitted);
    }

    #[test]
    fn repo_access_defaults_to_none() {
        let access = RepoAccessMap::new();
        assert_eq!(access.status(RepoKind::Backend), RepoJoinStatus::None);
        assert!(!access.is_active(RepoKind::Backend));
    }
}
