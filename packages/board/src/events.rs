//! Board events pushed over the project socket channel.
//!
//! All three kinds carry a full or partial task payload and funnel into
//! the same merge path in [`crate::state::BoardState::apply_event`].

use serde::{Deserialize, Serialize};

use crate::types::{Assignee, RepoKind, Task, VerificationStatus};

/// An event from another client's action, relayed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum BoardEvent {
    TaskUpdated(TaskPatch),
    TaskClaimed(TaskPatch),
    TaskVerified(TaskPatch),
}

impl BoardEvent {
    pub fn patch(&self) -> &TaskPatch {
        match self {
            BoardEvent::TaskUpdated(p) | BoardEvent::TaskClaimed(p) | BoardEvent::TaskVerified(p) => {
                p
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BoardEvent::TaskUpdated(_) => "task_updated",
            BoardEvent::TaskClaimed(_) => "task_claimed",
            BoardEvent::TaskVerified(_) => "task_verified",
        }
    }
}

/// Partial task payload. Absent fields never erase present ones when
/// merged; last write wins per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<RepoKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(
        default,
        rename = "columnId",
        alias = "status",
        skip_serializing_if = "Option::is_none"
    )]
    pub column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Assignee>,
    #[serde(
        default,
        rename = "verificationStatus",
        skip_serializing_if = "Option::is_none"
    )]
    pub verification: Option<VerificationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TaskPatch {
    /// Lookup key carried by the patch: id, else title.
    pub fn key(&self) -> Option<&str> {
        self.id.as_deref().or(self.title.as_deref())
    }

    /// Shallow-merge this patch over an existing task.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone());
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(category) = &self.category {
            task.category = Some(category.clone());
        }
        if let Some(repo) = self.repo {
            task.repo = Some(repo);
        }
        if let Some(price) = self.price {
            task.price = Some(price);
        }
        if let Some(column) = &self.column {
            task.column = column.clone();
        }
        if let Some(assignee) = &self.assignee {
            task.assignee = Some(assignee.clone());
        }
        if let Some(verification) = self.verification {
            task.verification = verification;
        }
        if let Some(notes) = &self.notes {
            task.notes = Some(notes.clone());
        }
    }

    /// Materialize a task from a patch that arrived for an unknown id.
    pub fn into_task(self, fallback_column: &str) -> Task {
        Task {
            id: self.id,
            title: self.title.unwrap_or_else(|| "(untitled)".to_string()),
            description: self.description,
            priority: self.priority.unwrap_or(0),
            category: self.category,
            repo: self.repo,
            price: self.price,
            column: self
                .column
                .unwrap_or_else(|| fallback_column.to_string()),
            assignee: self.assignee,
            verification: self.verification.unwrap_or_default(),
            notes: self.notes,
        }
    }
}

impl From<Task> for TaskPatch {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: Some(task.title),
            description: task.description,
            priority: Some(task.priority),
            category: task.category,
            repo: task.repo,
            price: task.price,
            column: Some(task.column),
            assignee: task.assignee,
            verification: Some(task.verification),
            notes: task.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn events_parse_from_tagged_frames() {
        let frame = r#"{"event":"task_claimed","data":{"id":"t1","assignee":{"email":"dev@x.io"}}}"#;
        let event: BoardEvent = serde_json::from_str(frame).unwrap();
        assert_eq!(event.kind(), "task_claimed");
        assert_eq!(event.patch().id.as_deref(), Some("t1"));
    }

    #[test]
    fn verified_event_carries_verification_state() {
        let frame = r#"{"event":"task_verified","data":{"id":"t1","verificationStatus":"APPROVED","columnId":"DONE"}}"#;
        let event: BoardEvent = serde_json::from_str(frame).unwrap();
        assert_eq!(
            event.patch().verification,
            Some(VerificationStatus::Approved)
        );
        assert_eq!(event.patch().column.as_deref(), Some("DONE"));
    }

    #[test]
    fn patch_merge_leaves_absent_fields_alone() {
        let mut task: Task = serde_json::from_str(
            r#"{"id":"t1","title":"Keep me","description":"original","columnId":"doing","priority":3}"#,
        )
        .unwrap();
        let patch = TaskPatch {
            id: Some("t1".into()),
            column: Some("done".into()),
            ..Default::default()
        };

        patch.apply_to(&mut task);

        assert_eq!(task.column, "done");
        assert_eq!(task.title, "Keep me");
        assert_eq!(task.description.as_deref(), Some("original"));
        assert_eq!(task.priority, 3);
    }
}
