//! Wire shapes for the board endpoint and their normalization.
//!
//! The backend has shipped two shapes for the same board: a flat
//! `{ project, columns, tasks }` payload and a columns-only payload with
//! tasks nested inside each column. Both are accepted here and reduced
//! to one in-memory contract: a column list plus a flat task list keyed
//! by column key.

use serde::Deserialize;
use std::collections::HashSet;
use tracing::warn;

use crate::types::{Column, Project, Task};

/// A column as it appears on the wire, possibly carrying nested tasks.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireColumn {
    #[serde(flatten)]
    pub column: Column,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Raw board payload from `GET /community/projects/:id/board`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardResponse {
    #[serde(default)]
    pub project: Option<Project>,
    pub columns: Vec<WireColumn>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// A normalized board: columns ordered by position, tasks flat.
#[derive(Debug, Clone)]
pub struct BoardSnapshot {
    pub project: Option<Project>,
    pub columns: Vec<Column>,
    pub tasks: Vec<Task>,
}

impl BoardResponse {
    pub fn normalize(self) -> BoardSnapshot {
        let mut columns: Vec<Column> = Vec::with_capacity(self.columns.len());
        let mut tasks: Vec<Task> = Vec::new();

        for wire in self.columns {
            let column_key = wire.column.key().to_string();
            for mut task in wire.tasks {
                // Nested tasks inherit the surrounding column when they
                // carry no membership of their own.
                if task.column.is_empty() {
                    task.column = column_key.clone();
                }
                tasks.push(task);
            }
            columns.push(wire.column);
        }
        columns.sort_by_key(|c| c.position);
        tasks.extend(self.tasks);

        dedupe_task_ids(&mut tasks);
        reparent_orphans(&columns, &mut tasks);

        BoardSnapshot {
            project: self.project,
            columns,
            tasks,
        }
    }
}

/// Duplicate server ids are a known backend fragility. The first holder
/// keeps the id; later holders fall back to title-based keys.
fn dedupe_task_ids(tasks: &mut [Task]) {
    let mut seen: HashSet<String> = HashSet::new();
    for task in tasks.iter_mut() {
        if let Some(id) = &task.id {
            if !seen.insert(id.clone()) {
                warn!(id = %id, title = %task.title, "duplicate task id; keying by title");
                task.id = None;
            }
        }
    }
}

/// Every task must sit in a known column. Unknown membership is mapped
/// to the first column rather than dropping the task.
fn reparent_orphans(columns: &[Column], tasks: &mut [Task]) {
    let keys: HashSet<&str> = columns.iter().map(|c| c.key()).collect();
    let Some(first) = columns.first().map(|c| c.key().to_string()) else {
        return;
    };
    for task in tasks.iter_mut() {
        if !keys.contains(task.column.as_str()) {
            warn!(task = %task.key(), column = %task.column, "unknown column; reparenting");
            task.column = first.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flat_payload() -> &'static str {
        r#"{
            "project": {"id":"p1","title":"Shop","ownerEmail":"owner@studio.dev","published":true},
            "columns": [
                {"id":"todo","title":"To do","position":0},
                {"id":"doing","title":"Doing","position":1},
                {"id":"done","title":"Done","position":2}
            ],
            "tasks": [
                {"id":"t1","title":"T1","columnId":"todo","priority":2},
                {"id":"t2","title":"T2","columnId":"todo","priority":1}
            ]
        }"#
    }

    #[test]
    fn flat_shape_normalizes_as_is() {
        let resp: BoardResponse = serde_json::from_str(flat_payload()).unwrap();
        let snapshot = resp.normalize();

        assert_eq!(snapshot.columns.len(), 3);
        assert_eq!(snapshot.tasks.len(), 2);
        assert_eq!(snapshot.project.unwrap().id, "p1");
    }

    #[test]
    fn nested_tasks_inherit_the_surrounding_column() {
        let resp: BoardResponse = serde_json::from_str(
            r#"{
                "columns": [
                    {"id":"todo","title":"To do","position":0,
                     "tasks":[{"title":"Nested","priority":1}]},
                    {"id":"done","title":"Done","position":1}
                ]
            }"#,
        )
        .unwrap();
        let snapshot = resp.normalize();

        assert_eq!(snapshot.tasks.len(), 1);
        assert_eq!(snapshot.tasks[0].column, "todo");
    }

    #[test]
    fn nested_tasks_keep_an_explicit_membership() {
        let resp: BoardResponse = serde_json::from_str(
            r#"{
                "columns": [
                    {"id":"todo","title":"To do","position":0,
                     "tasks":[{"title":"Explicit","columnId":"done"}]},
                    {"id":"done","title":"Done","position":1}
                ]
            }"#,
        )
        .unwrap();
        let snapshot = resp.normalize();
        assert_eq!(snapshot.tasks[0].column, "done");
    }

    #[test]
    fn columns_sort_by_position() {
        let resp: BoardResponse = serde_json::from_str(
            r#"{
                "columns": [
                    {"id":"done","title":"Done","position":2},
                    {"id":"todo","title":"To do","position":0},
                    {"id":"doing","title":"Doing","position":1}
                ]
            }"#,
        )
        .unwrap();
        let snapshot = resp.normalize();
        let keys: Vec<&str> = snapshot.columns.iter().map(|c| c.key()).collect();
        assert_eq!(keys, vec!["todo", "doing", "done"]);
    }

    #[test]
    fn duplicate_task_ids_degrade_to_title_keys() {
        let resp: BoardResponse = serde_json::from_str(
            r#"{
                "columns": [{"id":"todo","title":"To do","position":0}],
                "tasks": [
                    {"id":"t1","title":"First","columnId":"todo"},
                    {"id":"t1","title":"Second","columnId":"todo"}
                ]
            }"#,
        )
        .unwrap();
        let snapshot = resp.normalize();

        assert_eq!(snapshot.tasks.len(), 2);
        assert_eq!(snapshot.tasks[0].key(), "t1");
        assert_eq!(snapshot.tasks[1].key(), "Second");
    }

    #[test]
    fn unknown_column_membership_is_reparented_not_dropped() {
        let resp: BoardResponse = serde_json::from_str(
            r#"{
                "columns": [
                    {"id":"todo","title":"To do","position":0},
                    {"id":"done","title":"Done","position":1}
                ],
                "tasks": [{"id":"t1","title":"Stray","columnId":"nowhere"}]
            }"#,
        )
        .unwrap();
        let snapshot = resp.normalize();

        assert_eq!(snapshot.tasks.len(), 1);
        assert_eq!(snapshot.tasks[0].column, "todo");
    }
}
