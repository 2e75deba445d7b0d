//! API request and response models for the studio backend

use atelier_board::{RepoJoinStatus, RepoKind, Task};
use serde::{Deserialize, Serialize};

use crate::subscription::Tier;

/// Generator request: a project description to split into priced tasks.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTasksRequest {
    pub title: String,
    pub description: String,
}

/// One task as produced by the generator, before any board exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub repo: Option<RepoKind>,
    pub price: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTasksResponse {
    pub tasks: Vec<GeneratedTask>,
    #[serde(default)]
    pub total_price: Option<f64>,
}

/// Publish a generated plan as a community project.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCreateRequest {
    pub title: String,
    pub description: String,
    pub tasks: Vec<GeneratedTask>,
    pub publish: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoStatusResponse {
    pub status: RepoJoinStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationSubmitRequest {
    pub notes: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReviewRequest {
    pub approve: bool,
    pub notes: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingVerificationsResponse {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionRequest {
    pub tier: Tier,
}

/// The backend creates the checkout session; the client only surfaces
/// its URL. Payment processing itself is out of scope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionResponse {
    pub url: String,
}

/// Standard backend error body.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn display_message(&self) -> String {
        self.message.clone().unwrap_or_else(|| self.error.clone())
    }

    /// Repo named by a `repo_access_required` gating error, when present.
    pub fn gating_repo(&self) -> Option<RepoKind> {
        if self.error != "repo_access_required" {
            return None;
        }
        self.details.as_deref()?.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn gating_error_names_its_repo() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"error":"repo_access_required","message":"Join the repo first","details":"backend"}"#,
        )
        .unwrap();
        assert_eq!(body.gating_repo(), Some(RepoKind::Backend));
        assert_eq!(body.display_message(), "Join the repo first");
    }

    #[test]
    fn other_errors_carry_no_repo() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error":"task_locked","details":"backend"}"#).unwrap();
        assert_eq!(body.gating_repo(), None);
        assert_eq!(body.display_message(), "task_locked");
    }

    #[test]
    fn generated_tasks_parse_with_prices() {
        let resp: GenerateTasksResponse = serde_json::from_str(
            r#"{"tasks":[{"title":"Schema","priority":1,"repo":"backend","price":120.0}],
                "totalPrice":120.0}"#,
        )
        .unwrap();
        assert_eq!(resp.tasks.len(), 1);
        assert_eq!(resp.tasks[0].price, 120.0);
    }
}
