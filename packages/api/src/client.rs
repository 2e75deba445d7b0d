//! HTTP client for the studio backend.
//!
//! Stateless: no retries, no caching. Every call maps the response
//! status onto the [`ApiError`] taxonomy and returns.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use atelier_board::{BoardResponse, MoveAction, Project, RepoKind, Task};
use atelier_config::Settings;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    CheckoutSessionRequest, CheckoutSessionResponse, ErrorBody, GenerateTasksRequest,
    GenerateTasksResponse, PendingVerificationsResponse, ProjectCreateRequest, RepoStatusResponse,
    VerificationReviewRequest, VerificationSubmitRequest,
};
use crate::subscription::{SubscriptionStatus, Tier};

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ColumnPatch<'a> {
    column_id: &'a str,
}

/// Client for every studio backend surface the dashboard consumes.
#[derive(Clone)]
pub struct StudioClient {
    http: Client,
    base_url: String,
    access_token: Option<String>,
    session_email: String,
}

impl StudioClient {
    pub fn new(settings: &Settings) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(settings.http_timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: settings.api_base().to_string(),
            access_token: settings.session.access_token.clone(),
            session_email: settings.session.email.clone(),
        })
    }

    /// Identity the backend resolves mutations against.
    pub fn session_email(&self) -> &str {
        &self.session_email
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    // --- Generator ---------------------------------------------------

    /// Split a project description into priced tasks.
    pub async fn generate_tasks(
        &self,
        request: &GenerateTasksRequest,
    ) -> ApiResult<GenerateTasksResponse> {
        debug!(title = %request.title, "generating tasks");
        let response = self
            .authorize(self.http.post(self.url("/projects/generate-tasks")))
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }

    // --- Community projects and board --------------------------------

    pub async fn projects(&self) -> ApiResult<Vec<Project>> {
        let response = self
            .authorize(self.http.get(self.url("/community/projects")))
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn create_project(&self, request: &ProjectCreateRequest) -> ApiResult<Project> {
        let response = self
            .authorize(self.http.post(self.url("/community/projects")))
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn project(&self, project_id: &str) -> ApiResult<Project> {
        let response = self
            .authorize(
                self.http
                    .get(self.url(&format!("/community/projects/{project_id}"))),
            )
            .send()
            .await?;
        read_json(response).await
    }

    /// Board snapshot for one project. 404 maps to [`ApiError::NotFound`]
    /// so the UI can render its dedicated empty state.
    pub async fn board(&self, project_id: &str) -> ApiResult<BoardResponse> {
        let response = self
            .authorize(
                self.http
                    .get(self.url(&format!("/community/projects/{project_id}/board"))),
            )
            .send()
            .await?;
        read_json(response).await
    }

    // --- Task mutation ------------------------------------------------

    /// Persist a move. Semantic actions go to their POST endpoints; the
    /// relocate fallback is a plain PATCH of the column key.
    pub async fn persist_move(
        &self,
        project_id: &str,
        task_id: &str,
        action: MoveAction,
        to_column: &str,
    ) -> ApiResult<Task> {
        match action.endpoint() {
            Some(name) => self.task_action(project_id, task_id, name).await,
            None => self.patch_task_column(task_id, to_column).await,
        }
    }

    async fn task_action(&self, project_id: &str, task_id: &str, action: &str) -> ApiResult<Task> {
        debug!(task = %task_id, action, "posting task action");
        let response = self
            .authorize(self.http.post(self.url(&format!(
                "/community/projects/{project_id}/tasks/{task_id}/{action}"
            ))))
            .send()
            .await?;
        read_json(response).await
    }

    async fn patch_task_column(&self, task_id: &str, column_id: &str) -> ApiResult<Task> {
        debug!(task = %task_id, column = %column_id, "patching task column");
        let response = self
            .authorize(
                self.http
                    .patch(self.url(&format!("/community/tasks/{task_id}"))),
            )
            .json(&ColumnPatch { column_id })
            .send()
            .await?;
        read_json(response).await
    }

    // --- Repo membership ----------------------------------------------

    pub async fn repo_status(
        &self,
        project_id: &str,
        kind: RepoKind,
    ) -> ApiResult<RepoStatusResponse> {
        let response = self
            .authorize(self.http.get(self.url(&format!(
                "/community/projects/{project_id}/repos/{kind}/status"
            ))))
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn request_join(
        &self,
        project_id: &str,
        kind: RepoKind,
    ) -> ApiResult<RepoStatusResponse> {
        let response = self
            .authorize(self.http.post(self.url(&format!(
                "/community/projects/{project_id}/repos/{kind}/join"
            ))))
            .send()
            .await?;
        read_json(response).await
    }

    // --- Verification workflow ----------------------------------------

    pub async fn submit_verification(&self, task_id: &str, notes: &str) -> ApiResult<Task> {
        let response = self
            .authorize(
                self.http
                    .post(self.url(&format!("/verification/tasks/{task_id}/submit"))),
            )
            .json(&VerificationSubmitRequest {
                notes: notes.to_string(),
            })
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn review_verification(
        &self,
        task_id: &str,
        approve: bool,
        notes: &str,
    ) -> ApiResult<Task> {
        let response = self
            .authorize(
                self.http
                    .post(self.url(&format!("/verification/tasks/{task_id}/review"))),
            )
            .json(&VerificationReviewRequest {
                approve,
                notes: notes.to_string(),
            })
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn pending_verifications(
        &self,
        project_id: &str,
    ) -> ApiResult<PendingVerificationsResponse> {
        let response = self
            .authorize(
                self.http
                    .get(self.url(&format!("/verification/projects/{project_id}/pending"))),
            )
            .send()
            .await?;
        read_json(response).await
    }

    // --- Billing ------------------------------------------------------

    pub async fn subscription_status(&self) -> ApiResult<SubscriptionStatus> {
        let response = self
            .authorize(self.http.get(self.url("/billing/subscription")))
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn create_checkout_session(&self, tier: Tier) -> ApiResult<CheckoutSessionResponse> {
        let response = self
            .authorize(self.http.post(self.url("/billing/checkout-session")))
            .json(&CheckoutSessionRequest { tier })
            .send()
            .await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()));
    }
    Err(error_for(status, response).await)
}

async fn error_for(status: StatusCode, response: Response) -> ApiError {
    let body = response.json::<ErrorBody>().await.ok();
    let message = body
        .as_ref()
        .map(ErrorBody::display_message)
        .unwrap_or_else(|| status.to_string());

    match status {
        StatusCode::NOT_FOUND => ApiError::NotFound,
        StatusCode::UNAUTHORIZED => ApiError::Authentication(message),
        StatusCode::FORBIDDEN => match body.as_ref().and_then(ErrorBody::gating_repo) {
            Some(repo) => ApiError::RepoAccessRequired { repo },
            None => ApiError::Authentication(message),
        },
        StatusCode::PAYMENT_REQUIRED => ApiError::SubscriptionRequired(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ApiError::Validation(message)
        }
        status => ApiError::Api {
            status: status.as_u16(),
            message,
        },
    }
}
