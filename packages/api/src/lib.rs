//! Typed HTTP client over the studio's external backend.
//!
//! Everything here is consumed, never implemented: task generation,
//! pricing, repo provisioning, and payment all happen on the backend.

pub mod client;
pub mod error;
pub mod models;
pub mod subscription;

pub use client::StudioClient;
pub use error::{ApiError, ApiResult};
pub use models::{
    CheckoutSessionResponse, GenerateTasksRequest, GenerateTasksResponse, GeneratedTask,
    PendingVerificationsResponse, ProjectCreateRequest, RepoStatusResponse,
};
pub use subscription::{SubscriptionStatus, Tier};
