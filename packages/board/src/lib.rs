//! Board domain types and the client-side task state for one project.
//!
//! The backend owns every business rule (who may move what, pricing,
//! fees); this package only normalizes snapshots, groups tasks into
//! columns, applies optimistic moves, and merges socket pushes.

pub mod events;
pub mod snapshot;
pub mod state;
pub mod types;

pub use events::{BoardEvent, TaskPatch};
pub use snapshot::{BoardResponse, BoardSnapshot, WireColumn};
pub use state::{BoardState, MoveAction, MoveDenied, PendingMove};
pub use types::{
    Assignee, Column, Project, RepoAccessMap, RepoJoinStatus, RepoKind, RepoRef, Stage, Task,
    VerificationStatus,
};
