// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Atelier

// Backend endpoints
pub const ATELIER_API_URL: &str = "ATELIER_API_URL";
pub const ATELIER_SOCKET_URL: &str = "ATELIER_SOCKET_URL";

// Session identity
pub const ATELIER_SESSION_EMAIL: &str = "ATELIER_SESSION_EMAIL";
pub const ATELIER_ACCESS_TOKEN: &str = "ATELIER_ACCESS_TOKEN";

// HTTP client tuning
pub const ATELIER_HTTP_TIMEOUT_SECS: &str = "ATELIER_HTTP_TIMEOUT_SECS";

// Logging
pub const ATELIER_LOG: &str = "ATELIER_LOG";
