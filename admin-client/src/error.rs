//! Client error types

use std::fmt;

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Structured error body returned by the API
    #[error("{message}")]
    Api {
        code: i32,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Error body format returned by the API
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub code: i32,
    pub message: String,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

/// Store action that failed, used to phrase the user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    LoadingUsers,
    LoadingRoles,
    RemovingUser,
    UpdatingRole,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::LoadingUsers => write!(f, "loading users"),
            Action::LoadingRoles => write!(f, "loading roles"),
            Action::RemovingUser => write!(f, "removing user"),
            Action::UpdatingRole => write!(f, "updating role"),
        }
    }
}

/// Why a role name was rejected before sending
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleNameError {
    #[error("Role name is required")]
    Empty,

    #[error("A role named \"{0}\" already exists")]
    Duplicate(String),
}

/// Store error type
#[derive(Debug, Error)]
pub enum StoreError {
    /// A request failed for a reason other than supersession
    Request {
        action: Action,
        #[source]
        source: ClientError,
    },

    /// Rejected locally, nothing was sent
    InvalidRole(#[from] RoleNameError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request { action, source } => f.write_str(&problem_message(
                &action.to_string(),
                &source.to_string(),
                true,
            )),
            Self::InvalidRole(err) => write!(f, "{}", err),
        }
    }
}

impl StoreError {
    pub fn request(action: Action, source: ClientError) -> Self {
        Self::Request { action, source }
    }

    /// The failed action, if a request was made
    pub fn action(&self) -> Option<Action> {
        match self {
            Self::Request { action, .. } => Some(*action),
            Self::InvalidRole(_) => None,
        }
    }
}

/// Result type for store actions
pub type StoreResult<T> = Result<T, StoreError>;

/// User-facing banner text: `There was a problem {action}: {detail}. Please try again.`
pub fn problem_message(action: &str, detail: &str, try_again: bool) -> String {
    let detail = detail.trim_end_matches('.');
    if try_again {
        format!("There was a problem {}: {}. Please try again.", action, detail)
    } else {
        format!("There was a problem {}: {}.", action, detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_message() {
        assert_eq!(
            problem_message("loading users", "Not found: /users", true),
            "There was a problem loading users: Not found: /users. Please try again."
        );
        assert_eq!(
            problem_message("updating role", "name taken.", false),
            "There was a problem updating role: name taken."
        );
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::request(
            Action::RemovingUser,
            ClientError::Internal("database offline".into()),
        );
        assert_eq!(
            err.to_string(),
            "There was a problem removing user: Internal error: database offline. Please try again."
        );
        assert_eq!(err.action(), Some(Action::RemovingUser));
    }

    #[test]
    fn test_api_error_uses_server_message() {
        let err = StoreError::request(
            Action::UpdatingRole,
            ClientError::Api {
                code: 3001,
                message: "Role name already taken".into(),
                details: None,
            },
        );
        assert_eq!(
            err.to_string(),
            "There was a problem updating role: Role name already taken. Please try again."
        );
    }
}
