#[derive(Debug)]
pub enum ServerError {
    Io(std::io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "server io error: {err}"),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<std::io::Error> for ServerError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Debug)]
struct HttpApiError {
    status: StatusCode,
    error: ApiError,
}

impl HttpApiError {
    fn session_not_found(session_id: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: ApiError::new(
                ErrorCode::SessionNotFound,
                "session_id does not match an active session",
                Some(format!("session_id={session_id}")),
            ),
        }
    }

    fn invalid_request(message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: ApiError::new(ErrorCode::InvalidRequest, message, details),
        }
    }

    fn internal(message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: ApiError::new(ErrorCode::InternalError, message, details),
        }
    }

    /// Input mistakes map to 400; rejected-but-well-formed actions (wrong
    /// phase, budget, incomplete package) map to 409 so clients can retry
    /// after changing session state rather than the request shape.
    fn from_action(err: &ActionError) -> Self {
        let status = match err {
            ActionError::UnknownArea { .. } | ActionError::InvalidOption { .. } => {
                StatusCode::BAD_REQUEST
            }
            ActionError::BudgetExceeded { .. }
            | ActionError::PhaseViolation { .. }
            | ActionError::IncompletePackage { .. } => StatusCode::CONFLICT,
        };
        Self {
            status,
            error: err.to_api_error(),
        }
    }

    fn from_persistence(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotAttached => {
                Self::invalid_request("persistence store is not attached", None)
            }
            PersistenceError::SessionAlreadyExists(session_id) => Self {
                status: StatusCode::CONFLICT,
                error: ApiError::new(
                    ErrorCode::SessionStateConflict,
                    "session_id already persisted; pass replace_existing=true to replace",
                    Some(format!("session_id={session_id}")),
                ),
            },
            other => Self::internal("persistence operation failed", Some(other.to_string())),
        }
    }
}

impl IntoResponse for HttpApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}
