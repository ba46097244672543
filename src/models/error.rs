use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

/// Machine-readable failure class of one fetch leg. Used for logs and metrics only,
/// callers always see a generic 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorClass {
    UrlBuild,
    RequestBuild,
    Transport,
    BodyRead,
    Decode,
    Validation,
}

impl FetchErrorClass {
    /// Label value for the `err_type` metric dimension.
    pub fn label(&self) -> &'static str {
        match self {
            FetchErrorClass::UrlBuild => "url_build",
            FetchErrorClass::RequestBuild => "request_build",
            FetchErrorClass::Transport => "transport",
            FetchErrorClass::BodyRead => "body_read",
            FetchErrorClass::Decode => "decode",
            FetchErrorClass::Validation => "validation",
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            FetchErrorClass::UrlBuild => "failed to build API url",
            FetchErrorClass::RequestBuild => "failed to build HTTP request",
            FetchErrorClass::Transport => "failed to do HTTP request",
            FetchErrorClass::BodyRead => "failed to read HTTP response body",
            FetchErrorClass::Decode => "failed to unmarshal HTTP response",
            FetchErrorClass::Validation => "failed to validate HTTP response",
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{}: {detail}", .class.label())]
pub struct FetchError {
    pub class: FetchErrorClass,
    pub status: StatusCode,
    pub detail: String,
}

impl FetchError {
    pub fn new(class: FetchErrorClass, detail: impl Into<String>) -> Self {
        Self {
            class,
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for FetchError {
    fn into_response(self) -> Response {
        (self.status, self.class.public_message()).into_response()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn response_hides_the_detail() {
        let detail = "expected value at line 1 column 1";
        let res = FetchError::new(FetchErrorClass::Decode, detail).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(body, FetchErrorClass::Decode.public_message());
        assert!(!body.contains(detail));
    }

    #[test]
    fn display_carries_class_and_detail() {
        let err = FetchError::new(FetchErrorClass::Transport, "connection refused");
        assert_eq!(err.to_string(), "transport: connection refused");
    }
}
