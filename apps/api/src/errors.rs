use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Diagnostic detail is echoed to the caller on purpose: this service backs a
/// single-operator editing tool.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or unusable client input.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Stored JSON that could not be decoded. Not logged here: the handler
    /// logs it with the file path and parser error.
    #[error("{0}")]
    Decode(String),

    /// A collaborator (converter, model, filesystem write) failed.
    #[error("{error}: {details}")]
    Upstream {
        error: String,
        details: String,
        stack: Option<String>,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Upstream failure carrying the error's top-level message as `details`.
    pub fn upstream(error: &str, source: &anyhow::Error) -> Self {
        AppError::Upstream {
            error: error.to_string(),
            details: source.to_string(),
            stack: None,
        }
    }

    /// Upstream failure that also carries the full causal chain as `stack`.
    pub fn upstream_with_stack(error: &str, source: &anyhow::Error) -> Self {
        AppError::Upstream {
            error: error.to_string(),
            details: source.to_string(),
            stack: Some(format!("{source:?}")),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Decode(_) | AppError::Upstream { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::Validation(msg) | AppError::NotFound(msg) | AppError::Decode(msg) => {
                ErrorBody {
                    error: msg,
                    details: None,
                    stack: None,
                }
            }
            AppError::Upstream {
                error,
                details,
                stack,
            } => {
                match &stack {
                    Some(trace) => tracing::error!("{error}: {details}\n{trace}"),
                    None => tracing::error!("{error}: {details}"),
                }
                ErrorBody {
                    error,
                    details: Some(details),
                    stack,
                }
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                ErrorBody {
                    error: "Internal server error".to_string(),
                    details: Some(e.to_string()),
                    stack: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use anyhow::Context;
    use tracing_subscriber::layer::{Context as LayerContext, SubscriberExt};
    use tracing_subscriber::Layer;

    struct CountEvents(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for CountEvents {
        fn on_event(&self, _event: &tracing::Event<'_>, _ctx: LayerContext<'_, S>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn events_logged(err: AppError) -> usize {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(CountEvents(count.clone()));
        tracing::subscriber::with_default(subscriber, || {
            err.into_response();
        });
        count.load(Ordering::SeqCst)
    }

    #[test]
    fn test_decode_is_not_logged_again_on_response() {
        assert_eq!(events_logged(AppError::Decode("Error reading style JSON.".into())), 0);
        assert_eq!(
            events_logged(AppError::upstream("Failed to save style", &anyhow::anyhow!("disk full"))),
            1
        );
    }

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_is_400_with_error_only() {
        let (status, body) = body_json(AppError::Validation("Missing resume or JD".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"error": "Missing resume or JD"}));
    }

    #[tokio::test]
    async fn test_not_found_is_404() {
        let (status, body) = body_json(AppError::NotFound("gone".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "gone");
    }

    #[tokio::test]
    async fn test_upstream_with_stack_carries_chain() {
        let source = Err::<(), _>(std::io::Error::other("socket closed"))
            .context("model call failed")
            .unwrap_err();
        let (status, body) =
            body_json(AppError::upstream_with_stack("Server Error", &source)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Server Error");
        assert_eq!(body["details"], "model call failed");
        let stack = body["stack"].as_str().unwrap();
        assert!(stack.contains("socket closed"));
    }

    #[tokio::test]
    async fn test_upstream_without_stack_omits_field() {
        let source = anyhow::anyhow!("disk full");
        let (_, body) = body_json(AppError::upstream("Failed to save style", &source)).await;
        assert_eq!(body["details"], "disk full");
        assert!(body.get("stack").is_none());
    }
}
