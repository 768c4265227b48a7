//! Adapter from plain async request logic to framework handlers.

use std::future::Future;
use std::panic::AssertUnwindSafe;

use anyhow::anyhow;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::dispatch::error_api_response;
use crate::envelope::ApiResponse;

/// What user logic may resolve to.
pub enum HandlerOutcome {
    /// A fully built envelope, sent as-is.
    Response(ApiResponse),
    /// A raw value, wrapped as `data` and sent at 200.
    Data(Value),
    /// No response; the router's fallback answers instead.
    Skip,
}

impl From<ApiResponse> for HandlerOutcome {
    fn from(response: ApiResponse) -> Self {
        Self::Response(response)
    }
}

impl From<Value> for HandlerOutcome {
    fn from(value: Value) -> Self {
        Self::Data(value)
    }
}

impl From<()> for HandlerOutcome {
    fn from(_: ()) -> Self {
        Self::Skip
    }
}

/// Wrap an async request function into an axum-compatible handler.
///
/// The wrapper is the single recovery boundary: errors and panics from the
/// user future are classified by [`error_api_response`]; nothing escapes it
/// uncaught. It awaits exactly one future and adds no concurrency of its own.
pub fn async_handler<F, Fut, T>(
    func: F,
) -> impl Fn(Request) -> BoxFuture<'static, Response> + Clone + Send + Sync + 'static
where
    F: Fn(Request) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    T: Into<HandlerOutcome> + 'static,
{
    move |request| {
        let func = func.clone();
        async move {
            match AssertUnwindSafe(func(request)).catch_unwind().await {
                Ok(Ok(outcome)) => match outcome.into() {
                    HandlerOutcome::Response(response) => response.into_response(),
                    HandlerOutcome::Data(value) => {
                        ApiResponse::new().with_data(value).into_response()
                    }
                    HandlerOutcome::Skip => StatusCode::NOT_FOUND.into_response(),
                },
                Ok(Err(error)) => error_api_response(error),
                Err(panic) => error_api_response(anyhow!(panic_message(panic.as_ref()))),
            }
        }
        .boxed()
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::invalid_value_error;
    use crate::test_support::global_state_lock;
    use apikit_errors::ApiError;
    use axum::body::Body;
    use http_body_util::BodyExt;
    use serde_json::json;

    fn request() -> Request {
        Request::builder().uri("/").body(Body::empty()).unwrap()
    }

    async fn invoke<F, Fut, T>(func: F) -> (StatusCode, Option<Value>)
    where
        F: Fn(Request) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Into<HandlerOutcome> + 'static,
    {
        let response = async_handler(func)(request()).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).ok())
    }

    #[tokio::test]
    async fn envelope_results_are_sent_as_is() {
        let (status, body) = invoke(|_req| async {
            Ok(ApiResponse::new()
                .with_message("done")
                .with_status(StatusCode::CREATED))
        })
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.unwrap(), json!({"message": "done"}));
    }

    #[tokio::test]
    async fn raw_values_are_wrapped_as_data_at_200() {
        let (status, body) = invoke(|_req| async { Ok(json!({"message": "Welcome to app!"})) }).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.unwrap(), json!({"data": {"message": "Welcome to app!"}}));
    }

    #[tokio::test]
    async fn unit_results_skip_to_the_router_fallback() {
        let (status, _) = invoke(|_req| async { Ok(()) }).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn thrown_validation_errors_reach_the_dispatcher() {
        let (status, body) = invoke(|_req| async {
            Err::<(), _>(invalid_value_error("foo", "Foo is required."))
        })
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body.unwrap(),
            json!({"errors": {"foo": ["Foo is required."]}, "error": "Foo is required."})
        );
    }

    #[tokio::test]
    async fn thrown_unauthenticated_errors_reach_the_dispatcher() {
        let (status, body) =
            invoke(|_req| async { Err::<(), _>(ApiError::unauthenticated().into()) }).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body.unwrap(),
            json!({"message": "Unauthenticated", "errorCode": "unauthenticated"})
        );
    }

    #[tokio::test]
    async fn panics_are_recovered_as_server_errors() {
        let _guard = global_state_lock();
        crate::envelope::show_server_errors(true);

        let (status, body) = invoke(|_req| async {
            if true {
                panic!("handler defect");
            }
            Ok(())
        })
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body.unwrap()["serverError"]["message"],
            json!("handler defect")
        );
    }
}
