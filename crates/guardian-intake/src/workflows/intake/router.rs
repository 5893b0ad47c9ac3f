use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;
use tracing::{error, warn};

use super::domain::{failure_message, ApplicationRequest};
use super::service::{ApplicationIntakeService, IntakeError};
use crate::workflows::jotform::SubmissionGateway;

/// Well above realistic resume sizes; the encoder's own limits decide what reaches Jotform.
pub const MAX_REQUEST_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Router exposing the public application endpoint.
pub fn intake_router<G>(service: Arc<ApplicationIntakeService<G>>) -> Router
where
    G: SubmissionGateway + 'static,
{
    Router::new()
        .route("/api/v1/applications", post(submit_handler::<G>))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .with_state(service)
}

pub(crate) async fn submit_handler<G>(
    State(service): State<Arc<ApplicationIntakeService<G>>>,
    request: Result<axum::Json<ApplicationRequest>, JsonRejection>,
) -> Response
where
    G: SubmissionGateway + 'static,
{
    let axum::Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => return rejection_response(rejection),
    };

    match service.submit(request).await {
        Ok(accepted) => (StatusCode::ACCEPTED, axum::Json(accepted)).into_response(),
        Err(IntakeError::Validation(failure)) => {
            let payload = json!({
                "error": failure.to_string(),
                "fieldErrors": failure.field_errors,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(err @ IntakeError::InvalidAttachment { .. }) => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(IntakeError::Submission(err)) => {
            error!(error = %err, "Jotform submission failed");
            let payload = json!({
                "error": failure_message(),
            });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
        Err(IntakeError::Config(err)) => {
            error!(error = %err, "intake is misconfigured");
            let payload = json!({
                "error": failure_message(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

fn rejection_response(rejection: JsonRejection) -> Response {
    let status = rejection.status();
    let message = if status == StatusCode::PAYLOAD_TOO_LARGE {
        warn!(limit = MAX_REQUEST_BODY_BYTES, "application body exceeds limit");
        failure_message()
    } else {
        rejection.body_text()
    };
    (status, axum::Json(json!({ "error": message }))).into_response()
}
