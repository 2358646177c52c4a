//! License verify, activate and deactivate handlers.
//!
//! License-state outcomes are reported with HTTP 200 and a `false` flag in
//! the body. Malformed requests get 400. Store failures and lost write
//! races surface through [`ApiError`].

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use licensehub_entity::license::DenialReason;
use licensehub_service::{Admission, Release};

use crate::dto::{
    ActivateResponse, DeactivateResponse, LicenseRequest, OperationDenied, VerifyDenied,
    VerifyResponse,
};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /verify
pub async fn verify(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let target = LicenseRequest::from_body(&body).and_then(LicenseRequest::into_admission_target);
    let (key, machine_id) = match target {
        Ok(target) => target,
        Err(reason) => return Ok(denied(reason, VerifyDenied::new(reason))),
    };

    let response = match state.license_service.verify(&key, &machine_id).await? {
        Admission::Granted(grant) => Json(VerifyResponse::from(grant)).into_response(),
        Admission::Rejected(rejection) => Json(VerifyDenied::from(rejection)).into_response(),
    };
    Ok(response)
}

/// POST /activate
pub async fn activate(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let target = LicenseRequest::from_body(&body).and_then(LicenseRequest::into_admission_target);
    let (key, machine_id) = match target {
        Ok(target) => target,
        Err(reason) => return Ok(denied(reason, OperationDenied::new(reason))),
    };

    let response = match state.license_service.activate(&key, &machine_id).await? {
        Admission::Granted(grant) => Json(ActivateResponse::from(grant)).into_response(),
        Admission::Rejected(rejection) => Json(OperationDenied::from(rejection)).into_response(),
    };
    Ok(response)
}

/// POST /deactivate
pub async fn deactivate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let target = LicenseRequest::from_body(&body).and_then(LicenseRequest::into_release_target);
    let (key, machine_id) = match target {
        Ok(target) => target,
        Err(reason) => return Ok(denied(reason, OperationDenied::new(reason))),
    };

    let response = match state.license_service.deactivate(&key, &machine_id).await? {
        Release::Released { machines_used, .. } => Json(DeactivateResponse {
            success: true,
            machines_used,
        })
        .into_response(),
        Release::NotFound => Json(OperationDenied::new(DenialReason::NotFound)).into_response(),
    };
    Ok(response)
}

fn denied<T: serde::Serialize>(reason: DenialReason, body: T) -> Response {
    let status = if reason.is_malformed_request() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };
    (status, Json(body)).into_response()
}
