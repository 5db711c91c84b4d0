//! Request bodies and the error-to-HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use crate::utils::ElectionError;

/// Query string for routes that act on one election. Absent means "current".
#[derive(Debug, Default, Deserialize)]
pub struct ElectionQuery {
    #[serde(default)]
    pub election_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateElectionRequest {
    pub election_name: String,
    #[serde(default)]
    pub difficulty: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SwitchElectionRequest {
    pub election_id: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterVoterRequest {
    pub voter_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub election_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterCandidateRequest {
    pub candidate_id: String,
    pub name: String,
    pub party: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub election_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CastVoteRequest {
    pub voter_id: String,
    pub candidate_id: String,
    pub private_key: String,
    #[serde(default)]
    pub election_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckStatusRequest {
    pub voter_id: String,
    #[serde(default)]
    pub election_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyReceiptRequest {
    pub transaction_hash: String,
    #[serde(default)]
    pub election_id: Option<String>,
}

pub(crate) fn status_of(err: &ElectionError) -> StatusCode {
    match err {
        ElectionError::NotFound(_) => StatusCode::NOT_FOUND,
        ElectionError::AlreadyExists(_)
        | ElectionError::AlreadyVoted(_)
        | ElectionError::EmptyPool
        | ElectionError::InvalidState(_)
        | ElectionError::InvalidTransition { .. } => StatusCode::CONFLICT,
        ElectionError::InvalidCredential => StatusCode::UNAUTHORIZED,
        ElectionError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ElectionError::ChainViolation(_) | ElectionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ElectionError {
    fn into_response(self) -> Response {
        if self.is_internal() {
            error!("request failed: {self}");
        }
        let body = Json(json!({ "success": false, "message": self.to_string() }));
        (status_of(&self), body).into_response()
    }
}
