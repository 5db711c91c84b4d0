use axum::extract::{Query, State};
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;
use crate::crypto::Hash;
use crate::election::ElectionManager;
use crate::rpc::types::*;
use crate::utils::metrics::METRICS;
use crate::utils::{ElectionError, Result};

/// Shared state behind every handler.
pub struct AppState {
    pub manager: Arc<ElectionManager>,
}

impl AppState {
    pub fn new(manager: Arc<ElectionManager>) -> Arc<Self> {
        Arc::new(Self { manager })
    }
}

type Reply = Result<Json<Value>>;

pub async fn health() -> &'static str {
    "ok"
}

pub async fn metrics() -> String {
    METRICS.render()
}

pub async fn list_elections(State(st): State<Arc<AppState>>) -> Reply {
    Ok(Json(json!({
        "success": true,
        "elections": st.manager.list(),
        "current_election_id": st.manager.current_id(),
    })))
}

pub async fn create_election(State(st): State<Arc<AppState>>, Json(req): Json<CreateElectionRequest>) -> Reply {
    let election = st.manager.create_election(&req.election_name, req.difficulty)?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Election '{}' created", election.name()),
        "election_id": election.id(),
        "difficulty": election.difficulty(),
    })))
}

pub async fn switch_election(State(st): State<Arc<AppState>>, Json(req): Json<SwitchElectionRequest>) -> Reply {
    let election = st.manager.switch(&req.election_id)?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Switched to election '{}'", election.name()),
    })))
}

pub async fn register_voter(State(st): State<Arc<AppState>>, Json(req): Json<RegisterVoterRequest>) -> Reply {
    let election = st.manager.resolve(req.election_id.as_deref())?;
    let secret = election.register_voter(&req.voter_id, &req.name, &req.email)?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Voter {} registered", req.voter_id),
        "voter_id": req.voter_id,
        "private_key": secret.to_hex(),
    })))
}

pub async fn register_candidate(State(st): State<Arc<AppState>>, Json(req): Json<RegisterCandidateRequest>) -> Reply {
    let election = st.manager.resolve(req.election_id.as_deref())?;
    election.register_candidate(&req.candidate_id, &req.name, &req.party, &req.description)?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Candidate {} registered", req.candidate_id),
    })))
}

pub async fn start_election(State(st): State<Arc<AppState>>, Query(q): Query<ElectionQuery>) -> Reply {
    let election = st.manager.resolve(q.election_id.as_deref())?;
    election.start()?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Election '{}' is now active", election.name()),
    })))
}

pub async fn end_election(State(st): State<Arc<AppState>>, Query(q): Query<ElectionQuery>) -> Reply {
    let election = st.manager.resolve(q.election_id.as_deref())?;
    let name = election.name().to_string();
    let sealed = tokio::task::spawn_blocking(move || election.end()).await??;
    Ok(Json(json!({
        "success": true,
        "message": format!("Election '{name}' has ended"),
        "final_block": sealed,
    })))
}

pub async fn cast_vote(State(st): State<Arc<AppState>>, Json(req): Json<CastVoteRequest>) -> Reply {
    let election = st.manager.resolve(req.election_id.as_deref())?;
    let receipt = election.cast_vote(&req.voter_id, &req.candidate_id, &req.private_key)?;
    Ok(Json(json!({
        "success": true,
        "message": "Vote cast successfully",
        "transaction_id": receipt.transaction_id,
        "transaction_hash": receipt.transaction_hash,
        "timestamp": receipt.timestamp,
        "pending_count": receipt.pending_count,
    })))
}

pub async fn check_status(State(st): State<Arc<AppState>>, Json(req): Json<CheckStatusRequest>) -> Reply {
    let election = st.manager.resolve(req.election_id.as_deref())?;
    let voter = election.voter_status(&req.voter_id)?;
    Ok(Json(json!({
        "success": true,
        "voter": {
            "voter_id": voter.voter_id,
            "name": voter.name,
            "email": voter.email,
            "has_voted": voter.has_voted,
        },
    })))
}

pub async fn mine_votes(State(st): State<Arc<AppState>>, Query(q): Query<ElectionQuery>) -> Reply {
    let election = st.manager.resolve(q.election_id.as_deref())?;
    let mined = tokio::task::spawn_blocking(move || election.mine()).await??;
    Ok(Json(json!({
        "success": true,
        "message": format!("Block {} mined with {} votes", mined.block_index, mined.transaction_count),
        "block_hash": mined.block_hash,
        "block_index": mined.block_index,
        "block_nonce": mined.block_nonce,
        "transaction_count": mined.transaction_count,
    })))
}

pub async fn verify_blockchain(State(st): State<Arc<AppState>>, Query(q): Query<ElectionQuery>) -> Reply {
    let election = st.manager.resolve(q.election_id.as_deref())?;
    let report = election.verify_chain();
    let message = match (&report.first_invalid, &report.reason) {
        _ if report.is_valid => "Blockchain is valid".to_string(),
        (Some(i), Some(r)) => format!("Blockchain integrity compromised at block {i}: {r}"),
        _ => "Blockchain integrity compromised".to_string(),
    };
    Ok(Json(json!({
        "success": true,
        "is_valid": report.is_valid,
        "message": message,
        "first_invalid_block": report.first_invalid,
    })))
}

pub async fn blockchain_data(State(st): State<Arc<AppState>>, Query(q): Query<ElectionQuery>) -> Reply {
    let election = st.manager.resolve(q.election_id.as_deref())?;
    let view = election.ledger_view();
    let blocks: Vec<Value> = view
        .blocks
        .iter()
        .map(|b| {
            json!({
                "index": b.index,
                "hash": b.hash,
                "previous_hash": b.previous_hash,
                "timestamp": b.timestamp,
                "nonce": b.nonce,
                "transaction_count": b.transactions.len(),
                "transactions": b.transactions,
            })
        })
        .collect();
    Ok(Json(json!({
        "success": true,
        "blocks": blocks,
        "pending_transactions": view.pending_transactions,
        "difficulty": view.difficulty,
        "is_valid": view.is_valid,
    })))
}

pub async fn stats(State(st): State<Arc<AppState>>, Query(q): Query<ElectionQuery>) -> Reply {
    let election = st.manager.resolve(q.election_id.as_deref())?;
    Ok(Json(json!({
        "success": true,
        "stats": election.stats(),
    })))
}

pub async fn results(State(st): State<Arc<AppState>>, Query(q): Query<ElectionQuery>) -> Reply {
    let election = st.manager.resolve(q.election_id.as_deref())?;
    let mut body = serde_json::to_value(election.results())?;
    body["success"] = json!(true);
    Ok(Json(body))
}

pub async fn candidates(State(st): State<Arc<AppState>>, Query(q): Query<ElectionQuery>) -> Reply {
    let election = st.manager.resolve(q.election_id.as_deref())?;
    Ok(Json(json!({
        "success": true,
        "election_name": election.name(),
        "state": election.state(),
        "candidates": election.candidates(),
    })))
}

pub async fn create_sample_data(State(st): State<Arc<AppState>>) -> Reply {
    let sample = st.manager.create_sample_data()?;
    Ok(Json(json!({
        "success": true,
        "message": format!(
            "Sample election created with {} candidates and {} voters",
            sample.election.candidates().len(),
            sample.credentials.len()
        ),
        "election_id": sample.election.id(),
        "voter_credentials": sample.credentials,
    })))
}

pub async fn verify_receipt(State(st): State<Arc<AppState>>, Json(req): Json<VerifyReceiptRequest>) -> Reply {
    let election = st.manager.resolve(req.election_id.as_deref())?;
    let receipt: Hash = req.transaction_hash.parse().map_err(ElectionError::InvalidInput)?;
    let status = election.receipt_status(&receipt)?;
    Ok(Json(json!({
        "success": true,
        "transaction_hash": status.transaction_hash,
        "status": status.status,
        "block_index": status.block_index,
    })))
}
