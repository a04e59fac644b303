//! Route handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use pathwise_application::MessageReply;
use pathwise_core::PathwiseError;
use pathwise_core::decision::Decision;
use pathwise_core::dialog::DialogSession;
use pathwise_core::ethics::{DecisionExplanation, EthicsGate, StateSnapshot, ValidationResult};
use pathwise_core::memory::{DEFAULT_RETRIEVE_LIMIT, MemoryRecord, MemoryStats, NewMemory};
use pathwise_core::planning::{
    CounterfactualReport, PlanningService, SimulationRequest, SimulationResult, counterfactual,
};
use pathwise_execution::PipelineEvent;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::ApiResult;
use crate::state::AppState;

const DEFAULT_EVENT_LIMIT: usize = 50;

// API types
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub user_id: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub response: MessageReply,
}

#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct DecideRequest {
    pub user_id: String,
    #[serde(default)]
    pub current_state: StateSnapshot,
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    pub proposed_action: String,
    #[serde(default)]
    pub current_state: StateSnapshot,
}

#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    pub decision: String,
}

#[derive(Debug, Deserialize)]
pub struct CounterfactualRequest {
    #[serde(default)]
    pub scenario: String,
}

#[derive(Debug, Serialize)]
pub struct StoreResponse {
    pub status: &'static str,
    pub memory_id: String,
}

#[derive(Debug, Deserialize)]
pub struct RetrieveRequest {
    pub user_id: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RetrieveResponse {
    pub count: usize,
    pub memories: Vec<MemoryRecord>,
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub limit: Option<usize>,
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "service": "pathwise",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "POST /message",
            "POST /chat/reset",
            "GET /dialog",
            "GET /dialog/{user_id}",
            "POST /planning/simulate",
            "POST /planning/counterfactual",
            "POST /rl/decide",
            "POST /ethics/validate",
            "POST /ethics/explain",
            "POST /memory/store",
            "POST /memory/retrieve",
            "GET /memory/stats/{user_id}",
            "GET /events",
            "GET /health",
        ],
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "pathwise" }))
}

pub async fn message(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> ApiResult<MessageResponse> {
    let response = state
        .services
        .orchestrator
        .handle_message(&request.user_id, &request.text)
        .await?;
    Ok(Json(MessageResponse { response }))
}

pub async fn reset(
    State(state): State<AppState>,
    Json(request): Json<UserRequest>,
) -> ApiResult<Value> {
    state.services.orchestrator.reset(&request.user_id).await?;
    Ok(Json(json!({ "status": "success", "message": "Conversation reset" })))
}

pub async fn dialog(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<DialogSession> {
    Ok(Json(state.services.orchestrator.session(&user_id).await?))
}

pub async fn dialogs(State(state): State<AppState>) -> ApiResult<Vec<DialogSession>> {
    Ok(Json(state.services.orchestrator.sessions().await?))
}

pub async fn simulate(
    State(state): State<AppState>,
    Json(request): Json<SimulationRequest>,
) -> ApiResult<SimulationResult> {
    if request.user_id.trim().is_empty() {
        return Err(PathwiseError::invalid_input("user_id must not be empty").into());
    }
    Ok(Json(state.services.simulator.simulate(request).await?))
}

pub async fn counterfactual_analysis(
    Json(request): Json<CounterfactualRequest>,
) -> Json<CounterfactualReport> {
    Json(counterfactual(&request.scenario))
}

pub async fn decide(
    State(state): State<AppState>,
    Json(request): Json<DecideRequest>,
) -> ApiResult<Decision> {
    let decision = state
        .services
        .recommender
        .recommend(&request.user_id, &request.current_state)
        .await?;
    Ok(Json(decision))
}

pub async fn validate(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> ApiResult<ValidationResult> {
    if let Some(user_id) = &request.user_id {
        tracing::debug!(user_id = %user_id, action = %request.proposed_action, "Validation requested");
    }
    let result = state
        .services
        .ethics
        .validate(&request.proposed_action, &request.current_state)
        .await?;
    Ok(Json(result))
}

pub async fn explain(
    State(state): State<AppState>,
    Json(request): Json<ExplainRequest>,
) -> Json<DecisionExplanation> {
    Json(state.services.ethics.explain(&request.decision))
}

pub async fn store_memory(
    State(state): State<AppState>,
    Json(memory): Json<NewMemory>,
) -> ApiResult<StoreResponse> {
    let memory_id = state.services.memory.store(memory).await?;
    Ok(Json(StoreResponse {
        status: "success",
        memory_id,
    }))
}

pub async fn retrieve_memories(
    State(state): State<AppState>,
    Json(request): Json<RetrieveRequest>,
) -> ApiResult<RetrieveResponse> {
    let limit = request.limit.unwrap_or(DEFAULT_RETRIEVE_LIMIT);
    let memories = state
        .services
        .memory
        .retrieve(&request.user_id, limit)
        .await?;
    Ok(Json(RetrieveResponse {
        count: memories.len(),
        memories,
    }))
}

pub async fn memory_stats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<MemoryStats> {
    Ok(Json(state.services.memory.stats(&user_id).await?))
}

pub async fn events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Json<Vec<PipelineEvent>> {
    Json(state.events.recent(query.limit.unwrap_or(DEFAULT_EVENT_LIMIT)))
}
