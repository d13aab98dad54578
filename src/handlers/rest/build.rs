//! Build suggestion endpoint.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::build::BuildResult;

#[derive(Debug, Deserialize)]
pub(super) struct SuggestParams {
    budget: Option<String>,
    usage: Option<String>,
}

/// `GET /api/build/suggest?budget=&usage=`
pub(super) async fn suggest(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Result<Json<BuildResult>, ApiError> {
    let budget = params
        .budget
        .as_deref()
        .and_then(|b| b.trim().parse::<f64>().ok())
        .ok_or(ApiError::InvalidBudget)?;
    // A missing usage resolves like an empty one: gaming weights, empty label.
    let usage = params.usage.as_deref().unwrap_or("");

    let result = state.allocator.suggest_build(budget, usage).await?;
    Ok(Json(result))
}
