use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use tcm_core::enums::EntityType;
use tcm_core::responses::SearchResults;
use tcm_db::repos::search::SearchQuery;

use crate::error::ApiResult;
use crate::extract::ApiQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
    entity_type: Option<EntityType>,
    status: Option<String>,
    category: Option<String>,
}

pub async fn search(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> ApiResult<Json<SearchResults>> {
    let query = SearchQuery {
        q: params.q,
        entity_type: params.entity_type,
        status: params.status,
        category: params.category,
    };
    Ok(Json(state.service.search(&query).await?))
}
