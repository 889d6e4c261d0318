use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use tcm_core::entities::{NewTag, Tag};
use tcm_core::pagination::Window;
use tcm_core::responses::TagListResponse;
use tcm_db::repos::tag::TagFilter;
use tcm_db::updates::tag::TagUpdate;

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    skip: Option<i64>,
    limit: Option<i64>,
    category: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> ApiResult<Json<TagListResponse>> {
    let window = Window::from_query(params.skip, params.limit)?;
    let filter = TagFilter {
        category: params.category,
    };
    let page = state.service.list_tags(&filter, window).await?;
    Ok(Json(TagListResponse {
        tags: page.items,
        total: page.total,
        skip: window.skip,
        limit: window.limit,
    }))
}

pub async fn categories(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.service.tag_categories().await?))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewTag>,
) -> ApiResult<(StatusCode, Json<Tag>)> {
    let tag = state.service.create_tag(input).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Tag>> {
    Ok(Json(state.service.get_tag(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(update): ApiJson<TagUpdate>,
) -> ApiResult<Json<Tag>> {
    Ok(Json(state.service.update_tag(id, update).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    state.service.delete_tag(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
