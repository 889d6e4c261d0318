use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use tcm_core::entities::{NewTestCase, Project, TestCase};
use tcm_core::enums::{TestCasePriority, TestCaseStatus};
use tcm_core::pagination::Window;
use tcm_core::responses::TestCaseListResponse;
use tcm_db::repos::testcase::TestCaseFilter;
use tcm_db::updates::testcase::TestCaseUpdate;

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    skip: Option<i64>,
    limit: Option<i64>,
    status: Option<TestCaseStatus>,
    priority: Option<TestCasePriority>,
    tag_id: Option<i64>,
    search: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> ApiResult<Json<TestCaseListResponse>> {
    let window = Window::from_query(params.skip, params.limit)?;
    let filter = TestCaseFilter {
        search: params.search,
        status: params.status,
        priority: params.priority,
        tag_id: params.tag_id,
    };
    let page = state.service.list_testcases(&filter, window).await?;
    Ok(Json(TestCaseListResponse {
        testcases: page.items,
        total: page.total,
        skip: window.skip,
        limit: window.limit,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewTestCase>,
) -> ApiResult<(StatusCode, Json<TestCase>)> {
    let testcase = state.service.create_testcase(input).await?;
    Ok((StatusCode::CREATED, Json(testcase)))
}

pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<TestCase>> {
    Ok(Json(state.service.get_testcase(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(update): ApiJson<TestCaseUpdate>,
) -> ApiResult<Json<TestCase>> {
    Ok(Json(state.service.update_testcase(id, update).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    state.service.delete_testcase(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_tag(
    State(state): State<AppState>,
    ApiPath((id, tag_id)): ApiPath<(i64, i64)>,
) -> ApiResult<Json<TestCase>> {
    Ok(Json(state.service.add_tag_to_testcase(id, tag_id).await?))
}

pub async fn remove_tag(
    State(state): State<AppState>,
    ApiPath((id, tag_id)): ApiPath<(i64, i64)>,
) -> ApiResult<Json<TestCase>> {
    Ok(Json(state.service.remove_tag_from_testcase(id, tag_id).await?))
}

pub async fn projects(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(state.service.projects_for_testcase(id).await?))
}
