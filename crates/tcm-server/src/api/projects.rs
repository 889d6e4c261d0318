use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use tcm_core::entities::{NewProject, Project, TestCase};
use tcm_core::enums::ProjectStatus;
use tcm_core::pagination::Window;
use tcm_core::responses::ProjectListResponse;
use tcm_db::repos::project::ProjectFilter;
use tcm_db::updates::project::ProjectUpdate;

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    skip: Option<i64>,
    limit: Option<i64>,
    status: Option<ProjectStatus>,
}

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> ApiResult<Json<ProjectListResponse>> {
    let window = Window::from_query(params.skip, params.limit)?;
    let filter = ProjectFilter {
        status: params.status,
    };
    let page = state.service.list_projects(&filter, window).await?;
    Ok(Json(ProjectListResponse {
        projects: page.items,
        total: page.total,
        skip: window.skip,
        limit: window.limit,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewProject>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let project = state.service.create_project(input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Project>> {
    Ok(Json(state.service.get_project(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(update): ApiJson<ProjectUpdate>,
) -> ApiResult<Json<Project>> {
    Ok(Json(state.service.update_project(id, update).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    state.service.delete_project(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn testcases(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Vec<TestCase>>> {
    Ok(Json(state.service.project_testcases(id).await?))
}

pub async fn add_testcase(
    State(state): State<AppState>,
    ApiPath((id, testcase_id)): ApiPath<(i64, i64)>,
) -> ApiResult<Json<Project>> {
    Ok(Json(state.service.add_testcase_to_project(id, testcase_id).await?))
}

pub async fn remove_testcase(
    State(state): State<AppState>,
    ApiPath((id, testcase_id)): ApiPath<(i64, i64)>,
) -> ApiResult<Json<Project>> {
    Ok(Json(
        state
            .service
            .remove_testcase_from_project(id, testcase_id)
            .await?,
    ))
}
