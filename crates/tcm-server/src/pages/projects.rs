use std::fmt::Write;

use axum::Form;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tcm_core::dates::{format_date, parse_optional_date};
use tcm_core::entities::{NewProject, Project};
use tcm_core::enums::ProjectStatus;
use tcm_core::pagination::{DEFAULT_PAGE_SIZE, Page};
use tcm_db::repos::project::ProjectFilter;
use tcm_db::updates::project::ProjectUpdate;

use super::error::{PageError, PageResult, form_message};
use super::form::{FormFields, lenient};
use super::render::{
    badge, enum_select, escape, input, messages, pagination, post_button, query_string, textarea,
};
use super::{Flash, format_timestamp, optional_text, page, redirect_with};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    page: Option<String>,
    page_size: Option<String>,
    status: Option<String>,
    success: Option<String>,
    error: Option<String>,
}

fn date_or_dash(date: Option<&DateTime<Utc>>) -> String {
    date.map_or_else(|| "-".to_string(), format_date)
}

pub async fn list(State(state): State<AppState>, Query(q): Query<ListQuery>) -> PageResult {
    let window = Page::clamped(lenient(q.page.as_deref()), lenient(q.page_size.as_deref()));
    let status: Option<ProjectStatus> = lenient(q.status.as_deref());
    let result = state
        .service
        .list_projects(&ProjectFilter { status }, window.window())
        .await?;

    let status_str = status.map_or("", ProjectStatus::as_str);
    let mut content = format!(
        r#"<div class="page-title"><h2>Projects</h2><a class="btn btn-primary" href="/projects/new">New Project</a></div>
{}
<form method="get" action="/projects" class="filter-form">
{}
<button type="submit" class="btn">Filter</button>
<a href="/projects" class="btn btn-link">Clear</a>
</form>"#,
        messages(
            q.success.as_deref().unwrap_or(""),
            q.error.as_deref().unwrap_or("")
        ),
        enum_select(
            "status",
            ProjectStatus::ALL.iter().map(|s| s.as_str()),
            status_str,
            Some("All statuses")
        ),
    );

    if result.items.is_empty() {
        content.push_str(r#"<p class="muted">No projects found.</p>"#);
    } else {
        content.push_str(
            r#"<table class="data-table"><thead><tr><th>ID</th><th>Name</th><th>Status</th><th>Start</th><th>End</th><th>Test Cases</th></tr></thead><tbody>"#,
        );
        for project in &result.items {
            let _ = write!(
                content,
                r#"<tr><td>{id}</td><td><a href="/projects/{id}">{name}</a></td><td>{status}</td><td>{start}</td><td>{end}</td><td>{count}</td></tr>"#,
                id = project.id,
                name = escape(&project.name),
                status = badge(project.status.as_str(), project.status.as_str()),
                start = date_or_dash(project.start_date.as_ref()),
                end = date_or_dash(project.end_date.as_ref()),
                count = project.testcase_ids.len(),
            );
        }
        content.push_str("</tbody></table>");
    }

    let size_str = if window.page_size == DEFAULT_PAGE_SIZE {
        String::new()
    } else {
        window.page_size.to_string()
    };
    let base = query_string(&[("status", status_str), ("page_size", &size_str)]);
    content.push_str(&pagination(
        "/projects",
        &base,
        window.page,
        window.total_pages(result.total),
    ));

    Ok(page(&state, "Projects", &content).into_response())
}

// ---------------------------------------------------------------------------
// Create and edit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
struct Draft {
    name: String,
    description: String,
    status: String,
    start_date: String,
    end_date: String,
}

/// Parsed form values.
struct Fields {
    status: ProjectStatus,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
}

impl Draft {
    fn blank() -> Self {
        Self {
            status: ProjectStatus::default().as_str().to_string(),
            ..Self::default()
        }
    }

    fn from_form(form: &FormFields) -> Self {
        Self {
            name: form.get("name").to_string(),
            description: form.get("description").to_string(),
            status: form.get("status").trim().to_string(),
            start_date: form.get("start_date").trim().to_string(),
            end_date: form.get("end_date").trim().to_string(),
        }
    }

    fn from_project(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone().unwrap_or_default(),
            status: project.status.as_str().to_string(),
            start_date: project.start_date.as_ref().map(format_date).unwrap_or_default(),
            end_date: project.end_date.as_ref().map(format_date).unwrap_or_default(),
        }
    }

    fn parse(&self) -> Result<Fields, String> {
        let status = if self.status.is_empty() {
            ProjectStatus::default()
        } else {
            self.status.parse().map_err(|e| format!("Invalid status: {e}"))?
        };
        let start_date = parse_optional_date(&self.start_date).map_err(|e| e.to_string())?;
        let end_date = parse_optional_date(&self.end_date).map_err(|e| e.to_string())?;
        Ok(Fields {
            status,
            start_date,
            end_date,
        })
    }

    fn to_new(&self) -> Result<NewProject, String> {
        let fields = self.parse()?;
        Ok(NewProject {
            name: self.name.clone(),
            description: Some(self.description.clone()),
            status: fields.status,
            start_date: fields.start_date,
            end_date: fields.end_date,
            ..NewProject::default()
        })
    }

    /// Replaces every editable field. Test case links are left alone.
    fn to_update(&self) -> Result<ProjectUpdate, String> {
        let fields = self.parse()?;
        Ok(ProjectUpdate {
            name: Some(self.name.clone()),
            description: Some(Some(self.description.clone())),
            status: Some(fields.status),
            start_date: Some(fields.start_date),
            end_date: Some(fields.end_date),
            ..ProjectUpdate::default()
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Create,
    Edit(i64),
}

fn render_form(state: &AppState, mode: Mode, draft: &Draft, error: &str) -> PageResult {
    let (heading, action, submit, cancel) = match mode {
        Mode::Create => (
            "New Project".to_string(),
            "/projects/new".to_string(),
            "Create Project",
            "/projects".to_string(),
        ),
        Mode::Edit(id) => (
            format!("Edit Project #{id}"),
            format!("/projects/{id}/edit"),
            "Save Changes",
            format!("/projects/{id}"),
        ),
    };
    let content = format!(
        r#"<h2>{heading}</h2>
{error}
<form method="post" action="{action}" class="entity-form">
{name}
{description}
<div class="form-group"><label for="status">Status</label>{status}</div>
<div class="form-row">
{start}
{end}
</div>
<div class="form-actions"><button type="submit" class="btn btn-primary">{submit}</button> <a class="btn btn-link" href="{cancel}">Cancel</a></div>
</form>"#,
        heading = escape(&heading),
        error = messages("", error),
        name = input("name", "Name", "text", &draft.name, true),
        description = textarea("description", "Description", &draft.description, false),
        status = enum_select(
            "status",
            ProjectStatus::ALL.iter().map(|s| s.as_str()),
            &draft.status,
            None
        ),
        start = input("start_date", "Start Date", "date", &draft.start_date, false),
        end = input("end_date", "End Date", "date", &draft.end_date, false),
    );
    Ok(page(state, &heading, &content).into_response())
}

pub async fn new_form(State(state): State<AppState>) -> PageResult {
    render_form(&state, Mode::Create, &Draft::blank(), "")
}

pub async fn create(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult {
    let draft = Draft::from_form(&FormFields::new(pairs));
    let error = match draft.to_new() {
        Err(msg) => msg,
        Ok(input) => match state.service.create_project(input).await {
            Ok(project) => {
                return Ok(redirect_with(
                    &format!("/projects/{}", project.id),
                    "success",
                    "Project created successfully",
                ));
            }
            Err(err) => form_message(err)?,
        },
    };
    render_form(&state, Mode::Create, &draft, &error)
}

pub async fn edit_form(State(state): State<AppState>, Path(id): Path<i64>) -> PageResult {
    let project = state.service.get_project(id).await?;
    render_form(&state, Mode::Edit(id), &Draft::from_project(&project), "")
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult {
    let draft = Draft::from_form(&FormFields::new(pairs));
    let error = match draft.to_update() {
        Err(msg) => msg,
        Ok(update) => match state.service.update_project(id, update).await {
            Ok(_) => {
                return Ok(redirect_with(
                    &format!("/projects/{id}"),
                    "success",
                    "Project updated successfully",
                ));
            }
            Err(err) => form_message(err)?,
        },
    };
    render_form(&state, Mode::Edit(id), &draft, &error)
}

// ---------------------------------------------------------------------------
// View, delete and test case links
// ---------------------------------------------------------------------------

pub async fn view(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(flash): Query<Flash>,
) -> PageResult {
    let project = state.service.get_project(id).await?;
    let members = state.service.project_testcases(id).await?;
    let candidates: Vec<_> = state
        .service
        .all_testcases()
        .await?
        .into_iter()
        .filter(|tc| !project.testcase_ids.contains(&tc.id))
        .collect();

    let mut content = format!(
        r#"{flash}
<div class="page-title"><h2>{name}</h2>
<div class="actions"><a class="btn" href="/projects/{id}/edit">Edit</a> {delete}</div></div>
<div class="badges">{status}</div>
<dl class="details">
<dt>Description</dt><dd>{description}</dd>
<dt>Start Date</dt><dd>{start}</dd>
<dt>End Date</dt><dd>{end}</dd>
<dt>Created</dt><dd>{created}</dd>
<dt>Updated</dt><dd>{updated}</dd>
</dl>
<section class="project-testcases"><h3>Test Cases <span class="muted">{count}</span></h3>"#,
        flash = flash.render(),
        name = escape(&project.name),
        id = project.id,
        delete = post_button(&format!("/projects/{id}/delete"), "Delete", "btn-danger"),
        status = badge(project.status.as_str(), project.status.as_str()),
        description = optional_text(project.description.as_deref()),
        start = date_or_dash(project.start_date.as_ref()),
        end = date_or_dash(project.end_date.as_ref()),
        created = format_timestamp(project.created_at),
        updated = format_timestamp(project.updated_at),
        count = members.len(),
    );

    if members.is_empty() {
        content.push_str(r#"<p class="muted">No test cases in this project yet.</p>"#);
    } else {
        content.push_str(
            r#"<table class="data-table"><thead><tr><th>ID</th><th>Title</th><th>Status</th><th>Priority</th><th></th></tr></thead><tbody>"#,
        );
        for tc in &members {
            let _ = write!(
                content,
                r#"<tr><td>{tc_id}</td><td><a href="/testcases/{tc_id}">{title}</a></td><td>{status}</td><td>{priority}</td><td>{remove}</td></tr>"#,
                tc_id = tc.id,
                title = escape(&tc.title),
                status = badge(tc.status.as_str(), tc.status.as_str()),
                priority = badge(tc.priority.as_str(), tc.priority.as_str()),
                remove = post_button(
                    &format!("/projects/{id}/testcases/{}/remove", tc.id),
                    "Remove",
                    "btn-small"
                ),
            );
        }
        content.push_str("</tbody></table>");
    }

    if candidates.is_empty() {
        content.push_str(
            r#"<p class="muted">All available test cases have been added to this project.</p>"#,
        );
    } else {
        let _ = write!(
            content,
            r#"<form method="post" action="/projects/{id}/testcases" class="add-testcases"><h4>Add test cases</h4>"#
        );
        for tc in &candidates {
            let _ = write!(
                content,
                r#"<label class="checkbox"><input type="checkbox" name="testcase_ids" value="{}"> {}</label>"#,
                tc.id,
                escape(&tc.title)
            );
        }
        content.push_str(
            r#"<button type="submit" class="btn btn-primary">Add Selected</button></form>"#,
        );
    }
    content.push_str(r#"</section><p><a href="/projects">&laquo; Back to projects</a></p>"#);

    Ok(page(&state, &project.name, &content).into_response())
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> PageResult {
    state.service.delete_project(id).await?;
    Ok(redirect_with(
        "/projects",
        "success",
        "Project deleted successfully",
    ))
}

/// Link the checked test cases (`testcase_ids`, or a single `testcase_id`).
/// One unknown or already linked id rejects the whole selection.
pub async fn add_testcases(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult {
    let form = FormFields::new(pairs);
    let mut ids = form.ids("testcase_ids");
    ids.extend(form.ids("testcase_id"));
    let back = format!("/projects/{id}");

    if ids.is_empty() {
        state.service.get_project(id).await?;
        return Ok(redirect_with(&back, "error", "Select at least one test case."));
    }

    ids.sort_unstable();
    ids.dedup();
    match state.service.add_testcases_to_project(id, &ids).await {
        Ok(_) => Ok(redirect_with(
            &back,
            "success",
            &format!("Added {} test case(s) to the project", ids.len()),
        )),
        Err(err) if err.is_not_found() => Err(PageError::from(err)),
        Err(err) => Ok(redirect_with(&back, "error", &form_message(err)?)),
    }
}

pub async fn remove_testcase(
    State(state): State<AppState>,
    Path((id, testcase_id)): Path<(i64, i64)>,
) -> PageResult {
    let back = format!("/projects/{id}");
    match state
        .service
        .remove_testcase_from_project(id, testcase_id)
        .await
    {
        Ok(_) => Ok(redirect_with(
            &back,
            "success",
            "Test case removed from project",
        )),
        Err(err) if err.is_not_found() => Err(PageError::from(err)),
        Err(err) => Ok(redirect_with(&back, "error", &form_message(err)?)),
    }
}
