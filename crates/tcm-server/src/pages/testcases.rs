use std::fmt::Write;

use axum::Form;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use tcm_core::entities::{NewTestCase, TestCase};
use tcm_core::enums::{TestCasePriority, TestCaseStatus};
use tcm_core::pagination::{DEFAULT_PAGE_SIZE, Page};
use tcm_db::repos::testcase::TestCaseFilter;
use tcm_db::updates::testcase::TestCaseUpdate;

use super::error::{PageResult, form_message};
use super::form::{FormFields, lenient};
use super::render::{
    badge, enum_select, escape, input, messages, pagination, post_button, query_string, select,
    tag_badges, tag_picker, textarea,
};
use super::{Flash, format_timestamp, optional_text, page, redirect_with};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    page: Option<String>,
    page_size: Option<String>,
    search: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    tag_id: Option<String>,
    success: Option<String>,
    error: Option<String>,
}

pub async fn list(State(state): State<AppState>, Query(q): Query<ListQuery>) -> PageResult {
    let window = Page::clamped(lenient(q.page.as_deref()), lenient(q.page_size.as_deref()));
    let search = q.search.as_deref().unwrap_or("").trim().to_string();
    let status: Option<TestCaseStatus> = lenient(q.status.as_deref());
    let priority: Option<TestCasePriority> = lenient(q.priority.as_deref());
    let tag_id: Option<i64> = lenient::<i64>(q.tag_id.as_deref()).filter(|id| *id > 0);

    let filter = TestCaseFilter {
        search: (!search.is_empty()).then(|| search.clone()),
        status,
        priority,
        tag_id,
    };
    let result = state.service.list_testcases(&filter, window.window()).await?;
    let tags = state.service.all_tags().await?;

    let status_str = status.map_or("", TestCaseStatus::as_str);
    let priority_str = priority.map_or("", TestCasePriority::as_str);
    let tag_str = tag_id.map(|id| id.to_string()).unwrap_or_default();
    let tag_options: Vec<(String, String)> =
        tags.iter().map(|t| (t.id.to_string(), t.label())).collect();
    let tag_refs: Vec<(&str, &str)> = tag_options
        .iter()
        .map(|(v, l)| (v.as_str(), l.as_str()))
        .collect();

    let mut content = format!(
        r#"<div class="page-title"><h2>Test Cases</h2><a class="btn btn-primary" href="/testcases/new">New Test Case</a></div>
{}
<form method="get" action="/testcases" class="filter-form">
<input type="text" name="search" placeholder="Search title or description" value="{}">
{}
{}
{}
<button type="submit" class="btn">Filter</button>
<a href="/testcases" class="btn btn-link">Clear</a>
</form>"#,
        messages(
            q.success.as_deref().unwrap_or(""),
            q.error.as_deref().unwrap_or("")
        ),
        escape(&search),
        enum_select(
            "status",
            TestCaseStatus::ALL.iter().map(|s| s.as_str()),
            status_str,
            Some("All statuses")
        ),
        enum_select(
            "priority",
            TestCasePriority::ALL.iter().map(|p| p.as_str()),
            priority_str,
            Some("All priorities")
        ),
        select("tag_id", &tag_refs, &tag_str, Some("All tags")),
    );

    if result.items.is_empty() {
        content.push_str(r#"<p class="muted">No test cases found.</p>"#);
    } else {
        let _ = write!(
            content,
            r#"<p class="muted">{} test case(s)</p><table class="data-table"><thead><tr><th>ID</th><th>Title</th><th>Status</th><th>Priority</th><th>Tags</th></tr></thead><tbody>"#,
            result.total
        );
        for tc in &result.items {
            let _ = write!(
                content,
                r#"<tr><td>{id}</td><td><a href="/testcases/{id}">{title}</a></td><td>{status}</td><td>{priority}</td><td>{tags}</td></tr>"#,
                id = tc.id,
                title = escape(&tc.title),
                status = badge(tc.status.as_str(), tc.status.as_str()),
                priority = badge(tc.priority.as_str(), tc.priority.as_str()),
                tags = tag_badges(&tc.tags),
            );
        }
        content.push_str("</tbody></table>");
    }

    let size_str = if window.page_size == DEFAULT_PAGE_SIZE {
        String::new()
    } else {
        window.page_size.to_string()
    };
    let base = query_string(&[
        ("search", &search),
        ("status", status_str),
        ("priority", priority_str),
        ("tag_id", &tag_str),
        ("page_size", &size_str),
    ]);
    content.push_str(&pagination(
        "/testcases",
        &base,
        window.page,
        window.total_pages(result.total),
    ));

    Ok(page(&state, "Test Cases", &content).into_response())
}

// ---------------------------------------------------------------------------
// Create and edit
// ---------------------------------------------------------------------------

/// Raw form values, kept as submitted so a failed form can be shown again.
#[derive(Debug, Clone, Default)]
struct Draft {
    title: String,
    description: String,
    preconditions: String,
    steps: String,
    expected_results: String,
    actual_results: String,
    status: String,
    priority: String,
    tag_ids: Vec<i64>,
}

impl Draft {
    fn blank() -> Self {
        Self {
            status: TestCaseStatus::default().as_str().to_string(),
            priority: TestCasePriority::default().as_str().to_string(),
            ..Self::default()
        }
    }

    fn from_form(form: &FormFields) -> Self {
        let or_default = |key: &str, default: &str| {
            let value = form.get(key).trim();
            let chosen = if value.is_empty() { default } else { value };
            chosen.to_string()
        };
        Self {
            title: form.get("title").to_string(),
            description: form.get("description").to_string(),
            preconditions: form.get("preconditions").to_string(),
            steps: form.get("steps").to_string(),
            expected_results: form.get("expected_results").to_string(),
            actual_results: form.get("actual_results").to_string(),
            status: or_default("status", TestCaseStatus::default().as_str()),
            priority: or_default("priority", TestCasePriority::default().as_str()),
            tag_ids: form.ids("tag_ids"),
        }
    }

    fn from_testcase(tc: &TestCase) -> Self {
        Self {
            title: tc.title.clone(),
            description: tc.description.clone().unwrap_or_default(),
            preconditions: tc.preconditions.clone().unwrap_or_default(),
            steps: tc.steps.clone(),
            expected_results: tc.expected_results.clone(),
            actual_results: tc.actual_results.clone().unwrap_or_default(),
            status: tc.status.as_str().to_string(),
            priority: tc.priority.as_str().to_string(),
            tag_ids: tc.tags.iter().map(|t| t.id).collect(),
        }
    }

    fn enums(&self) -> Result<(TestCaseStatus, TestCasePriority), String> {
        match (
            self.status.parse::<TestCaseStatus>(),
            self.priority.parse::<TestCasePriority>(),
        ) {
            (Ok(status), Ok(priority)) => Ok((status, priority)),
            (Err(e), _) | (_, Err(e)) => Err(format!("Invalid status or priority: {e}")),
        }
    }

    fn to_new(&self) -> Result<NewTestCase, String> {
        let (status, priority) = self.enums()?;
        Ok(NewTestCase {
            title: self.title.clone(),
            description: Some(self.description.clone()),
            preconditions: Some(self.preconditions.clone()),
            steps: self.steps.clone(),
            expected_results: self.expected_results.clone(),
            actual_results: Some(self.actual_results.clone()),
            status,
            priority,
            tag_ids: self.tag_ids.clone(),
            ..NewTestCase::default()
        })
    }

    fn to_update(&self) -> Result<TestCaseUpdate, String> {
        let (status, priority) = self.enums()?;
        Ok(TestCaseUpdate {
            title: Some(self.title.clone()),
            description: Some(Some(self.description.clone())),
            preconditions: Some(Some(self.preconditions.clone())),
            steps: Some(self.steps.clone()),
            expected_results: Some(self.expected_results.clone()),
            actual_results: Some(Some(self.actual_results.clone())),
            status: Some(status),
            priority: Some(priority),
            updated_by: None,
            tag_ids: Some(self.tag_ids.clone()),
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Create,
    Edit(i64),
}

async fn render_form(state: &AppState, mode: Mode, draft: &Draft, error: &str) -> PageResult {
    let tags = state.service.all_tags().await?;
    let (heading, action, submit, cancel) = match mode {
        Mode::Create => (
            "New Test Case".to_string(),
            "/testcases/new".to_string(),
            "Create Test Case",
            "/testcases".to_string(),
        ),
        Mode::Edit(id) => (
            format!("Edit Test Case #{id}"),
            format!("/testcases/{id}/edit"),
            "Save Changes",
            format!("/testcases/{id}"),
        ),
    };

    let content = format!(
        r#"<h2>{heading}</h2>
{error}
<form method="post" action="{action}" class="entity-form">
{title}
{description}
{preconditions}
{steps}
{expected}
{actual}
<div class="form-row">
<div class="form-group"><label for="status">Status</label>{status}</div>
<div class="form-group"><label for="priority">Priority</label>{priority}</div>
</div>
{tags}
<div class="form-actions"><button type="submit" class="btn btn-primary">{submit}</button> <a class="btn btn-link" href="{cancel}">Cancel</a></div>
</form>"#,
        heading = escape(&heading),
        error = messages("", error),
        title = input("title", "Title", "text", &draft.title, true),
        description = textarea("description", "Description", &draft.description, false),
        preconditions = textarea("preconditions", "Preconditions", &draft.preconditions, false),
        steps = textarea("steps", "Steps", &draft.steps, true),
        expected = textarea(
            "expected_results",
            "Expected Results",
            &draft.expected_results,
            true
        ),
        actual = textarea(
            "actual_results",
            "Actual Results",
            &draft.actual_results,
            false
        ),
        status = enum_select(
            "status",
            TestCaseStatus::ALL.iter().map(|s| s.as_str()),
            &draft.status,
            None
        ),
        priority = enum_select(
            "priority",
            TestCasePriority::ALL.iter().map(|p| p.as_str()),
            &draft.priority,
            None
        ),
        tags = tag_picker(&tags, &draft.tag_ids),
        cancel = escape(&cancel),
    );
    Ok(page(state, &heading, &content).into_response())
}

pub async fn new_form(State(state): State<AppState>) -> PageResult {
    render_form(&state, Mode::Create, &Draft::blank(), "").await
}

pub async fn create(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult {
    let draft = Draft::from_form(&FormFields::new(pairs));
    let error = match draft.to_new() {
        Err(msg) => msg,
        Ok(input) => match state.service.create_testcase(input).await {
            Ok(tc) => {
                return Ok(redirect_with(
                    &format!("/testcases/{}", tc.id),
                    "success",
                    "Test case created successfully",
                ));
            }
            Err(err) => form_message(err)?,
        },
    };
    render_form(&state, Mode::Create, &draft, &error).await
}

pub async fn edit_form(State(state): State<AppState>, Path(id): Path<i64>) -> PageResult {
    let tc = state.service.get_testcase(id).await?;
    render_form(&state, Mode::Edit(id), &Draft::from_testcase(&tc), "").await
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult {
    let draft = Draft::from_form(&FormFields::new(pairs));
    let error = match draft.to_update() {
        Err(msg) => msg,
        Ok(update) => match state.service.update_testcase(id, update).await {
            Ok(_) => {
                return Ok(redirect_with(
                    &format!("/testcases/{id}"),
                    "success",
                    "Test case updated successfully",
                ));
            }
            Err(err) => form_message(err)?,
        },
    };
    render_form(&state, Mode::Edit(id), &draft, &error).await
}

// ---------------------------------------------------------------------------
// View and delete
// ---------------------------------------------------------------------------

pub async fn view(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(flash): Query<Flash>,
) -> PageResult {
    let tc = state.service.get_testcase(id).await?;
    let projects = state.service.projects_for_testcase(id).await?;

    let project_links = if projects.is_empty() {
        r#"<span class="muted">Not in any project</span>"#.to_string()
    } else {
        projects
            .iter()
            .map(|p| format!(r#"<a href="/projects/{}">{}</a>"#, p.id, escape(&p.name)))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let content = format!(
        r#"{flash}
<div class="page-title"><h2>{title}</h2>
<div class="actions"><a class="btn" href="/testcases/{id}/edit">Edit</a> {delete}</div></div>
<div class="badges">{status} {priority}</div>
<dl class="details">
<dt>Description</dt><dd>{description}</dd>
<dt>Preconditions</dt><dd>{preconditions}</dd>
<dt>Steps</dt><dd><pre>{steps}</pre></dd>
<dt>Expected Results</dt><dd><pre>{expected}</pre></dd>
<dt>Actual Results</dt><dd>{actual}</dd>
<dt>Tags</dt><dd>{tags}</dd>
<dt>Projects</dt><dd>{projects}</dd>
<dt>Created</dt><dd>{created_at}{created_by}</dd>
<dt>Updated</dt><dd>{updated_at}{updated_by}</dd>
</dl>
<p><a href="/testcases">&laquo; Back to test cases</a></p>"#,
        flash = flash.render(),
        title = escape(&tc.title),
        id = tc.id,
        delete = post_button(&format!("/testcases/{}/delete", tc.id), "Delete", "btn-danger"),
        status = badge(tc.status.as_str(), tc.status.as_str()),
        priority = badge(tc.priority.as_str(), tc.priority.as_str()),
        description = optional_text(tc.description.as_deref()),
        preconditions = optional_text(tc.preconditions.as_deref()),
        steps = escape(&tc.steps),
        expected = escape(&tc.expected_results),
        actual = optional_text(tc.actual_results.as_deref()),
        tags = tag_badges(&tc.tags),
        projects = project_links,
        created_at = format_timestamp(tc.created_at),
        created_by = by_line(tc.created_by.as_deref()),
        updated_at = format_timestamp(tc.updated_at),
        updated_by = by_line(tc.updated_by.as_deref()),
    );
    Ok(page(&state, &tc.title, &content).into_response())
}

fn by_line(user: Option<&str>) -> String {
    user.map(|u| format!(" by {}", escape(u))).unwrap_or_default()
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> PageResult {
    state.service.delete_testcase(id).await?;
    Ok(redirect_with(
        "/testcases",
        "success",
        "Test case deleted successfully",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn form(pairs: &[(&str, &str)]) -> FormFields {
        FormFields::new(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn draft_defaults_missing_enums() {
        let draft = Draft::from_form(&form(&[("title", "Login"), ("tag_ids", "2"), ("tag_ids", "5")]));
        assert_eq!(draft.status, "draft");
        assert_eq!(draft.priority, "medium");
        assert_eq!(draft.tag_ids, vec![2, 5]);
    }

    #[test]
    fn invalid_enum_is_a_form_error() {
        let draft = Draft::from_form(&form(&[("status", "finished")]));
        let err = draft.to_new().unwrap_err();
        assert!(err.starts_with("Invalid status or priority:"), "{err}");
        assert!(err.contains("finished"));
    }

    #[test]
    fn update_replaces_every_field() {
        let draft = Draft::from_form(&form(&[
            ("title", "T"),
            ("steps", "S"),
            ("expected_results", "E"),
            ("priority", "high"),
        ]));
        let update = draft.to_update().unwrap();
        assert_eq!(update.priority, Some(TestCasePriority::High));
        assert_eq!(update.tag_ids, Some(vec![]));
        assert_eq!(update.description, Some(Some(String::new())));
    }
}
