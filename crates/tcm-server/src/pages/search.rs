use std::fmt::Write;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use tcm_core::enums::{EntityType, ProjectStatus, TestCaseStatus};
use tcm_core::responses::SearchResults;
use tcm_db::repos::search::SearchQuery;

use super::error::PageResult;
use super::form::lenient;
use super::page;
use super::render::{badge, escape, humanize, select, tag_badges};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct Params {
    q: Option<String>,
    entity_type: Option<String>,
    status: Option<String>,
    category: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub async fn search(State(state): State<AppState>, Query(params): Query<Params>) -> PageResult {
    let query = SearchQuery {
        q: params.q.as_deref().unwrap_or("").trim().to_string(),
        entity_type: lenient(params.entity_type.as_deref()),
        status: non_empty(params.status.as_deref()),
        category: non_empty(params.category.as_deref()),
    };
    let results = state.service.search(&query).await?;
    let categories = state.service.tag_categories().await?;

    let mut content = search_form(&query, &categories);
    if query.q.is_empty() {
        content.push_str(
            r#"<p class="muted">Enter a search term to find test cases, projects and tags.</p>"#,
        );
    } else {
        content.push_str(&render_results(&results));
    }
    Ok(page(&state, "Search", &content).into_response())
}

fn search_form(query: &SearchQuery, categories: &[String]) -> String {
    let entity = query.entity_type.map_or("", EntityType::as_str);
    let entity_options = [
        ("testcase", "Test Cases"),
        ("project", "Projects"),
        ("tag", "Tags"),
    ];

    // Statuses of both entity kinds, without repeats.
    let mut statuses: Vec<&str> = TestCaseStatus::ALL.iter().map(|s| s.as_str()).collect();
    for status in ProjectStatus::ALL {
        if !statuses.contains(&status.as_str()) {
            statuses.push(status.as_str());
        }
    }
    let status_labels: Vec<(&str, String)> = statuses.iter().map(|s| (*s, humanize(s))).collect();
    let status_options: Vec<(&str, &str)> = status_labels
        .iter()
        .map(|(v, l)| (*v, l.as_str()))
        .collect();
    let category_options: Vec<(&str, &str)> = categories
        .iter()
        .map(|c| (c.as_str(), c.as_str()))
        .collect();

    format!(
        r#"<h2>Search</h2>
<form method="get" action="/search" class="search-form">
<input type="search" name="q" value="{q}" placeholder="Search test cases, projects and tags" autofocus>
{entity}
{status}
{category}
<button type="submit" class="btn btn-primary">Search</button>
</form>"#,
        q = escape(&query.q),
        entity = select("entity_type", &entity_options, entity, Some("All types")),
        status = select(
            "status",
            &status_options,
            query.status.as_deref().unwrap_or(""),
            Some("Any status")
        ),
        category = select(
            "category",
            &category_options,
            query.category.as_deref().unwrap_or(""),
            Some("Any category")
        ),
    )
}

fn render_results(results: &SearchResults) -> String {
    let mut out = format!(
        r#"<p class="muted">{} result(s) for "{}"</p>"#,
        results.total,
        escape(&results.query)
    );
    if results.total == 0 {
        out.push_str(r#"<p class="muted">No results found.</p>"#);
        return out;
    }

    if !results.testcases.is_empty() {
        let _ = write!(
            out,
            r#"<section class="search-group"><h3>Test Cases ({})</h3><ul class="result-list">"#,
            results.testcases.len()
        );
        for tc in &results.testcases {
            let _ = write!(
                out,
                r#"<li><a href="/testcases/{}">{}</a> {} {}<p class="muted">{}</p><div>{}</div></li>"#,
                tc.id,
                escape(&tc.title),
                badge(tc.status.as_str(), tc.status.as_str()),
                badge(tc.priority.as_str(), tc.priority.as_str()),
                escape(tc.description.as_deref().unwrap_or("")),
                tag_badges(&tc.tags),
            );
        }
        out.push_str("</ul></section>");
    }

    if !results.projects.is_empty() {
        let _ = write!(
            out,
            r#"<section class="search-group"><h3>Projects ({})</h3><ul class="result-list">"#,
            results.projects.len()
        );
        for project in &results.projects {
            let _ = write!(
                out,
                r#"<li><a href="/projects/{}">{}</a> {}<p class="muted">{}</p></li>"#,
                project.id,
                escape(&project.name),
                badge(project.status.as_str(), project.status.as_str()),
                escape(project.description.as_deref().unwrap_or("")),
            );
        }
        out.push_str("</ul></section>");
    }

    if !results.tags.is_empty() {
        let _ = write!(
            out,
            r#"<section class="search-group"><h3>Tags ({})</h3><ul class="result-list">"#,
            results.tags.len()
        );
        for hit in &results.tags {
            let _ = write!(
                out,
                r#"<li><a href="/tags/{}/edit">{}</a> <span class="muted">used by {} test case(s)</span><p class="muted">{}</p></li>"#,
                hit.tag.id,
                escape(&hit.tag.label()),
                hit.testcase_count,
                escape(hit.tag.description.as_deref().unwrap_or("")),
            );
        }
        out.push_str("</ul></section>");
    }
    out
}
