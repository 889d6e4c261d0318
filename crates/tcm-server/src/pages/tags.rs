use std::fmt::Write;

use axum::Form;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;
use tcm_core::entities::{NewTag, Tag};
use tcm_core::pagination::Window;
use tcm_db::repos::tag::TagFilter;
use tcm_db::updates::tag::TagUpdate;

use super::error::{PageResult, form_message};
use super::form::FormFields;
use super::render::{escape, input, messages, post_button, select, textarea};
use super::{page, redirect_with};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    category: Option<String>,
    success: Option<String>,
    error: Option<String>,
}

fn tag_row(tag: &Tag) -> String {
    let kind = if tag.is_predefined { "Predefined" } else { "Custom" };
    format!(
        r#"<tr><td>{value}</td><td>{description}</td><td>{kind}</td><td><a class="btn btn-small" href="/tags/{id}/edit">Edit</a> {delete}</td></tr>"#,
        value = escape(&tag.value),
        description = escape(tag.description.as_deref().unwrap_or("")),
        id = tag.id,
        delete = post_button(&format!("/tags/{}/delete", tag.id), "Delete", "btn-small btn-danger"),
    )
}

const TABLE_HEAD: &str = r#"<table class="data-table"><thead><tr><th>Value</th><th>Description</th><th>Type</th><th></th></tr></thead><tbody>"#;

/// Filtered by one category, or every tag grouped under category headings.
pub async fn list(State(state): State<AppState>, Query(q): Query<ListQuery>) -> PageResult {
    let category = q
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);
    let categories = state.service.tag_categories().await?;
    let tags = match &category {
        Some(c) => {
            let filter = TagFilter {
                category: Some(c.clone()),
            };
            let window = Window {
                skip: 0,
                limit: u32::MAX,
            };
            state.service.list_tags(&filter, window).await?.items
        }
        None => state.service.all_tags().await?,
    };

    let options: Vec<(&str, &str)> = categories
        .iter()
        .map(|c| (c.as_str(), c.as_str()))
        .collect();
    let mut content = format!(
        r#"<div class="page-title"><h2>Tags</h2><a class="btn btn-primary" href="/tags/new">New Tag</a></div>
{}
<form method="get" action="/tags" class="filter-form">
{}
<button type="submit" class="btn">Filter</button>
<a href="/tags" class="btn btn-link">Clear</a>
</form>
<p class="muted">{} tag(s)</p>"#,
        messages(
            q.success.as_deref().unwrap_or(""),
            q.error.as_deref().unwrap_or("")
        ),
        select(
            "category",
            &options,
            category.as_deref().unwrap_or(""),
            Some("All categories")
        ),
        tags.len(),
    );

    if tags.is_empty() {
        content.push_str(r#"<p class="muted">No tags found.</p>"#);
    } else if category.is_some() {
        content.push_str(TABLE_HEAD);
        for tag in &tags {
            content.push_str(&tag_row(tag));
        }
        content.push_str("</tbody></table>");
    } else {
        // all_tags is ordered by category, so groups are contiguous.
        for group in tags.chunk_by(|a, b| a.category == b.category) {
            let _ = write!(
                content,
                r#"<section class="tag-category"><h3>{} <span class="muted">({})</span></h3>{TABLE_HEAD}"#,
                escape(&group[0].category),
                group.len()
            );
            for tag in group {
                content.push_str(&tag_row(tag));
            }
            content.push_str("</tbody></table></section>");
        }
    }

    Ok(page(&state, "Tags", &content).into_response())
}

// ---------------------------------------------------------------------------
// Create and edit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
struct Draft {
    category: String,
    value: String,
    description: String,
}

impl Draft {
    fn from_form(form: &FormFields) -> Self {
        Self {
            category: form.get("category").trim().to_string(),
            value: form.get("value").trim().to_string(),
            description: form.get("description").trim().to_string(),
        }
    }

    fn from_tag(tag: &Tag) -> Self {
        Self {
            category: tag.category.clone(),
            value: tag.value.clone(),
            description: tag.description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Create,
    Edit(i64),
}

async fn render_form(state: &AppState, mode: Mode, draft: &Draft, error: &str) -> PageResult {
    let categories = state.service.tag_categories().await?;
    let (heading, action, submit) = match mode {
        Mode::Create => ("New Tag".to_string(), "/tags/new".to_string(), "Create Tag"),
        Mode::Edit(id) => (
            format!("Edit Tag #{id}"),
            format!("/tags/{id}/edit"),
            "Save Changes",
        ),
    };
    let mut datalist = String::from(r#"<datalist id="categories">"#);
    for category in &categories {
        let _ = write!(datalist, r#"<option value="{}">"#, escape(category));
    }
    datalist.push_str("</datalist>");

    let content = format!(
        r#"<h2>{heading}</h2>
{error}
<form method="post" action="{action}" class="entity-form">
<div class="form-group"><label for="category">Category</label><input type="text" name="category" id="category" list="categories" value="{category}" required>{datalist}</div>
{value}
{description}
<div class="form-actions"><button type="submit" class="btn btn-primary">{submit}</button> <a class="btn btn-link" href="/tags">Cancel</a></div>
</form>"#,
        heading = escape(&heading),
        error = messages("", error),
        category = escape(&draft.category),
        value = input("value", "Value", "text", &draft.value, true),
        description = textarea("description", "Description", &draft.description, false),
    );
    Ok(page(state, &heading, &content).into_response())
}

pub async fn new_form(State(state): State<AppState>) -> PageResult {
    render_form(&state, Mode::Create, &Draft::default(), "").await
}

/// Tags created from the UI are custom, not predefined.
pub async fn create(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult {
    let draft = Draft::from_form(&FormFields::new(pairs));
    let input = NewTag {
        category: draft.category.clone(),
        value: draft.value.clone(),
        description: Some(draft.description.clone()),
        is_predefined: false,
    };
    match state.service.create_tag(input).await {
        Ok(_) => Ok(redirect_with("/tags", "success", "Tag created successfully")),
        Err(err) => {
            let error = form_message(err)?;
            render_form(&state, Mode::Create, &draft, &error).await
        }
    }
}

pub async fn edit_form(State(state): State<AppState>, Path(id): Path<i64>) -> PageResult {
    let tag = state.service.get_tag(id).await?;
    render_form(&state, Mode::Edit(id), &Draft::from_tag(&tag), "").await
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult {
    let draft = Draft::from_form(&FormFields::new(pairs));
    let update = TagUpdate {
        category: Some(draft.category.clone()),
        value: Some(draft.value.clone()),
        description: Some(Some(draft.description.clone())),
        is_predefined: None,
    };
    match state.service.update_tag(id, update).await {
        Ok(_) => Ok(redirect_with("/tags", "success", "Tag updated successfully")),
        Err(err) => {
            let error = form_message(err)?;
            render_form(&state, Mode::Edit(id), &draft, &error).await
        }
    }
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> PageResult {
    state.service.delete_tag(id).await?;
    Ok(redirect_with("/tags", "success", "Tag deleted successfully"))
}
