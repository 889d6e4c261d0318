//! HTML building blocks shared by every page.
//!
//! Pages are plain strings assembled with `format!`. Anything that came from
//! a user or the database goes through [`escape`] first.

use std::fmt::Write;

use axum::response::Html;
use tcm_core::entities::Tag;

/// Escape text for use in element content and quoted attribute values.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

/// Wrap page content in the shared layout.
#[must_use]
pub fn layout(brand: &str, title: &str, content: &str) -> Html<String> {
    let brand = escape(brand);
    let title = escape(title);
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} - {brand}</title>
<link rel="stylesheet" href="/static/css/styles.css">
</head>
<body>
<div class="page-container">
<header class="page-header">
<h1><a href="/dashboard">{brand}</a></h1>
<nav class="main-nav">
<a href="/dashboard">Dashboard</a>
<a href="/testcases">Test Cases</a>
<a href="/projects">Projects</a>
<a href="/tags">Tags</a>
<a href="/search">Search</a>
<a href="/api/auth/logout">Sign Out</a>
</nav>
</header>
<main class="page-main">
{content}
</main>
<footer class="page-footer"><p>{brand}</p></footer>
</div>
</body>
</html>"#
    ))
}

/// Success and error banners. Empty messages render nothing.
#[must_use]
pub fn messages(success: &str, error: &str) -> String {
    let mut out = String::new();
    if !success.is_empty() {
        let _ = write!(out, r#"<div class="alert alert-success">{}</div>"#, escape(success));
    }
    if !error.is_empty() {
        let _ = write!(out, r#"<div class="alert alert-error">{}</div>"#, escape(error));
    }
    out
}

#[must_use]
pub fn badge(kind: &str, text: &str) -> String {
    format!(
        r#"<span class="badge badge-{}">{}</span>"#,
        escape(kind),
        escape(text)
    )
}

#[must_use]
pub fn tag_badges(tags: &[Tag]) -> String {
    if tags.is_empty() {
        return r#"<span class="muted">No tags</span>"#.to_string();
    }
    tags.iter()
        .map(|tag| {
            format!(
                r#"<span class="tag">{}</span>"#,
                escape(&tag.label())
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `<select>` over string options. `blank` adds a leading empty option.
#[must_use]
pub fn select(name: &str, options: &[(&str, &str)], selected: &str, blank: Option<&str>) -> String {
    let mut out = format!(r#"<select name="{0}" id="{0}">"#, escape(name));
    if let Some(label) = blank {
        let _ = write!(out, r#"<option value="">{}</option>"#, escape(label));
    }
    for (value, label) in options {
        let attr = if *value == selected { " selected" } else { "" };
        let _ = write!(
            out,
            r#"<option value="{}"{attr}>{}</option>"#,
            escape(value),
            escape(label)
        );
    }
    out.push_str("</select>");
    out
}

/// `on_hold` -> `On Hold`.
#[must_use]
pub fn humanize(value: &str) -> String {
    value
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `<select>` over enum string forms, labelled with [`humanize`].
#[must_use]
pub fn enum_select<I>(name: &str, values: I, selected: &str, blank: Option<&str>) -> String
where
    I: IntoIterator<Item = &'static str>,
{
    let labelled: Vec<(&str, String)> = values.into_iter().map(|v| (v, humanize(v))).collect();
    let options: Vec<(&str, &str)> = labelled.iter().map(|(v, l)| (*v, l.as_str())).collect();
    select(name, &options, selected, blank)
}

/// Labelled single-line input.
#[must_use]
pub fn input(name: &str, label: &str, kind: &str, value: &str, required: bool) -> String {
    let required_attr = if required { " required" } else { "" };
    format!(
        r#"<div class="form-group"><label for="{name}">{label}</label><input type="{kind}" name="{name}" id="{name}" value="{value}"{required_attr}></div>"#,
        name = escape(name),
        label = escape(label),
        kind = escape(kind),
        value = escape(value),
    )
}

/// Labelled textarea.
#[must_use]
pub fn textarea(name: &str, label: &str, value: &str, required: bool) -> String {
    let required_attr = if required { " required" } else { "" };
    format!(
        r#"<div class="form-group"><label for="{name}">{label}</label><textarea name="{name}" id="{name}" rows="4"{required_attr}>{value}</textarea></div>"#,
        name = escape(name),
        label = escape(label),
        value = escape(value),
    )
}

/// Checkbox list of tags grouped by category.
#[must_use]
pub fn tag_picker(tags: &[Tag], selected: &[i64]) -> String {
    let mut out = String::from(r#"<fieldset class="tag-picker"><legend>Tags</legend>"#);
    let mut current: Option<&str> = None;
    for tag in tags {
        if current != Some(tag.category.as_str()) {
            if current.is_some() {
                out.push_str("</div>");
            }
            let _ = write!(
                out,
                r#"<div class="tag-group"><h4>{}</h4>"#,
                escape(&tag.category)
            );
            current = Some(tag.category.as_str());
        }
        let checked = if selected.contains(&tag.id) { " checked" } else { "" };
        let _ = write!(
            out,
            r#"<label class="checkbox"><input type="checkbox" name="tag_ids" value="{}"{checked}> {}</label>"#,
            tag.id,
            escape(&tag.value)
        );
    }
    if current.is_some() {
        out.push_str("</div>");
    } else {
        out.push_str(r#"<p class="muted">No tags defined yet.</p>"#);
    }
    out.push_str("</fieldset>");
    out
}

/// A POST button, used for deletes and association changes.
#[must_use]
pub fn post_button(action: &str, label: &str, class: &str) -> String {
    format!(
        r#"<form method="post" action="{}" class="inline-form"><button type="submit" class="btn {}">{}</button></form>"#,
        escape(action),
        escape(class),
        escape(label)
    )
}

/// Previous/next links. `base_query` is an already encoded query string
/// without the `page` parameter.
#[must_use]
pub fn pagination(path: &str, base_query: &str, page: u32, total_pages: u64) -> String {
    if total_pages <= 1 {
        return String::new();
    }
    let sep = if base_query.is_empty() { "" } else { "&" };
    let mut out = String::from(r#"<nav class="pagination">"#);
    if page > 1 {
        let _ = write!(
            out,
            r#"<a href="{path}?{base}{sep}page={}">&laquo; Previous</a>"#,
            page - 1,
            base = escape(base_query)
        );
    }
    let _ = write!(out, "<span>Page {page} of {total_pages}</span>");
    if u64::from(page) < total_pages {
        let _ = write!(
            out,
            r#"<a href="{path}?{base}{sep}page={}">Next &raquo;</a>"#,
            page + 1,
            base = escape(base_query)
        );
    }
    out.push_str("</nav>");
    out
}

/// `key=value` pairs, percent-encoded and joined with `&`. Empty values are skipped.
#[must_use]
pub fn query_string(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}
