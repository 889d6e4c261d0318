use std::fmt::Write;

use axum::extract::State;
use axum::response::IntoResponse;
use tcm_core::relative_time::relative_time;
use tcm_db::repos::dashboard::RECENT_ACTIVITY_LIMIT;

use super::error::PageResult;
use super::page;
use super::render::{badge, escape};
use crate::state::AppState;

pub async fn dashboard(State(state): State<AppState>) -> PageResult {
    let stats = state.service.dashboard_stats(RECENT_ACTIVITY_LIMIT).await?;

    let mut content = format!(
        r#"<h2>Dashboard</h2>
<div class="stats-grid">
<a class="stat-card" href="/testcases"><span class="stat-value">{}</span><span class="stat-label">Test Cases</span></a>
<a class="stat-card" href="/projects"><span class="stat-value">{}</span><span class="stat-label">Projects</span></a>
<a class="stat-card" href="/tags"><span class="stat-value">{}</span><span class="stat-label">Tags</span></a>
</div>
<div class="actions"><a class="btn btn-primary" href="/testcases/new">New Test Case</a> <a class="btn" href="/projects/new">New Project</a> <a class="btn" href="/tags/new">New Tag</a></div>
<section class="recent-activity"><h3>Recent Activity</h3>"#,
        stats.testcase_count, stats.project_count, stats.tag_count
    );

    if stats.recent_activity.is_empty() {
        content.push_str(r#"<p class="muted">No activity yet.</p>"#);
    } else {
        content.push_str("<ul class=\"activity-list\">");
        for activity in &stats.recent_activity {
            let _ = write!(
                content,
                r#"<li>{} <a href="{}">{}</a> {} <span class="muted">{}</span></li>"#,
                badge(activity.entity_type.as_str(), activity.entity_type.label()),
                escape(&activity.link()),
                escape(&activity.title),
                activity.action,
                relative_time(activity.timestamp),
            );
        }
        content.push_str("</ul>");
    }
    content.push_str("</section>");

    Ok(page(&state, "Dashboard", &content).into_response())
}
