//! Entity counts and the recent-activity feed.

use tcm_core::enums::EntityType;
use tcm_core::responses::{Activity, DashboardStats};

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::service::TcmService;

/// Activity entries shown on the dashboard.
pub const RECENT_ACTIVITY_LIMIT: u32 = 10;

/// `(entity, query)` pairs selecting `id, title, created_at, updated_at`,
/// most recently touched first.
const ACTIVITY_SOURCES: [(EntityType, &str); 3] = [
    (
        EntityType::TestCase,
        "SELECT id, title, created_at, updated_at FROM testcases
         ORDER BY updated_at DESC, id DESC LIMIT ?1",
    ),
    (
        EntityType::Project,
        "SELECT id, name, created_at, updated_at FROM projects
         ORDER BY updated_at DESC, id DESC LIMIT ?1",
    ),
    (
        EntityType::Tag,
        "SELECT id, category || ':' || value, created_at, updated_at FROM tags
         ORDER BY updated_at DESC, id DESC LIMIT ?1",
    ),
];

impl TcmService {
    /// Counts of every entity plus the `limit` most recently touched
    /// entities across all three kinds, newest first.
    pub async fn dashboard_stats(&self, limit: u32) -> Result<DashboardStats, DatabaseError> {
        Ok(DashboardStats {
            testcase_count: self.count_testcases().await?,
            project_count: self.count_projects().await?,
            tag_count: self.count_tags().await?,
            recent_activity: self.recent_activity(limit).await?,
        })
    }

    /// Take the top `limit` of each entity kind, merge, then keep the
    /// overall top `limit`.
    pub async fn recent_activity(&self, limit: u32) -> Result<Vec<Activity>, DatabaseError> {
        let conn = self.db().read().await;
        let mut activity = Vec::new();
        for (entity_type, sql) in ACTIVITY_SOURCES {
            let mut rows = conn.query(sql, [i64::from(limit)]).await?;
            while let Some(row) = rows.next().await? {
                let created_at = parse_datetime(&row.get::<String>(2)?)?;
                let updated_at = parse_datetime(&row.get::<String>(3)?)?;
                activity.push(Activity {
                    entity_type,
                    entity_id: row.get::<i64>(0)?,
                    title: row.get::<String>(1)?,
                    action: Activity::action_for(created_at, updated_at),
                    timestamp: updated_at,
                });
            }
        }
        activity.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        activity.truncate(limit as usize);
        Ok(activity)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tcm_core::enums::{ActivityAction, EntityType};

    use crate::test_support::{make_project, make_tag, make_testcase, test_service};

    #[tokio::test]
    async fn empty_database_has_no_activity() {
        let svc = test_service().await;
        let stats = svc.dashboard_stats(10).await.unwrap();
        assert_eq!(stats.testcase_count, 0);
        assert_eq!(stats.project_count, 0);
        assert_eq!(stats.tag_count, 0);
        assert!(stats.recent_activity.is_empty());
    }

    #[tokio::test]
    async fn merges_entities_newest_first() {
        let svc = test_service().await;
        let tag = make_tag(&svc, "os", "linux").await;
        let tc = make_testcase(&svc, "Boots", &[tag.id]).await;
        let project = make_project(&svc, "Release", &[]).await;

        let stats = svc.dashboard_stats(10).await.unwrap();
        assert_eq!(stats.testcase_count, 1);
        assert_eq!(stats.project_count, 1);
        assert_eq!(stats.tag_count, 1);

        let feed: Vec<(EntityType, i64, &str)> = stats
            .recent_activity
            .iter()
            .map(|a| (a.entity_type, a.entity_id, a.title.as_str()))
            .collect();
        assert_eq!(
            feed,
            vec![
                (EntityType::Project, project.id, "Release"),
                (EntityType::TestCase, tc.id, "Boots"),
                (EntityType::Tag, tag.id, "os:linux"),
            ]
        );
        assert!(
            stats
                .recent_activity
                .iter()
                .all(|a| a.action == ActivityAction::Created)
        );
    }

    #[tokio::test]
    async fn feed_is_truncated_to_limit() {
        let svc = test_service().await;
        for i in 0..6 {
            make_tag(&svc, "sprint", &format!("s{i}")).await;
            make_testcase(&svc, &format!("Case {i}"), &[]).await;
        }
        let activity = svc.recent_activity(10).await.unwrap();
        assert_eq!(activity.len(), 10);
        assert_eq!(activity[0].title, "Case 5");
    }
}
