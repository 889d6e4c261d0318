//! Shared test utilities for tcm-db unit tests.

use tcm_core::entities::{NewProject, NewTag, NewTestCase, Project, Tag, TestCase};

use crate::service::TcmService;

/// Create an in-memory `TcmService`.
pub async fn test_service() -> TcmService {
    TcmService::new_local(":memory:").await.unwrap()
}

pub async fn make_tag(svc: &TcmService, category: &str, value: &str) -> Tag {
    svc.create_tag(NewTag::new(category, value)).await.unwrap()
}

pub async fn make_testcase(svc: &TcmService, title: &str, tag_ids: &[i64]) -> TestCase {
    let mut input = NewTestCase::new(title, "1. do the thing", "the thing happens");
    input.tag_ids = tag_ids.to_vec();
    svc.create_testcase(input).await.unwrap()
}

pub async fn make_project(svc: &TcmService, name: &str, testcase_ids: &[i64]) -> Project {
    let mut input = NewProject::new(name);
    input.testcase_ids = testcase_ids.to_vec();
    svc.create_project(input).await.unwrap()
}

/// Row count of an arbitrary table.
pub async fn count_rows(svc: &TcmService, table: &str) -> i64 {
    let conn = svc.db().read().await;
    let mut rows = conn
        .query(&format!("SELECT COUNT(*) FROM {table}"), ())
        .await
        .unwrap();
    rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap()
}
