//! HTML pages over HTTP: form round trips, redirects, not-found pages.

mod common;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use tcm_core::entities::{NewProject, NewTag, NewTestCase};

use common::{body_text, location, test_app};

#[tokio::test]
async fn dashboard_shows_counts_and_activity() {
    let app = test_app().await;
    app.service
        .create_testcase(NewTestCase::new("Checkout flow", "pay", "receipt"))
        .await
        .unwrap();
    app.service.create_tag(NewTag::new("os", "linux")).await.unwrap();

    let response = app.get("/dashboard").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Checkout flow"));
    assert!(html.contains("os:linux"));
    assert!(html.contains("just now"));
}

#[tokio::test]
async fn unknown_ids_render_not_found_page() {
    let app = test_app().await;
    for (uri, heading) in [
        ("/testcases/999", "Test case not found"),
        ("/testcases/999/edit", "Test case not found"),
        ("/projects/999", "Project not found"),
        ("/tags/999/edit", "Tag not found"),
    ] {
        let response = app.get(uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        assert!(body_text(response).await.contains(heading), "{uri}");
    }

    let response = app.post_form("/testcases/999/delete", "").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test case forms
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_testcase_redirects_with_message() {
    let app = test_app().await;
    let a = app.service.create_tag(NewTag::new("os", "linux")).await.unwrap();
    let b = app.service.create_tag(NewTag::new("os", "mac")).await.unwrap();

    let body = format!(
        "title=Login&steps=open+page&expected_results=signed+in&status=active&priority=high&tag_ids={}&tag_ids={}",
        a.id, b.id
    );
    let response = app.post_form("/testcases/new", &body).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response).to_string();
    assert!(
        target.ends_with("?success=Test%20case%20created%20successfully"),
        "{target}"
    );

    let page = body_text(app.get(&target).await).await;
    assert!(page.contains("Test case created successfully"));
    assert!(page.contains("os:linux"));
    assert!(page.contains("os:mac"));
}

#[tokio::test]
async fn invalid_testcase_form_is_rerendered() {
    let app = test_app().await;
    let response = app
        .post_form(
            "/testcases/new",
            "title=Kept+title&steps=&expected_results=x&status=draft&priority=low",
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Title, steps, and expected results are required."));
    assert!(html.contains(r#"value="Kept title""#));

    let response = app
        .post_form(
            "/testcases/new",
            "title=t&steps=s&expected_results=e&status=finished&priority=low",
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Invalid status or priority"));
}

#[tokio::test]
async fn edit_testcase_replaces_tags() {
    let app = test_app().await;
    let tag = app.service.create_tag(NewTag::new("os", "linux")).await.unwrap();
    let mut input = NewTestCase::new("Boot", "power", "prompt");
    input.tag_ids = vec![tag.id];
    let tc = app.service.create_testcase(input).await.unwrap();

    let response = app
        .post_form(
            &format!("/testcases/{}/edit", tc.id),
            "title=Cold+boot&steps=power&expected_results=prompt&status=active&priority=medium",
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let updated = app.service.get_testcase(tc.id).await.unwrap();
    assert_eq!(updated.title, "Cold boot");
    assert!(updated.tags.is_empty());
}

#[tokio::test]
async fn list_page_ignores_bad_filters() {
    let app = test_app().await;
    for i in 0..25 {
        app.service
            .create_testcase(NewTestCase::new(format!("Case {i}"), "s", "e"))
            .await
            .unwrap();
    }
    let response = app.get("/testcases?page=abc&status=bogus&tag_id=x").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Case 24"));
    assert!(html.contains("Page 1 of 2"));

    let html = body_text(app.get("/testcases?page=2").await).await;
    assert!(html.contains("Case 0"));
    assert!(!html.contains("Case 24"));
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[tokio::test]
async fn project_form_reports_date_errors() {
    let app = test_app().await;
    let response = app
        .post_form("/projects/new", "name=Q3&status=planning&start_date=soon&end_date=")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Invalid date format."));

    let response = app
        .post_form(
            "/projects/new",
            "name=Q3&status=planning&start_date=2024-09-01&end_date=2024-08-01",
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("End date must be after start date."));
    assert!(html.contains(r#"value="2024-09-01""#));
}

#[tokio::test]
async fn project_membership_forms() {
    let app = test_app().await;
    let a = app
        .service
        .create_testcase(NewTestCase::new("First", "s", "e"))
        .await
        .unwrap();
    let b = app
        .service
        .create_testcase(NewTestCase::new("Second", "s", "e"))
        .await
        .unwrap();
    let project = app.service.create_project(NewProject::new("Web")).await.unwrap();
    let base = format!("/projects/{}", project.id);

    let response = app
        .post_form(
            &format!("{base}/testcases"),
            &format!("testcase_ids={}&testcase_ids={}", a.id, b.id),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).contains("success=Added%202%20test%20case"));
    assert_eq!(
        app.service.get_project(project.id).await.unwrap().testcase_ids.len(),
        2
    );

    let again = app
        .post_form(&format!("{base}/testcases"), &format!("testcase_id={}", a.id))
        .await;
    assert!(location(&again).contains("error="));

    let removed = app
        .post_form(&format!("{base}/testcases/{}/remove", a.id), "")
        .await;
    assert_eq!(removed.status(), StatusCode::SEE_OTHER);
    assert!(location(&removed).contains("success="));

    let html = body_text(app.get(&base).await).await;
    assert!(html.contains("Second"));
    assert!(html.contains(&format!(r#"name="testcase_ids" value="{}""#, a.id)));
}

#[tokio::test]
async fn unknown_id_rejects_whole_selection() {
    let app = test_app().await;
    let tc = app
        .service
        .create_testcase(NewTestCase::new("Known", "s", "e"))
        .await
        .unwrap();
    let project = app.service.create_project(NewProject::new("Web")).await.unwrap();

    let response = app
        .post_form(
            &format!("/projects/{}/testcases", project.id),
            &format!("testcase_ids={}&testcase_ids=99999", tc.id),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response).to_string();
    assert!(target.contains("error="), "{target}");
    assert!(target.contains("99999"), "{target}");
    assert!(
        app.service
            .get_project(project.id)
            .await
            .unwrap()
            .testcase_ids
            .is_empty()
    );

    let response = app
        .post_form("/projects/999/testcases", &format!("testcase_ids={}", tc.id))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

#[tokio::test]
async fn tag_pages_group_and_reject_duplicates() {
    let app = test_app().await;
    let response = app
        .post_form("/tags/new", "category=os&value=linux&description=")
        .await;
    assert_eq!(location(&response), "/tags?success=Tag%20created%20successfully");
    let tag = app.service.all_tags().await.unwrap().remove(0);
    assert!(!tag.is_predefined);
    assert_eq!(tag.description, None);

    let response = app.post_form("/tags/new", "category=os&value=linux").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("already exists"));

    app.post_form("/tags/new", "category=browser&value=safari").await;
    let html = body_text(app.get("/tags").await).await;
    assert!(html.contains("<h3>browser"));
    assert!(html.contains("<h3>os"));

    let filtered = body_text(app.get("/tags?category=browser").await).await;
    assert!(filtered.contains("safari"));
    assert!(!filtered.contains("linux"));
}

// ---------------------------------------------------------------------------
// Search and static assets
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_page_groups_matches() {
    let app = test_app().await;
    app.service
        .create_testcase(NewTestCase::new("User LOGIN", "s", "e"))
        .await
        .unwrap();
    app.service
        .create_project(NewProject::new("Login revamp"))
        .await
        .unwrap();
    app.service
        .create_tag(NewTag::new("feature", "Logout"))
        .await
        .unwrap();

    let response = app.get("/search?q=login&entity_type=bogus").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Test Cases (1)"));
    assert!(html.contains("Projects (1)"));
    assert!(!html.contains("Tags ("));
    assert!(html.contains("User LOGIN"));

    let html = body_text(app.get("/search").await).await;
    assert!(html.contains("Enter a search term"));
}

#[tokio::test]
async fn stylesheet_is_served() {
    let app = test_app().await;
    let response = app.get("/static/css/styles.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(".page-header"));
}
