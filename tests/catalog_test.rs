// tests/catalog_test.rs

use egghead_dl::auth::Session;
use egghead_dl::catalog::{CatalogService, apply_filter};
use egghead_dl::client::RobustClient;
use egghead_dl::config::{AppConfig, Endpoints};
use egghead_dl::error::AppError;
use egghead_dl::extractor::EggheadExtractor;
use egghead_dl::models::Filter;
use std::sync::{Arc, Mutex};

const COURSES_PAGE: &str = r#"
<html><body>
  <div class="jump-into-technologies"><div class="technologies-list">
    <div class="item-wrapper"><a class="anchor-to-technology" data-technology="vue"></a><span class="title">Vue</span></div>
    <div class="item-wrapper"><a class="anchor-to-technology" data-technology="react"></a><span class="title">React</span></div>
  </div></div>
  <section id="technology-react">
    <div class="card-course"><div class="card-content">
      <a class="link-overlay" href="/courses/redux-basics"></a>
      <h3 class="course-title">Redux Basics</h3>
      <div class="lessons-in-course-number-holder"><span class="total">5</span></div>
    </div></div>
    <div class="card-course"><div class="card-content">
      <a class="link-overlay" href="/courses/react-hooks"></a>
      <h3 class="course-title">Hooks in Depth</h3>
      <div class="lessons-in-course-number-holder"><span class="total">8</span></div>
    </div></div>
  </section>
  <section id="technology-vue">
    <div class="card-course"><div class="card-content">
      <a class="link-overlay" href="/courses/vue-router"></a>
      <h3 class="course-title">Vue Router</h3>
      <div class="lessons-in-course-number-holder"><span class="total">n/a</span></div>
    </div></div>
  </section>
</body></html>"#;

fn catalog_service(server_url: &str) -> CatalogService {
    let client = RobustClient::new(Arc::new(AppConfig::default())).expect("Failed to create client");
    CatalogService::new(
        Arc::new(client),
        Endpoints::with_base(server_url),
        Arc::new(EggheadExtractor),
    )
}

#[tokio::test]
async fn test_list_catalog_is_sorted_and_materialized() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/courses")
        .with_status(200)
        .with_body(COURSES_PAGE)
        .create_async()
        .await;

    let service = catalog_service(&server.url());
    let session = Session::for_testing("me@example.com", "token");
    let progress = Mutex::new(Vec::new());
    let catalog = service
        .list_catalog(&session, |done, total| progress.lock().unwrap().push((done, total)))
        .await
        .expect("catalog should load");

    let names: Vec<_> = catalog.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["React", "Vue"]);

    let react: Vec<_> = catalog[0].courses.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(react, vec!["Hooks in Depth", "Redux Basics"]);
    assert_eq!(catalog[0].courses[0].code, "react-hooks");
    assert_eq!(catalog[0].courses[0].lesson_count, 8);
    assert_eq!(
        catalog[0].courses[0].url,
        format!("{}/courses/react-hooks", server.url())
    );
    assert_eq!(catalog[1].courses[0].lesson_count, 0);

    assert_eq!(*progress.lock().unwrap(), vec![(1, 2), (2, 2)]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_catalog_requires_valid_session() {
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("GET", "/courses").expect(0).create_async().await;

    let service = catalog_service(&server.url());
    let session = Session::for_testing("me@example.com", "");
    let result = service.list_catalog(&session, |_, _| {}).await;

    assert!(matches!(result, Err(AppError::NotAuthenticated)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_filtered_catalog_from_server() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/courses")
        .with_status(200)
        .with_body(COURSES_PAGE)
        .create_async()
        .await;

    let service = catalog_service(&server.url());
    let session = Session::for_testing("me@example.com", "token");
    let catalog = service.list_catalog(&session, |_, _| {}).await.unwrap();

    let react = apply_filter(Some(&Filter::Technology("react".into())), catalog.clone()).unwrap();
    assert_eq!(react.len(), 1);
    assert_eq!(react[0].name, "React");

    let missing = apply_filter(Some(&Filter::Course("svelte".into())), catalog);
    assert!(matches!(missing, Err(AppError::CourseNotFound(name)) if name == "svelte"));
}
