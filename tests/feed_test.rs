// tests/feed_test.rs

use egghead_dl::auth::Session;
use egghead_dl::client::RobustClient;
use egghead_dl::config::{AppConfig, Endpoints};
use egghead_dl::error::AppError;
use egghead_dl::extractor::EggheadExtractor;
use egghead_dl::feed::LessonFeedService;
use egghead_dl::models::Course;
use egghead_dl::probe::FileSizeProber;
use mockito::Matcher;
use std::sync::Arc;

const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel>
  <title>Redux Basics</title><link>https://egghead.io</link><description>course</description>
  <item><title>Introduction</title><enclosure url="https://cdn.example.com/1.mp4" length="100" type="video/mp4"/></item>
  <item><title>Reading Notes</title></item>
  <item><title>Reducers</title><enclosure url="https://cdn.example.com/3.mp4" length="300" type="video/mp4"/></item>
</channel></rss>"#;

fn client() -> Arc<RobustClient> {
    Arc::new(RobustClient::new(Arc::new(AppConfig::default())).expect("Failed to create client"))
}

fn course(code: &str, lesson_count: u32) -> Course {
    Course {
        name: "Redux Basics".into(),
        code: code.into(),
        url: format!("https://egghead.io/courses/{}", code),
        lesson_count,
    }
}

#[tokio::test]
async fn test_list_lessons_numbers_feed_items() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/courses/redux-basics/course_feed")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("user_email".into(), "me@example.com".into()),
            Matcher::UrlEncoded("user_token".into(), "token-1".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/rss+xml")
        .with_body(FEED)
        .create_async()
        .await;

    let service = LessonFeedService::new(
        client(),
        Endpoints::with_base(&server.url()),
        Arc::new(EggheadExtractor),
    );
    let session = Session::for_testing("me@example.com", "token-1");
    // 页面上声明的课时数与订阅源不一致时只记录警告
    let lessons = service
        .list_lessons(&session, &course("redux-basics", 5))
        .await
        .expect("feed should load");

    assert_eq!(lessons.len(), 3);
    assert_eq!(
        lessons.iter().map(|l| l.lesson_number).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert_eq!(lessons[0].name, "Introduction");
    assert_eq!(lessons[1].url, "");
    assert_eq!(lessons[2].url, "https://cdn.example.com/3.mp4");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_course_without_code_has_no_lessons() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let service = LessonFeedService::new(
        client(),
        Endpoints::with_base(&server.url()),
        Arc::new(EggheadExtractor),
    );
    let session = Session::for_testing("me@example.com", "token-1");
    let lessons = service.list_lessons(&session, &course("", 3)).await.unwrap();

    assert!(lessons.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_invalid_feed_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/courses/redux-basics/course_feed")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>not a feed</html>")
        .create_async()
        .await;

    let service = LessonFeedService::new(
        client(),
        Endpoints::with_base(&server.url()),
        Arc::new(EggheadExtractor),
    );
    let session = Session::for_testing("me@example.com", "token-1");
    let result = service.list_lessons(&session, &course("redux-basics", 3)).await;
    assert!(matches!(result, Err(AppError::FeedParse(_))));
}

#[tokio::test]
async fn test_probe_error_status_fails() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("HEAD", "/missing.mp4")
        .with_status(404)
        .create_async()
        .await;

    let prober = FileSizeProber::new(client());
    let url = format!("{}/missing.mp4", server.url());
    let result = prober.probe_size(&url).await;
    match result {
        Err(AppError::Transfer {
            url: failed_url,
            downloaded,
            ..
        }) => {
            assert_eq!(failed_url, url);
            assert_eq!(downloaded, 0);
        }
        other => panic!("expected Transfer, got {:?}", other),
    }
}

#[tokio::test]
async fn test_refused_head_request_is_transfer_error() {
    // 端口 9 (discard) 在测试环境中没有监听
    let prober = FileSizeProber::new(client());
    let result = prober.probe_size("http://127.0.0.1:9/lesson.mp4").await;
    assert!(matches!(result, Err(AppError::Transfer { downloaded: 0, .. })));
}

#[tokio::test]
async fn test_probe_empty_url_skips_network() {
    let prober = FileSizeProber::new(client());
    assert_eq!(prober.probe_size("").await.unwrap(), None);
}
