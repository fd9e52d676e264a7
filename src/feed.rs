// src/feed.rs

use crate::{
    auth::Session,
    client::RobustClient,
    config::Endpoints,
    constants::feed_params,
    downloader::LessonSource,
    error::*,
    extractor::{FeedItem, StructuredExtractor},
    models::{Course, Lesson},
};
use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;
use url::Url;

/// 通过课程订阅源列出课时。
pub struct LessonFeedService {
    http_client: Arc<RobustClient>,
    endpoints: Endpoints,
    extractor: Arc<dyn StructuredExtractor>,
}

impl LessonFeedService {
    pub fn new(
        http_client: Arc<RobustClient>,
        endpoints: Endpoints,
        extractor: Arc<dyn StructuredExtractor>,
    ) -> Self {
        Self {
            http_client,
            endpoints,
            extractor,
        }
    }

    /// 订阅源地址: 模板中的 `{code}` 替换为课程标识，再附加邮箱与 access token。
    pub fn feed_url(&self, session: &Session, course_code: &str) -> AppResult<Url> {
        let mut url = Url::parse(&self.endpoints.feed_url_template.replace("{code}", course_code))?;
        url.query_pairs_mut()
            .append_pair(feed_params::EMAIL, session.email())
            .append_pair(feed_params::TOKEN, session.access_token());
        Ok(url)
    }

    pub async fn list_lessons(&self, session: &Session, course: &Course) -> AppResult<Vec<Lesson>> {
        session.ensure_valid()?;
        if course.code.is_empty() {
            warn!("课程 '{}' 没有课程标识，无法获取课时列表", course.name);
            return Ok(vec![]);
        }

        let url = self.feed_url(session, &course.code)?;
        let xml = self.http_client.get_text(url).await?;
        let lessons = lessons_from_items(self.extractor.feed_items(&xml)?);

        if course.lesson_count as usize != lessons.len() {
            warn!(
                "课程 '{}' 页面显示 {} 个课时，订阅源中实际有 {} 个",
                course.name,
                course.lesson_count,
                lessons.len()
            );
        }
        debug!("课程 '{}' 共 {} 个课时", course.name, lessons.len());
        Ok(lessons)
    }
}

/// 按订阅源顺序从 1 开始编号。缺少附件的条目保留，地址为空字符串。
fn lessons_from_items(items: Vec<FeedItem>) -> Vec<Lesson> {
    items
        .into_iter()
        .zip(1u32..)
        .map(|(item, lesson_number)| Lesson {
            name: item.title,
            lesson_number,
            url: item.enclosure_url.unwrap_or_default(),
        })
        .collect()
}

#[async_trait]
impl LessonSource for LessonFeedService {
    async fn list_lessons(&self, session: &Session, course: &Course) -> AppResult<Vec<Lesson>> {
        LessonFeedService::list_lessons(self, session, course).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lessons_are_numbered_in_feed_order() {
        let items = vec![
            FeedItem {
                title: "Intro".into(),
                enclosure_url: Some("https://cdn/1.mp4".into()),
            },
            FeedItem {
                title: "No Video".into(),
                enclosure_url: None,
            },
            FeedItem {
                title: "Outro".into(),
                enclosure_url: Some("https://cdn/3.mp4".into()),
            },
        ];
        let lessons = lessons_from_items(items);
        let numbers: Vec<_> = lessons.iter().map(|l| l.lesson_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(lessons[1].url, "");
        assert_eq!(lessons[2].url, "https://cdn/3.mp4");
    }
}
