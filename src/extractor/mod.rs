// src/extractor/mod.rs

pub mod feed;
pub mod html;

use crate::error::AppResult;

/// 课程列表页中的一个技术分类，字段均为页面上的原始文本。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTechnology {
    pub name: String,
    pub courses: Vec<RawCourse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawCourse {
    pub name: String,
    pub href: String,
    pub lesson_count: String,
}

/// 课程订阅源中的一个条目。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedItem {
    pub title: String,
    pub enclosure_url: Option<String>,
}

/// 把原始文档转换为结构化记录。实现必须是纯函数，不发起任何网络请求。
pub trait StructuredExtractor: Send + Sync {
    /// 登录页中的防伪造 Token
    fn csrf_token(&self, html: &str) -> Option<String>;
    /// 会员页中用于订阅源请求的长期 Token
    fn access_token(&self, html: &str) -> Option<String>;
    fn catalog(&self, html: &str) -> AppResult<Vec<RawTechnology>>;
    fn feed_items(&self, xml: &str) -> AppResult<Vec<FeedItem>>;
}

/// 针对 egghead.io 页面结构与 RSS 订阅源的默认实现。
#[derive(Debug, Clone, Copy, Default)]
pub struct EggheadExtractor;

impl StructuredExtractor for EggheadExtractor {
    fn csrf_token(&self, html: &str) -> Option<String> {
        html::extract_csrf_token(html)
    }

    fn access_token(&self, html: &str) -> Option<String> {
        html::extract_access_token(html)
    }

    fn catalog(&self, html: &str) -> AppResult<Vec<RawTechnology>> {
        Ok(html::extract_catalog(html))
    }

    fn feed_items(&self, xml: &str) -> AppResult<Vec<FeedItem>> {
        feed::parse_feed_items(xml)
    }
}
