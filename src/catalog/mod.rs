// src/catalog/mod.rs

pub mod filter;

pub use filter::apply_filter;

use crate::{
    auth::Session,
    client::RobustClient,
    config::Endpoints,
    error::*,
    extractor::{RawCourse, RawTechnology, StructuredExtractor},
    models::{Course, Technology},
    utils,
};
use log::{debug, info, warn};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use url::Url;

static COURSE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/courses/([^/?#]+)").unwrap());

/// 从课程地址中提取课程标识，无法匹配时返回空字符串。
pub fn derive_course_code(url: &str) -> String {
    COURSE_CODE_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// 技术分类与课程都按名称排序，保证每次运行顺序一致。
pub fn sort_catalog(technologies: &mut [Technology]) {
    for technology in technologies.iter_mut() {
        technology
            .courses
            .sort_by(|a, b| utils::compare_names(&a.name, &b.name));
    }
    technologies.sort_by(|a, b| utils::compare_names(&a.name, &b.name));
}

pub struct CatalogService {
    http_client: Arc<RobustClient>,
    endpoints: Endpoints,
    extractor: Arc<dyn StructuredExtractor>,
}

impl CatalogService {
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

    /// 获取完整的 技术分类 -> 课程 目录树。`on_progress(已处理, 总数)` 在每个技术分类处理完后调用。
    pub async fn list_catalog<F>(&self, session: &Session, on_progress: F) -> AppResult<Vec<Technology>>
    where
        F: Fn(usize, usize),
    {
        session.ensure_valid()?;
        let html = self.http_client.get_text(&self.endpoints.courses_url).await?;
        let raw_technologies = self.extractor.catalog(&html)?;
        let base_url = Url::parse(&self.endpoints.courses_url)?;

        let total = raw_technologies.len();
        let mut technologies = Vec::with_capacity(total);
        for (index, raw) in raw_technologies.into_iter().enumerate() {
            technologies.push(materialize_technology(raw, &base_url));
            on_progress(index + 1, total);
        }

        sort_catalog(&mut technologies);
        info!(
            "获取到 {} 个技术分类，共 {} 门课程",
            technologies.len(),
            technologies.iter().map(|t| t.courses.len()).sum::<usize>()
        );
        Ok(technologies)
    }
}

fn materialize_technology(raw: RawTechnology, base_url: &Url) -> Technology {
    let courses = raw
        .courses
        .into_iter()
        .map(|c| materialize_course(c, base_url))
        .collect();
    Technology::new(raw.name, courses)
}

fn materialize_course(raw: RawCourse, base_url: &Url) -> Course {
    let url = base_url
        .join(&raw.href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| raw.href.clone());
    let code = derive_course_code(&url);
    if code.is_empty() {
        warn!("无法从课程 '{}' 的地址 '{}' 中提取课程标识", raw.name, url);
    }
    let lesson_count = raw.lesson_count.trim().parse::<u32>().unwrap_or_else(|_| {
        debug!("课程 '{}' 的课时数 '{}' 无法解析，按 0 处理", raw.name, raw.lesson_count);
        0
    });
    Course {
        name: raw.name,
        code,
        url,
        lesson_count,
    }
}
