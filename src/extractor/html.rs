// src/extractor/html.rs

use super::{RawCourse, RawTechnology};
use crate::constants;
use log::{debug, trace, warn};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static CSRF_META: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="csrf-token"]"#).unwrap());
static TOKEN_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a[href*="user_token="]"#).unwrap());
static TECHNOLOGY_ITEM: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".jump-into-technologies .technologies-list .item-wrapper").unwrap()
});
static TECHNOLOGY_TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".title").unwrap());
static TECHNOLOGY_ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.anchor-to-technology").unwrap());
static COURSE_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".course-title").unwrap());
static COURSE_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a.link-overlay").unwrap());
static COURSE_LESSON_TOTAL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".lessons-in-course-number-holder .total").unwrap());

fn text_of(element: ElementRef<'_>, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

fn attr_of(element: ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    element
        .select(selector)
        .next()
        .and_then(|e| e.value().attr(attr))
        .map(|s| s.trim().to_string())
}

pub fn extract_csrf_token(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&CSRF_META)
        .next()
        .and_then(|e| e.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// 会员页上的个人订阅源链接带有 `user_token` 参数。
pub fn extract_access_token(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&TOKEN_LINK)
        .filter_map(|a| a.value().attr("href"))
        .find_map(|href| {
            let (_, query) = href.split_once('?')?;
            url::form_urlencoded::parse(query.as_bytes())
                .find(|(k, _)| k == constants::feed_params::TOKEN)
                .map(|(_, v)| v.into_owned())
        })
        .filter(|token| !token.is_empty())
}

/// 解析课程列表页。每个技术分类通过 `data-technology` 关联到 `#technology-<code>` 区块中的课程卡片。
pub fn extract_catalog(html: &str) -> Vec<RawTechnology> {
    let document = Html::parse_document(html);

    document
        .select(&TECHNOLOGY_ITEM)
        .map(|item| {
            let name = text_of(item, &TECHNOLOGY_TITLE);
            let courses = match attr_of(item, &TECHNOLOGY_ANCHOR, "data-technology") {
                Some(code) if !code.is_empty() => extract_courses(&document, &code),
                _ => {
                    warn!("技术分类 '{}' 缺少 data-technology 属性，无法关联课程", name);
                    vec![]
                }
            };
            debug!("解析到技术分类 '{}'，课程数: {}", name, courses.len());
            RawTechnology { name, courses }
        })
        .collect()
}

fn extract_courses(document: &Html, technology_code: &str) -> Vec<RawCourse> {
    let selector_str = format!(
        r#"[id="technology-{}"] .card-course .card-content"#,
        technology_code.replace('"', "")
    );
    let Ok(selector) = Selector::parse(&selector_str) else {
        warn!("无法为技术分类 '{}' 构造课程选择器", technology_code);
        return vec![];
    };

    document
        .select(&selector)
        .map(|card| {
            let course = RawCourse {
                name: text_of(card, &COURSE_TITLE),
                href: attr_of(card, &COURSE_LINK, "href").unwrap_or_default(),
                lesson_count: text_of(card, &COURSE_LESSON_TOTAL),
            };
            trace!("课程卡片: {:?}", course);
            course
        })
        .collect()
}
