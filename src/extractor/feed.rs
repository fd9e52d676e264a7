// src/extractor/feed.rs

use super::FeedItem;
use crate::error::{AppError, AppResult};
use log::debug;

/// 解析课程 RSS 订阅源，保持条目原有顺序。
pub fn parse_feed_items(xml: &str) -> AppResult<Vec<FeedItem>> {
    let channel = xml
        .parse::<rss::Channel>()
        .map_err(|e| AppError::FeedParse(e.to_string()))?;

    let items: Vec<FeedItem> = channel
        .items()
        .iter()
        .map(|item| FeedItem {
            title: item.title().unwrap_or_default().trim().to_string(),
            enclosure_url: item
                .enclosure()
                .map(|enc| enc.url().trim().to_string())
                .filter(|url| !url.is_empty()),
        })
        .collect();

    debug!("订阅源 '{}' 共 {} 个条目", channel.title(), items.len());
    Ok(items)
}
