// src/probe.rs

use crate::{client::RobustClient, downloader::SizeProbe, error::*};
use async_trait::async_trait;
use log::{debug, trace};
use reqwest::header::{self, HeaderMap};
use std::sync::Arc;

/// 从响应头中读取声明的内容长度，缺失或无法解析时返回 None。
pub fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

/// 用 HEAD 请求探测课时视频的大小，不下载内容。
pub struct FileSizeProber {
    http_client: Arc<RobustClient>,
}

impl FileSizeProber {
    pub fn new(http_client: Arc<RobustClient>) -> Self {
        Self { http_client }
    }

    pub async fn probe_size(&self, url: &str) -> AppResult<Option<u64>> {
        if url.is_empty() {
            trace!("课时没有视频地址，跳过大小探测");
            return Ok(None);
        }
        let response = self
            .http_client
            .head(url)
            .await
            .map_err(|e| AppError::transfer(url, 0, e))?;
        let size = declared_length(response.headers());
        debug!("探测 {} -> {:?}", url, size);
        Ok(size)
    }
}

#[async_trait]
impl SizeProbe for FileSizeProber {
    async fn probe(&self, url: &str) -> AppResult<Option<u64>> {
        self.probe_size(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_declared_length() {
        let mut headers = HeaderMap::new();
        assert_eq!(declared_length(&headers), None);

        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("1048576"));
        assert_eq!(declared_length(&headers), Some(1_048_576));

        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("unknown"));
        assert_eq!(declared_length(&headers), None);
    }
}
