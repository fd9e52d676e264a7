// src/client.rs

use crate::{config::AppConfig, constants, error::*};
use log::debug;
use reqwest::{
    Client, IntoUrl, Response, StatusCode,
    header::{self, HeaderMap, HeaderValue},
};
use std::sync::Arc;

/// 带 Cookie 会话的 HTTP 客户端。登录后的所有请求共享同一个 Cookie 存储。
#[derive(Clone)]
pub struct RobustClient {
    pub client: Client,
    config: Arc<AppConfig>,
}

impl RobustClient {
    pub fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static(constants::ACCEPT_LANGUAGE),
        );

        // 整体超时只在单个请求上设置，流式下载不受限
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .cookie_store(true)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self { client, config })
    }

    fn check_status(res: Response) -> AppResult<Response> {
        if matches!(res.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(AppError::NotAuthenticated);
        }
        Ok(res.error_for_status()?)
    }

    pub async fn get<T: IntoUrl>(&self, url: T) -> AppResult<Response> {
        let res = self
            .client
            .get(url)
            .timeout(self.config.timeout)
            .send()
            .await?;
        Self::check_status(res)
    }

    /// 获取页面或订阅源的文本内容。
    pub async fn get_text<T: IntoUrl>(&self, url: T) -> AppResult<String> {
        let url = url.into_url()?;
        debug!("GET {}", url);
        Ok(self.get(url).await?.text().await?)
    }

    pub async fn post_form<T: IntoUrl>(&self, url: T, form: &[(&str, &str)]) -> AppResult<Response> {
        let res = self
            .client
            .post(url)
            .timeout(self.config.timeout)
            .form(form)
            .send()
            .await?;
        Self::check_status(res)
    }

    /// 仅获取响应头的 HEAD 请求，状态码错误也视为失败。
    pub async fn head(&self, url: &str) -> Result<Response, reqwest::Error> {
        self.client
            .head(url)
            .timeout(self.config.timeout)
            .send()
            .await?
            .error_for_status()
    }

    /// 以流的方式下载资源，不设置整体超时。
    pub async fn get_stream(&self, url: &str) -> Result<Response, reqwest::Error> {
        self.client.get(url).send().await?.error_for_status()
    }
}
