// src/auth.rs

use crate::{
    client::RobustClient,
    config::Endpoints,
    constants::form,
    error::*,
    extractor::StructuredExtractor,
};
use log::{debug, error, info};
use std::{fmt, sync::Arc};

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"********")
            .finish()
    }
}

/// 登录成功后得到的会话。构造后不可变，所有需要认证的请求都以引用方式接收它。
#[derive(Debug, Clone)]
pub struct Session {
    credentials: Credentials,
    access_token: String,
}

impl Session {
    pub fn email(&self) -> &str {
        &self.credentials.email
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// 需要认证的操作在发起请求前调用。
    pub fn ensure_valid(&self) -> AppResult<()> {
        if self.access_token.is_empty() {
            return Err(AppError::NotAuthenticated);
        }
        Ok(())
    }

    #[cfg(feature = "testing")]
    pub fn for_testing(email: &str, access_token: &str) -> Self {
        Self {
            credentials: Credentials::new(email, "test-password"),
            access_token: access_token.to_string(),
        }
    }
}

pub struct SessionAuthenticator {
    http_client: Arc<RobustClient>,
    endpoints: Endpoints,
    extractor: Arc<dyn StructuredExtractor>,
    session: Option<Session>,
}

impl SessionAuthenticator {
    pub fn new(
        http_client: Arc<RobustClient>,
        endpoints: Endpoints,
        extractor: Arc<dyn StructuredExtractor>,
    ) -> Self {
        Self {
            http_client,
            endpoints,
            extractor,
            session: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> AppResult<&Session> {
        self.session.as_ref().ok_or(AppError::NotAuthenticated)
    }

    /// 登录流程: 获取登录页中的 CSRF Token -> 提交表单 -> 从会员页获取长期 Token。
    pub async fn authenticate(&mut self, credentials: Credentials) -> AppResult<&Session> {
        self.session = None;
        info!("开始登录: {}", credentials.email);

        let login_page = self.http_client.get_text(&self.endpoints.login_url).await?;
        let csrf_token = self
            .extractor
            .csrf_token(&login_page)
            .ok_or_else(|| {
                error!("登录页面中未找到 CSRF Token");
                AppError::CsrfTokenMissing
            })?;
        debug!("获取到 CSRF Token (长度 {})", csrf_token.len());

        let login_form = [
            (form::AUTHENTICITY_TOKEN, csrf_token.as_str()),
            (form::EMAIL, credentials.email.as_str()),
            (form::PASSWORD, credentials.password.as_str()),
            (form::UTF8, form::UTF8_CHECK),
        ];
        self.http_client
            .post_form(&self.endpoints.login_url, &login_form)
            .await
            .map_err(|e| {
                error!("提交登录表单失败: {}", e);
                AppError::AuthenticationRejected(format!("登录请求被拒绝 ({})", e))
            })?;

        let membership_page = self
            .http_client
            .get_text(&self.endpoints.membership_url)
            .await
            .map_err(|e| AppError::AuthenticationRejected(format!("无法访问会员页面 ({})", e)))?;
        let access_token = self.extractor.access_token(&membership_page).ok_or_else(|| {
            error!("会员页面中未找到 access token，邮箱或密码可能有误");
            AppError::AuthenticationRejected("邮箱或密码错误，未能获取 access token".to_string())
        })?;

        info!("登录成功: {}", credentials.email);
        Ok(self.session.insert(Session {
            credentials,
            access_token,
        }))
    }
}
