// src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("尚未登录或会话已失效")]
    NotAuthenticated,
    #[error("认证失败: 登录页面中未找到 CSRF Token")]
    CsrfTokenMissing,
    #[error("认证失败: {0}")]
    AuthenticationRejected(String),
    #[error("未找到名称包含 \"{0}\" 的技术分类")]
    TechnologyNotFound(String),
    #[error("未找到名称包含 \"{0}\" 的课程")]
    CourseNotFound(String),
    #[error("技术分类与课程过滤条件只能指定一个")]
    FilterAmbiguous,
    #[error("传输失败 '{url}' (已接收 {downloaded} 字节): {source}")]
    Transfer {
        url: String,
        downloaded: u64,
        #[source]
        source: reqwest::Error,
    },
    #[error("任务 '{task}' 失败: {source}")]
    TaskFailed {
        task: String,
        #[source]
        source: Box<AppError>,
    },
    #[error("尚未配置登录邮箱和密码")]
    CredentialsMissing,
    #[error("尚未配置下载目录")]
    DownloadPathMissing,
    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("URL 解析错误: {0}")]
    Url(#[from] url::ParseError),
    #[error("课程订阅源解析失败: {0}")]
    FeedParse(String),
    #[error("用户中断")]
    UserInterrupt,
    #[error("未知错误: {0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// 将底层网络错误包装为带有已传输字节数的传输错误。
    pub fn transfer(url: &str, downloaded: u64, source: reqwest::Error) -> Self {
        AppError::Transfer {
            url: url.to_string(),
            downloaded,
            source,
        }
    }

    /// 为错误附加所属任务 (技术/课程/课时) 的描述。
    pub fn in_task(self, task: impl Into<String>) -> Self {
        AppError::TaskFailed {
            task: task.into(),
            source: Box::new(self),
        }
    }

    /// 剥去任务包装，返回最内层的错误。
    pub fn root(&self) -> &AppError {
        match self {
            AppError::TaskFailed { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
