// src/config.rs

pub mod settings;

use crate::{cli::DownloadArgs, constants};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub max_concurrent_probes: Option<usize>,
}

/// 远程站点的各个入口地址，可在配置文件中覆盖。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub login_url: String,
    pub courses_url: String,
    pub membership_url: String,
    /// 课程订阅源地址模板，`{code}` 会被替换为课程标识
    pub feed_url_template: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login_url: constants::urls::LOGIN.into(),
            courses_url: constants::urls::COURSES.into(),
            membership_url: constants::urls::MEMBERSHIP.into(),
            feed_url_template: constants::urls::COURSE_FEED.into(),
        }
    }
}

impl Endpoints {
    /// 所有地址都指向同一个主机，测试时用来对接模拟服务器。
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            login_url: format!("{}/users/sign_in", base),
            courses_url: format!("{}/courses", base),
            membership_url: format!("{}/users/me/membership", base),
            feed_url_template: format!("{}/courses/{{code}}/course_feed", base),
        }
    }
}

/// 持久化在 `~/.egghead-dl/config.json` 中的用户设置。
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_path: Option<PathBuf>,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Settings {
    pub(crate) fn default_settings() -> Self {
        Self {
            network: NetworkConfig {
                connect_timeout_secs: Some(constants::DEFAULT_CONNECT_TIMEOUT_SECS),
                timeout_secs: Some(constants::DEFAULT_TIMEOUT_SECS),
                max_concurrent_probes: Some(constants::DEFAULT_MAX_CONCURRENT_PROBES),
            },
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub probe_concurrency: usize,
    pub force_redownload: bool,
    pub download_path: Option<PathBuf>,
    pub endpoints: Endpoints,
}

impl AppConfig {
    /// 命令行参数优先于配置文件。
    pub fn from_settings(settings: &Settings, args: &DownloadArgs) -> Self {
        let probe_concurrency = args
            .workers
            .or(settings.network.max_concurrent_probes)
            .unwrap_or(constants::DEFAULT_MAX_CONCURRENT_PROBES)
            .max(1);

        Self {
            user_agent: constants::USER_AGENT.into(),
            connect_timeout: Duration::from_secs(
                settings
                    .network
                    .connect_timeout_secs
                    .unwrap_or(constants::DEFAULT_CONNECT_TIMEOUT_SECS),
            ),
            timeout: Duration::from_secs(
                settings
                    .network
                    .timeout_secs
                    .unwrap_or(constants::DEFAULT_TIMEOUT_SECS),
            ),
            probe_concurrency,
            force_redownload: args.force_redownload,
            download_path: args
                .output
                .clone()
                .or_else(|| settings.download_path.clone()),
            endpoints: settings.endpoints.clone(),
        }
    }
}

#[cfg(feature = "testing")]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: "test-agent/1.0".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
            probe_concurrency: constants::DEFAULT_MAX_CONCURRENT_PROBES,
            force_redownload: false,
            download_path: None,
            endpoints: Endpoints::default(),
        }
    }
}
