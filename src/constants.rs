// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const LESSON_NAME_TRUNCATE_LENGTH: usize = 60;
pub const MAX_FILENAME_BYTES: usize = 200;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const LESSON_FILE_EXTENSION: &str = "mp4";
pub const LESSON_NUMBER_WIDTH: usize = 2;
pub const DEFAULT_MAX_CONCURRENT_PROBES: usize = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const PROGRESS_TICK_MS: u64 = 100;
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; WOW64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/49.0.2623.87 Safari/537.36";
pub const ACCEPT_LANGUAGE: &str = "en-GB,en-US;q=0.8,en;q=0.6";

pub mod env {
    pub const EMAIL: &str = "EGGHEAD_EMAIL";
    pub const PASSWORD: &str = "EGGHEAD_PASSWORD";
}

pub mod urls {
    pub const LOGIN: &str = "https://egghead.io/users/sign_in";
    pub const COURSES: &str = "https://egghead.io/courses";
    pub const MEMBERSHIP: &str = "https://egghead.io/users/me/membership";
    pub const COURSE_FEED: &str = "https://egghead.io/courses/{code}/course_feed";
}

pub mod form {
    pub const AUTHENTICITY_TOKEN: &str = "authenticity_token";
    pub const EMAIL: &str = "user[email]";
    pub const PASSWORD: &str = "user[password]";
    pub const UTF8: &str = "utf8";
    pub const UTF8_CHECK: &str = "✓";
}

pub mod feed_params {
    pub const EMAIL: &str = "user_email";
    pub const TOKEN: &str = "user_token";
}

pub const HELP_SETUP_GUIDE: &str = r#"
1. 设置登录信息 (密码将以明文保存在本地配置文件中):
     egghead-dl config -e <邮箱> --ask-password
2. 设置下载目录:
     egghead-dl config -d <目录>
3. 也可以通过环境变量 EGGHEAD_EMAIL / EGGHEAD_PASSWORD 临时提供登录信息。"#;
