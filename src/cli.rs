// src/cli.rs

use clap::{Args, Parser, Subcommand, ValueEnum, crate_version};
use std::path::PathBuf;

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    arg_required_else_help = true,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// (隐藏参数) 设置日志文件的输出级别，用于调试
    #[arg(long, value_enum, default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// 列出所有技术分类及其课程
    List,
    /// 下载课程 (可按技术分类或课程名称过滤)
    Download(DownloadArgs),
    /// 查看或修改本地设置
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct DownloadArgs {
    /// 只下载名称包含该字符串的技术分类 (不区分大小写)
    #[arg(short, long, value_name = "TECHNOLOGY")]
    pub technology: Option<String>,
    /// 只下载名称包含该字符串的课程 (不区分大小写)
    #[arg(short, long, value_name = "COURSE")]
    pub course: Option<String>,
    /// 跳过下载前的确认提示
    #[arg(short = 'y', long, visible_alias = "no-verify", action = clap::ArgAction::SetTrue)]
    pub yes: bool,
    /// 强制重新下载已存在的文件
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    pub force_redownload: bool,
    /// 设置文件大小探测的最大并发数
    #[arg(short, long, value_parser = clap::value_parser!(usize))]
    pub workers: Option<usize>,
    /// 设置文件保存目录 (覆盖配置文件中的下载目录)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// 登录邮箱
    #[arg(short, long)]
    pub email: Option<String>,
    /// 登录密码
    #[arg(short, long)]
    pub password: Option<String>,
    /// 以不可见的方式输入登录密码
    #[arg(long, action = clap::ArgAction::SetTrue, conflicts_with = "password")]
    pub ask_password: bool,
    /// 下载目录
    #[arg(short, long, value_name = "DIR")]
    pub download_path: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn has_any_values(&self) -> bool {
        self.email.is_some()
            || self.password.is_some()
            || self.ask_password
            || self.download_path.is_some()
    }
}
