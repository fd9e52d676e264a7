// src/main.rs

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use egghead_dl::{
    cli::{Cli, LogLevel},
    constants, run_from_cli,
};
use log::warn;
use std::{env, sync::Arc, time::Duration};

fn init_logger(level: LogLevel) {
    if level == LogLevel::Off {
        return;
    }
    let app_name = clap::crate_name!();

    let log_file_path = match dirs::home_dir() {
        Some(home) => home
            .join(constants::CONFIG_DIR_NAME)
            .join(constants::LOG_FILE_NAME),
        None => {
            eprintln!("警告: 无法获取用户主目录，日志将写入临时目录。");
            env::temp_dir().join(app_name).join(constants::LOG_FILE_NAME)
        }
    };

    if let Some(dir) = log_file_path.parent()
        && let Err(e) = std::fs::create_dir_all(dir)
    {
        eprintln!("警告: 无法创建日志目录 {:?}: {}", dir, e);
    }

    let file_appender = match fern::log_file(&log_file_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!(
                "警告: 无法打开日志文件 {:?}: {}。将尝试使用备用日志文件。",
                log_file_path, e
            );
            let fallback_path = env::temp_dir().join(format!(
                "{}-{}",
                app_name,
                constants::LOG_FALLBACK_FILE_NAME
            ));
            match fern::log_file(&fallback_path) {
                Ok(file) => {
                    warn!("日志将写入备用文件: {:?}", fallback_path);
                    file
                }
                Err(e) => {
                    eprintln!("错误: 无法创建备用日志文件 {:?}: {}。", fallback_path, e);
                    return;
                }
            }
        }
    };

    let result = fern::Dispatch::new()
        .level(level.into())
        // 屏蔽依赖库的调试输出
        .level_for("html5ever", log::LevelFilter::Warn)
        .level_for("selectors", log::LevelFilter::Warn)
        .level_for("hyper_util", log::LevelFilter::Warn)
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] [{:<5}] [{}:{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.line().unwrap_or(0),
                message
            ))
        })
        .chain(file_appender)
        .apply();

    if let Err(e) = result {
        eprintln!("警告: 日志系统初始化失败: {}", e);
    }
}

#[tokio::main]
async fn main() {
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n{} 用户强制中断程序。", "[!]".yellow());
            tokio::time::sleep(Duration::from_millis(100)).await;
            std::process::exit(130);
        }
    });

    let bin_name = env::var("CARGO_BIN_NAME").unwrap_or_else(|_| clap::crate_name!().to_string());
    let after_help = format!(
        "示例:\n  # 列出全部课程\n  {bin} list\n\n  # 下载名称包含 react 的技术分类下的所有课程\n  {bin} download -t react\n\n  # 不经确认直接下载某门课程\n  {bin} download -c \"redux basics\" -y\n\n  # 设置登录信息与下载目录\n  {bin} config -e me@example.com --ask-password -d ~/egghead",
        bin = bin_name
    );
    let cmd = Cli::command().after_help(after_help);
    let args = match Cli::from_arg_matches(&cmd.get_matches()) {
        Ok(args) => Arc::new(args),
        Err(e) => e.exit(),
    };

    init_logger(args.log_level);

    if let Err(e) = run_from_cli(args).await {
        log::error!("程序执行出错: {:?}", e);
        eprintln!("\n{} {}", "[X]".red(), format!("程序执行出错: {}", e).red());
        std::process::exit(1);
    }
}
