// src/lib.rs

pub mod auth;
pub mod catalog;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod downloader;
pub mod error;
pub mod extractor;
pub mod feed;
pub mod models;
pub mod probe;
pub mod symbols;
pub mod ui;
pub mod utils;
mod workflows;

use crate::{
    cli::{Cli, Command},
    error::AppResult,
};
use log::debug;
use std::sync::Arc;

/// 库的公共入口点，由 `main.rs` 调用
pub async fn run_from_cli(args: Arc<Cli>) -> AppResult<()> {
    debug!("CLI 参数: {:?}", args);
    match &args.command {
        Command::List => workflows::run_list().await,
        Command::Download(download_args) => workflows::run_download(download_args).await,
        Command::Config(config_args) => workflows::run_config(config_args),
    }
}
