// src/downloader/mod.rs

pub mod fs_gate;
mod observer;
pub mod plan;
mod scheduler;
mod task_processor;

pub use observer::{NoopObserver, TransferObserver};
pub use scheduler::{DownloadScheduler, SchedulerOptions};

use crate::{
    auth::Session,
    error::AppResult,
    models::{Course, Lesson},
    symbols, ui,
};
use async_trait::async_trait;
use colored::*;
use indicatif::HumanBytes;
use log::{error, info};
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// 提供某门课程的有序课时列表。
#[async_trait]
pub trait LessonSource: Send + Sync {
    async fn list_lessons(&self, session: &Session, course: &Course) -> AppResult<Vec<Lesson>>;
}

/// 在不下载内容的前提下获取远程文件大小。
#[async_trait]
pub trait SizeProbe: Send + Sync {
    async fn probe(&self, url: &str) -> AppResult<Option<u64>>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadStats {
    pub total: usize,
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
    pub bytes: u64,
}

impl DownloadStats {
    /// 已处理 (成功、跳过或失败) 的任务数。
    pub fn processed(&self) -> usize {
        self.success + self.skipped + self.failed
    }
}

#[derive(Default)]
struct Records {
    stats: DownloadStats,
    skipped: Vec<(String, String)>,
    failed: Vec<(String, String)>,
}

/// 汇总一次下载过程的结果。下载中途终止后仍可打印报告。
#[derive(Clone, Default)]
pub struct DownloadManager {
    records: Arc<Mutex<Records>>,
}

impl DownloadManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, Records> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn start_batch(&self, total_tasks: usize) {
        info!("开始新一批下载任务，总数: {}", total_tasks);
        *self.records() = Records {
            stats: DownloadStats {
                total: total_tasks,
                ..Default::default()
            },
            ..Default::default()
        };
    }

    pub fn record_success(&self, task: &str, bytes: u64) {
        info!("'{}' 下载完成 ({})", task, HumanBytes(bytes));
        let mut records = self.records();
        records.stats.success += 1;
        records.stats.bytes += bytes;
    }

    pub fn record_skip(&self, task: &str, reason: &str) {
        info!("跳过 '{}'，原因: {}", task, reason);
        let mut records = self.records();
        records.stats.skipped += 1;
        records.skipped.push((task.to_string(), reason.to_string()));
    }

    pub fn record_failure(&self, task: &str, reason: &str) {
        error!("'{}' 下载失败: {}", task, reason);
        let mut records = self.records();
        records.stats.failed += 1;
        records.failed.push((task.to_string(), reason.to_string()));
    }

    pub fn get_stats(&self) -> DownloadStats {
        self.records().stats.clone()
    }

    pub fn did_all_succeed(&self) -> bool {
        let stats = self.get_stats();
        stats.failed == 0 && stats.processed() == stats.total
    }

    pub fn print_report(&self) {
        let records = self.records();
        let stats = &records.stats;
        info!(
            "下载报告: Total={}, Success={}, Skipped={}, Failed={}, Bytes={}",
            stats.total, stats.success, stats.skipped, stats.failed, stats.bytes
        );

        if !records.skipped.is_empty() || !records.failed.is_empty() {
            ui::print_sub_header("下载详情报告");
            if !records.skipped.is_empty() {
                println!("\n{} 跳过的课时 ({}个):", *symbols::INFO, stats.skipped);
                print_grouped_report(&records.skipped, |s| s.cyan());
            }
            if !records.failed.is_empty() {
                println!("\n{} 失败的课时 ({}个):", *symbols::ERROR, stats.failed);
                print_grouped_report(&records.failed, |s| s.red());
            }
        }

        ui::print_sub_header("任务总结");
        let not_started = stats.total.saturating_sub(stats.processed());
        if stats.failed == 0 && not_started == 0 {
            println!(
                "{} 所有 {} 个课时均已处理 (下载 {} 个，共 {}；跳过 {} 个)。",
                *symbols::OK,
                stats.total,
                stats.success,
                HumanBytes(stats.bytes),
                stats.skipped
            );
        } else {
            let summary = format!(
                "{} | {} | {} | {}",
                format!("成功: {}", stats.success).green(),
                format!("失败: {}", stats.failed).red(),
                format!("跳过: {}", stats.skipped).yellow(),
                format!("未开始: {}", not_started).dimmed()
            );
            println!("{}", summary);
        }
    }
}

fn print_grouped_report(items: &[(String, String)], color_fn: fn(ColoredString) -> ColoredString) {
    let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (task, reason) in items {
        grouped.entry(reason.as_str()).or_default().push(task.as_str());
    }
    for (reason, tasks) in grouped {
        println!("  - {}", color_fn(format!("原因: {}", reason).into()));
        for task in tasks {
            println!("    - {}", task);
        }
    }
}
