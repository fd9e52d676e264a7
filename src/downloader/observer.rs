// src/downloader/observer.rs

use crate::{error::AppError, models::TransferTask};

/// 下载阶段的进度回调。所有方法都有空的默认实现，按需覆盖即可。
pub trait TransferObserver: Send + Sync {
    fn on_task_start(&self, _task: &TransferTask) {}

    /// 每收到一个数据块后调用，`total` 为响应声明的长度。
    fn on_progress(&self, _task: &TransferTask, _downloaded: u64, _total: Option<u64>) {}

    fn on_task_skipped(&self, _task: &TransferTask, _reason: &str) {}

    fn on_task_finished(&self, _task: &TransferTask, _bytes: u64) {}

    fn on_task_failed(&self, _task: &TransferTask, _error: &AppError) {}
}

/// 不输出任何内容的观察者，用于测试与非交互场景。
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TransferObserver for NoopObserver {}
