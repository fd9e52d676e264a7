// src/models/transfer.rs

use super::LessonWithFileSize;
use std::path::PathBuf;

/// 扁平化、排好序之后的单个下载任务。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTask {
    pub technology: String,
    pub course: String,
    pub lesson: LessonWithFileSize,
    pub destination: PathBuf,
    /// 在整个下载计划中的位置，从 0 开始
    pub sequence_index: usize,
    pub total_count: usize,
}

impl TransferTask {
    pub fn url(&self) -> &str {
        &self.lesson.lesson.url
    }

    pub fn expected_size(&self) -> Option<u64> {
        self.lesson.file_size
    }

    /// 用于日志和错误信息的任务描述。
    pub fn label(&self) -> String {
        format!(
            "{} / {} / {:02} {}",
            self.technology, self.course, self.lesson.lesson.lesson_number, self.lesson.lesson.name
        )
    }

    pub fn file_name(&self) -> String {
        self.destination
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.lesson.lesson.name.clone())
    }
}

/// 单个任务在第三阶段的处理结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Downloaded(u64),
    Skipped(String),
}
