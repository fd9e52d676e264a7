// src/downloader/task_processor.rs

use super::{TransferObserver, fs_gate};
use crate::{
    client::RobustClient,
    error::*,
    models::{TaskOutcome, TransferTask},
    probe,
};
use futures::StreamExt;
use log::{debug, info, warn};
use std::{
    fs::{self, File},
    io::Write as IoWrite,
    sync::Arc,
};

/// 处理单个下载任务: 准备目录 -> 检查本地文件 -> 流式下载。
pub struct TaskProcessor {
    http_client: Arc<RobustClient>,
    force_redownload: bool,
}

impl TaskProcessor {
    pub fn new(http_client: Arc<RobustClient>, force_redownload: bool) -> Self {
        Self {
            http_client,
            force_redownload,
        }
    }

    pub async fn process(
        &self,
        task: &TransferTask,
        observer: &dyn TransferObserver,
    ) -> AppResult<TaskOutcome> {
        if task.url().is_empty() {
            return Ok(TaskOutcome::Skipped("没有可下载的视频资源".to_string()));
        }

        if let Some(parent) = task.destination.parent() {
            fs_gate::ensure_dir(parent)?;
        }

        if self.force_redownload && task.destination.exists() {
            info!("强制重新下载，删除已有文件: {:?}", task.destination);
            fs::remove_file(&task.destination)?;
        }

        if !fs_gate::should_download(&task.destination, task.expected_size())? {
            return Ok(TaskOutcome::Skipped("文件已存在且大小一致".to_string()));
        }

        let bytes = self.download(task, observer).await?;
        Ok(TaskOutcome::Downloaded(bytes))
    }

    /// 以流的方式把响应体写入目标文件，已有内容被整体覆盖。
    /// 中途失败时已写入的部分保留在磁盘上，由下次运行时的大小检查处理。
    async fn download(&self, task: &TransferTask, observer: &dyn TransferObserver) -> AppResult<u64> {
        let url = task.url();
        let response = self
            .http_client
            .get_stream(url)
            .await
            .map_err(|e| AppError::transfer(url, 0, e))?;

        let total = probe::declared_length(response.headers()).or(task.expected_size());
        if let (Some(declared), Some(expected)) = (total, task.expected_size())
            && declared != expected
        {
            warn!(
                "'{}' 的响应长度 {} 与探测到的大小 {} 不一致",
                task.label(),
                declared,
                expected
            );
        }

        let mut file = File::create(&task.destination)?;
        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(|e| AppError::transfer(url, downloaded, e))?;
            file.write_all(&chunk)?;
            downloaded += chunk.len() as u64;
            observer.on_progress(task, downloaded, total);
        }
        file.flush()?;

        debug!("'{}' 下载完成，共 {} 字节", task.label(), downloaded);
        Ok(downloaded)
    }
}
