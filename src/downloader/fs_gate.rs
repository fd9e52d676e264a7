// src/downloader/fs_gate.rs

use crate::error::AppResult;
use anyhow::Context;
use indicatif::HumanBytes;
use log::{debug, info};
use std::{fs, path::Path};

/// 决定目标文件是否需要 (重新) 下载。
///
/// - 文件不存在: 需要下载
/// - 预期大小未知: 需要下载，写入时整体覆盖
/// - 大小一致: 不需要下载，文件保持不变
/// - 大小不一致: 删除旧文件后重新下载
pub fn should_download(path: &Path, expected_size: Option<u64>) -> AppResult<bool> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(e.into()),
    };

    let Some(expected) = expected_size else {
        debug!("'{}' 没有预期大小，重新下载", path.display());
        return Ok(true);
    };

    let actual = metadata.len();
    if actual == expected {
        debug!("'{}' 已完整存在 ({})", path.display(), HumanBytes(actual));
        return Ok(false);
    }

    info!(
        "'{}' 大小不一致 (预期: {}, 实际: {})，删除后重新下载",
        path.display(),
        HumanBytes(expected),
        HumanBytes(actual)
    );
    fs::remove_file(path)?;
    Ok(true)
}

/// 创建目录 (含所有父目录)，目录已存在时不做任何事。
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    fs::create_dir_all(path).with_context(|| format!("无法创建目录 '{}'", path.display()))?;
    Ok(())
}
