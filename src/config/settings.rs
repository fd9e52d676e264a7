// src/config/settings.rs

use crate::{
    auth::Credentials,
    config::Settings,
    constants,
    error::{AppError, AppResult},
};
use anyhow::{Context, anyhow};
use log::{debug, info};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub fn get_config_path() -> AppResult<PathBuf> {
    let path = dirs::home_dir()
        .ok_or_else(|| AppError::Other(anyhow!("无法获取用户主目录")))?
        .join(constants::CONFIG_DIR_NAME)
        .join(constants::CONFIG_FILE_NAME);
    Ok(path)
}

pub fn load_or_create_settings() -> AppResult<Settings> {
    load_or_create_settings_at(&get_config_path()?)
}

pub(crate) fn load_or_create_settings_at(config_path: &Path) -> AppResult<Settings> {
    if config_path.is_file() {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("读取配置文件 '{}' 失败", config_path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件 '{}' 失败", config_path.display()))
            .map_err(AppError::from)
    } else {
        info!("配置文件 {:?} 不存在，将创建默认配置。", config_path);
        let settings = Settings::default_settings();
        save_settings_at(config_path, &settings)?;
        Ok(settings)
    }
}

pub fn save_settings(settings: &Settings) -> AppResult<()> {
    save_settings_at(&get_config_path()?, settings)
}

pub(crate) fn save_settings_at(config_path: &Path, settings: &Settings) -> AppResult<()> {
    if let Some(dir) = config_path.parent() {
        fs::create_dir_all(dir)?;
    }
    let json_content = serde_json::to_string_pretty(settings)?;
    fs::write(config_path, json_content)
        .with_context(|| format!("保存配置到 '{}' 失败", config_path.display()))?;
    info!("设置已保存至: {}", config_path.display());
    Ok(())
}

/// 只覆盖提供了新值的字段。
pub fn apply_updates(
    mut settings: Settings,
    email: Option<String>,
    password: Option<String>,
    download_path: Option<PathBuf>,
) -> Settings {
    if let Some(email) = email {
        settings.email = Some(email);
    }
    if let Some(password) = password {
        settings.password = Some(password);
    }
    if let Some(path) = download_path {
        settings.download_path = Some(path);
    }
    settings
}

/// 依次从环境变量和配置文件中查找登录信息。
pub fn resolve_credentials(settings: &Settings) -> Option<(Credentials, String)> {
    let env_email = std::env::var(constants::env::EMAIL).ok();
    let env_password = std::env::var(constants::env::PASSWORD).ok();
    if let (Some(email), Some(password)) = (env_email, env_password)
        && !email.is_empty()
        && !password.is_empty()
    {
        debug!("使用来自环境变量的登录信息");
        return Some((Credentials::new(email, password), "环境变量".to_string()));
    }
    if let (Some(email), Some(password)) = (&settings.email, &settings.password)
        && !email.is_empty()
        && !password.is_empty()
    {
        debug!("使用来自本地配置文件的登录信息");
        return Some((
            Credentials::new(email.clone(), password.clone()),
            "本地配置文件".to_string(),
        ));
    }
    debug!("未在任何位置找到可用的登录信息");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_creates_default_settings_when_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let settings = load_or_create_settings_at(&path).unwrap();
        assert!(path.is_file());
        assert_eq!(
            settings.network.max_concurrent_probes,
            Some(constants::DEFAULT_MAX_CONCURRENT_PROBES)
        );
        assert!(settings.email.is_none());
    }

    #[test]
    fn test_saved_settings_are_loaded_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let settings = apply_updates(
            Settings::default_settings(),
            Some("me@example.com".into()),
            None,
            Some(PathBuf::from("/videos")),
        );
        save_settings_at(&path, &settings).unwrap();

        let loaded = load_or_create_settings_at(&path).unwrap();
        assert_eq!(loaded.email.as_deref(), Some("me@example.com"));
        assert_eq!(loaded.password, None);
        assert_eq!(loaded.download_path, Some(PathBuf::from("/videos")));
    }

    #[test]
    fn test_apply_updates_keeps_unset_fields() {
        let original = Settings {
            email: Some("old@example.com".into()),
            password: Some("secret".into()),
            ..Default::default()
        };
        let updated = apply_updates(original, None, Some("new-secret".into()), None);
        assert_eq!(updated.email.as_deref(), Some("old@example.com"));
        assert_eq!(updated.password.as_deref(), Some("new-secret"));
    }
}
