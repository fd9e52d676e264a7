// src/workflows.rs

use crate::{
    auth::{Credentials, Session, SessionAuthenticator},
    catalog::{self, CatalogService},
    cli::{ConfigArgs, DownloadArgs},
    client::RobustClient,
    config::{
        AppConfig, Settings,
        settings::{self, get_config_path, load_or_create_settings},
    },
    constants,
    downloader::{
        DownloadManager, DownloadScheduler, SchedulerOptions, TransferObserver, fs_gate,
    },
    error::{AppError, AppResult},
    extractor::{EggheadExtractor, StructuredExtractor},
    feed::LessonFeedService,
    models::{EnrichedTechnology, Filter, Technology, TransferTask},
    probe::FileSizeProber,
    symbols, ui, utils,
};
use colored::*;
use heck::ToTitleCase;
use indicatif::{HumanBytes, ProgressBar};
use log::{debug, info};
use std::{
    path::Path,
    sync::{Arc, Mutex, PoisonError},
};

/// 登录后的共享组件。
struct Connection {
    config: Arc<AppConfig>,
    http_client: Arc<RobustClient>,
    extractor: Arc<dyn StructuredExtractor>,
    session: Session,
}

fn print_setup_guide(title: &str) {
    ui::box_message(
        title,
        constants::HELP_SETUP_GUIDE
            .lines()
            .collect::<Vec<_>>()
            .as_slice(),
        |s| s.yellow(),
    );
}

fn require_credentials(settings: &Settings) -> AppResult<Credentials> {
    match settings::resolve_credentials(settings) {
        Some((credentials, source)) => {
            info!("从 {} 加载登录信息", source);
            ui::info(&format!("已从{}加载登录信息: {}", source, credentials.email));
            Ok(credentials)
        }
        None => {
            print_setup_guide("尚未配置登录信息");
            Err(AppError::CredentialsMissing)
        }
    }
}

async fn connect(config: AppConfig, credentials: Credentials) -> AppResult<Connection> {
    let config = Arc::new(config);
    debug!("应用配置: {:?}", config);
    let http_client = Arc::new(RobustClient::new(config.clone())?);
    let extractor: Arc<dyn StructuredExtractor> = Arc::new(EggheadExtractor);

    let mut authenticator = SessionAuthenticator::new(
        http_client.clone(),
        config.endpoints.clone(),
        extractor.clone(),
    );
    let spinner = ui::new_spinner("正在登录...");
    let result = authenticator.authenticate(credentials).await.cloned();
    spinner.finish_and_clear();
    let session = result?;
    ui::success(&format!("登录成功: {}", session.email()));

    Ok(Connection {
        config,
        http_client,
        extractor,
        session,
    })
}

async fn fetch_catalog(connection: &Connection) -> AppResult<Vec<Technology>> {
    let service = CatalogService::new(
        connection.http_client.clone(),
        connection.config.endpoints.clone(),
        connection.extractor.clone(),
    );
    let spinner = ui::new_spinner("正在获取课程目录...");
    let result = service
        .list_catalog(&connection.session, |done, total| {
            spinner.set_message(format!("正在整理课程目录 ({}/{})...", done, total));
        })
        .await;
    spinner.finish_and_clear();
    result
}

/// `list` 子命令: 列出所有技术分类与课程。
pub(crate) async fn run_list() -> AppResult<()> {
    let settings = load_or_create_settings()?;
    let credentials = require_credentials(&settings)?;
    let config = AppConfig::from_settings(&settings, &DownloadArgs::default());
    let connection = connect(config, credentials).await?;

    let technologies = fetch_catalog(&connection).await?;
    ui::print_header(&catalog_summary(&technologies));
    for technology in &technologies {
        println!(
            "\n{} {} ({} 门课程)",
            *symbols::BULLET,
            technology.name.bold(),
            technology.courses.len()
        );
        for course in &technology.courses {
            println!(
                "    - {} {}",
                utils::truncate_text(&course.name, constants::LESSON_NAME_TRUNCATE_LENGTH),
                format!("[{} 个课时]", course.lesson_count).dimmed()
            );
        }
    }
    Ok(())
}

fn catalog_summary(technologies: &[Technology]) -> String {
    let course_total: usize = technologies.iter().map(|t| t.courses.len()).sum();
    let lesson_total: u64 = technologies
        .iter()
        .flat_map(|t| t.courses.iter())
        .map(|c| u64::from(c.lesson_count))
        .sum();
    format!(
        "课程目录 ({} 个课时，{} 门课程，{} 个技术分类)",
        lesson_total,
        course_total,
        technologies.len()
    )
}

/// `download` 子命令: 过滤 -> 补全 -> 确认 -> 下载 -> 报告。
pub(crate) async fn run_download(args: &DownloadArgs) -> AppResult<()> {
    let filter = Filter::from_options(args.technology.as_deref(), args.course.as_deref())?;

    let settings = load_or_create_settings()?;
    let credentials = require_credentials(&settings)?;
    let config = AppConfig::from_settings(&settings, args);
    let Some(download_root) = config.download_path.clone() else {
        print_setup_guide("尚未配置下载目录");
        return Err(AppError::DownloadPathMissing);
    };
    fs_gate::ensure_dir(&download_root)?;
    let download_root = dunce::canonicalize(&download_root).unwrap_or(download_root);
    ui::info(&format!("下载目录: {}", download_root.display()));

    let connection = connect(config, credentials).await?;
    let technologies = fetch_catalog(&connection).await?;
    let technologies = catalog::apply_filter(filter.as_ref(), technologies)?;

    let scheduler = DownloadScheduler::new(
        Arc::new(LessonFeedService::new(
            connection.http_client.clone(),
            connection.config.endpoints.clone(),
            connection.extractor.clone(),
        )),
        Arc::new(FileSizeProber::new(connection.http_client.clone())),
        connection.http_client.clone(),
        DownloadManager::new(),
        SchedulerOptions {
            probe_concurrency: connection.config.probe_concurrency,
            force_redownload: connection.config.force_redownload,
        },
    );

    ui::print_header("阶段 1/2: 获取课时信息");
    let pbar = ui::new_count_bar(0, "探测");
    let enriched = scheduler
        .enrich(&connection.session, technologies, &|done, total| {
            pbar.set_length(total as u64);
            pbar.set_position(done as u64);
        })
        .await;
    pbar.finish_and_clear();
    let enriched = enriched?;

    print_enriched_summary(&enriched);
    let tasks = scheduler.plan(&enriched, &download_root);
    if tasks.is_empty() {
        ui::warn("没有可下载的课时。");
        return Ok(());
    }

    if !args.yes
        && !ui::confirm(
            &format!("即将按顺序下载 {} 个课时，是否继续?", tasks.len()),
            true,
        )
    {
        ui::info("已取消下载。");
        return Ok(());
    }

    ui::print_header(&format!("阶段 2/2: 下载课时 (共 {} 个)", tasks.len()));
    let observer = ConsoleObserver::default();
    let result = scheduler.execute(&tasks, &observer).await;
    scheduler.manager().print_report();
    result
}

fn print_enriched_summary(technologies: &[EnrichedTechnology]) {
    let mut lesson_total = 0;
    let mut size_total = 0;
    for technology in technologies.iter().filter(|t| !t.courses.is_empty()) {
        println!(
            "\n{} {} ({})",
            *symbols::BULLET,
            technology.name.bold(),
            HumanBytes(technology.total_size())
        );
        for course in &technology.courses {
            lesson_total += course.lessons.len();
            size_total += course.total_size();
            println!(
                "    - {} {}",
                utils::truncate_text(&course.course.name, constants::LESSON_NAME_TRUNCATE_LENGTH),
                format!(
                    "[{} 个课时, {}]",
                    course.lessons.len(),
                    HumanBytes(course.total_size())
                )
                .dimmed()
            );
        }
    }
    println!();
    ui::info(&format!(
        "共 {} 个课时，已知大小合计 {}",
        lesson_total,
        HumanBytes(size_total)
    ));
}

/// 在终端中为当前下载任务显示进度条。
#[derive(Default)]
struct ConsoleObserver {
    current: Mutex<Option<ProgressBar>>,
}

impl ConsoleObserver {
    fn take_bar(&self) -> Option<ProgressBar> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn task_title(task: &TransferTask) -> String {
        format!(
            "[{}/{}] {}",
            task.sequence_index + 1,
            task.total_count,
            utils::truncate_text(&task.label(), constants::UI_WIDTH - 12)
        )
    }
}

impl TransferObserver for ConsoleObserver {
    fn on_task_start(&self, task: &TransferTask) {
        let pbar = ui::new_bytes_progress_bar(task.expected_size(), Self::task_title(task));
        if let Some(previous) = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(pbar)
        {
            previous.finish_and_clear();
        }
    }

    fn on_progress(&self, _task: &TransferTask, downloaded: u64, total: Option<u64>) {
        let guard = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pbar) = guard.as_ref() {
            if let Some(total) = total
                && pbar.length() != Some(total)
            {
                pbar.set_length(total);
            }
            pbar.set_position(downloaded);
        }
    }

    fn on_task_skipped(&self, task: &TransferTask, reason: &str) {
        if let Some(pbar) = self.take_bar() {
            pbar.finish_and_clear();
        }
        println!(
            "{} {} {}",
            *symbols::SKIP,
            Self::task_title(task),
            format!("({})", reason).dimmed()
        );
    }

    fn on_task_finished(&self, task: &TransferTask, bytes: u64) {
        if let Some(pbar) = self.take_bar() {
            pbar.finish_and_clear();
        }
        println!("{} {} ({})", *symbols::OK, Self::task_title(task), HumanBytes(bytes));
    }

    fn on_task_failed(&self, task: &TransferTask, error: &AppError) {
        if let Some(pbar) = self.take_bar() {
            pbar.abandon();
        }
        println!(
            "{} {} {}",
            *symbols::ERROR,
            Self::task_title(task),
            error.to_string().red()
        );
    }
}

/// `config` 子命令: 不带参数时显示当前设置，否则更新对应字段。
pub(crate) fn run_config(args: &ConfigArgs) -> AppResult<()> {
    let config_path = get_config_path()?;
    let settings = load_or_create_settings()?;

    if !args.has_any_values() {
        display_settings(&settings, &config_path)?;
        return Ok(());
    }

    let password = if args.ask_password {
        let password =
            ui::prompt_hidden("请输入登录密码").map_err(|_| AppError::UserInterrupt)?;
        if password.is_empty() {
            return Err(AppError::CredentialsMissing);
        }
        Some(password)
    } else {
        args.password.clone()
    };

    let settings = settings::apply_updates(
        settings,
        args.email.clone(),
        password,
        args.download_path.clone(),
    );
    settings::save_settings(&settings)?;
    ui::success("设置已更新。");
    display_settings(&settings, &config_path)
}

fn display_settings(settings: &Settings, config_path: &Path) -> AppResult<()> {
    ui::print_sub_header("当前设置");
    ui::info(&format!("配置文件: {}", config_path.display()));
    for (name, value) in settings_rows(settings)? {
        println!("  {:<28} {}", name.bold(), value);
    }
    if settings.email.is_none() || settings.password.is_none() || settings.download_path.is_none() {
        print_setup_guide("设置尚不完整");
    }
    Ok(())
}

/// 把设置展开为 (字段名, 值) 列表，字段名转换为标题格式，密码以掩码显示。
fn settings_rows(settings: &Settings) -> AppResult<Vec<(String, String)>> {
    fn flatten(prefix: &str, value: &serde_json::Value, rows: &mut Vec<(String, String)>) {
        match value {
            serde_json::Value::Object(map) => {
                for (key, child) in map {
                    let name = if prefix.is_empty() {
                        key.to_title_case()
                    } else {
                        format!("{} / {}", prefix, key.to_title_case())
                    };
                    flatten(&name, child, rows);
                }
            }
            serde_json::Value::String(s) => rows.push((prefix.to_string(), s.clone())),
            serde_json::Value::Null => rows.push((prefix.to_string(), "(未设置)".to_string())),
            other => rows.push((prefix.to_string(), other.to_string())),
        }
    }

    let mut masked = settings.clone();
    if let Some(password) = masked.password.as_mut() {
        *password = "*".repeat(8);
    }
    let mut rows = Vec::new();
    flatten("", &serde_json::to_value(&masked)?, &mut rows);
    for field in ["email", "password", "download_path"] {
        let name = field.to_title_case();
        if !rows.iter().any(|(n, _)| *n == name) {
            rows.push((name, "(未设置)".to_string()));
        }
    }
    Ok(rows)
}
