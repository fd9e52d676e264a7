// src/downloader/scheduler.rs

use super::{
    DownloadManager, LessonSource, SizeProbe, TransferObserver, plan, task_processor::TaskProcessor,
};
use crate::{
    auth::Session,
    client::RobustClient,
    error::*,
    models::{
        CourseWithLessons, EnrichedTechnology, LessonWithFileSize, TaskOutcome, Technology,
        TransferTask,
    },
};
use futures::{StreamExt, TryStreamExt, stream};
use log::{error, info};
use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

#[derive(Debug, Clone)]
pub struct SchedulerOptions {
    /// 同时进行的大小探测请求上限
    pub probe_concurrency: usize,
    pub force_redownload: bool,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            probe_concurrency: crate::constants::DEFAULT_MAX_CONCURRENT_PROBES,
            force_redownload: false,
        }
    }
}

/// 三阶段下载流程: 补全元数据 -> 生成有序计划 -> 逐个下载。
pub struct DownloadScheduler {
    lessons: Arc<dyn LessonSource>,
    prober: Arc<dyn SizeProbe>,
    processor: TaskProcessor,
    manager: DownloadManager,
    options: SchedulerOptions,
}

impl DownloadScheduler {
    pub fn new(
        lessons: Arc<dyn LessonSource>,
        prober: Arc<dyn SizeProbe>,
        http_client: Arc<RobustClient>,
        manager: DownloadManager,
        options: SchedulerOptions,
    ) -> Self {
        let processor = TaskProcessor::new(http_client, options.force_redownload);
        Self {
            lessons,
            prober,
            processor,
            manager,
            options,
        }
    }

    pub fn manager(&self) -> &DownloadManager {
        &self.manager
    }

    /// 第一阶段: 为每门课程获取课时列表并探测文件大小。
    ///
    /// 技术分类与课程依次处理；同一课程内的探测请求最多 `probe_concurrency` 个同时进行。
    /// `on_progress(已探测, 总数)` 中的总数取页面上声明的课时数之和，且不会小于已探测数。
    /// 任意一次请求失败即终止整个阶段。
    pub async fn enrich(
        &self,
        session: &Session,
        technologies: Vec<Technology>,
        on_progress: &(dyn Fn(usize, usize) + Sync),
    ) -> AppResult<Vec<EnrichedTechnology>> {
        session.ensure_valid()?;
        let advertised: usize = technologies
            .iter()
            .flat_map(|t| t.courses.iter())
            .map(|c| c.lesson_count as usize)
            .sum();
        let checked = AtomicUsize::new(0);
        let cap = self.options.probe_concurrency.max(1);

        let mut enriched = Vec::with_capacity(technologies.len());
        for technology in technologies {
            let mut courses = Vec::with_capacity(technology.courses.len());
            for course in technology.courses {
                let course_label = format!("{} / {}", technology.name, course.name);
                let lessons = self
                    .lessons
                    .list_lessons(session, &course)
                    .await
                    .map_err(|e| e.in_task(course_label.clone()))?;

                let lessons: Vec<LessonWithFileSize> = stream::iter(lessons)
                    .map(|lesson| {
                        let prober = Arc::clone(&self.prober);
                        let checked = &checked;
                        let course_label = &course_label;
                        async move {
                            let file_size = prober.probe(&lesson.url).await.map_err(|e| {
                                e.in_task(format!(
                                    "{} / {:02} {}",
                                    course_label, lesson.lesson_number, lesson.name
                                ))
                            })?;
                            let done = checked.fetch_add(1, Ordering::SeqCst) + 1;
                            on_progress(done, advertised.max(done));
                            Ok::<_, AppError>(LessonWithFileSize { lesson, file_size })
                        }
                    })
                    .buffered(cap)
                    .try_collect()
                    .await?;

                courses.push(CourseWithLessons { course, lessons });
            }
            enriched.push(Technology::new(technology.name, courses));
        }

        info!(
            "元数据补全完成: {} 个课时已探测 (页面声明 {} 个)",
            checked.load(Ordering::SeqCst),
            advertised
        );
        Ok(enriched)
    }

    /// 第二阶段: 展开为有序的下载计划。
    pub fn plan(&self, technologies: &[EnrichedTechnology], root: &Path) -> Vec<TransferTask> {
        plan::build_plan(technologies, root)
    }

    /// 第三阶段: 严格按顺序逐个下载。任一任务失败即终止，并返回带任务描述的错误。
    pub async fn execute(&self, tasks: &[TransferTask], observer: &dyn TransferObserver) -> AppResult<()> {
        self.manager.start_batch(tasks.len());

        for task in tasks {
            observer.on_task_start(task);
            match self.processor.process(task, observer).await {
                Ok(TaskOutcome::Downloaded(bytes)) => {
                    self.manager.record_success(&task.label(), bytes);
                    observer.on_task_finished(task, bytes);
                }
                Ok(TaskOutcome::Skipped(reason)) => {
                    self.manager.record_skip(&task.label(), &reason);
                    observer.on_task_skipped(task, &reason);
                }
                Err(e) => {
                    error!("任务 '{}' 失败，终止下载: {}", task.label(), e);
                    self.manager.record_failure(&task.label(), &e.to_string());
                    observer.on_task_failed(task, &e);
                    return Err(e.in_task(task.label()));
                }
            }
        }
        Ok(())
    }
}
