// src/models/mod.rs

pub mod transfer;

pub use transfer::{TaskOutcome, TransferTask};

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// 顶层的课程分类，例如 "React"、"Vue"。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology<C = Course> {
    pub name: String,
    pub courses: Vec<C>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub name: String,
    /// 从课程 URL 中提取的稳定标识，提取失败时为空字符串
    pub code: String,
    pub url: String,
    pub lesson_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub name: String,
    /// 从 1 开始，按订阅源中的顺序编号
    pub lesson_number: u32,
    /// 订阅源条目缺少附件时为空字符串
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseWithLessons<L = Lesson> {
    pub course: Course,
    pub lessons: Vec<L>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonWithFileSize {
    pub lesson: Lesson,
    pub file_size: Option<u64>,
}

/// 完成元数据补全后的目录树。
pub type EnrichedTechnology = Technology<CourseWithLessons<LessonWithFileSize>>;

impl<C> Technology<C> {
    pub fn new(name: impl Into<String>, courses: Vec<C>) -> Self {
        Self {
            name: name.into(),
            courses,
        }
    }
}

impl EnrichedTechnology {
    /// 所有课时中已知大小的总和。
    pub fn total_size(&self) -> u64 {
        self.courses.iter().map(CourseWithLessons::total_size).sum()
    }
}

impl CourseWithLessons<LessonWithFileSize> {
    pub fn total_size(&self) -> u64 {
        self.lessons.iter().filter_map(|l| l.file_size).sum()
    }
}

/// 名称过滤条件，技术分类与课程二选一。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Technology(String),
    Course(String),
}

impl Filter {
    /// 根据命令行中的两个可选参数构造过滤条件，两者同时给出时报错。
    pub fn from_options(
        technology: Option<&str>,
        course: Option<&str>,
    ) -> AppResult<Option<Filter>> {
        match (technology, course) {
            (Some(_), Some(_)) => Err(AppError::FilterAmbiguous),
            (Some(name), None) => Ok(Some(Filter::Technology(name.to_string()))),
            (None, Some(name)) => Ok(Some(Filter::Course(name.to_string()))),
            (None, None) => Ok(None),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Filter::Technology(name) | Filter::Course(name) => name,
        }
    }
}
