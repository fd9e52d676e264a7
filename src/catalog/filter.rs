// src/catalog/filter.rs

use crate::{
    error::{AppError, AppResult},
    models::{Filter, Technology},
};
use log::{debug, info};

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// 按过滤条件缩小目录树。结果中没有任何课程时返回对应的 NotFound 错误。
pub fn apply_filter(filter: Option<&Filter>, technologies: Vec<Technology>) -> AppResult<Vec<Technology>> {
    let Some(filter) = filter else {
        return Ok(technologies);
    };

    let filtered: Vec<Technology> = match filter {
        Filter::Technology(name) => technologies
            .into_iter()
            .filter(|t| contains_ignore_case(&t.name, name))
            .collect(),
        // 课程过滤保留所有技术分类，课程被过滤空的分类也保留
        Filter::Course(name) => technologies
            .into_iter()
            .map(|mut t| {
                t.courses.retain(|c| contains_ignore_case(&c.name, name));
                t
            })
            .collect(),
    };

    let matched_courses: usize = filtered.iter().map(|t| t.courses.len()).sum();
    debug!("过滤条件 {:?} 匹配到 {} 门课程", filter, matched_courses);
    if matched_courses == 0 {
        return Err(match filter {
            Filter::Technology(name) => AppError::TechnologyNotFound(name.clone()),
            Filter::Course(name) => AppError::CourseNotFound(name.clone()),
        });
    }

    info!(
        "过滤 '{}' 后剩余 {} 个技术分类，{} 门课程",
        filter.name(),
        filtered.len(),
        matched_courses
    );
    Ok(filtered)
}
