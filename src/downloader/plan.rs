// src/downloader/plan.rs

use crate::{
    constants,
    models::{EnrichedTechnology, TransferTask},
    utils,
};
use itertools::Itertools;
use log::warn;
use std::path::{Path, PathBuf};

/// 课时文件的保存位置: `<root>/<技术分类>/<课程>/<NN> <课时名>.mp4`。
pub fn lesson_destination(
    root: &Path,
    technology: &str,
    course: &str,
    lesson_number: u32,
    lesson_name: &str,
) -> PathBuf {
    let file_name = format!(
        "{}.{}",
        utils::sanitize_filename(&utils::lesson_file_stem(lesson_number, lesson_name)),
        constants::LESSON_FILE_EXTENSION
    );
    root.join(utils::sanitize_filename(technology))
        .join(utils::sanitize_filename(course))
        .join(file_name)
}

/// 将补全后的目录树展开为有序的下载计划。
///
/// 排序只依赖 (技术分类名, 课程名, 课时序号)，与补全阶段各请求的完成顺序无关。
pub fn build_plan(technologies: &[EnrichedTechnology], root: &Path) -> Vec<TransferTask> {
    let triples: Vec<_> = technologies
        .iter()
        .flat_map(|t| {
            t.courses.iter().flat_map(move |c| {
                c.lessons.iter().map(move |l| (t.name.as_str(), c.course.name.as_str(), l))
            })
        })
        .sorted_by(|a, b| {
            utils::compare_names(a.0, b.0)
                .then_with(|| utils::compare_names(a.1, b.1))
                .then_with(|| a.2.lesson.lesson_number.cmp(&b.2.lesson.lesson_number))
        })
        .collect();

    let total_count = triples.len();
    let tasks: Vec<TransferTask> = triples
        .into_iter()
        .enumerate()
        .map(|(sequence_index, (technology, course, lesson))| TransferTask {
            technology: technology.to_string(),
            course: course.to_string(),
            destination: lesson_destination(
                root,
                technology,
                course,
                lesson.lesson.lesson_number,
                &lesson.lesson.name,
            ),
            lesson: lesson.clone(),
            sequence_index,
            total_count,
        })
        .collect();

    for path in duplicate_destinations(&tasks) {
        warn!("多个课时的保存路径相同，后下载的会覆盖先下载的: {}", path.display());
    }
    tasks
}

/// 清理文件名后落到同一路径的目标文件，每个路径只出现一次。
pub fn duplicate_destinations(tasks: &[TransferTask]) -> Vec<&Path> {
    tasks
        .iter()
        .map(|t| t.destination.as_path())
        .duplicates()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, CourseWithLessons, Lesson, LessonWithFileSize, Technology};

    fn lesson(number: u32, name: &str) -> LessonWithFileSize {
        LessonWithFileSize {
            lesson: Lesson {
                name: name.into(),
                lesson_number: number,
                url: format!("https://cdn/{}.mp4", number),
            },
            file_size: Some(100),
        }
    }

    fn course(name: &str, lessons: Vec<LessonWithFileSize>) -> CourseWithLessons<LessonWithFileSize> {
        CourseWithLessons {
            course: Course {
                name: name.into(),
                code: name.to_lowercase(),
                url: String::new(),
                lesson_count: lessons.len() as u32,
            },
            lessons,
        }
    }

    #[test]
    fn test_lesson_destination() {
        let path = lesson_destination(Path::new("/dl"), "React", "Hooks: Intro", 3, "Use State?");
        assert_eq!(path, PathBuf::from("/dl/React/Hooks Intro/03 Use State.mp4"));
    }

    #[test]
    fn test_plan_is_sorted_and_indexed() {
        let technologies = vec![
            Technology::new(
                "Vue",
                vec![course("Router", vec![lesson(2, "b"), lesson(1, "a")])],
            ),
            Technology::new(
                "angular",
                vec![
                    course("Zone", vec![lesson(1, "z")]),
                    course("Forms", vec![lesson(1, "f")]),
                ],
            ),
        ];

        let plan = build_plan(&technologies, Path::new("/dl"));
        let order: Vec<_> = plan
            .iter()
            .map(|t| (t.technology.as_str(), t.course.as_str(), t.lesson.lesson.lesson_number))
            .collect();
        assert_eq!(
            order,
            vec![
                ("angular", "Forms", 1),
                ("angular", "Zone", 1),
                ("Vue", "Router", 1),
                ("Vue", "Router", 2),
            ]
        );
        assert!(plan.iter().enumerate().all(|(i, t)| t.sequence_index == i));
        assert!(plan.iter().all(|t| t.total_count == 4));
        assert_eq!(plan[3].destination, PathBuf::from("/dl/Vue/Router/02 b.mp4"));
    }

    #[test]
    fn test_plan_ignores_input_order() {
        let a = vec![Technology::new(
            "React",
            vec![course("B", vec![lesson(1, "x")]), course("A", vec![lesson(2, "y"), lesson(1, "x")])],
        )];
        let b = vec![Technology::new(
            "React",
            vec![course("A", vec![lesson(1, "x"), lesson(2, "y")]), course("B", vec![lesson(1, "x")])],
        )];
        assert_eq!(build_plan(&a, Path::new("out")), build_plan(&b, Path::new("out")));
    }

    #[test]
    fn test_sanitized_name_collisions_are_detected() {
        let technologies = vec![Technology::new(
            "React",
            vec![
                course("Hooks: Intro", vec![lesson(1, "a"), lesson(2, "b")]),
                course("Hooks Intro", vec![lesson(1, "a")]),
            ],
        )];
        let plan = build_plan(&technologies, Path::new("/dl"));
        assert_eq!(plan.len(), 3);
        assert_eq!(
            duplicate_destinations(&plan),
            vec![Path::new("/dl/React/Hooks Intro/01 a.mp4")]
        );

        let distinct = vec![Technology::new(
            "React",
            vec![course("Hooks", vec![lesson(1, "a")]), course("Redux", vec![lesson(1, "a")])],
        )];
        assert!(duplicate_destinations(&build_plan(&distinct, Path::new("/dl"))).is_empty());
    }

    #[test]
    fn test_empty_catalog_has_empty_plan() {
        assert!(build_plan(&[], Path::new("out")).is_empty());
    }
}
