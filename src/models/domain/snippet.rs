use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};

/// A named category of course content. Created during material ingestion.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Topic {
    pub id: String,
    pub name: String,
    pub course_id: String,
}

/// A text excerpt of a class material, tagged with exactly one topic.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Snippet {
    pub id: String,
    pub material_id: String,
    pub course_id: String,
    pub topic_id: String,
    pub text: String,
}

/// Which snippets a new quiz may draw from.
///
/// Precedence when building from a request: explicit subjects, then explicit
/// materials, then the whole course.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnippetScope {
    Subjects {
        course_id: String,
        subject_ids: Vec<String>,
    },
    Materials {
        material_ids: Vec<String>,
    },
    Course {
        course_id: String,
    },
}

impl SnippetScope {
    pub fn resolve(course_id: &str, subject_ids: &[String], material_ids: &[String]) -> Self {
        if !subject_ids.is_empty() {
            SnippetScope::Subjects {
                course_id: course_id.to_string(),
                subject_ids: subject_ids.to_vec(),
            }
        } else if !material_ids.is_empty() {
            SnippetScope::Materials {
                material_ids: material_ids.to_vec(),
            }
        } else {
            SnippetScope::Course {
                course_id: course_id.to_string(),
            }
        }
    }

    /// Explicitly chosen subjects turn adaptive weighting off.
    pub fn optimize_learning(&self) -> bool {
        !matches!(self, SnippetScope::Subjects { .. })
    }

    pub fn admits(&self, snippet: &Snippet) -> bool {
        match self {
            SnippetScope::Subjects {
                course_id,
                subject_ids,
            } => snippet.course_id == *course_id && subject_ids.contains(&snippet.topic_id),
            SnippetScope::Materials { material_ids } => material_ids.contains(&snippet.material_id),
            SnippetScope::Course { course_id } => snippet.course_id == *course_id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidatePool {
    pub snippets: Vec<Snippet>,
    pub optimize_learning: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(id: &str, course_id: &str, material_id: &str, topic_id: &str) -> Snippet {
        Snippet {
            id: id.to_string(),
            material_id: material_id.to_string(),
            course_id: course_id.to_string(),
            topic_id: topic_id.to_string(),
            text: format!("text of {}", id),
        }
    }

    #[test]
    fn subjects_take_precedence_over_materials() {
        let scope = SnippetScope::resolve(
            "course-1",
            &["trees".to_string()],
            &["material-1".to_string()],
        );

        assert!(matches!(scope, SnippetScope::Subjects { .. }));
        assert!(!scope.optimize_learning());
    }

    #[test]
    fn materials_take_precedence_over_course() {
        let scope = SnippetScope::resolve("course-1", &[], &["material-1".to_string()]);

        assert_eq!(
            scope,
            SnippetScope::Materials {
                material_ids: vec!["material-1".to_string()]
            }
        );
        assert!(scope.optimize_learning());
    }

    #[test]
    fn defaults_to_whole_course() {
        let scope = SnippetScope::resolve("course-1", &[], &[]);

        assert_eq!(
            scope,
            SnippetScope::Course {
                course_id: "course-1".to_string()
            }
        );
        assert!(scope.optimize_learning());
    }

    #[test]
    fn subject_scope_is_restricted_to_its_course() {
        let scope = SnippetScope::resolve("course-1", &["trees".to_string()], &[]);

        assert!(scope.admits(&snippet("s1", "course-1", "m1", "trees")));
        assert!(!scope.admits(&snippet("s2", "course-2", "m2", "trees")));
        assert!(!scope.admits(&snippet("s3", "course-1", "m1", "graphs")));
    }

    #[test]
    fn material_scope_ignores_topic() {
        let scope = SnippetScope::resolve("course-1", &[], &["m1".to_string()]);

        assert!(scope.admits(&snippet("s1", "course-1", "m1", "trees")));
        assert!(scope.admits(&snippet("s2", "course-1", "m1", "graphs")));
        assert!(!scope.admits(&snippet("s3", "course-1", "m2", "trees")));
    }
}
