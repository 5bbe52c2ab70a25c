// src/models/lesson.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_enabled() -> bool {
    true
}

/// A lesson groups questions within a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Lesson {
    #[serde(default)]
    #[validate(length(min = 1, max = 10, message = "Lesson ID must be 1-10 characters"))]
    pub id: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Lesson name must be 1-100 characters"))]
    pub name: String,

    /// Disabled lessons are removed, together with their questions, before a quiz sees them.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Lesson {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            enabled: true,
        }
    }
}
