// src/content.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::{AnswerValue, Language};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Beginner = 1,
    Intermediate = 2,
    Advanced = 3,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "BEGINNER",
            Difficulty::Intermediate => "INTERMEDIATE",
            Difficulty::Advanced => "ADVANCED",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BEGINNER" => Ok(Difficulty::Beginner),
            "INTERMEDIATE" => Ok(Difficulty::Intermediate),
            "ADVANCED" => Ok(Difficulty::Advanced),
            _ => Ok(Difficulty::Beginner), // Default fallback
        }
    }
}

// --- Learning Paths ---

/// An ordered curriculum of lessons.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPath {
    pub id: String,
    pub slug: String,
    pub difficulty: Difficulty,
    pub estimated_hours: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Lesson ids in curriculum order.
    pub lessons: Vec<String>,
    pub translations: Vec<PathTranslation>,
}

/// Per-language display bundle for a path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathTranslation {
    pub language: Language,
    pub name: String,
    pub description: String,
}

// --- Lessons ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub slug: String,
    pub path_id: String,
    pub order: u32,
    pub difficulty: Difficulty,
    pub estimated_duration: u32, // minutes
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub translations: Vec<LessonTranslation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonTranslation {
    pub language: Language,
    pub title: String,
    pub description: String,
    pub content: LessonContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonKind {
    Theory,
    Practical,
    Assessment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonContent {
    #[serde(rename = "type")]
    pub kind: LessonKind,
    pub sections: Vec<ContentSection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exercises: Vec<Exercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Quiz>,
}

/// One block of lesson material, tagged by kind with a per-kind payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ContentSection {
    Text {
        id: String,
        title: String,
        body: String,
    },
    Video {
        id: String,
        title: String,
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_seconds: Option<u32>,
    },
    Code {
        id: String,
        title: String,
        code: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    Image {
        id: String,
        title: String,
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
}

impl ContentSection {
    pub fn id(&self) -> &str {
        match self {
            ContentSection::Text { id, .. }
            | ContentSection::Video { id, .. }
            | ContentSection::Code { id, .. }
            | ContentSection::Image { id, .. } => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseKind {
    Code,
    MultipleChoice,
    Practical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ExerciseKind,
    pub title: String,
    pub description: String,
    pub instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    pub hints: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub questions: Vec<QuizQuestion>,
    pub passing_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>, // minutes
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizQuestionKind {
    MultipleChoice,
    TrueFalse,
    FillBlank,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: QuizQuestionKind,
    pub question: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub correct_answer: AnswerValue,
    pub explanation: String,
    pub points: u32,
}

// --- Vulnerable Labs ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VulnerableLab {
    pub id: String,
    pub slug: String,
    pub difficulty: Difficulty,
    pub vulnerability_types: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Image reference for the (simulated) isolated environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_image: Option<String>,
    pub translations: Vec<LabTranslation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabTranslation {
    pub language: Language,
    pub name: String,
    pub description: String,
    pub hints: Vec<String>,
}

// --- Achievements ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AchievementType {
    LessonCompletion,
    PathCompletion,
    Streak,
    SkillMastery,
    Community,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub kind: AchievementType,
    pub criteria: AchievementCriteria,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub translations: Vec<AchievementTranslation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementTranslation {
    pub language: Language,
    pub name: String,
    pub description: String,
}

/// Unlock condition, one closed variant per criteria kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum AchievementCriteria {
    /// Completed at least this many lessons overall.
    LessonCompletion { lessons_completed: u32 },
    /// Every lesson of the named path completed.
    PathCompletion { path_id: String },
    /// Consecutive days of activity.
    Streak { days: u32 },
    /// Completed labs exercising one vulnerability class.
    SkillMastery {
        skill_type: String,
        labs_completed: u32,
    },
    /// Community participation milestone.
    Community { contributions: u32 },
}

/// Resolves the bundle for `language`, falling back to English, then to
/// whatever is available. Content without any translation is a data error.
pub fn pick_translation<T>(translations: &[T], language: Language, lang_of: impl Fn(&T) -> Language) -> Option<&T> {
    translations
        .iter()
        .find(|t| lang_of(t) == language)
        .or_else(|| translations.iter().find(|t| lang_of(t) == Language::En))
        .or_else(|| translations.first())
}
