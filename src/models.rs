// src/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Student,
    Educator,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "STUDENT",
            UserRole::Educator => "EDUCATOR",
            UserRole::Admin => "ADMIN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Language {
    En,
    Es,
    Eu,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "EN",
            Language::Es => "ES",
            Language::Eu => "EU",
        }
    }
}

impl FromStr for Language {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EN" => Ok(Language::En),
            "ES" => Ok(Language::Es),
            "EU" => Ok(Language::Eu),
            _ => Ok(Language::En), // Default fallback
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LabStatus {
    Deploying,
    Ready,
    Error,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssessmentType {
    Quiz,
    Practical,
    Certification,
}

// --- User ---

/// The current-user singleton. At most one is persisted per profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub preferred_language: Language,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Input for the login stub; id, active flag and creation timestamp are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub preferred_language: Language,
}

/// Partial update merged over the persisted user.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<UserRole>,
    pub preferred_language: Option<Language>,
    pub is_active: Option<bool>,
    pub last_login_at: Option<DateTime<Utc>>,
}

// --- Progress ---

/// One record per (userId, lessonId) pair. `time_spent` accumulates across
/// updates; `created_at` never changes after the first write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub user_id: String,
    pub lesson_id: String,
    pub path_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>, // 0-100
    pub time_spent: u64, // seconds
    pub attempts: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-call payload for a progress update. `time_spent` is the additional
/// seconds spent this attempt, not the running total.
#[derive(Debug, Clone, Default)]
pub struct LessonProgressDelta {
    pub score: Option<u8>,
    pub time_spent: u64,
    pub completed: bool,
}

/// Derived completion aggregate for one learning path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PathProgress {
    pub completed: usize,
    pub total: usize,
    pub percentage: u8,
}

// --- Assessments ---

/// A graded attempt. Append-only: every save is a fresh record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: AssessmentType,
    pub score: u32,
    pub max_score: u32,
    pub passed: bool,
    pub completed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answers: Option<AssessmentAnswers>,
}

#[derive(Debug, Clone)]
pub struct NewAssessment {
    pub user_id: String,
    pub lesson_id: Option<String>,
    pub kind: AssessmentType,
    pub score: u32,
    pub max_score: u32,
    pub passed: bool,
    pub answers: Option<AssessmentAnswers>,
}

/// Recorded answer payload for an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentAnswers {
    pub responses: Vec<QuestionResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub question_id: String,
    pub answer: AnswerValue,
    pub correct: bool,
}

/// A quiz answer: single choice/text, or a set of selected options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Single(String),
    Multiple(Vec<String>),
}

// --- Achievements ---

/// First-unlock record for one (userId, achievementId) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAchievement {
    pub id: String,
    pub user_id: String,
    pub achievement_id: String,
    pub unlocked_at: DateTime<Utc>,
}

// --- Lab Sessions ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabSession {
    pub id: String,
    pub user_id: String,
    pub lab_id: String,
    pub status: LabStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewLabSession {
    pub user_id: String,
    pub lab_id: String,
    pub status: LabStatus,
    pub expires_at: DateTime<Utc>,
    pub container_url: Option<String>,
}

/// Partial-field update; last writer wins.
#[derive(Debug, Clone, Default)]
pub struct LabSessionUpdate {
    pub status: Option<LabStatus>,
    pub expires_at: Option<DateTime<Utc>>,
    pub terminated_at: Option<DateTime<Utc>>,
    pub container_url: Option<String>,
}

// --- Settings ---

/// Per-profile settings singleton. Absent key reads as the default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub theme: Theme,
    pub language: Language,
    pub notifications: bool,
    pub auto_save: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        UserSettings {
            theme: Theme::System,
            language: Language::En,
            notifications: true,
            auto_save: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub theme: Option<Theme>,
    pub language: Option<Language>,
    pub notifications: Option<bool>,
    pub auto_save: Option<bool>,
}
