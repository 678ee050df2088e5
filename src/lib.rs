// src/lib.rs

//! Local-first core of the CyberLearn training app: per-profile storage for
//! user, progress, assessment, achievement, lab-session and settings records,
//! plus the static multi-language content catalog they join against.

pub mod catalog;
pub mod constants;
pub mod content;
pub mod cookies;
mod database;
pub mod models;
pub mod pedagogy;
pub mod repository;
pub mod storage;
pub mod views;

pub use models::{
    Assessment, AssessmentType, LabSession, LabSessionUpdate, LabStatus, Language,
    LessonProgressDelta, NewAssessment, NewLabSession, NewUser, PathProgress, SettingsUpdate,
    Theme, User, UserAchievement, UserProgress, UserRole, UserSettings, UserUpdate,
};
pub use storage::LocalStore;
pub use views::{Profile, ProgressView, SettingsView, UserView};
