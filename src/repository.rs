// src/repository.rs
//
// Domain record stores. Each domain owns exactly one storage key; collection
// stores read the whole sequence, splice, and write it back (a write replaces
// the key's value in one call). Per the error model, nothing here returns a
// Result: absence is `None` or the documented default.

use chrono::Utc;
use log::{debug, info};
use uuid::Uuid;

use crate::constants::*;
use crate::cookies::CookieJar;
use crate::models::{
    Assessment, LabSession, LabSessionUpdate, LessonProgressDelta, NewAssessment, NewLabSession,
    NewUser, PathProgress, SettingsUpdate, User, UserAchievement, UserProgress, UserSettings,
    UserUpdate,
};
use crate::storage::LocalStore;

// --- User (singleton + cookie mirror) ---

pub fn current_user(store: &LocalStore) -> Option<User> {
    store.get(KEY_USER)
}

fn persist_current_user(store: &LocalStore, user: &User) {
    store.set(KEY_USER, user);
    CookieJar::new(store).set(COOKIE_USER_ID, &user.id);
}

/// Login stub: materializes a user record with a generated id and persists
/// it as the profile's current user.
pub fn create_user(store: &LocalStore, new_user: NewUser) -> User {
    let user = User {
        id: Uuid::new_v4().to_string(),
        email: new_user.email,
        first_name: new_user.first_name,
        last_name: new_user.last_name,
        role: new_user.role,
        preferred_language: new_user.preferred_language,
        is_active: true,
        created_at: Utc::now(),
        last_login_at: None,
    };
    persist_current_user(store, &user);
    info!("[User] Created current user {} ({})", user.id, user.email);
    user
}

/// Merges the update over the persisted user. `None` when nobody is logged
/// in; never creates a user.
pub fn update_user(store: &LocalStore, updates: UserUpdate) -> Option<User> {
    let mut user = current_user(store)?;
    if let Some(email) = updates.email {
        user.email = email;
    }
    if let Some(first_name) = updates.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = updates.last_name {
        user.last_name = last_name;
    }
    if let Some(role) = updates.role {
        user.role = role;
    }
    if let Some(language) = updates.preferred_language {
        user.preferred_language = language;
    }
    if let Some(active) = updates.is_active {
        user.is_active = active;
    }
    if let Some(ts) = updates.last_login_at {
        user.last_login_at = Some(ts);
    }
    persist_current_user(store, &user);
    Some(user)
}

/// Removes the current-user record and its mirrored cookie.
pub fn logout(store: &LocalStore) {
    store.remove(KEY_USER);
    CookieJar::new(store).remove(COOKIE_USER_ID);
    info!("[User] Logged out");
}

// --- Progress (collection, keyed by (userId, lessonId)) ---

pub fn all_progress(store: &LocalStore) -> Vec<UserProgress> {
    store.get(KEY_PROGRESS).unwrap_or_default()
}

pub fn user_progress(store: &LocalStore, user_id: &str) -> Vec<UserProgress> {
    let mut records = all_progress(store);
    records.retain(|p| p.user_id == user_id);
    records
}

pub fn lesson_progress(store: &LocalStore, user_id: &str, lesson_id: &str) -> Option<UserProgress> {
    all_progress(store)
        .into_iter()
        .find(|p| p.user_id == user_id && p.lesson_id == lesson_id)
}

/// Upserts the (userId, lessonId) record: time spent accumulates, attempts
/// increments once per call, the creation timestamp is preserved, and a
/// completion timestamp is set on first completion and kept afterwards.
pub fn update_progress(
    store: &LocalStore,
    user_id: &str,
    lesson_id: &str,
    path_id: &str,
    delta: LessonProgressDelta,
) -> UserProgress {
    let mut records = all_progress(store);
    let now = Utc::now();
    let existing = records
        .iter()
        .position(|p| p.user_id == user_id && p.lesson_id == lesson_id);

    let record = match existing {
        Some(index) => {
            let prior = &records[index];
            UserProgress {
                user_id: prior.user_id.clone(),
                lesson_id: prior.lesson_id.clone(),
                path_id: path_id.to_string(),
                completed_at: if delta.completed {
                    prior.completed_at.or(Some(now))
                } else {
                    prior.completed_at
                },
                score: delta.score.map(|s| s.min(SCORE_MAX)).or(prior.score),
                time_spent: prior.time_spent + delta.time_spent,
                attempts: prior.attempts + 1,
                created_at: prior.created_at,
                updated_at: now,
            }
        }
        None => UserProgress {
            user_id: user_id.to_string(),
            lesson_id: lesson_id.to_string(),
            path_id: path_id.to_string(),
            completed_at: delta.completed.then_some(now),
            score: delta.score.map(|s| s.min(SCORE_MAX)),
            time_spent: delta.time_spent,
            attempts: 1,
            created_at: now,
            updated_at: now,
        },
    };

    match existing {
        Some(index) => records[index] = record.clone(),
        None => records.push(record.clone()),
    }
    store.set(KEY_PROGRESS, &records);
    debug!(
        "[Progress] {}/{}: attempts={}, timeSpent={}s, completed={}",
        user_id,
        lesson_id,
        record.attempts,
        record.time_spent,
        record.completed_at.is_some()
    );
    record
}

/// Completion aggregate over one path's progress records. A path with no
/// records reads as 0%, never a division by zero.
pub fn path_progress(store: &LocalStore, user_id: &str, path_id: &str) -> PathProgress {
    let records = user_progress(store, user_id);
    let path_records: Vec<&UserProgress> =
        records.iter().filter(|p| p.path_id == path_id).collect();
    let completed = path_records
        .iter()
        .filter(|p| p.completed_at.is_some())
        .count();
    let total = path_records.len();
    let percentage = if total > 0 {
        ((completed as f64 / total as f64) * 100.0).round() as u8
    } else {
        0
    };
    PathProgress {
        completed,
        total,
        percentage,
    }
}

// --- Assessments (append-only) ---

pub fn all_assessments(store: &LocalStore) -> Vec<Assessment> {
    store.get(KEY_ASSESSMENTS).unwrap_or_default()
}

pub fn user_assessments(store: &LocalStore, user_id: &str) -> Vec<Assessment> {
    let mut records = all_assessments(store);
    records.retain(|a| a.user_id == user_id);
    records
}

/// Appends a fresh assessment record; saves are never merged or deduplicated.
pub fn save_assessment(store: &LocalStore, new: NewAssessment) -> Assessment {
    let mut records = all_assessments(store);
    let assessment = Assessment {
        id: Uuid::new_v4().to_string(),
        user_id: new.user_id,
        lesson_id: new.lesson_id,
        kind: new.kind,
        score: new.score,
        max_score: new.max_score,
        passed: new.passed,
        completed_at: Utc::now(),
        answers: new.answers,
    };
    records.push(assessment.clone());
    store.set(KEY_ASSESSMENTS, &records);
    debug!(
        "[Assessment] Saved {:?} for {}: {}/{} ({})",
        assessment.kind,
        assessment.user_id,
        assessment.score,
        assessment.max_score,
        if assessment.passed { "passed" } else { "failed" }
    );
    assessment
}

// --- Achievement unlocks ---

pub fn user_achievements(store: &LocalStore, user_id: &str) -> Vec<UserAchievement> {
    let mut records: Vec<UserAchievement> = store.get(KEY_ACHIEVEMENTS).unwrap_or_default();
    records.retain(|a| a.user_id == user_id);
    records
}

/// Records the first unlock of (userId, achievementId). Re-unlocking is a
/// no-op returning the existing record with its original timestamp.
pub fn unlock_achievement(
    store: &LocalStore,
    user_id: &str,
    achievement_id: &str,
) -> UserAchievement {
    let mut records: Vec<UserAchievement> = store.get(KEY_ACHIEVEMENTS).unwrap_or_default();
    if let Some(existing) = records
        .iter()
        .find(|a| a.user_id == user_id && a.achievement_id == achievement_id)
    {
        return existing.clone();
    }

    let unlock = UserAchievement {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        achievement_id: achievement_id.to_string(),
        unlocked_at: Utc::now(),
    };
    records.push(unlock.clone());
    store.set(KEY_ACHIEVEMENTS, &records);
    info!("[Achievement] Unlocked {} for {}", achievement_id, user_id);
    unlock
}

// --- Lab sessions ---

pub fn all_lab_sessions(store: &LocalStore) -> Vec<LabSession> {
    store.get(KEY_LAB_SESSIONS).unwrap_or_default()
}

pub fn user_lab_sessions(store: &LocalStore, user_id: &str) -> Vec<LabSession> {
    let mut records = all_lab_sessions(store);
    records.retain(|s| s.user_id == user_id);
    records
}

/// Creates a session record with a generated id and creation timestamp.
pub fn create_lab_session(store: &LocalStore, new: NewLabSession) -> LabSession {
    let mut records = all_lab_sessions(store);
    let session = LabSession {
        id: Uuid::new_v4().to_string(),
        user_id: new.user_id,
        lab_id: new.lab_id,
        status: new.status,
        created_at: Utc::now(),
        expires_at: new.expires_at,
        terminated_at: None,
        container_url: new.container_url,
    };
    records.push(session.clone());
    store.set(KEY_LAB_SESSIONS, &records);
    info!(
        "[Lab] Session {} for lab {} ({:?})",
        session.id, session.lab_id, session.status
    );
    session
}

/// Partial-field merge over an existing session. Unknown ids return `None`
/// without touching the stored collection.
pub fn update_lab_session(
    store: &LocalStore,
    session_id: &str,
    updates: LabSessionUpdate,
) -> Option<LabSession> {
    let mut records = all_lab_sessions(store);
    let index = records.iter().position(|s| s.id == session_id)?;

    let session = &mut records[index];
    if let Some(status) = updates.status {
        session.status = status;
    }
    if let Some(expires_at) = updates.expires_at {
        session.expires_at = expires_at;
    }
    if let Some(terminated_at) = updates.terminated_at {
        session.terminated_at = Some(terminated_at);
    }
    if let Some(container_url) = updates.container_url {
        session.container_url = Some(container_url);
    }
    let updated = session.clone();
    store.set(KEY_LAB_SESSIONS, &records);
    debug!("[Lab] Session {} -> {:?}", updated.id, updated.status);
    Some(updated)
}

// --- Settings (singleton) ---

/// The settings singleton; an absent key reads as the documented default.
pub fn settings(store: &LocalStore) -> UserSettings {
    store.get(KEY_SETTINGS).unwrap_or_default()
}

/// Shallow merge over the prior value. No history is kept.
pub fn update_settings(store: &LocalStore, updates: SettingsUpdate) -> UserSettings {
    let mut current = settings(store);
    if let Some(theme) = updates.theme {
        current.theme = theme;
    }
    if let Some(language) = updates.language {
        current.language = language;
    }
    if let Some(notifications) = updates.notifications {
        current.notifications = notifications;
    }
    if let Some(auto_save) = updates.auto_save {
        current.auto_save = auto_save;
    }
    store.set(KEY_SETTINGS, &current);
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssessmentType, LabStatus, Language, Theme, UserRole};
    use chrono::Duration;
    use rstest::rstest;

    fn store() -> LocalStore {
        let _ = env_logger::builder().is_test(true).try_init();
        LocalStore::open_in_memory()
    }

    fn sample_user() -> NewUser {
        NewUser {
            email: "ada@example.com".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            role: UserRole::Student,
            preferred_language: Language::En,
        }
    }

    #[test]
    fn create_user_persists_singleton_and_cookie() {
        let store = store();
        let user = create_user(&store, sample_user());
        assert!(user.is_active);
        assert!(user.last_login_at.is_none());

        let current = current_user(&store).expect("current user");
        assert_eq!(current, user);
        assert_eq!(
            CookieJar::new(&store).get(COOKIE_USER_ID).as_deref(),
            Some(user.id.as_str())
        );
    }

    #[test]
    fn update_user_without_login_is_none() {
        let store = store();
        let updated = update_user(
            &store,
            UserUpdate {
                first_name: Some("Grace".into()),
                ..Default::default()
            },
        );
        assert!(updated.is_none());
        assert!(current_user(&store).is_none());
    }

    #[test]
    fn update_user_merges_named_fields_only() {
        let store = store();
        let user = create_user(&store, sample_user());
        let updated = update_user(
            &store,
            UserUpdate {
                preferred_language: Some(Language::Es),
                last_login_at: Some(Utc::now()),
                ..Default::default()
            },
        )
        .expect("logged in");
        assert_eq!(updated.id, user.id);
        assert_eq!(updated.email, user.email);
        assert_eq!(updated.preferred_language, Language::Es);
        assert!(updated.last_login_at.is_some());
    }

    #[test]
    fn logout_removes_record_and_cookie() {
        let store = store();
        create_user(&store, sample_user());
        logout(&store);
        assert!(current_user(&store).is_none());
        assert_eq!(CookieJar::new(&store).get(COOKIE_USER_ID), None);
    }

    #[test]
    fn progress_updates_accumulate() {
        let store = store();
        let first = update_progress(
            &store,
            "u-1",
            "lesson-intro-cybersec",
            "path-beginner-web-security",
            LessonProgressDelta {
                score: None,
                time_spent: 120,
                completed: false,
            },
        );
        assert_eq!(first.attempts, 1);
        assert_eq!(first.time_spent, 120);
        assert!(first.completed_at.is_none());

        let second = update_progress(
            &store,
            "u-1",
            "lesson-intro-cybersec",
            "path-beginner-web-security",
            LessonProgressDelta {
                score: Some(85),
                time_spent: 300,
                completed: true,
            },
        );
        assert_eq!(second.attempts, 2);
        assert_eq!(second.time_spent, 420);
        assert_eq!(second.score, Some(85));
        assert!(second.completed_at.is_some());
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);

        // Still one record for the pair.
        assert_eq!(user_progress(&store, "u-1").len(), 1);
    }

    #[test]
    fn completion_timestamp_survives_later_updates() {
        let store = store();
        let completed = update_progress(
            &store,
            "u-1",
            "l-1",
            "p-1",
            LessonProgressDelta {
                score: Some(90),
                time_spent: 60,
                completed: true,
            },
        );
        let later = update_progress(
            &store,
            "u-1",
            "l-1",
            "p-1",
            LessonProgressDelta {
                score: None,
                time_spent: 30,
                completed: true,
            },
        );
        assert_eq!(later.completed_at, completed.completed_at);
        // Score from the first call is kept when the second supplies none.
        assert_eq!(later.score, Some(90));
    }

    #[test]
    fn score_is_clamped_to_max() {
        let store = store();
        let record = update_progress(
            &store,
            "u-1",
            "l-1",
            "p-1",
            LessonProgressDelta {
                score: Some(250),
                time_spent: 10,
                completed: false,
            },
        );
        assert_eq!(record.score, Some(SCORE_MAX));
    }

    #[rstest]
    #[case(0, 0, 0)]
    #[case(2, 3, 67)]
    #[case(1, 3, 33)]
    #[case(3, 3, 100)]
    fn path_percentage_rounds(
        #[case] completed: usize,
        #[case] total: usize,
        #[case] expected: u8,
    ) {
        let store = store();
        for i in 0..total {
            update_progress(
                &store,
                "u-1",
                &format!("l-{}", i),
                "p-1",
                LessonProgressDelta {
                    score: None,
                    time_spent: 1,
                    completed: i < completed,
                },
            );
        }
        let progress = path_progress(&store, "u-1", "p-1");
        assert_eq!(progress.completed, completed);
        assert_eq!(progress.total, total);
        assert_eq!(progress.percentage, expected);
    }

    #[test]
    fn path_progress_scoped_to_user_and_path() {
        let store = store();
        update_progress(
            &store,
            "u-1",
            "l-1",
            "p-1",
            LessonProgressDelta {
                completed: true,
                time_spent: 1,
                score: None,
            },
        );
        update_progress(
            &store,
            "u-2",
            "l-1",
            "p-1",
            LessonProgressDelta {
                completed: false,
                time_spent: 1,
                score: None,
            },
        );
        update_progress(
            &store,
            "u-1",
            "l-9",
            "p-2",
            LessonProgressDelta {
                completed: false,
                time_spent: 1,
                score: None,
            },
        );
        let progress = path_progress(&store, "u-1", "p-1");
        assert_eq!(progress.total, 1);
        assert_eq!(progress.percentage, 100);
    }

    #[test]
    fn assessments_are_append_only() {
        let store = store();
        let new = |score| NewAssessment {
            user_id: "u-1".into(),
            lesson_id: Some("l-1".into()),
            kind: AssessmentType::Quiz,
            score,
            max_score: 10,
            passed: score >= 6,
            answers: None,
        };
        let a = save_assessment(&store, new(4));
        let b = save_assessment(&store, new(4));
        assert_ne!(a.id, b.id);
        assert_eq!(user_assessments(&store, "u-1").len(), 2);
        assert!(user_assessments(&store, "u-2").is_empty());
    }

    #[test]
    fn achievement_unlock_is_idempotent() {
        let store = store();
        let first = unlock_achievement(&store, "u-1", "achievement-first-lesson");
        let second = unlock_achievement(&store, "u-1", "achievement-first-lesson");
        assert_eq!(first.id, second.id);
        assert_eq!(first.unlocked_at, second.unlocked_at);
        assert_eq!(user_achievements(&store, "u-1").len(), 1);

        // A different user unlocks independently.
        unlock_achievement(&store, "u-2", "achievement-first-lesson");
        assert_eq!(user_achievements(&store, "u-2").len(), 1);
    }

    #[test]
    fn lab_session_lifecycle() {
        let store = store();
        let session = create_lab_session(
            &store,
            NewLabSession {
                user_id: "u-1".into(),
                lab_id: "lab-sql-injection-basic".into(),
                status: LabStatus::Deploying,
                expires_at: Utc::now() + Duration::hours(2),
                container_url: None,
            },
        );
        assert!(!session.id.is_empty());
        assert!(session.terminated_at.is_none());

        let ready = update_lab_session(
            &store,
            &session.id,
            LabSessionUpdate {
                status: Some(LabStatus::Ready),
                container_url: Some("https://labs.local/s/1".into()),
                ..Default::default()
            },
        )
        .expect("known session");
        assert_eq!(ready.status, LabStatus::Ready);
        assert_eq!(ready.container_url.as_deref(), Some("https://labs.local/s/1"));
        // Untouched fields survive the merge.
        assert_eq!(ready.expires_at, session.expires_at);

        let terminated = update_lab_session(
            &store,
            &session.id,
            LabSessionUpdate {
                status: Some(LabStatus::Terminated),
                terminated_at: Some(Utc::now()),
                ..Default::default()
            },
        )
        .expect("known session");
        assert!(terminated.terminated_at.is_some());
    }

    #[test]
    fn updating_unknown_session_leaves_collection_alone() {
        let store = store();
        create_lab_session(
            &store,
            NewLabSession {
                user_id: "u-1".into(),
                lab_id: "lab-xss-reflected".into(),
                status: LabStatus::Ready,
                expires_at: Utc::now() + Duration::hours(1),
                container_url: None,
            },
        );
        let before = all_lab_sessions(&store);
        let result = update_lab_session(
            &store,
            "no-such-session",
            LabSessionUpdate {
                status: Some(LabStatus::Error),
                ..Default::default()
            },
        );
        assert!(result.is_none());
        assert_eq!(all_lab_sessions(&store), before);
    }

    #[test]
    fn settings_partial_update_keeps_other_fields() {
        let store = store();
        assert_eq!(settings(&store), UserSettings::default());

        let updated = update_settings(
            &store,
            SettingsUpdate {
                language: Some(Language::Es),
                ..Default::default()
            },
        );
        assert_eq!(updated.language, Language::Es);
        assert_eq!(updated.theme, Theme::System);
        assert!(updated.notifications);
        assert!(updated.auto_save);

        let again = update_settings(
            &store,
            SettingsUpdate {
                theme: Some(Theme::Dark),
                notifications: Some(false),
                ..Default::default()
            },
        );
        assert_eq!(again.language, Language::Es);
        assert_eq!(again.theme, Theme::Dark);
        assert!(!again.notifications);
    }

    #[test]
    fn disabled_medium_degrades_to_defaults() {
        let store = LocalStore::disabled();
        assert!(current_user(&store).is_none());
        assert!(all_progress(&store).is_empty());
        assert_eq!(settings(&store), UserSettings::default());
        // Writes are swallowed; reads still yield the defaults.
        update_progress(
            &store,
            "u-1",
            "l-1",
            "p-1",
            LessonProgressDelta {
                time_spent: 5,
                ..Default::default()
            },
        );
        assert!(all_progress(&store).is_empty());
    }
}
