// End-to-end flow over an on-disk profile: login, work through a lesson,
// save an assessment, spin up a lab session, evaluate achievements, and
// verify everything survives reopening the profile.

use std::env;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Duration, Utc};

use cyberlearn_core::constants::COOKIE_USER_ID;
use cyberlearn_core::models::{
    AssessmentType, LabSessionUpdate, LabStatus, LessonProgressDelta, NewAssessment,
    NewLabSession,
};
use cyberlearn_core::{catalog, pedagogy, repository, Profile};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!(
            "cyberlearn-{}-{nanos}-{counter}",
            std::process::id()
        ));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn db_path(&self) -> PathBuf {
        self.path.join("profile.db")
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

#[test]
fn full_profile_flow_survives_reopen() {
    let tmp = TempDir::new();
    let user_id;

    {
        let profile = Profile::open(tmp.db_path());
        let mut users = profile.user_view();
        let user = users.login("ada@example.com", "Ada", "Lovelace");
        user_id = user.id.clone();

        // Work through the intro lesson of the beginner path.
        let lesson = catalog::lesson_by_slug("introduction-to-cybersecurity")
            .expect("seeded lesson");
        let mut progress = profile.progress_view(Some(&user_id));
        progress.update_lesson_progress(
            &lesson.id,
            &lesson.path_id,
            LessonProgressDelta {
                score: None,
                time_spent: 600,
                completed: false,
            },
        );
        let record = progress
            .update_lesson_progress(
                &lesson.id,
                &lesson.path_id,
                LessonProgressDelta {
                    score: Some(92),
                    time_spent: 900,
                    completed: true,
                },
            )
            .expect("active user");
        assert_eq!(record.attempts, 2);
        assert_eq!(record.time_spent, 1500);

        repository::save_assessment(
            profile.store(),
            NewAssessment {
                user_id: user_id.clone(),
                lesson_id: Some(lesson.id.clone()),
                kind: AssessmentType::Quiz,
                score: 9,
                max_score: 10,
                passed: true,
                answers: None,
            },
        );

        let session = repository::create_lab_session(
            profile.store(),
            NewLabSession {
                user_id: user_id.clone(),
                lab_id: "lab-sql-injection-basic".into(),
                status: LabStatus::Deploying,
                expires_at: Utc::now() + Duration::hours(2),
                container_url: None,
            },
        );
        repository::update_lab_session(
            profile.store(),
            &session.id,
            LabSessionUpdate {
                status: Some(LabStatus::Ready),
                container_url: Some("https://labs.local/s/1".into()),
                ..Default::default()
            },
        )
        .expect("known session");

        let unlocked = pedagogy::evaluate_achievements(profile.store(), &user_id);
        assert_eq!(unlocked.len(), 1);
        assert_eq!(unlocked[0].achievement_id, "achievement-first-lesson");
    }

    // Reopen: every record is still there.
    let profile = Profile::open(tmp.db_path());
    let users = profile.user_view();
    let user = users.user().expect("persisted user");
    assert_eq!(user.id, user_id);
    assert_eq!(
        profile.cookies().get(COOKIE_USER_ID).as_deref(),
        Some(user_id.as_str())
    );

    let progress = profile.progress_view(Some(&user_id));
    assert_eq!(progress.completed_lessons_count(), 1);
    assert_eq!(progress.total_time_spent(), 1500);
    let path = progress.path_progress("path-beginner-web-security");
    assert_eq!((path.completed, path.total, path.percentage), (1, 1, 100));

    assert_eq!(repository::user_assessments(profile.store(), &user_id).len(), 1);

    let sessions = repository::user_lab_sessions(profile.store(), &user_id);
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].status, LabStatus::Ready);

    // Achievement evaluation stays idempotent across processes.
    assert!(pedagogy::evaluate_achievements(profile.store(), &user_id).is_empty());
    assert_eq!(
        repository::user_achievements(profile.store(), &user_id).len(),
        1
    );
}
