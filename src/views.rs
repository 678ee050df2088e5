// src/views.rs
//
// View-layer handles. `Profile` is the explicit session context (one open
// profile medium, no ambient global); each view mirrors one store's state
// on construction and updates the mirror optimistically after writes rather
// than re-reading from storage.

use std::path::Path;

use crate::cookies::CookieJar;
use crate::models::{
    Language, LessonProgressDelta, NewUser, PathProgress, SettingsUpdate, Theme, User,
    UserProgress, UserRole, UserSettings, UserUpdate,
};
use crate::repository;
use crate::storage::LocalStore;

/// One browser-profile equivalent: the open medium plus its cookie jar and
/// view handles. Created at startup, dropped at teardown.
pub struct Profile {
    store: LocalStore,
}

impl Profile {
    pub fn open<P: AsRef<Path>>(path: P) -> Profile {
        Profile {
            store: LocalStore::open(path),
        }
    }

    pub fn open_in_memory() -> Profile {
        Profile {
            store: LocalStore::open_in_memory(),
        }
    }

    /// A profile without a medium; every view degrades to its defaults.
    pub fn disabled() -> Profile {
        Profile {
            store: LocalStore::disabled(),
        }
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn cookies(&self) -> CookieJar<'_> {
        CookieJar::new(&self.store)
    }

    pub fn user_view(&self) -> UserView<'_> {
        UserView::new(&self.store)
    }

    pub fn progress_view(&self, user_id: Option<&str>) -> ProgressView<'_> {
        ProgressView::new(&self.store, user_id)
    }

    pub fn settings_view(&self) -> SettingsView<'_> {
        SettingsView::new(&self.store)
    }
}

// --- Current user ---

pub struct UserView<'a> {
    store: &'a LocalStore,
    user: Option<User>,
}

impl<'a> UserView<'a> {
    fn new(store: &'a LocalStore) -> UserView<'a> {
        let user = repository::current_user(store);
        UserView { store, user }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Login stub: creates and persists a student account with the default
    /// language, mirroring the id into the cookie jar.
    pub fn login(&mut self, email: &str, first_name: &str, last_name: &str) -> User {
        let user = repository::create_user(
            self.store,
            NewUser {
                email: email.to_string(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                role: UserRole::Student,
                preferred_language: Language::En,
            },
        );
        self.user = Some(user.clone());
        user
    }

    pub fn logout(&mut self) {
        repository::logout(self.store);
        self.user = None;
    }

    pub fn update(&mut self, updates: UserUpdate) -> Option<User> {
        let updated = repository::update_user(self.store, updates);
        self.user = updated.clone();
        updated
    }

    pub fn update_last_login(&mut self) -> Option<User> {
        self.user.as_ref()?;
        self.update(UserUpdate {
            last_login_at: Some(chrono::Utc::now()),
            ..Default::default()
        })
    }
}

// --- Progress ---

pub struct ProgressView<'a> {
    store: &'a LocalStore,
    user_id: Option<String>,
    records: Vec<UserProgress>,
}

impl<'a> ProgressView<'a> {
    fn new(store: &'a LocalStore, user_id: Option<&str>) -> ProgressView<'a> {
        let mut view = ProgressView {
            store,
            user_id: user_id.map(str::to_string),
            records: Vec::new(),
        };
        view.refresh();
        view
    }

    /// Switches the observed user and reloads the mirror, as when the active
    /// user id changes.
    pub fn set_user(&mut self, user_id: Option<&str>) {
        self.user_id = user_id.map(str::to_string);
        self.refresh();
    }

    pub fn refresh(&mut self) {
        self.records = match &self.user_id {
            Some(user_id) => repository::user_progress(self.store, user_id),
            None => Vec::new(),
        };
    }

    pub fn records(&self) -> &[UserProgress] {
        &self.records
    }

    /// Writes the update through the store, then patches the mirror in place
    /// instead of re-reading. `None` when no user is active.
    pub fn update_lesson_progress(
        &mut self,
        lesson_id: &str,
        path_id: &str,
        delta: LessonProgressDelta,
    ) -> Option<UserProgress> {
        let user_id = self.user_id.clone()?;
        let updated = repository::update_progress(self.store, &user_id, lesson_id, path_id, delta);
        self.records.retain(|p| p.lesson_id != lesson_id);
        self.records.push(updated.clone());
        Some(updated)
    }

    pub fn lesson_progress(&self, lesson_id: &str) -> Option<&UserProgress> {
        self.records.iter().find(|p| p.lesson_id == lesson_id)
    }

    pub fn is_lesson_completed(&self, lesson_id: &str) -> bool {
        self.lesson_progress(lesson_id)
            .is_some_and(|p| p.completed_at.is_some())
    }

    pub fn path_progress(&self, path_id: &str) -> PathProgress {
        match &self.user_id {
            Some(user_id) => repository::path_progress(self.store, user_id, path_id),
            None => PathProgress {
                completed: 0,
                total: 0,
                percentage: 0,
            },
        }
    }

    pub fn total_time_spent(&self) -> u64 {
        self.records.iter().map(|p| p.time_spent).sum()
    }

    pub fn completed_lessons_count(&self) -> usize {
        self.records
            .iter()
            .filter(|p| p.completed_at.is_some())
            .count()
    }
}

// --- Settings ---

pub struct SettingsView<'a> {
    store: &'a LocalStore,
    settings: UserSettings,
}

impl<'a> SettingsView<'a> {
    fn new(store: &'a LocalStore) -> SettingsView<'a> {
        let settings = repository::settings(store);
        SettingsView { store, settings }
    }

    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    pub fn update(&mut self, updates: SettingsUpdate) -> &UserSettings {
        self.settings = repository::update_settings(self.store, updates);
        &self.settings
    }

    pub fn set_theme(&mut self, theme: Theme) -> &UserSettings {
        self.update(SettingsUpdate {
            theme: Some(theme),
            ..Default::default()
        })
    }

    pub fn set_language(&mut self, language: Language) -> &UserSettings {
        self.update(SettingsUpdate {
            language: Some(language),
            ..Default::default()
        })
    }

    pub fn toggle_notifications(&mut self) -> &UserSettings {
        let flipped = !self.settings.notifications;
        self.update(SettingsUpdate {
            notifications: Some(flipped),
            ..Default::default()
        })
    }

    pub fn toggle_auto_save(&mut self) -> &UserSettings {
        let flipped = !self.settings.auto_save;
        self.update(SettingsUpdate {
            auto_save: Some(flipped),
            ..Default::default()
        })
    }
}
