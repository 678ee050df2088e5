// src/constants.rs

// --- Storage Keys ---
// One key per logical collection/singleton; the value under a key is
// replaced wholesale on every write.
pub const KEY_USER: &str = "cyberlearn_user";
pub const KEY_PROGRESS: &str = "cyberlearn_progress";
pub const KEY_ACHIEVEMENTS: &str = "cyberlearn_achievements";
pub const KEY_SETTINGS: &str = "cyberlearn_settings";
pub const KEY_LAB_SESSIONS: &str = "cyberlearn_lab_sessions";
pub const KEY_ASSESSMENTS: &str = "cyberlearn_assessments";

// --- Cookies ---
// The cookie jar only ever mirrors the current user id.
pub const COOKIE_USER_ID: &str = "user_id";
pub const COOKIE_MAX_AGE_DAYS: i64 = 365;

// --- Progress ---
pub const SCORE_MAX: u8 = 100;
