// src/pedagogy.rs
//
// Achievement evaluation: checks the catalog's criteria against a user's
// persisted progress and records unlocks through the repository. Only
// criteria decidable from local progress records are evaluated; streak,
// skill-mastery and community milestones have no local signal yet.

use log::{debug, info};

use crate::catalog;
use crate::content::AchievementCriteria;
use crate::models::UserAchievement;
use crate::repository;
use crate::storage::LocalStore;

/// Unlocks every newly satisfied achievement for `user_id` and returns the
/// fresh unlock records. Already-unlocked achievements are skipped, so a
/// second evaluation with unchanged progress returns nothing.
pub fn evaluate_achievements(store: &LocalStore, user_id: &str) -> Vec<UserAchievement> {
    let progress = repository::user_progress(store, user_id);
    let completed_lessons = progress
        .iter()
        .filter(|p| p.completed_at.is_some())
        .count() as u32;
    let unlocked: Vec<String> = repository::user_achievements(store, user_id)
        .into_iter()
        .map(|a| a.achievement_id)
        .collect();

    let mut newly_unlocked = Vec::new();
    for achievement in catalog::achievements().iter().filter(|a| a.is_active) {
        if unlocked.iter().any(|id| *id == achievement.id) {
            continue;
        }

        let satisfied = match &achievement.criteria {
            AchievementCriteria::LessonCompletion { lessons_completed } => {
                completed_lessons >= *lessons_completed
            }
            AchievementCriteria::PathCompletion { path_id } => {
                match catalog::learning_path(path_id) {
                    Some(path) => {
                        let completed_in_path = progress
                            .iter()
                            .filter(|p| p.path_id == *path_id && p.completed_at.is_some())
                            .count();
                        !path.lessons.is_empty() && completed_in_path >= path.lessons.len()
                    }
                    None => false,
                }
            }
            // No local signal for these yet.
            AchievementCriteria::Streak { .. }
            | AchievementCriteria::SkillMastery { .. }
            | AchievementCriteria::Community { .. } => false,
        };

        if satisfied {
            info!(
                "[Achievement] Criteria met for {} (user {})",
                achievement.id, user_id
            );
            newly_unlocked.push(repository::unlock_achievement(store, user_id, &achievement.id));
        } else {
            debug!(
                "[Achievement] Criteria not met for {} (user {})",
                achievement.id, user_id
            );
        }
    }
    newly_unlocked
}
