//! Pure authorization decisions.
//!
//! Ownership-scoped lookups (`WHERE id = $1 AND user_id = $2`) deliberately
//! answer "not found" for rows owned by someone else, so callers cannot probe
//! for the existence of other users' private data. The decisions below cover
//! the cases where a row is loaded unscoped and the verdict must be made in
//! code.

use crate::models::Workout;

/// Only the owner may update or delete a workout.
pub fn can_mutate_workout(actor: i64, workout: &Workout) -> bool {
    workout.user_id == actor
}

/// Likes and comments may only target public workouts.
pub fn can_act_on_workout_socially(workout: &Workout) -> bool {
    workout.is_public
}

/// Only the author may delete a comment.
pub fn can_mutate_comment(actor: i64, comment_author: i64) -> bool {
    comment_author == actor
}

/// Self-follow is rejected unconditionally.
pub fn can_follow(actor: i64, target_user_id: i64) -> bool {
    actor != target_user_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn workout(owner: i64, is_public: bool) -> Workout {
        Workout {
            id: 1,
            user_id: owner,
            title: "Leg Day".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            duration: Some(60),
            notes: String::new(),
            is_public,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn only_the_owner_may_mutate_a_workout() {
        let w = workout(7, true);
        assert!(can_mutate_workout(7, &w));
        assert!(!can_mutate_workout(8, &w));
    }

    #[test]
    fn social_actions_require_a_public_workout() {
        // Private workouts refuse likes/comments regardless of actor
        assert!(!can_act_on_workout_socially(&workout(7, false)));
        assert!(can_act_on_workout_socially(&workout(7, true)));
    }

    #[test]
    fn visibility_gates_even_the_owner() {
        let w = workout(7, false);
        assert!(can_mutate_workout(7, &w));
        assert!(!can_act_on_workout_socially(&w));
    }

    #[test]
    fn only_the_author_may_delete_a_comment() {
        assert!(can_mutate_comment(3, 3));
        assert!(!can_mutate_comment(4, 3));
    }

    #[test]
    fn self_follow_is_always_rejected() {
        assert!(!can_follow(5, 5));
        assert!(can_follow(5, 6));
    }
}
