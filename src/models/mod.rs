pub mod exercise;
pub mod social;
pub mod user;
pub mod workout;

pub use exercise::Exercise;
pub use social::{CommentWithAuthor, FeedItem, FollowUserEntry, LikeEntry};
pub use user::{PublicProfile, User, UserProfile};
pub use workout::{Set, Workout, WorkoutDetail, WorkoutExercise, WorkoutExerciseDetail, WorkoutSummary};
