pub mod auth;
pub mod exercises;
pub mod social;
pub mod users;
pub mod workouts;
