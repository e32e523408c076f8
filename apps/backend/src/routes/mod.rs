pub mod auth;
pub mod games;
pub mod gate;
pub mod players;
pub mod progress;
