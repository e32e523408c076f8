pub mod content;
pub mod effects;
pub mod identity;
pub mod reporter;
pub mod sessions;
