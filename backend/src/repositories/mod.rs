//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod media;
pub mod position;
pub mod user;

pub use media::{MediaRepository, MediaRow, NewMedia};
pub use position::{NewPosition, PositionRecord, PositionRepository, UpdatePosition};
pub use user::{UpdateUserProfile, UserRecord, UserRepository};
