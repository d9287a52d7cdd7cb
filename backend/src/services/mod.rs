//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories, the media store, and external systems.

pub mod capture;
pub mod media;
pub mod position;
pub mod user;

pub use capture::CameraClient;
pub use media::MediaService;
pub use position::PositionService;
pub use user::UserService;
