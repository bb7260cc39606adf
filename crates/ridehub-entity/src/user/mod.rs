//! User entity: model, role, and account status.

pub mod model;
pub mod role;
pub mod status;

pub use model::{DeviceToken, User};
pub use role::UserRole;
pub use status::UserStatus;
