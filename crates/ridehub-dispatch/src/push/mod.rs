//! Push gateway adapter: message shapes, the gateway seam, and the
//! HTTP implementation.

pub mod gateway;
pub mod http;
pub mod message;

pub use gateway::{MulticastOutcome, PushGateway};
pub use http::HttpPushGateway;
pub use message::{PushData, PushMessage, PushPriority};
