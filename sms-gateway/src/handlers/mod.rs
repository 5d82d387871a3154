pub mod health;
pub mod sms;

pub use health::{health_check, readiness_check};
pub use sms::send_sms;
