//! Client side of the smsguard HTTP API.

pub mod http;

pub use http::{ClientError, SmsGuardClient};
