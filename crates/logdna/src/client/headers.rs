#![allow(dead_code)]
pub const CONTENT_TYPE: &str = "content-type";
pub const USER_AGENT_VALUE: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";
