//! Data models for the guestbook service.

mod greeting;

pub use greeting::*;
