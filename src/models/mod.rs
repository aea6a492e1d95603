//! Core data models for the gateway.
//!
//! Everything here is request-scoped except the allow-list, which is built
//! once at startup and only read afterwards.

pub mod allow_list;
pub mod object;
