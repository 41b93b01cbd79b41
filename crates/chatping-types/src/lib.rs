//! Shared domain types for chatping.
//!
//! This crate contains the core domain types used across the chatping
//! service: chat message events, user profiles, notification payloads,
//! delivery outcomes, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod error;
pub mod message;
pub mod notification;
pub mod profile;
