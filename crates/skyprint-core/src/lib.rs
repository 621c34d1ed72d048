//! Skyprint Core - Foundational types for the Skyprint firework engine
//!
//! This crate provides the core types that all other Skyprint crates depend on:
//! - `InstanceId` - Handles for live firework instances
//! - `Vec3`, `Rgba8` - Spatial and color types
//! - Error types and Result alias

mod error;
mod id;
mod types;

pub use error::{Result, SkyprintError};
pub use id::InstanceId;
pub use types::{Rgba8, Vec3};
