//! # Geometry Module
//!
//! This module provides geometric primitives and spatial calculations for the
//! traffic core, working in the host server's world space.
//!
//! ## Key Components
//!
//! - [`Vec3`] - World-space vector in meters (Y is up, traffic math happens in the XZ plane)
//! - [`rotate90_xz`] - Quarter turn in the XZ plane, used to derive lane-offset directions
//! - [`right_vector_from_velocity`] / [`right_vector_from_yaw`] - Right-hand vector of a moving vehicle
//!
//! ## Coordinate conventions
//!
//! The host server hands over positions in a right-handed world frame where
//! `y` points up. All lane-change lateral offsets are applied strictly in the
//! XZ (ground) plane; the vertical component is left to the host physics.
//!
//! ## Usage Examples
//!
//! ```rust
//! use traffic_ai_core::geom::{Vec3, right_vector_from_velocity};
//!
//! let velocity = Vec3::new(0.0, 0.0, 27.8);
//! if let Some(right) = right_vector_from_velocity(velocity) {
//!     println!("Right vector: {:?}", right);
//! }
//! ```

mod vec3;
mod spatial;

pub use self::{vec3::*, spatial::*};
