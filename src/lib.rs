//! vision-testbed library crate.
//!
//! A debugging harness for vision pipelines: a capture loop that hands each
//! frame to a callback, and a registry of named debug images that can be
//! toggled on screen with the digit keys.

pub mod capture;
pub mod cli;
pub mod config;
pub mod demo;
pub mod display;
pub mod error;
pub mod image;
pub mod registry;
pub mod testbed;

pub use error::TestbedError;
pub use registry::{ImageRegistry, Ownership, SharedImage};
pub use testbed::{KeyDisposition, LoopContext, LoopState, Testbed, VideoSource};
