//! Calibra - calibration process registry with Avimex chain export
//!
//! This library exposes the core modules for testing and reuse.

pub mod avimex;
pub mod chain;
pub mod common;
pub mod config;
pub mod entity;
pub mod error;
pub mod routes;
pub mod services;
pub mod validation;
