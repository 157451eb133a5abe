//! # IO Module
//!
//! Adapter layer between HTTP clients (the verification page frontend and
//! any automated caller) and the domain services.

pub mod rest;

pub use rest::*;
