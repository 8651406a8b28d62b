//! kvg-rgb library - RGB lighting control through an OpenRGB SDK server.
//!
//! This library exposes the core functionality of the `kvg-rgb` CLI for use in
//! tests and the local web API.
//!
//! # Modules
//!
//! - `gateway`: OpenRGB SDK client and the `Gateway` abstraction
//! - `controller`: Color, resize and exclusion operations over a device snapshot
//! - `effects`: Animated effects and the background runner
//! - `store`: SQLite preference store
//! - `web`: Local HTTP API
//! - `config`: Settings file handling
//! - `error`: Error types with user-recoverable hints
#![forbid(unsafe_code)]

pub mod cli;
pub mod color;
pub mod config;
pub mod controller;
pub mod effects;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod selection;
pub mod snapshot;
pub mod store;
pub mod web;
