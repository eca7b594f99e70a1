//! livelink - short path resolver with expiring redirects and WeChat live codes
//!
//! # Architecture
//! - `storage`: SeaORM mapping store (SQLite / MySQL / PostgreSQL)
//! - `services`: lifecycle, resolution, expiry maintenance and legacy import
//! - `api`: HTTP services and middleware
//! - `interfaces`: one-shot CLI commands
//! - `config`: Configuration management
//! - `runtime`: HTTP server mode
//! - `system`: logging

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
