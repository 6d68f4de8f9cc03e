//! Parts inventory server library.
//!
//! Areas, machines, OEMs and parts behind a REST API, with a bulk CSV/XLSX
//! import pipeline: file parsing, row validation, find-or-create entity
//! resolution, batched processing and progress reporting.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
