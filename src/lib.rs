//! rollcall - a terminal client for an extracurricular-activity signup service
//!
//! This crate provides the core functionality for rollcall, including:
//! - A typed REST client for the signup service
//! - Session management with a persisted bearer token
//! - Roster snapshot state and its refresh lifecycle
//!
//! # Architecture
//!
//! rollcall is a pure consumer of a REST API:
//! - The UI loop owns the session and the roster snapshot
//! - Network calls run as spawned tasks that report back over channels
//! - The roster snapshot is replaced wholesale on every fetch; client
//!   actions only take effect after a round trip to the server

pub mod api;
pub mod client;
pub mod config;
pub mod roster;
pub mod session;
