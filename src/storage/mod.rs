//! Persistence for the board.
//!
//! This module owns the SeaORM connection and the schema for:
//! - Columns
//! - Tasks
//! - Labels
//! - Task-label relationships

pub mod db;

pub use db::LocalStorage;
