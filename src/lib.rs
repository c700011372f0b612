//! Kanboard - a kanban board backend
//!
//! This library provides CRUD operations for board columns, tasks and
//! labels over a relational store, an HTTP API exposing them, and a thin
//! passthrough to a chat-completion provider.
//!
//! # Modules
//!
//! * [`config`] - Application configuration management
//! * [`storage`] - Database connection and schema
//! * [`repositories`] - Query helpers per entity
//! * [`board`] - Board operations (mutations and reads)
//! * [`chat`] - Chat-completion passthrough
//! * [`api`] - HTTP routes and error mapping

/// HTTP API built on axum
pub mod api;

/// Board operations: columns, tasks, labels and their relationships
pub mod board;

/// Chat-completion provider abstraction and service
pub mod chat;

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// SeaORM entity models for database tables
pub mod entities;

/// Logging setup
pub mod logger;

/// Repository layer for database operations
pub mod repositories;

/// Database connection and schema management
pub mod storage;

// Re-export entity models for convenient access
pub use entities::{column, label, task, task_label};
