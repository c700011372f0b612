//! Repository layer for database operations.
//!
//! Repositories are stateless: every method takes the connection (or the
//! open transaction) it should run on, so the board service decides the
//! transaction boundaries and entities stay plain data models.

pub mod column;
pub mod label;
pub mod task;

pub use column::ColumnRepository;
pub use label::LabelRepository;
pub use task::TaskRepository;
