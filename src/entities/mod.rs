pub mod column;
pub mod label;
pub mod task;
pub mod task_label;

pub use column::Entity as BoardColumn;
pub use label::Entity as Label;
pub use task::Entity as Task;
pub use task_label::Entity as TaskLabel;
