pub mod component;
pub mod list;

pub use component::{TaskComponent, TaskSnapshot};
pub use list::{Task, TaskId, TaskList};
