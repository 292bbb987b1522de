pub mod task;
pub mod user;

pub use task::{CompleteInput, Task, TaskInput, TaskQuery};
pub use user::User;
