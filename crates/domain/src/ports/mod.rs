pub mod task_source;

pub use task_source::TaskSource;
