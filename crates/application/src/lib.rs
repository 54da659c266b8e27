pub mod failed_task_pipeline;

pub use failed_task_pipeline::FailedTaskPipeline;
