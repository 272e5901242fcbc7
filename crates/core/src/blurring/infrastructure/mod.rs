pub mod executor_factory;
pub mod sequential_row_executor;
pub mod threaded_row_executor;
