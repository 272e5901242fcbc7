pub mod blur_engine;
pub mod boundary;
pub mod kernel;
pub mod pixel_store;
pub mod progress;
pub mod row_executor;
pub mod row_window;
pub mod snapshot;
