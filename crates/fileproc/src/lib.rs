mod file_finder;
mod worker_pool;

pub use file_finder::FileFinder;
pub use worker_pool::{spawn_worker, FileWorker, WorkerHandle};
