pub mod config_io;
pub mod local_store;
pub mod remote_store;
pub mod session;
pub mod storage;
pub mod store;
pub mod watcher;
