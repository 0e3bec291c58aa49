mod config_watcher;
mod hub;
mod ipc;

pub use config_watcher::ConfigWatcher;
pub use hub::ServiceHub;
pub use ipc::IpcServer;
