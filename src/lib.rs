pub mod trace;
pub mod history;
pub mod compare;
pub mod convert;
pub mod launch;
pub mod config;
pub mod error;
pub mod verify;

/// Logger for the binaries: `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
