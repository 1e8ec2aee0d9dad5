use thiserror::Error;

/// The line-oriented console `print`, `input` and the REPL talk to.
pub mod console;
/// Keyboard and pointer control.
pub mod device;
/// File and directory operations.
pub mod fs;
/// Static table of the button names device actions accept.
pub mod keymap;
/// An in-memory host that records every service call, for tests and dry
/// runs.
pub mod recording;
/// Clock, randomness, sleeping and shell commands.
pub mod system;

pub use console::{Console, StdConsole};
pub use device::{Device, VirtualDevice};
pub use fs::{FileSystem, HostFileSystem};
pub use recording::{Event, Recorder};
pub use system::{HostSystem, LocalTime, System};

/// Errors raised by host services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A file system call failed.
    #[error("{operation} '{path}' failed: {source}")]
    File {
        /// The operation, such as `read`.
        operation: &'static str,
        /// The path involved.
        path:      String,
        /// The underlying failure.
        source:    std::io::Error,
    },
    /// A button name is not in the keymap.
    #[error("unknown button '{0}'")]
    UnknownButton(String),
    /// A shell command could not be started.
    #[error("command '{command}' failed: {source}")]
    Command {
        /// The command line.
        command: String,
        /// The underlying failure.
        source:  std::io::Error,
    },
    /// The console has no more input.
    #[error("input is closed")]
    InputClosed,
    /// Writing to the console failed.
    #[error("console output failed: {0}")]
    Output(#[source] std::io::Error),
}

/// Result type of every service call.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// The host services a running program talks to.
pub struct Services {
    pub device:  Box<dyn Device>,
    pub files:   Box<dyn FileSystem>,
    pub system:  Box<dyn System>,
    pub console: Box<dyn Console>,
}

impl Services {
    /// Services backed by the real host: standard streams, the real file
    /// system and clock, and the headless [`VirtualDevice`].
    #[must_use]
    pub fn host() -> Self {
        Self { device:  Box::new(VirtualDevice::default()),
               files:   Box::new(HostFileSystem),
               system:  Box::new(HostSystem::new()),
               console: Box::new(StdConsole), }
    }

    /// Services that all record into `recorder`.
    #[must_use]
    pub fn recording(recorder: &Recorder) -> Self {
        Self { device:  Box::new(recorder.clone()),
               files:   Box::new(recorder.clone()),
               system:  Box::new(recorder.clone()),
               console: Box::new(recorder.clone()), }
    }
}
