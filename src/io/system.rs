use std::{
    process::Command,
    thread,
    time::{Duration, Instant},
};

use chrono::{Datelike, Local, Timelike};
use log::debug;

use crate::io::{ServiceError, ServiceResult};

/// Calendar fields of the local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocalTime {
    pub year:   i64,
    pub month:  i64,
    pub day:    i64,
    pub hour:   i64,
    pub minute: i64,
    pub second: i64,
}

/// Clock, randomness, sleeping and shell access.
pub trait System {
    fn local_time(&mut self) -> LocalTime;

    /// Milliseconds since the session started.
    fn millis(&mut self) -> i64;

    /// A non-negative pseudo-random integer.
    fn random(&mut self) -> i64;

    fn sleep(&mut self, duration: Duration);

    /// Runs `command` through the platform shell and returns its exit code.
    fn run_command(&mut self, command: &str) -> ServiceResult<i32>;
}

/// The real clock, `rand`'s thread-local generator and the platform shell.
#[derive(Debug, Clone, Copy)]
pub struct HostSystem {
    started: Instant,
}

impl Default for HostSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl HostSystem {
    #[must_use]
    pub fn new() -> Self {
        Self { started: Instant::now() }
    }
}

impl System for HostSystem {
    fn local_time(&mut self) -> LocalTime {
        let now = Local::now();
        LocalTime { year:   i64::from(now.year()),
                    month:  i64::from(now.month()),
                    day:    i64::from(now.day()),
                    hour:   i64::from(now.hour()),
                    minute: i64::from(now.minute()),
                    second: i64::from(now.second()), }
    }

    fn millis(&mut self) -> i64 {
        i64::try_from(self.started.elapsed().as_millis()).unwrap_or(i64::MAX)
    }

    fn random(&mut self) -> i64 {
        i64::from(rand::random::<u32>())
    }

    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }

    fn run_command(&mut self, command: &str) -> ServiceResult<i32> {
        debug!("os: {command}");
        let status = if cfg!(windows) {
            Command::new("cmd").args(["/C", command]).status()
        } else {
            Command::new("sh").args(["-c", command]).status()
        };
        status.map(|s| s.code().unwrap_or(-1))
              .map_err(|source| ServiceError::Command { command: command.to_string(),
                                                        source })
    }
}
