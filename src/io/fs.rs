use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::Path,
};

use crate::io::{ServiceError, ServiceResult};

/// File and directory operations available to scripts.
pub trait FileSystem {
    /// Reads a whole file as text.
    fn read(&mut self, path: &str) -> ServiceResult<String>;

    /// Replaces a file's contents, creating it if needed.
    fn write(&mut self, path: &str, contents: &str) -> ServiceResult<()>;

    /// Appends to a file, creating it if needed.
    fn append(&mut self, path: &str, contents: &str) -> ServiceResult<()>;

    /// Creates an empty file, truncating an existing one.
    fn create(&mut self, path: &str) -> ServiceResult<()>;

    fn remove(&mut self, path: &str) -> ServiceResult<()>;

    fn exists(&mut self, path: &str) -> bool;

    fn copy(&mut self, from: &str, to: &str) -> ServiceResult<()>;

    fn rename(&mut self, from: &str, to: &str) -> ServiceResult<()>;

    /// Creates a directory and any missing parents.
    fn create_dir(&mut self, path: &str) -> ServiceResult<()>;
}

/// The real file system, through `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFileSystem;

fn failed(operation: &'static str, path: &str) -> impl FnOnce(std::io::Error) -> ServiceError {
    move |source| ServiceError::File { operation,
                                       path: path.to_string(),
                                       source }
}

impl FileSystem for HostFileSystem {
    fn read(&mut self, path: &str) -> ServiceResult<String> {
        fs::read_to_string(path).map_err(failed("read", path))
    }

    fn write(&mut self, path: &str, contents: &str) -> ServiceResult<()> {
        fs::write(path, contents).map_err(failed("write", path))
    }

    fn append(&mut self, path: &str, contents: &str) -> ServiceResult<()> {
        OpenOptions::new().create(true)
                          .append(true)
                          .open(path)
                          .and_then(|mut file| file.write_all(contents.as_bytes()))
                          .map_err(failed("append to", path))
    }

    fn create(&mut self, path: &str) -> ServiceResult<()> {
        fs::File::create(path).map(drop).map_err(failed("create", path))
    }

    fn remove(&mut self, path: &str) -> ServiceResult<()> {
        fs::remove_file(path).map_err(failed("remove", path))
    }

    fn exists(&mut self, path: &str) -> bool {
        Path::new(path).exists()
    }

    fn copy(&mut self, from: &str, to: &str) -> ServiceResult<()> {
        fs::copy(from, to).map(drop).map_err(failed("copy", from))
    }

    fn rename(&mut self, from: &str, to: &str) -> ServiceResult<()> {
        fs::rename(from, to).map_err(failed("rename", from))
    }

    fn create_dir(&mut self, path: &str) -> ServiceResult<()> {
        fs::create_dir_all(path).map_err(failed("create directory", path))
    }
}
