//! FTP upload of a built staging directory.
//!
//! The publisher walks the staging tree in sorted order and mirrors it under
//! the configured remote path: it changes into the remote upload directory,
//! clears whatever a previous deploy left there, then uploads every file,
//! creating remote directories parent-first. Clearing first means removed
//! posts and renamed derivatives do not linger on the live host. With
//! `secure: true` the connection is upgraded to FTPS (explicit TLS) right
//! after connect, before credentials are sent.
//!
//! The [`RemoteSink`] trait is the seam between the upload plan and the FTP
//! protocol, so the ordering rules (enter, clear, dirs before files) are
//! testable without a server.

use crate::config::FtpConfig;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use suppaftp::native_tls::TlsConnector;
use suppaftp::{NativeTlsConnector, NativeTlsFtpStream};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("FTP error: {0}")]
    Ftp(#[from] suppaftp::FtpError),
    #[error("TLS error: {0}")]
    Tls(String),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),
}

/// The remote side of a deploy, as the upload plan sees it.
pub trait RemoteSink {
    /// Change into the upload directory, creating path components as needed.
    fn enter(&mut self, path: &str) -> Result<(), PublishError>;
    /// Remove everything under the current remote directory.
    fn clear(&mut self) -> Result<(), PublishError>;
    /// Create a directory relative to the upload root. Best-effort: the
    /// directory may already exist.
    fn make_dir(&mut self, path: &str);
    /// Upload one local file to `key` relative to the upload root.
    fn upload(&mut self, key: &str, local: &Path) -> Result<(), PublishError>;
    fn close(&mut self) -> Result<(), PublishError>;
}

/// Uploads a local directory tree over FTP/FTPS.
pub struct FtpPublisher {
    config: FtpConfig,
}

impl FtpPublisher {
    pub fn new(config: FtpConfig) -> Self {
        Self { config }
    }

    /// Upload every file under `directory` to the configured remote path,
    /// replacing the previous deploy. Returns the number of files uploaded.
    pub fn publish(&self, directory: &Path) -> Result<usize, PublishError> {
        if !directory.is_dir() {
            return Err(PublishError::DirectoryNotFound(directory.to_path_buf()));
        }
        let files = collect_files(directory)?;
        let mut remote = FtpRemote::connect(&self.config)?;
        upload_all(&mut remote, &self.config.upload_path, &files)
    }
}

/// The deploy plan: enter the upload path, clear it, then upload every file
/// with its parent directories created first.
fn upload_all<S: RemoteSink>(
    remote: &mut S,
    upload_path: &str,
    files: &[(PathBuf, PathBuf)],
) -> Result<usize, PublishError> {
    remote.enter(upload_path)?;
    remote.clear()?;

    let mut created: BTreeSet<String> = BTreeSet::new();
    for (relative, absolute) in files {
        let key = remote_key(relative);
        if let Some((dirs, _)) = key.rsplit_once('/') {
            let mut prefix = String::new();
            for component in dirs.split('/') {
                if !prefix.is_empty() {
                    prefix.push('/');
                }
                prefix.push_str(component);
                if created.insert(prefix.clone()) {
                    remote.make_dir(&prefix);
                }
            }
        }
        remote.upload(&key, absolute)?;
    }

    remote.close()?;
    Ok(files.len())
}

/// [`RemoteSink`] over a live FTP/FTPS connection.
struct FtpRemote {
    stream: NativeTlsFtpStream,
}

impl FtpRemote {
    fn connect(config: &FtpConfig) -> Result<Self, PublishError> {
        let address = if config.host.contains(':') {
            config.host.clone()
        } else {
            format!("{}:21", config.host)
        };
        let mut stream = NativeTlsFtpStream::connect(&address)?;
        if config.secure {
            let domain = config
                .host
                .split(':')
                .next()
                .unwrap_or(&config.host)
                .to_string();
            let connector = TlsConnector::new().map_err(|e| PublishError::Tls(e.to_string()))?;
            stream = stream.into_secure(NativeTlsConnector::from(connector), &domain)?;
        }
        stream.login(&config.user, &config.password)?;
        Ok(Self { stream })
    }

    /// Remove every entry in the current remote directory. Entries that
    /// refuse plain deletion are treated as directories and cleared
    /// recursively.
    fn clear_current_dir(&mut self) -> Result<(), PublishError> {
        for entry in self.stream.nlst(None)? {
            // Some servers return full paths from NLST
            let name = entry.rsplit('/').next().unwrap_or(&entry).to_string();
            if name.is_empty() || name == "." || name == ".." {
                continue;
            }
            if self.stream.rm(&name).is_err() {
                self.stream.cwd(&name)?;
                self.clear_current_dir()?;
                self.stream.cdup()?;
                self.stream.rmdir(&name)?;
            }
        }
        Ok(())
    }
}

impl RemoteSink for FtpRemote {
    fn enter(&mut self, path: &str) -> Result<(), PublishError> {
        if path.starts_with('/') {
            self.stream.cwd("/")?;
        }
        for component in path.split('/').filter(|c| !c.is_empty()) {
            let _ = self.stream.mkdir(component);
            self.stream.cwd(component)?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), PublishError> {
        self.clear_current_dir()
    }

    fn make_dir(&mut self, path: &str) {
        // Already-existing directories make mkdir fail; that is harmless
        let _ = self.stream.mkdir(path);
    }

    fn upload(&mut self, key: &str, local: &Path) -> Result<(), PublishError> {
        let mut reader = File::open(local)?;
        self.stream.put_file(key, &mut reader)?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), PublishError> {
        self.stream.quit()?;
        Ok(())
    }
}

/// Walk the tree, collecting `(relative, absolute)` file paths in sorted
/// order so directory creation happens parent-first.
fn collect_files(directory: &Path) -> Result<Vec<(PathBuf, PathBuf)>, PublishError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(directory).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            let relative = entry
                .path()
                .strip_prefix(directory)
                .unwrap_or(entry.path())
                .to_path_buf();
            files.push((relative, entry.path().to_path_buf()));
        }
    }
    Ok(files)
}

/// Remote path for a relative local path: forward slashes regardless of the
/// local separator.
fn remote_key(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
