//! Response body storage
//!
//! A response body lives in exactly one place at a time: an owned buffer, a
//! borrowed static view, or a file on disk that the transport sends directly.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::config::HttpConfig;
use crate::error::{ResponseError, Result};
use crate::logger;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Buffer(Bytes),
    View(&'static [u8]),
    /// Not read into memory; the transport streams the file after the head
    File { path: PathBuf },
}

impl Default for Body {
    fn default() -> Self {
        Self::Buffer(Bytes::new())
    }
}

impl Body {
    /// In-memory bytes, `None` for the file variant
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Buffer(bytes) => Some(bytes),
            Self::View(view) => Some(view),
            Self::File { .. } => None,
        }
    }

    pub fn file_path(&self) -> Option<&Path> {
        match self {
            Self::File { path, .. } => Some(path),
            Self::Buffer(_) | Self::View(_) => None,
        }
    }

    /// Value of the `Content-Length` header
    ///
    /// Files are stat'ed on every call so a file that changed since the
    /// response was built is reported with its current size.
    pub fn content_length(&self) -> Result<u64> {
        match self {
            Self::Buffer(bytes) => Ok(bytes.len() as u64),
            Self::View(view) => Ok(view.len() as u64),
            Self::File { path, .. } => match std::fs::metadata(path) {
                Ok(meta) => Ok(meta.len()),
                Err(source) => {
                    logger::log_stat_failed(path, &source);
                    Err(ResponseError::FileStat {
                        path: path.clone(),
                        source,
                    })
                }
            },
        }
    }

    /// Build a body from a file on disk
    ///
    /// Large files (strictly above the configured threshold) become the
    /// direct-transfer variant when enabled; anything else is read whole.
    pub fn from_file(path: &Path, config: &HttpConfig) -> io::Result<Self> {
        let mut file = File::open(path)?;
        let size = file.seek(SeekFrom::End(0))?;
        file.rewind()?;

        if config.use_sendfile && size > config.sendfile_threshold {
            logger::log_sendfile_selected(path, size);
            return Ok(Self::File {
                path: path.to_path_buf(),
            });
        }

        let mut buf = Vec::with_capacity(usize::try_from(size).unwrap_or_default());
        file.read_to_end(&mut buf)?;
        Ok(Self::Buffer(Bytes::from(buf)))
    }
}
