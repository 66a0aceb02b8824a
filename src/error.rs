use std::fmt;

/// Failure to obtain a stem's raw bytes.
#[derive(Debug, Clone)]
pub enum LoadError {
    Http { url: String, detail: String },
    Io { path: String, detail: String },
}

/// Failure to decode fetched bytes into a playable buffer.
#[derive(Debug, Clone)]
pub enum DecodeError {
    EmptyStream,
    UnsupportedFormat { detail: String },
    Corrupt { detail: String },
}

/// Returned by `SourceHandle::stop` when the source already finished
/// (or was never started). Callers are expected to swallow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceStopped;

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Http { url, detail } => write!(f, "fetch failed for {url}: {detail}"),
            LoadError::Io { path, detail } => write!(f, "read failed for {path}: {detail}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::EmptyStream => write!(f, "audio stream is empty"),
            DecodeError::UnsupportedFormat { detail } => {
                write!(f, "unsupported audio format: {detail}")
            }
            DecodeError::Corrupt { detail } => write!(f, "corrupt audio data: {detail}"),
        }
    }
}

impl std::error::Error for DecodeError {}

impl fmt::Display for SourceStopped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source already stopped")
    }
}

impl std::error::Error for SourceStopped {}
