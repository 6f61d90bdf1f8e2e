use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Enumeration of all possible errors that can occur while extracting highlights
#[derive(Debug)]
pub enum HighlightParserError {
    Mp4(Mp4Error),
    Project(ProjectError),
    Config(ConfigError),
    Other(io::Error),
}

/// Editor project template specific errors
#[derive(Debug)]
pub struct ProjectError {
    pub message: String,
}

impl ProjectError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
}

impl ConfigError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// MP4 container structure errors
#[derive(Debug, PartialEq, Eq)]
pub enum Mp4Error {
    /// A box header is truncated or declares a length below the header size
    MalformedContainer { offset: u64, message: String },
    /// The root `ftyp` box is absent or not at offset 0
    NotAContainer { message: String },
    /// A box required to reach the highlight data is absent from its parent
    RequiredBoxMissing { name: String, parent: String },
}

impl Mp4Error {
    pub fn malformed(offset: u64, message: impl Into<String>) -> Self {
        Mp4Error::MalformedContainer {
            offset,
            message: message.into(),
        }
    }

    pub fn missing(name: impl Into<String>, parent: impl Into<String>) -> Self {
        Mp4Error::RequiredBoxMissing {
            name: name.into(),
            parent: parent.into(),
        }
    }
}

/// A failure scoped to one input file.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: HighlightParserError,
}

impl FileFailure {
    pub fn new(path: &Path, error: HighlightParserError) -> Self {
        Self {
            path: path.to_path_buf(),
            error,
        }
    }
}

impl fmt::Display for HighlightParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighlightParserError::Other(err) => write!(f, "I/O error: {}", err),
            HighlightParserError::Project(err) => write!(f, "Project error: {}", err),
            HighlightParserError::Config(err) => write!(f, "Config error: {}", err),
            HighlightParserError::Mp4(err) => write!(f, "MP4 error: {}", err),
        }
    }
}

impl fmt::Display for ProjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for Mp4Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mp4Error::MalformedContainer { offset, message } => {
                write!(f, "malformed container at byte {}: {}", offset, message)
            }
            Mp4Error::NotAContainer { message } => {
                write!(f, "file is not an MP4 container: {}", message)
            }
            Mp4Error::RequiredBoxMissing { name, parent } => {
                write!(f, "required box '{}' not found in '{}'", name, parent)
            }
        }
    }
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}

impl Error for HighlightParserError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            HighlightParserError::Other(err) => Some(err),
            _ => None,
        }
    }
}
impl Error for ProjectError {}
impl Error for ConfigError {}
impl Error for Mp4Error {}
impl Error for FileFailure {}

// Conversion implementations
impl From<io::Error> for HighlightParserError {
    fn from(err: io::Error) -> Self {
        HighlightParserError::Other(err)
    }
}

impl From<ProjectError> for HighlightParserError {
    fn from(err: ProjectError) -> Self {
        HighlightParserError::Project(err)
    }
}

impl From<ConfigError> for HighlightParserError {
    fn from(err: ConfigError) -> Self {
        HighlightParserError::Config(err)
    }
}

impl From<Mp4Error> for HighlightParserError {
    fn from(err: Mp4Error) -> Self {
        HighlightParserError::Mp4(err)
    }
}

impl From<serde_json::Error> for HighlightParserError {
    fn from(err: serde_json::Error) -> Self {
        HighlightParserError::Project(ProjectError::new(err.to_string()))
    }
}

// Type alias for Result with HighlightParserError
pub type HighlightResult<T> = Result<T, HighlightParserError>;
