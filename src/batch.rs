use crate::config::HighlightConfig;
use crate::errors::{ConfigError, FileFailure, HighlightResult};
use crate::highlights::{extract_local_highlights, FileHighlights};
use crate::organizer::{organize_video, OrganizedOutput};
use crate::project::ProjectTemplate;
use log::{info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Result of one successfully processed file
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub highlights: FileHighlights,
    pub output: Option<OrganizedOutput>,
}

/// Per-file results of a batch; one failing file never stops the others
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub outcomes: Vec<FileOutcome>,
    pub failures: Vec<FileFailure>,
}

impl BatchSummary {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// `.mp4` extension, any case
pub fn is_mp4_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("mp4"))
}

/// macOS AppleDouble companions such as `._GX010042.MP4`
pub fn is_apple_double(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.starts_with("._"))
}

/// Explicit files plus every MP4 directly inside `directory`, in sorted order,
/// without AppleDouble files.
pub fn collect_input_files(
    files: &[PathBuf],
    directory: Option<&Path>,
) -> io::Result<Vec<PathBuf>> {
    let mut inputs: Vec<PathBuf> = files.to_vec();

    if let Some(dir) = directory {
        let mut found = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && is_mp4_file(&path) {
                found.push(path);
            }
        }
        found.sort();
        inputs.extend(found);
    }

    inputs.retain(|path| {
        let skip = is_apple_double(path);
        if skip {
            info!("Skipping AppleDouble file {}", path.display());
        }
        !skip
    });
    Ok(inputs)
}

/// Extract highlights from one file and, when configured, organize its outputs
pub fn process_file(
    path: &Path,
    template: Option<&ProjectTemplate>,
    config: &HighlightConfig,
) -> HighlightResult<FileOutcome> {
    let highlights = extract_local_highlights(path)?;
    info!(
        "{}: found {} highlight(s)",
        path.display(),
        highlights.len()
    );

    let output = if config.organize {
        let template = template
            .ok_or_else(|| ConfigError::new("organizing outputs requires a project template"))?;
        organize_video(path, &highlights, template, config)?
    } else {
        None
    };

    Ok(FileOutcome {
        path: path.to_path_buf(),
        highlights,
        output,
    })
}

/// Process every file, collecting failures per file
pub fn process_files(
    paths: &[PathBuf],
    template: Option<&ProjectTemplate>,
    config: &HighlightConfig,
) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for path in paths {
        match process_file(path, template, config) {
            Ok(outcome) => summary.outcomes.push(outcome),
            Err(error) => {
                warn!("{}: {}", path.display(), error);
                summary.failures.push(FileFailure::new(path, error));
            }
        }
    }
    summary
}
