/*
# Output Organizer

 Filesystem side effects for a video that has highlights:

   <dir>/<stem>/<stem>.tscproj                   editor project with one marker per highlight
   <dir>/<stem>/<stem>_GP-Highlights_<n>.txt     text report
   <dir>/<stem>/<video>                          the video, moved in

 Everything is rendered before the first write, and the folder must not exist
 yet, so earlier outputs are never overwritten. If writing or moving fails,
 the files written so far and the folder are removed again.
*/

use crate::config::HighlightConfig;
use crate::errors::HighlightResult;
use crate::highlights::FileHighlights;
use crate::project::{markers_from_highlights, ProjectTemplate};
use crate::report::{report_file_name, HighlightReport};
use log::{info, warn};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Where the outputs for one video ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizedOutput {
    pub folder: PathBuf,
    pub project_path: PathBuf,
    pub report_path: PathBuf,
    pub video_path: PathBuf,
}

/// Write the project and report for `video` into a folder named after it and
/// move the video there. Videos without highlights are left alone.
pub fn organize_video(
    video: &Path,
    highlights: &FileHighlights,
    template: &ProjectTemplate,
    config: &HighlightConfig,
) -> HighlightResult<Option<OrganizedOutput>> {
    if highlights.is_empty() {
        return Ok(None);
    }

    let file_name = video
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = video
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let seconds = highlights.sorted_seconds();
    let markers = markers_from_highlights(&seconds, config.edit_rate, &config.marker_label);
    let project = template.render_pretty(&markers)?;
    let report = HighlightReport::new(file_name.clone(), &seconds).to_string();
    let video_modified = fs::metadata(video)?.modified()?;

    let folder = video
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(&stem);
    let project_path = folder.join(format!("{}.tscproj", stem));
    let report_path = folder.join(report_file_name(&stem, seconds.len()));
    let video_path = folder.join(&file_name);
    if video_path == project_path || video_path == report_path {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!(
                "{} would overwrite its own outputs in {}",
                file_name,
                folder.display()
            ),
        )
        .into());
    }

    // Never reuse a folder: an earlier run's video or project may live there.
    fs::create_dir(&folder).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("output folder {} already exists", folder.display()),
        ),
        _ => e,
    })?;

    let written = [
        (project_path.as_path(), project.as_bytes()),
        (report_path.as_path(), report.as_bytes()),
    ];
    if let Err(e) = write_outputs(&written).and_then(|_| fs::rename(video, &video_path)) {
        remove_partial_output(&folder, &[project_path.as_path(), report_path.as_path()]);
        return Err(e.into());
    }
    info!("Saved highlights under: {}", report_path.display());

    if config.copy_mtime {
        // The folder goes last; writing into it bumps its mtime.
        copy_mtime(&report_path, video_modified);
        copy_mtime(&folder, video_modified);
    }

    Ok(Some(OrganizedOutput {
        folder,
        project_path,
        report_path,
        video_path,
    }))
}

fn write_outputs(files: &[(&Path, &[u8])]) -> io::Result<()> {
    for (path, contents) in files {
        fs::write(path, contents)?;
    }
    Ok(())
}

/// Undo a failed organize: delete the files this run wrote, then the folder
/// it created. The video is never touched.
fn remove_partial_output(folder: &Path, written: &[&Path]) {
    for path in written {
        if let Err(e) = fs::remove_file(path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Failed to remove {}: {}", path.display(), e);
            }
        }
    }
    if let Err(e) = fs::remove_dir(folder) {
        warn!("Failed to remove {}: {}", folder.display(), e);
    }
}

fn copy_mtime(path: &Path, modified: SystemTime) {
    if let Err(e) = set_modified(path, modified) {
        warn!(
            "Failed to set modification time of {}: {}",
            path.display(),
            e
        );
    }
}

fn set_modified(path: &Path, modified: SystemTime) -> io::Result<()> {
    let file = if path.is_dir() {
        File::open(path)?
    } else {
        OpenOptions::new().write(true).open(path)?
    };
    file.set_modified(modified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mp4::ftyp::ContainerFormat;
    use crate::mp4::gpmf::HighlightRecord;
    use std::time::Duration;

    const TEMPLATE: &str = r#"{ "timeline": { "id": 1 } }"#;

    fn highlights(timestamps: &[u32]) -> FileHighlights {
        FileHighlights {
            format: ContainerFormat::MP4,
            records: timestamps
                .iter()
                .enumerate()
                .map(|(i, &timestamp_ms)| HighlightRecord {
                    timestamp_ms,
                    tag_offset: 100 + 20 * i as u64,
                })
                .collect(),
        }
    }

    #[test]
    fn test_organize_video_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("GX010042.MP4");
        fs::write(&video, b"video").unwrap();
        let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        OpenOptions::new()
            .write(true)
            .open(&video)
            .unwrap()
            .set_modified(mtime)
            .unwrap();

        let template = ProjectTemplate::from_json(TEMPLATE).unwrap();
        let output = organize_video(
            &video,
            &highlights(&[10_250, 2_000]),
            &template,
            &HighlightConfig::default(),
        )
        .unwrap()
        .unwrap();

        assert_eq!(output.folder, dir.path().join("GX010042"));
        assert!(!video.exists());
        assert_eq!(fs::read(&output.video_path).unwrap(), b"video");
        assert_eq!(
            output.report_path.file_name().unwrap(),
            "GX010042_GP-Highlights_2.txt"
        );
        assert_eq!(
            fs::read_to_string(&output.report_path).unwrap(),
            "GX010042.MP4\n(1): 0:00:02.000\n(2): 0:00:10.250\n\n"
        );

        let project: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output.project_path).unwrap()).unwrap();
        let keyframes = &project["timeline"]["parameters"]["toc"]["keyframes"];
        assert_eq!(keyframes[0]["time"], 1_411_200_000u64);
        assert_eq!(keyframes[1]["time"], 7_232_400_000u64);
        assert_eq!(project["timeline"]["id"], 1);

        let report_mtime = fs::metadata(&output.report_path).unwrap().modified().unwrap();
        assert_eq!(report_mtime, mtime);
    }

    #[test]
    fn test_organize_video_without_highlights() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("GX010043.MP4");
        fs::write(&video, b"video").unwrap();
        let template = ProjectTemplate::from_json(TEMPLATE).unwrap();
        let output =
            organize_video(&video, &highlights(&[]), &template, &HighlightConfig::default())
                .unwrap();
        assert!(output.is_none());
        assert!(video.exists());
        assert!(!dir.path().join("GX010043").exists());
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_existing_folder_is_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("GX01");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("GX01.MP4"), b"EARLIER VIDEO").unwrap();
        fs::write(folder.join("GX01.tscproj"), b"EARLIER PROJECT").unwrap();
        let video = dir.path().join("GX01.MP4");
        fs::write(&video, b"new").unwrap();

        let template = ProjectTemplate::from_json(TEMPLATE).unwrap();
        let err = organize_video(
            &video,
            &highlights(&[1_000]),
            &template,
            &HighlightConfig::default(),
        )
        .unwrap_err();

        assert!(err.to_string().contains("already exists"));
        assert_eq!(fs::read(folder.join("GX01.MP4")).unwrap(), b"EARLIER VIDEO");
        assert_eq!(
            fs::read(folder.join("GX01.tscproj")).unwrap(),
            b"EARLIER PROJECT"
        );
        assert_eq!(entries(&folder), vec!["GX01.MP4", "GX01.tscproj"]);
        assert_eq!(fs::read(&video).unwrap(), b"new");
    }

    #[test]
    fn test_blocked_move_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("GX02");
        fs::create_dir_all(folder.join("GX02.MP4").join("x")).unwrap();
        let video = dir.path().join("GX02.MP4");
        fs::write(&video, b"video").unwrap();

        let template = ProjectTemplate::from_json(TEMPLATE).unwrap();
        let result = organize_video(
            &video,
            &highlights(&[1_000]),
            &template,
            &HighlightConfig::default(),
        );

        assert!(result.is_err());
        assert_eq!(entries(&folder), vec!["GX02.MP4"]);
        assert!(video.exists());
    }

    #[test]
    fn test_failed_write_removes_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        // The folder name fits, but "<stem>.tscproj" exceeds the 255-byte
        // file name limit, so the first write fails after the folder exists.
        let stem = "G".repeat(250);
        let video = dir.path().join(format!("{}.MP4", stem));
        fs::write(&video, b"video").unwrap();

        let template = ProjectTemplate::from_json(TEMPLATE).unwrap();
        let result = organize_video(
            &video,
            &highlights(&[1_000]),
            &template,
            &HighlightConfig::default(),
        );

        assert!(result.is_err());
        assert!(!dir.path().join(&stem).exists());
        assert_eq!(fs::read(&video).unwrap(), b"video");
    }

    #[test]
    fn test_video_named_like_its_project_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let video = dir.path().join("clip.tscproj");
        fs::write(&video, b"video").unwrap();

        let template = ProjectTemplate::from_json(TEMPLATE).unwrap();
        let result = organize_video(
            &video,
            &highlights(&[1_000]),
            &template,
            &HighlightConfig::default(),
        );

        assert!(result.is_err());
        assert!(!dir.path().join("clip").exists());
        assert_eq!(fs::read(&video).unwrap(), b"video");
    }
}
