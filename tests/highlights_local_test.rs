use gphighlights::mp4::r#box::write_box;
use gphighlights::{
    extract_local_highlights, markers_from_highlights, process_files, read_local_highlights,
    HighlightConfig, HighlightParserError, Mp4Error, ProjectTemplate, EDIT_RATE,
};
use std::fs;
use std::path::{Path, PathBuf};

const TEMPLATE: &str = r#"{
  "title": "",
  "timeline": { "id": 11, "sceneTrack": { "scenes": [] } }
}"#;

fn record(timestamp_ms: u32) -> Vec<u8> {
    let mut buf = timestamp_ms.to_be_bytes().to_vec();
    buf.extend_from_slice(&[0u8; 12]);
    buf.extend_from_slice(b"MANL");
    buf
}

/// ftyp, mdat, then moov holding udta only when `gpmf` is given
fn synthetic_mp4(gpmf: Option<&[u32]>) -> Vec<u8> {
    let mut moov = Vec::new();
    write_box(&mut moov, b"mvhd", &[0u8; 100]);
    if let Some(timestamps) = gpmf {
        let mut payload = b"DEVC\0\0\0\0Highlights\0\0HLMT".to_vec();
        for ts in timestamps {
            payload.extend_from_slice(&record(*ts));
        }
        let mut udta = Vec::new();
        write_box(&mut udta, b"FIRM", b"HD9.01.01.60.00\0");
        write_box(&mut udta, b"GPMF", &payload);
        write_box(&mut moov, b"udta", &udta);
    }

    let mut data = Vec::new();
    write_box(&mut data, b"ftyp", b"mp41\0\0\0\0mp41");
    write_box(&mut data, b"mdat", &[0x42; 256]);
    write_box(&mut data, b"moov", &moov);
    data
}

fn write_video(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, data).unwrap();
    path
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_read_local_highlights() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_video(dir.path(), "GX010042.MP4", &synthetic_mp4(Some(&[2_000, 10_250])));

    let highlights = extract_local_highlights(&path).unwrap();
    assert_eq!(highlights.seconds(), vec![2.0, 10.25]);

    let seconds = read_local_highlights(&path).unwrap();
    let markers = markers_from_highlights(&seconds, EDIT_RATE, "Marker");
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].time, 1_411_200_000);
    assert_eq!(markers[0].endtime, 1_411_200_000);
    assert_eq!(markers[1].time, 7_232_400_000);
    assert_eq!(markers[1].endtime, 7_232_400_000);
    assert!(markers.iter().all(|m| m.duration == 0 && m.value == "Marker"));
}

#[test]
fn test_missing_udta_produces_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_video(dir.path(), "GX010043.MP4", &synthetic_mp4(None));

    let err = extract_local_highlights(&path).unwrap_err();
    match err {
        HighlightParserError::Mp4(Mp4Error::RequiredBoxMissing { ref name, .. }) => {
            assert_eq!(name, "udta")
        }
        other => panic!("unexpected error: {other}"),
    }

    let template = ProjectTemplate::from_json(TEMPLATE).unwrap();
    let summary = process_files(&[path.clone()], Some(&template), &HighlightConfig::default());
    assert!(summary.outcomes.is_empty());
    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].to_string().contains("GX010043.MP4"));
    assert!(summary.failures[0].to_string().contains("udta"));
    assert_eq!(dir_entries(dir.path()), vec!["GX010043.MP4"]);
}

#[test]
fn test_batch_continues_after_failure() {
    let dir = tempfile::tempdir().unwrap();
    let broken = write_video(dir.path(), "A_broken.MP4", b"not a video at all");
    let good = write_video(dir.path(), "B_good.MP4", &synthetic_mp4(Some(&[10_250, 2_000])));
    let plain = write_video(dir.path(), "C_plain.MP4", &synthetic_mp4(Some(&[])));

    let template = ProjectTemplate::from_json(TEMPLATE).unwrap();
    let summary = process_files(
        &[broken.clone(), good.clone(), plain.clone()],
        Some(&template),
        &HighlightConfig::default(),
    );

    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].path, broken);
    assert_eq!(summary.outcomes.len(), 2);

    let good_outcome = &summary.outcomes[0];
    assert_eq!(good_outcome.highlights.seconds(), vec![10.25, 2.0]);
    let output = good_outcome.output.as_ref().unwrap();
    assert_eq!(output.folder, dir.path().join("B_good"));
    assert!(output.video_path.exists());
    assert!(!good.exists());

    let project: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output.project_path).unwrap()).unwrap();
    let keyframes = project["timeline"]["parameters"]["toc"]["keyframes"]
        .as_array()
        .unwrap();
    assert_eq!(keyframes.len(), 2);
    assert_eq!(keyframes[0]["time"], 1_411_200_000u64);
    assert_eq!(keyframes[1]["time"], 7_232_400_000u64);

    assert_eq!(
        dir_entries(&output.folder),
        vec!["B_good.MP4", "B_good.tscproj", "B_good_GP-Highlights_2.txt"]
    );

    // no highlights: nothing is written and the video stays put
    assert!(summary.outcomes[1].highlights.is_empty());
    assert!(summary.outcomes[1].output.is_none());
    assert!(plain.exists());
}

#[test]
fn test_no_organize_leaves_files_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_video(dir.path(), "GX010044.MP4", &synthetic_mp4(Some(&[1_500])));
    let config = HighlightConfig {
        organize: false,
        ..HighlightConfig::default()
    };

    let summary = process_files(&[path.clone()], None, &config);
    assert!(!summary.has_failures());
    assert_eq!(summary.outcomes[0].highlights.seconds(), vec![1.5]);
    assert!(summary.outcomes[0].output.is_none());
    assert_eq!(dir_entries(dir.path()), vec!["GX010044.MP4"]);
}

#[test]
fn test_second_run_keeps_earlier_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let first = synthetic_mp4(Some(&[2_000]));
    let path = write_video(dir.path(), "GX010045.MP4", &first);
    let template = ProjectTemplate::from_json(TEMPLATE).unwrap();

    let summary = process_files(&[path.clone()], Some(&template), &HighlightConfig::default());
    assert!(!summary.has_failures());
    let folder = dir.path().join("GX010045");
    let project_before = fs::read(folder.join("GX010045.tscproj")).unwrap();

    // a new recording with the same name shows up later
    write_video(dir.path(), "GX010045.MP4", &synthetic_mp4(Some(&[4_000, 6_000])));
    let summary = process_files(&[path.clone()], Some(&template), &HighlightConfig::default());

    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].to_string().contains("already exists"));
    assert_eq!(fs::read(folder.join("GX010045.MP4")).unwrap(), first);
    assert_eq!(fs::read(folder.join("GX010045.tscproj")).unwrap(), project_before);
    assert_eq!(
        dir_entries(&folder),
        vec!["GX010045.MP4", "GX010045.tscproj", "GX010045_GP-Highlights_1.txt"]
    );
    assert!(path.exists());
}
