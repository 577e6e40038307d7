mod common;

use approx::assert_relative_eq;
use tempfile::tempdir;

use depthcut_core::device::StreamKind;
use depthcut_core::error::DepthcutError;
use depthcut_core::io::{RecordingHeader, RecordingReader, RecordingWriter};
use depthcut_core::metadata::MetadataAttribute;
use depthcut_core::pipeline::{run_session, NoOpReporter};
use depthcut_core::refine::NearestMeanSolver;
use depthcut_core::segment::SegmentationConfig;
use depthcut_core::session::{FramePoll, Session};
use depthcut_core::source::{FrameSource, GridAligner};

use common::{color_frame, depth_frame, flat_depth, write_recording};

#[test]
fn test_round_trip_frames_and_metadata() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("two.dcr");

    let mut depth = depth_frame(3, 2, &[0, 100, 200, 300, 400, 65535]);
    depth.metadata.set(MetadataAttribute::FrameCounter, 7);
    depth.metadata.set(MetadataAttribute::ActualExposure, -3);
    let mut color = color_frame(3, 2, &[1, 2, 3]);
    color.metadata.set(MetadataAttribute::WhiteBalance, 4600);
    let second = (flat_depth(3, 2, 900), color_frame(3, 2, &[9, 8, 7]));

    write_recording(&path, StreamKind::Color, 0.00025, &[(depth.clone(), color.clone()), second]);

    let reader = RecordingReader::open(&path).unwrap();
    assert_eq!(reader.frame_count(), 2);
    assert_eq!((reader.header.width, reader.header.height), (3, 2));
    assert_eq!(reader.header.bytes_per_pixel, 3);
    assert_eq!(reader.header.stream, StreamKind::Color);
    assert_eq!(reader.header.device_name, "Bench Camera");
    assert_relative_eq!(reader.header.depth_scale, 0.00025);

    let (d0, c0) = reader.read_frame(0).unwrap();
    assert_eq!(d0.as_raw(), depth.as_raw());
    assert_eq!(c0.as_raw(), color.as_raw());
    assert_eq!(d0.metadata, depth.metadata);
    assert_eq!(c0.metadata, color.metadata);
    assert!(!d0.supports_metadata(MetadataAttribute::GainLevel));

    let (d1, c1) = reader.read_frame(1).unwrap();
    assert!(d1.as_raw().iter().all(|&u| u == 900));
    assert_eq!(c1.pixel(2, 1), &[9, 8, 7]);
    assert!(d1.metadata.is_empty());
}

#[test]
fn test_replays_as_frame_source() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("replay.dcr");
    let frames: Vec<_> = (1..=3u16)
        .map(|i| (flat_depth(2, 2, i * 100), color_frame(2, 2, &[i as u8; 3])))
        .collect();
    write_recording(&path, StreamKind::Infrared, 0.001, &frames);

    let mut reader = RecordingReader::open(&path).unwrap();
    assert_eq!(reader.frames_remaining(), Some(3));

    let profile = reader.active_profile();
    assert_eq!(profile.streams.len(), 2);
    assert_eq!(profile.streams[1].stream, StreamKind::Infrared);

    for expected in 1..=3u16 {
        let set = reader.wait_for_frames().unwrap().unwrap();
        assert_eq!(set.depth.as_ref().unwrap().get(0, 0), expected * 100);
        assert!(set.first(StreamKind::Infrared).is_some());
    }
    assert!(reader.wait_for_frames().unwrap().is_none());
    assert_eq!(reader.frames_remaining(), Some(0));

    reader.rewind();
    assert_eq!(reader.frames_remaining(), Some(3));
}

#[test]
fn test_session_over_recording_uses_recorded_scale() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.dcr");
    write_recording(&path, StreamKind::Color, 0.002, &[(flat_depth(4, 3, 250), color_frame(4, 3, &[5, 5, 5]))]);

    let reader = RecordingReader::open(&path).unwrap();
    let mut session = Session::start(reader, GridAligner).unwrap();
    assert_relative_eq!(session.depth_scale(), 0.002);
    assert_eq!(session.align_target(), StreamKind::Color);

    let FramePoll::Frame(frames) = session.poll().unwrap() else {
        panic!("expected a frame");
    };
    assert_eq!(frames.depth_at(3, 2), 250);
    assert!(matches!(session.poll().unwrap(), FramePoll::Finished));
}

#[test]
fn test_single_frame_recording_runs_with_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("packed.dcr");
    write_recording(&path, StreamKind::Color, 0.001, &[(flat_depth(3, 3, 400), color_frame(3, 3, &[12, 34, 56]))]);

    let reader = RecordingReader::open(&path).unwrap();
    let mut session = Session::start(reader, GridAligner).unwrap();
    let mut images = Vec::new();
    let summary = run_session(
        &mut session,
        &SegmentationConfig::default(),
        &mut NearestMeanSolver,
        &NoOpReporter,
        |frame| {
            images.push(frame.image.clone());
            Ok(())
        },
    )
    .unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].pixel(1, 1), &[12, 34, 56]);
}

#[test]
fn test_bad_magic_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.dcr");
    std::fs::write(&path, vec![0u8; 128]).unwrap();
    assert!(matches!(
        RecordingReader::open(&path),
        Err(DepthcutError::InvalidRecording(_))
    ));
}

#[test]
fn test_short_file_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("short.dcr");
    std::fs::write(&path, b"DEPTHCUT-REC").unwrap();
    assert!(matches!(
        RecordingReader::open(&path),
        Err(DepthcutError::InvalidRecording(_))
    ));
}

#[test]
fn test_truncated_frame_data_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cut.dcr");
    write_recording(&path, StreamKind::Color, 0.001, &[(flat_depth(8, 8, 1), color_frame(8, 8, &[0; 3]))]);

    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() - 10]).unwrap();
    match RecordingReader::open(&path) {
        Err(DepthcutError::InvalidRecording(msg)) => assert!(msg.contains("truncated"), "{msg}"),
        Err(e) => panic!("unexpected error {e}"),
        Ok(_) => panic!("truncated file accepted"),
    }
}

#[test]
fn test_unsupported_version_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("v2.dcr");
    write_recording(&path, StreamKind::Color, 0.001, &[(flat_depth(2, 2, 1), color_frame(2, 2, &[0; 3]))]);

    let mut bytes = std::fs::read(&path).unwrap();
    bytes[12..16].copy_from_slice(&2u32.to_le_bytes());
    std::fs::write(&path, &bytes).unwrap();
    assert!(RecordingReader::open(&path).is_err());
}

#[test]
fn test_frame_index_out_of_range() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("one.dcr");
    write_recording(&path, StreamKind::Color, 0.001, &[(flat_depth(2, 2, 1), color_frame(2, 2, &[0; 3]))]);

    let reader = RecordingReader::open(&path).unwrap();
    assert!(matches!(
        reader.read_frame(1),
        Err(DepthcutError::FrameIndexOutOfRange { index: 1, total: 1 })
    ));
}

#[test]
fn test_writer_rejects_frames_that_do_not_fit_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("strict.dcr");
    let header = RecordingHeader::new(2, 2, 3, StreamKind::Color, 0.001);
    let mut writer = RecordingWriter::create(&path, &header).unwrap();

    assert!(writer.write_frame(&flat_depth(3, 3, 1), &color_frame(3, 3, &[0; 3])).is_err());
    assert!(writer.write_frame(&flat_depth(2, 2, 1), &color_frame(2, 2, &[0; 4])).is_err());
    assert!(writer.write_frame(&flat_depth(2, 2, 1), &color_frame(3, 2, &[0; 3])).is_err());
    assert_eq!(writer.frames_written(), 0);
    writer.finalize().unwrap();

    let reader = RecordingReader::open(&path).unwrap();
    assert_eq!(reader.frame_count(), 0);
}

#[test]
fn test_header_rejects_depth_as_align_target() {
    let dir = tempdir().unwrap();
    let header = RecordingHeader::new(2, 2, 3, StreamKind::Depth, 0.001);
    assert!(RecordingWriter::create(&dir.path().join("x.dcr"), &header).is_err());
}

#[test]
fn test_long_device_name_truncated() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("name.dcr");
    let header = RecordingHeader::new(1, 1, 3, StreamKind::Color, 0.001)
        .with_device_name("An Extremely Long Depth Camera Model Name");
    let mut writer = RecordingWriter::create(&path, &header).unwrap();
    writer.write_frame(&flat_depth(1, 1, 1), &color_frame(1, 1, &[0; 3])).unwrap();
    writer.finalize().unwrap();

    let reader = RecordingReader::open(&path).unwrap();
    assert_eq!(reader.header.device_name, "An Extremely Long Depth");
}
