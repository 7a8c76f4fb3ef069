use crate::constants::{AUDIO_FILE_NAME, AUDIO_MIME_TYPE};
use crate::core::errors::SplitError;
use crate::core::recorder::{AudioRecorder, RecorderState};

#[test]
fn test_record_pause_resume_stop() {
    let _ = env_logger::try_init();
    let mut recorder = AudioRecorder::new();
    assert_eq!(recorder.state(), RecorderState::Idle);

    recorder.start();
    recorder.push_chunk(b"abc").unwrap();
    recorder.pause().unwrap();
    assert_eq!(recorder.state(), RecorderState::Paused);
    assert!(matches!(
        recorder.push_chunk(b"lost"),
        Err(SplitError::InvalidRecorderTransition { .. })
    ));

    recorder.resume();
    recorder.push_chunk(b"def").unwrap();
    let status = recorder.status();
    assert_eq!(status.chunks, 2);
    assert_eq!(status.bytes, 6);

    let clip = recorder.stop().unwrap();
    assert_eq!(recorder.state(), RecorderState::Stopped);
    assert_eq!(clip.data, b"abcdef".to_vec());
    assert_eq!(clip.chunk_count, 2);
    assert_eq!(clip.file_name, AUDIO_FILE_NAME);
    assert_eq!(clip.mime_type, AUDIO_MIME_TYPE);
    assert_eq!(recorder.status().bytes, 0);
}

#[test]
fn test_stop_without_audio_fails() {
    let mut recorder = AudioRecorder::new();
    recorder.start();
    recorder.push_chunk(b"").unwrap();
    assert!(matches!(recorder.stop(), Err(SplitError::NoAudioRecorded)));
    assert_eq!(recorder.state(), RecorderState::Stopped);
}

#[test]
fn test_invalid_transitions() {
    let mut recorder = AudioRecorder::new();
    assert!(recorder.pause().is_err());
    assert!(recorder.stop().is_err());
    assert!(recorder.push_chunk(b"x").is_err());
}

#[test]
fn test_restart_discards_previous_chunks() {
    let mut recorder = AudioRecorder::new();
    recorder.start();
    recorder.push_chunk(b"old").unwrap();
    recorder.start();
    recorder.push_chunk(b"new").unwrap();
    assert_eq!(recorder.stop().unwrap().data, b"new".to_vec());

    // Resuming a stopped recorder starts a fresh recording
    recorder.resume();
    assert_eq!(recorder.state(), RecorderState::Recording);
    assert_eq!(recorder.status().chunks, 0);
}
