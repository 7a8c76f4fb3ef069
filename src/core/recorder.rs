use log::debug;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::{AUDIO_FILE_NAME, AUDIO_MIME_TYPE};
use crate::core::errors::SplitError;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecorderState {
    #[default]
    Idle,
    Recording,
    Paused,
    Stopped,
}

impl std::fmt::Display for RecorderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RecorderState::Idle => "idle",
            RecorderState::Recording => "recording",
            RecorderState::Paused => "paused",
            RecorderState::Stopped => "stopped",
        };
        write!(f, "{}", s)
    }
}

/// The finalized recording handed to the voice-processing endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioClip {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
    pub chunk_count: usize,
}

/// Buffers capture chunks between start and stop.
#[derive(Clone, Debug, Default)]
pub struct AudioRecorder {
    state: RecorderState,
    chunks: Vec<Vec<u8>>,
}

#[derive(Clone, Debug, Serialize, ToSchema, PartialEq)]
pub struct RecorderStatus {
    pub state: RecorderState,
    pub chunks: usize,
    pub bytes: usize,
}

impl AudioRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn status(&self) -> RecorderStatus {
        RecorderStatus {
            state: self.state,
            chunks: self.chunks.len(),
            bytes: self.chunks.iter().map(Vec::len).sum(),
        }
    }

    fn invalid(&self, action: &str) -> SplitError {
        SplitError::InvalidRecorderTransition {
            state: self.state.to_string(),
            action: action.to_string(),
        }
    }

    /// Starts a new recording, discarding anything left from a previous one.
    pub fn start(&mut self) {
        if !self.chunks.is_empty() {
            debug!("Discarding {} chunks from previous recording", self.chunks.len());
        }
        self.chunks.clear();
        self.state = RecorderState::Recording;
    }

    pub fn pause(&mut self) -> Result<(), SplitError> {
        match self.state {
            RecorderState::Recording => {
                self.state = RecorderState::Paused;
                Ok(())
            }
            _ => Err(self.invalid("pause")),
        }
    }

    /// Resumes a paused recording. With nothing to resume, starts afresh.
    pub fn resume(&mut self) {
        match self.state {
            RecorderState::Paused => self.state = RecorderState::Recording,
            RecorderState::Recording => {}
            RecorderState::Idle | RecorderState::Stopped => self.start(),
        }
    }

    pub fn push_chunk(&mut self, chunk: &[u8]) -> Result<(), SplitError> {
        if self.state != RecorderState::Recording {
            return Err(self.invalid("capture audio"));
        }
        if !chunk.is_empty() {
            self.chunks.push(chunk.to_vec());
        }
        Ok(())
    }

    /// Ends the recording and concatenates the buffered chunks.
    pub fn stop(&mut self) -> Result<AudioClip, SplitError> {
        match self.state {
            RecorderState::Recording | RecorderState::Paused => {
                self.state = RecorderState::Stopped;
            }
            _ => return Err(self.invalid("stop")),
        }
        if self.chunks.is_empty() {
            return Err(SplitError::NoAudioRecorded);
        }
        let chunk_count = self.chunks.len();
        let data = std::mem::take(&mut self.chunks).concat();
        debug!("Finalized recording: {} chunks, {} bytes", chunk_count, data.len());
        Ok(AudioClip {
            file_name: AUDIO_FILE_NAME.to_string(),
            mime_type: AUDIO_MIME_TYPE.to_string(),
            data,
            chunk_count,
        })
    }
}
