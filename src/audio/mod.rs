//! Sound feedback for the shop.
//!
//! [`AudioUnit`] turns [`SoundCue`]s into rendered clips and hands them to an
//! [`AudioOutput`]. Nothing here reports back to the game: a missing or failing
//! device is logged and the clip dropped.

mod output;
mod synth;

use std::path::Path;

use log::{debug, warn};
use thiserror::Error;

use crate::game::{Note, SoundCue};

pub use output::{AudioOutput, Clip, SilentOutput, write_wav};
#[cfg(feature = "playback")]
pub use output::DeviceOutput;
pub use synth::{CHORD_VOLUME, DEFAULT_SAMPLE_RATE, Envelope, NOTE_VOLUME, Synth};

pub const DEFAULT_MASTER_VOLUME: f32 = 0.3;
pub const KEY_NOTE_SECS: f32 = 0.5;
pub const DEMO_NOTE_SECS: f32 = 0.6;
pub const DEMO_GAP_SECS: f32 = 0.2;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio output is not initialised")]
    NotInitialised,
    #[error("audio device unavailable: {0}")]
    Device(String),
    #[error("playback failed: {0}")]
    Playback(String),
    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),
}

pub struct AudioUnit {
    synth: Synth,
    output: Option<Box<dyn AudioOutput>>,
    master_volume: f32,
}

impl AudioUnit {
    pub fn new(sample_rate: u32, output: Option<Box<dyn AudioOutput>>) -> Self {
        Self {
            synth: Synth::new(sample_rate),
            output,
            master_volume: DEFAULT_MASTER_VOLUME,
        }
    }

    /// Opens the default device, falling back to an uninitialised unit when that fails.
    #[cfg(feature = "playback")]
    pub fn with_device(sample_rate: u32) -> Self {
        match DeviceOutput::open() {
            Ok(device) => Self::new(sample_rate, Some(Box::new(device))),
            Err(err) => {
                warn!("audio disabled: {}", err);
                Self::new(sample_rate, None)
            }
        }
    }

    #[cfg(not(feature = "playback"))]
    pub fn with_device(sample_rate: u32) -> Self {
        warn!("audio disabled: built without the playback feature");
        Self::new(sample_rate, None)
    }

    pub fn silent(sample_rate: u32) -> Self {
        Self::new(sample_rate, Some(Box::new(SilentOutput)))
    }

    pub fn is_initialised(&self) -> bool {
        self.output.is_some()
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
        debug!("master volume {:.2}", self.master_volume);
    }

    pub fn synth(&self) -> &Synth {
        &self.synth
    }

    /// Renders a cue without playing it. Master volume is applied.
    pub fn render(&self, cue: &SoundCue) -> Clip {
        let raw = match cue {
            SoundCue::Note(note) => self.synth.render_note(*note, KEY_NOTE_SECS, NOTE_VOLUME),
            SoundCue::Demo(notes) => {
                self.synth
                    .render_sequence(notes, DEMO_NOTE_SECS, DEMO_GAP_SECS)
            }
            SoundCue::Success => self.synth.render_success(),
            SoundCue::Error => self.synth.render_error(),
            SoundCue::LevelUp => self.synth.render_level_up(),
        };
        self.finish(raw)
    }

    fn finish(&self, mut samples: Vec<f32>) -> Clip {
        for s in &mut samples {
            *s = (*s * self.master_volume).clamp(-1.0, 1.0);
        }
        Clip {
            sample_rate: self.synth.sample_rate,
            samples,
        }
    }

    pub fn play_cue(&mut self, cue: &SoundCue) {
        if self.output.is_none() {
            warn!("cannot play {:?}: {}", cue, AudioError::NotInitialised);
            return;
        }
        let clip = self.render(cue);
        if clip.samples.is_empty() {
            debug!("nothing to play for {:?}", cue);
            return;
        }
        self.send(clip);
    }

    fn send(&mut self, clip: Clip) {
        let Some(output) = self.output.as_mut() else {
            warn!("dropping clip: {}", AudioError::NotInitialised);
            return;
        };
        if let Err(err) = output.play(clip) {
            warn!("{}", err);
        }
    }

    /// Renders the stingers and the scale into `dir` as WAV files.
    pub fn export_cues(&self, dir: &Path) -> Result<Vec<String>, AudioError> {
        let cues = [
            ("success.wav", SoundCue::Success),
            ("error.wav", SoundCue::Error),
            ("level-up.wav", SoundCue::LevelUp),
            ("scale.wav", SoundCue::Demo(Note::ALL.to_vec())),
        ];
        let mut written = Vec::with_capacity(cues.len());
        for (name, cue) in cues {
            let path = dir.join(name);
            write_wav(&path, &self.render(&cue))?;
            written.push(path.display().to_string());
        }
        Ok(written)
    }
}
