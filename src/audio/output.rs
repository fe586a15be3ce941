use std::path::Path;

use log::trace;

use super::AudioError;

/// A rendered, ready-to-play mono clip.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl Clip {
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Somewhere clips can be sent. Playback is fire-and-forget.
pub trait AudioOutput {
    fn play(&mut self, clip: Clip) -> Result<(), AudioError>;
}

/// Discards every clip. Used when sound is muted or no device is wanted.
#[derive(Debug, Default)]
pub struct SilentOutput;

impl AudioOutput for SilentOutput {
    fn play(&mut self, clip: Clip) -> Result<(), AudioError> {
        trace!("silent output dropped {:.2}s clip", clip.duration_secs());
        Ok(())
    }
}

#[cfg(feature = "playback")]
pub use device::DeviceOutput;

#[cfg(feature = "playback")]
mod device {
    use rodio::buffer::SamplesBuffer;
    use rodio::{OutputStream, OutputStreamHandle};

    use super::{AudioOutput, Clip};
    use crate::audio::AudioError;

    /// Plays clips on the default output device.
    pub struct DeviceOutput {
        // Dropping the stream silences the handle.
        _stream: OutputStream,
        handle: OutputStreamHandle,
    }

    impl DeviceOutput {
        pub fn open() -> Result<Self, AudioError> {
            let (stream, handle) = OutputStream::try_default()
                .map_err(|e| AudioError::Device(e.to_string()))?;
            Ok(Self {
                _stream: stream,
                handle,
            })
        }
    }

    impl AudioOutput for DeviceOutput {
        fn play(&mut self, clip: Clip) -> Result<(), AudioError> {
            let source = SamplesBuffer::new(1, clip.sample_rate, clip.samples);
            self.handle
                .play_raw(source)
                .map_err(|e| AudioError::Playback(e.to_string()))
        }
    }
}

/// Writes a clip as 16-bit mono PCM.
pub fn write_wav(path: &Path, clip: &Clip) -> Result<(), AudioError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: clip.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for sample in &clip.samples {
        let pcm = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(pcm)?;
    }
    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_roundtrip_keeps_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        let clip = Clip {
            sample_rate: 8_000,
            samples: vec![0.0, 0.5, -0.5, 1.5],
        };
        write_wav(&path, &clip).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 8_000);
        let samples: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[3], i16::MAX);
    }
}
