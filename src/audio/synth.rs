//! Brass-ish tone synthesis.
//!
//! A note is a sawtooth run through a two-pole lowpass and shaped by an
//! attack/decay/sustain/release envelope. Everything renders to mono `f32`
//! samples; sequences and stingers are mixed into a single buffer with the
//! gaps left as silence.

use std::f32::consts::PI;

use crate::game::Note;

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
pub const NOTE_VOLUME: f32 = 0.3;
pub const CHORD_VOLUME: f32 = 0.2;
const FILTER_CUTOFF_HZ: f32 = 2000.0;
const FILTER_Q: f32 = 1.0;
const RELEASE_FLOOR: f32 = 0.01;

/// Amplitude envelope for a single note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    /// Linear rise from silence to full volume, seconds.
    pub attack: f32,
    /// Time by which the level has settled to `sustain`, seconds from note start.
    pub decay_end: f32,
    /// Sustain level as a fraction of volume.
    pub sustain: f32,
    /// Release length at the end of the note, seconds.
    pub release: f32,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            attack: 0.05,
            decay_end: 0.1,
            sustain: 0.8,
            release: 0.1,
        }
    }
}

impl Envelope {
    /// Gain in `[0, 1]` at `t` seconds into a note lasting `duration` seconds.
    pub fn gain_at(&self, t: f32, duration: f32) -> f32 {
        if t < 0.0 || t >= duration {
            return 0.0;
        }
        let release_start = (duration - self.release).max(self.decay_end.min(duration));
        if t < self.attack {
            t / self.attack
        } else if t < self.decay_end {
            let frac = (t - self.attack) / (self.decay_end - self.attack);
            exp_ramp(1.0, self.sustain, frac)
        } else if t < release_start {
            self.sustain
        } else {
            let span = (duration - release_start).max(f32::EPSILON);
            let frac = (t - release_start) / span;
            exp_ramp(self.sustain, RELEASE_FLOOR, frac)
        }
    }
}

fn exp_ramp(from: f32, to: f32, frac: f32) -> f32 {
    from * (to / from).powf(frac.clamp(0.0, 1.0))
}

/// Direct-form I biquad, lowpass only.
#[derive(Debug, Clone, Copy)]
struct Lowpass {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Lowpass {
    fn new(cutoff: f32, q: f32, sample_rate: f32) -> Self {
        let q = q.max(0.5);
        let omega = 2.0 * PI * cutoff.min(sample_rate * 0.45) / sample_rate;
        let (sin_omega, cos_omega) = omega.sin_cos();
        let alpha = sin_omega / (2.0 * q);
        let a0 = 1.0 + alpha;
        Self {
            b0: (1.0 - cos_omega) / 2.0 / a0,
            b1: (1.0 - cos_omega) / a0,
            b2: (1.0 - cos_omega) / 2.0 / a0,
            a1: -2.0 * cos_omega / a0,
            a2: (1.0 - alpha) / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}

#[derive(Debug, Clone)]
pub struct Synth {
    pub sample_rate: u32,
    pub envelope: Envelope,
}

impl Default for Synth {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

impl Synth {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate.max(8_000),
            envelope: Envelope::default(),
        }
    }

    fn samples_for(&self, seconds: f32) -> usize {
        (seconds.max(0.0) * self.sample_rate as f32).round() as usize
    }

    pub fn render_note(&self, note: Note, duration: f32, volume: f32) -> Vec<f32> {
        let mut out = vec![0.0; self.samples_for(duration)];
        self.mix_note(&mut out, 0.0, note, duration, volume);
        out
    }

    /// Adds a note into `buf` starting `offset` seconds in, growing the buffer if needed.
    pub fn mix_note(&self, buf: &mut Vec<f32>, offset: f32, note: Note, duration: f32, volume: f32) {
        let start = self.samples_for(offset);
        let len = self.samples_for(duration);
        if buf.len() < start + len {
            buf.resize(start + len, 0.0);
        }
        let rate = self.sample_rate as f32;
        let step = note.frequency() / rate;
        let mut filter = Lowpass::new(FILTER_CUTOFF_HZ, FILTER_Q, rate);
        let mut phase = 0.0_f32;
        for (i, slot) in buf[start..start + len].iter_mut().enumerate() {
            let saw = 2.0 * phase - 1.0;
            phase = (phase + step).fract();
            let t = i as f32 / rate;
            *slot += filter.process(saw) * self.envelope.gain_at(t, duration) * volume;
        }
    }

    /// Notes one after another, each `note_duration` long with `gap` seconds of silence between.
    pub fn render_sequence(&self, notes: &[Note], note_duration: f32, gap: f32) -> Vec<f32> {
        let mut out = Vec::new();
        for (idx, note) in notes.iter().enumerate() {
            let offset = idx as f32 * (note_duration + gap);
            self.mix_note(&mut out, offset, *note, note_duration, NOTE_VOLUME);
        }
        out
    }

    /// All notes at once, each at [`CHORD_VOLUME`].
    pub fn render_chord(&self, notes: &[Note], duration: f32) -> Vec<f32> {
        let mut out = Vec::new();
        for note in notes {
            self.mix_note(&mut out, 0.0, *note, duration, CHORD_VOLUME);
        }
        out
    }

    /// Major triad.
    pub fn render_success(&self) -> Vec<f32> {
        self.render_chord(&[Note::C, Note::E, Note::G], 0.8)
    }

    /// Two short clashing notes, the second one off the beat.
    pub fn render_error(&self) -> Vec<f32> {
        let mut out = Vec::new();
        self.mix_note(&mut out, 0.0, Note::F, 0.2, CHORD_VOLUME);
        self.mix_note(&mut out, 0.1, Note::B, 0.2, CHORD_VOLUME);
        out
    }

    pub fn render_level_up(&self) -> Vec<f32> {
        self.render_sequence(&[Note::C, Note::E, Note::G, Note::C], 0.3, 0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn envelope_shape() {
        let env = Envelope::default();
        assert_relative_eq!(env.gain_at(0.0, 0.5), 0.0);
        assert_relative_eq!(env.gain_at(0.025, 0.5), 0.5, epsilon = 1e-5);
        assert_relative_eq!(env.gain_at(0.2, 0.5), 0.8);
        assert_relative_eq!(env.gain_at(0.5, 0.5), 0.0);
        assert!(env.gain_at(0.49, 0.5) < 0.1);
        assert!(env.gain_at(0.45, 0.5) < env.gain_at(0.41, 0.5));
    }

    #[test]
    fn short_notes_skip_sustain() {
        let env = Envelope::default();
        let peak = env.gain_at(0.05, 0.2);
        assert!(peak > 0.9);
        assert!(env.gain_at(0.15, 0.2) < env.gain_at(0.1, 0.2) + f32::EPSILON);
    }

    #[test]
    fn note_length_matches_duration() {
        let synth = Synth::new(8_000);
        let clip = synth.render_note(Note::A, 0.5, NOTE_VOLUME);
        assert_eq!(clip.len(), 4_000);
        assert!(clip.iter().all(|s| s.abs() <= 1.0));
        assert!(clip.iter().any(|s| s.abs() > 0.05));
    }

    #[test]
    fn sequence_leaves_gaps_silent() {
        let synth = Synth::new(8_000);
        let clip = synth.render_sequence(&[Note::C, Note::G], 0.6, 0.2);
        assert_eq!(clip.len(), 8_000 * 14 / 10);
        let gap = &clip[4_800..6_400];
        assert!(gap.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn stingers_stay_in_range() {
        let synth = Synth::new(8_000);
        for clip in [
            synth.render_success(),
            synth.render_error(),
            synth.render_level_up(),
        ] {
            assert!(!clip.is_empty());
            assert!(clip.iter().all(|s| s.abs() <= 1.0));
        }
        assert_eq!(synth.render_error().len(), 2_400);
        assert_eq!(synth.render_level_up().len(), 8_000 * 15 / 10);
    }
}
