use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;

pub const MAX_SEQUENCE_LEN: usize = 7;
/// How long a wrong note lingers before the attempt is marked failed.
pub const FAILURE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Note {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Note {
    pub const ALL: [Note; 7] = [
        Note::C,
        Note::D,
        Note::E,
        Note::F,
        Note::G,
        Note::A,
        Note::B,
    ];

    /// Equal-tempered frequency in Hz, fourth octave.
    pub fn frequency(self) -> f32 {
        match self {
            Note::C => 261.63,
            Note::D => 293.66,
            Note::E => 329.63,
            Note::F => 349.23,
            Note::G => 392.00,
            Note::A => 440.00,
            Note::B => 493.88,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(Note::C),
            'D' => Some(Note::D),
            'E' => Some(Note::E),
            'F' => Some(Note::F),
            'G' => Some(Note::G),
            'A' => Some(Note::A),
            'B' => Some(Note::B),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Note::C => 'C',
            Note::D => 'D',
            Note::E => 'E',
            Note::F => 'F',
            Note::G => 'G',
            Note::A => 'A',
            Note::B => 'B',
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown note: {0:?}")]
pub struct UnknownNote(pub String);

impl FromStr for Note {
    type Err = UnknownNote;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Note::from_char(c).ok_or_else(|| UnknownNote(s.to_string())),
            _ => Err(UnknownNote(s.to_string())),
        }
    }
}

pub fn sequence_length(difficulty: u8) -> usize {
    (3 + difficulty as usize).min(MAX_SEQUENCE_LEN)
}

/// Random target melody for an order of the given difficulty, notes drawn with replacement.
pub fn generate_sequence<R: Rng>(difficulty: u8, rng: &mut R) -> Vec<Note> {
    (0..sequence_length(difficulty))
        .map(|_| Note::ALL[rng.gen_range(0..Note::ALL.len())])
        .collect()
}

pub fn format_sequence(notes: &[Note]) -> String {
    notes
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" → ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteVerdict {
    /// Matched the target so far; more notes expected.
    Correct,
    /// Matched the whole target.
    Completed,
    /// Mismatch; the attempt fails once the failure delay runs out.
    Wrong,
    /// No attempt is listening (inactive, or a failure is pending).
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success,
    Failure,
}

#[derive(Debug, Clone)]
pub struct TuningSession {
    target: Vec<Note>,
    played: Vec<Note>,
    failure_in: Option<Duration>,
}

impl TuningSession {
    pub fn new(target: Vec<Note>) -> Self {
        Self {
            target,
            played: Vec::new(),
            failure_in: None,
        }
    }

    pub fn target(&self) -> &[Note] {
        &self.target
    }

    pub fn played(&self) -> &[Note] {
        &self.played
    }

    pub fn failure_pending(&self) -> bool {
        self.failure_in.is_some()
    }

    pub fn is_listening(&self) -> bool {
        !self.failure_pending() && self.played.len() < self.target.len()
    }

    /// Fraction of the target matched so far.
    pub fn completion_ratio(&self) -> f64 {
        if self.target.is_empty() {
            return 0.0;
        }
        (self.played.len() as f64 / self.target.len() as f64).clamp(0.0, 1.0)
    }

    /// Compares `note` with the target at the next position.
    pub fn submit(&mut self, note: Note) -> NoteVerdict {
        if !self.is_listening() {
            return NoteVerdict::Ignored;
        }
        let idx = self.played.len();
        self.played.push(note);
        if self.target[idx] != note {
            self.failure_in = Some(FAILURE_DELAY);
            NoteVerdict::Wrong
        } else if self.played == self.target {
            NoteVerdict::Completed
        } else {
            NoteVerdict::Correct
        }
    }

    /// Runs the failure timer down. Returns `true` once it has expired.
    pub fn advance(&mut self, dt: Duration) -> bool {
        match self.failure_in.as_mut() {
            Some(remaining) => {
                *remaining = remaining.saturating_sub(dt);
                remaining.is_zero()
            }
            None => false,
        }
    }
}
