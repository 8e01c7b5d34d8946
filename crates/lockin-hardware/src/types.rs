//! LED colours, tones and the signal-to-pattern table.

use lockin_core::Signal;
use serde::{Deserialize, Serialize};

/// Buzzer frequency for confirmations, in hertz.
pub const TONE_SUCCESS_HZ: u16 = 2_000;

/// Buzzer frequency for errors, in hertz.
pub const TONE_ERROR_HZ: u16 = 400;

/// Buzzer frequency for warnings, in hertz.
pub const TONE_WARNING_HZ: u16 = 1_000;

/// Base beep length in milliseconds.
pub const BEEP_MS: u16 = 100;

/// Number of error beeps in the lockout pattern.
pub const LOCKOUT_BEEPS: usize = 5;

/// Indicator LED colour. `Off` leaves the LED dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum LedColor {
    Off,
    Red,
    Green,
    Blue,
    Yellow,
    Magenta,
}

impl LedColor {
    /// 8-bit RGB drive levels for the tri-colour LED.
    pub fn as_rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Off => (0, 0, 0),
            Self::Red => (255, 0, 0),
            Self::Green => (0, 255, 0),
            Self::Blue => (0, 0, 255),
            Self::Yellow => (255, 255, 0),
            Self::Magenta => (128, 0, 128),
        }
    }
}

/// A single buzzer beep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tone {
    pub frequency_hz: u16,
    pub duration_ms: u16,
}

impl Tone {
    pub const fn new(frequency_hz: u16, duration_ms: u16) -> Self {
        Self {
            frequency_hz,
            duration_ms,
        }
    }
}

/// What the LED and buzzer do for a given signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorPattern {
    /// Steady LED colour after the pattern plays.
    pub color: LedColor,

    /// Beeps played in order.
    pub tones: Vec<Tone>,

    /// Silence between consecutive beeps, in milliseconds.
    pub gap_ms: u16,
}

impl IndicatorPattern {
    /// Look up the pattern for a signal.
    ///
    /// Rejected, locked-out and offline outcomes each get a distinct
    /// pattern so a person at the door can tell them apart.
    pub fn for_signal(signal: Signal) -> Self {
        let success = Tone::new(TONE_SUCCESS_HZ, BEEP_MS);
        let error = Tone::new(TONE_ERROR_HZ, BEEP_MS * 2);
        let warning = Tone::new(TONE_WARNING_HZ, BEEP_MS);

        match signal {
            Signal::Locked => Self {
                color: LedColor::Red,
                tones: Vec::new(),
                gap_ms: 0,
            },
            Signal::Unlocked => Self {
                color: LedColor::Green,
                tones: vec![success, success],
                gap_ms: 50,
            },
            Signal::Error => Self {
                color: LedColor::Red,
                tones: vec![error],
                gap_ms: 0,
            },
            Signal::Lockout => Self {
                color: LedColor::Red,
                tones: vec![error; LOCKOUT_BEEPS],
                gap_ms: 200,
            },
            Signal::Warning => Self {
                color: LedColor::Yellow,
                tones: vec![warning, warning],
                gap_ms: 100,
            },
            Signal::Pairing => Self {
                color: LedColor::Magenta,
                tones: vec![warning],
                gap_ms: 0,
            },
        }
    }

    /// Total time the pattern takes to play, in milliseconds.
    pub fn duration_ms(&self) -> u32 {
        let beeps: u32 = self.tones.iter().map(|t| u32::from(t.duration_ms)).sum();
        let gaps = self.tones.len().saturating_sub(1) as u32 * u32::from(self.gap_ms);
        beeps + gaps
    }
}
