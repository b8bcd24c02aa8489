use serde::{Deserialize, Serialize};

/// Hand pose recognised in a single frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GestureClass {
    NoHand,
    Open,
    Fist,
    Ambiguous,
}

impl GestureClass {
    /// Color theme shown for this class. Ambiguous shapes get the same
    /// theme as an empty frame.
    pub fn theme(self) -> Theme {
        match self {
            GestureClass::NoHand | GestureClass::Ambiguous => Theme::NeonRed,
            GestureClass::Open => Theme::NeonGreen,
            GestureClass::Fist => Theme::NeonBlue,
        }
    }
}

/// Color theme identifier consumed by the frontend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    /// Before any frame has been processed.
    #[default]
    Default,
    NeonRed,
    NeonGreen,
    NeonBlue,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::NeonRed => "neon-red",
            Theme::NeonGreen => "neon-green",
            Theme::NeonBlue => "neon-blue",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw, unsmoothed per-frame reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureSample {
    pub class: GestureClass,
    pub raw_resolution: u32,
}
