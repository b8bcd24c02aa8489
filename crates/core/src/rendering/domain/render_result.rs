use serde::{Deserialize, Serialize};

use crate::gesture::domain::gesture::Theme;

/// What one processed frame produces for the frontend.
///
/// Serialises as `{"ascii": [...], "theme": "...", "resolution": n}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderResult {
    #[serde(rename = "ascii")]
    pub character_grid: Vec<String>,
    pub theme: Theme,
    /// Grid width in characters.
    pub resolution: u32,
}

impl RenderResult {
    pub fn rows(&self) -> usize {
        self.character_grid.len()
    }

    pub fn columns(&self) -> usize {
        self.character_grid
            .first()
            .map_or(0, |line| line.chars().count())
    }
}
