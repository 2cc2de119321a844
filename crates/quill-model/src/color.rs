//! Cosmetic story colors.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Display color assigned to a story
///
/// Purely cosmetic; the store accepts exactly this fixed palette as
/// lowercase strings on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryColor {
    Green,
    Blue,
    Black,
    Brown,
}

impl StoryColor {
    /// The fixed palette, in wire order
    pub const PALETTE: [StoryColor; 4] = [
        StoryColor::Green,
        StoryColor::Blue,
        StoryColor::Black,
        StoryColor::Brown,
    ];

    /// Pick a color uniformly at random from the palette
    #[must_use]
    pub fn random() -> Self {
        let idx = rand::rng().random_range(0..Self::PALETTE.len());
        Self::PALETTE[idx]
    }

    /// Wire representation
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            StoryColor::Green => "green",
            StoryColor::Blue => "blue",
            StoryColor::Black => "black",
            StoryColor::Brown => "brown",
        }
    }
}

impl std::fmt::Display for StoryColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
