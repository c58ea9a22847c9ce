//! Fixed display-color palette and color selection policies.
//!
//! Colors serialize as the UI's utility-class tokens (`bg-blue-500`), so
//! snapshots stay readable by the web frontend.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// One entry of the display palette.
///
/// `Gray` is the neutral fallback for unassigned or dangling group
/// references and is never handed out by a [`ColorPicker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum PaletteColor {
    Red,
    Orange,
    Amber,
    Green,
    Teal,
    Blue,
    Indigo,
    Purple,
    Pink,
    Gray,
}

/// Colors eligible for avatars and new groups.
pub const PALETTE: [PaletteColor; 9] = [
    PaletteColor::Red,
    PaletteColor::Orange,
    PaletteColor::Amber,
    PaletteColor::Green,
    PaletteColor::Teal,
    PaletteColor::Blue,
    PaletteColor::Indigo,
    PaletteColor::Purple,
    PaletteColor::Pink,
];

impl PaletteColor {
    pub fn token(self) -> &'static str {
        match self {
            Self::Red => "bg-red-500",
            Self::Orange => "bg-orange-500",
            Self::Amber => "bg-amber-500",
            Self::Green => "bg-green-500",
            Self::Teal => "bg-teal-500",
            Self::Blue => "bg-blue-500",
            Self::Indigo => "bg-indigo-500",
            Self::Purple => "bg-purple-500",
            Self::Pink => "bg-pink-500",
            Self::Gray => "bg-gray-400",
        }
    }

    /// Parses a stored token. Unknown tokens map to `Gray` so one odd value
    /// cannot invalidate a whole snapshot.
    pub fn from_token(token: &str) -> Self {
        PALETTE
            .iter()
            .copied()
            .find(|color| color.token() == token)
            .unwrap_or(Self::Gray)
    }
}

impl From<String> for PaletteColor {
    fn from(value: String) -> Self {
        Self::from_token(value.as_str())
    }
}

impl From<PaletteColor> for &'static str {
    fn from(value: PaletteColor) -> Self {
        value.token()
    }
}

/// Source of colors for newly created contacts and groups.
pub trait ColorPicker {
    fn next_color(&mut self) -> PaletteColor;
}

/// Uniform random selection over [`PALETTE`].
pub struct RandomColorPicker {
    rng: StdRng,
}

impl RandomColorPicker {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence for tests and demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomColorPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorPicker for RandomColorPicker {
    fn next_color(&mut self) -> PaletteColor {
        PALETTE[self.rng.random_range(0..PALETTE.len())]
    }
}

/// Cycles through [`PALETTE`] in declaration order.
#[derive(Debug, Default)]
pub struct RoundRobinColorPicker {
    cursor: usize,
}

impl ColorPicker for RoundRobinColorPicker {
    fn next_color(&mut self) -> PaletteColor {
        let color = PALETTE[self.cursor % PALETTE.len()];
        self.cursor = self.cursor.wrapping_add(1);
        color
    }
}
