//! Theme palette selection.
//!
//! Every generation call draws a fresh palette of themes to include and
//! exclude. This forces thematic variety across calls and discourages
//! the model from repeating motifs.

use rand::seq::SliceRandom;
use rand::Rng;

/// Fixed catalog of themes the palette draws from.
pub const THEMES: [&str; 20] = [
    "revolution",
    "discovery",
    "conflict",
    "peace",
    "technology",
    "expansion",
    "innovation",
    "rebellion",
    "diplomacy",
    "catastrophe",
    "enlightenment",
    "migration",
    "invention",
    "decay",
    "mythology",
    "trade",
    "espionage",
    "cultural fusion",
    "revival",
    "ecology",
];

/// Themes to include and exclude in one generation prompt.
///
/// Invariants: `1 <= include.len() <= 3`,
/// `0 <= exclude.len() <= min(3, 20 - include.len())`, and the two sets
/// are disjoint. Never persisted; recomputed for every call.
#[derive(Debug, Clone)]
pub struct ThemePalette {
    pub include: Vec<&'static str>,
    pub exclude: Vec<&'static str>,
}

impl ThemePalette {
    /// Draw a palette uniformly without replacement from the catalog.
    pub fn draw(rng: &mut impl Rng) -> Self {
        let num_include = rng.gen_range(1..=3);
        let include: Vec<&'static str> =
            THEMES.choose_multiple(rng, num_include).copied().collect();

        let remaining: Vec<&'static str> = THEMES
            .iter()
            .copied()
            .filter(|t| !include.contains(t))
            .collect();

        // Cap exclusion by availability so we never over-draw.
        let num_exclude = rng.gen_range(0..=3.min(remaining.len()));
        let exclude: Vec<&'static str> = remaining
            .choose_multiple(rng, num_exclude)
            .copied()
            .collect();

        Self { include, exclude }
    }

    /// The include/exclude instruction attached to one prompt.
    pub fn instruction(&self) -> String {
        format!(
            "Include these themes {:?} and exclude these themes {:?}\n",
            self.include, self.exclude
        )
    }
}
