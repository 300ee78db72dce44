// src/view/languages.rs
// =============================================================================
// Repository language breakdown.
//
// GitHub's languages endpoint returns bytes of code per language:
//
//   { "Rust": 80512, "Shell": 1200 }
//
// We turn that into percentages rounded to one decimal, largest first, and
// give every language a colour. Colours are random but stable: the palette
// remembers the colour it handed out for a name, so the same language looks
// the same in every repository card of a page.
// =============================================================================

use crate::github::types::Languages;
use rand::Rng;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn from_u24(value: u32) -> Self {
        Self {
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// One colour per language name for the lifetime of a page
#[derive(Debug, Default, Clone)]
pub struct LanguagePalette {
    colors: HashMap<String, Rgb>,
}

impl LanguagePalette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color_for(&mut self, language: &str) -> Rgb {
        *self
            .colors
            .entry(language.to_string())
            .or_insert_with(|| Rgb::from_u24(rand::rng().random_range(0..=0xFF_FFFF)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LanguageShare {
    pub name: String,
    /// Rounded to one decimal
    pub percent: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LanguageBreakdown {
    pub shares: Vec<LanguageShare>,
}

impl LanguageBreakdown {
    // Returns None when there's nothing to show (no languages, or 0 bytes)
    pub fn new(languages: &Languages, palette: &mut LanguagePalette) -> Option<Self> {
        let shares: Vec<LanguageShare> = percentages(languages)
            .into_iter()
            .map(|(name, percent)| LanguageShare {
                color: palette.color_for(&name),
                name,
                percent,
            })
            .collect();

        if shares.is_empty() {
            None
        } else {
            Some(Self { shares })
        }
    }

    // Languages worth a line in the list: the ones that don't round to 0.0%
    pub fn listed(&self) -> impl Iterator<Item = &LanguageShare> {
        self.shares.iter().filter(|s| s.percent > 0.0)
    }

    // How many of `width` bar cells each language gets
    pub fn bar_cells(&self, width: usize) -> Vec<(Rgb, usize)> {
        self.shares
            .iter()
            .map(|s| (s.color, ((s.percent / 100.0) * width as f64).round() as usize))
            .filter(|(_, cells)| *cells > 0)
            .collect()
    }
}

// Share of each language in percent, one decimal, largest first
//
// Ties are broken by name so the order doesn't depend on HashMap iteration
pub fn percentages(languages: &Languages) -> Vec<(String, f64)> {
    let total: u64 = languages.values().sum();
    if total == 0 {
        return Vec::new();
    }

    let mut entries: Vec<(&String, &u64)> = languages.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    entries
        .into_iter()
        .map(|(name, bytes)| {
            let percent = (*bytes as f64 / total as f64) * 100.0;
            (name.clone(), (percent * 10.0).round() / 10.0)
        })
        .collect()
}
