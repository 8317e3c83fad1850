use crate::utils::error::{MapError, Result};
use serde::{Deserialize, Serialize};

/// Canonical drive-time bands and their colors, fastest first.
pub const DEFAULT_BANDS: &[(u32, &str)] = &[
    (10, "green"),
    (20, "yellow"),
    (30, "orange"),
    (40, "red"),
    (50, "purple"),
    (60, "black"),
];

/// Upper bound on a band threshold: one day.
pub const MAX_BAND_MINUTES: u32 = 24 * 60;

/// One drive-time threshold paired with the color it is drawn in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandStyle {
    pub minutes: u32,
    pub color: String,
}

impl BandStyle {
    pub fn new(minutes: u32, color: impl Into<String>) -> Self {
        Self {
            minutes,
            color: color.into(),
        }
    }

    /// Routing services take ranges in seconds.
    pub fn seconds(&self) -> u32 {
        self.minutes * 60
    }
}

/// A legend row: `lower-upper` minutes and the band's color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandRange<'a> {
    pub lower: u32,
    pub upper: u32,
    pub color: &'a str,
}

/// Ordered, validated list of bands. Index `i` means "reachable within
/// `bands[i].minutes`", and minutes strictly increase with the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandScheme {
    bands: Vec<BandStyle>,
}

impl BandScheme {
    pub fn new(bands: Vec<BandStyle>) -> Result<Self> {
        if bands.is_empty() {
            return Err(MapError::ConfigurationInvariantViolation {
                message: "at least one drive-time band is required".to_string(),
            });
        }

        for (i, band) in bands.iter().enumerate() {
            if band.minutes == 0 {
                return Err(MapError::ConfigurationInvariantViolation {
                    message: format!("band {} has a zero-minute threshold", i),
                });
            }
            if band.minutes > MAX_BAND_MINUTES {
                return Err(MapError::ConfigurationInvariantViolation {
                    message: format!(
                        "band {} ({} min) exceeds the {} minute limit",
                        i, band.minutes, MAX_BAND_MINUTES
                    ),
                });
            }
            if band.color.trim().is_empty() {
                return Err(MapError::ConfigurationInvariantViolation {
                    message: format!("band {} ({} min) has no color", i, band.minutes),
                });
            }
        }

        if let Some(pair) = bands.windows(2).find(|w| w[0].minutes >= w[1].minutes) {
            return Err(MapError::ConfigurationInvariantViolation {
                message: format!(
                    "band minutes must strictly increase, found {} followed by {}",
                    pair[0].minutes, pair[1].minutes
                ),
            });
        }

        Ok(Self { bands })
    }

    /// Pair two parallel lists. Differing lengths are rejected outright;
    /// colors are never truncated or wrapped.
    pub fn from_parts<S: AsRef<str>>(minutes: &[u32], colors: &[S]) -> Result<Self> {
        if minutes.len() != colors.len() {
            return Err(MapError::ConfigurationInvariantViolation {
                message: format!(
                    "{} drive-time bands but {} colors",
                    minutes.len(),
                    colors.len()
                ),
            });
        }

        let bands = minutes
            .iter()
            .zip(colors)
            .map(|(m, c)| BandStyle::new(*m, c.as_ref()))
            .collect();
        Self::new(bands)
    }

    pub fn bands(&self) -> &[BandStyle] {
        &self.bands
    }

    pub fn get(&self, index: usize) -> Option<&BandStyle> {
        self.bands.get(index)
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    pub fn seconds(&self) -> Vec<u32> {
        self.bands.iter().map(BandStyle::seconds).collect()
    }

    pub fn ranges(&self) -> impl Iterator<Item = BandRange<'_>> {
        let lowers = std::iter::once(0).chain(self.bands.iter().map(|b| b.minutes));
        lowers.zip(&self.bands).map(|(lower, band)| BandRange {
            lower,
            upper: band.minutes,
            color: &band.color,
        })
    }
}

impl Default for BandScheme {
    fn default() -> Self {
        Self {
            bands: default_band_styles(),
        }
    }
}

pub fn default_band_styles() -> Vec<BandStyle> {
    DEFAULT_BANDS
        .iter()
        .map(|(minutes, color)| BandStyle::new(*minutes, *color))
        .collect()
}
