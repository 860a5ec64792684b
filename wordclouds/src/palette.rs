//! Party colors.
//!
//! Each party owns a fixed hue and saturation; only the lightness varies from
//! word to word, sampled inside the party's range.

use crate::error::{Error, Result};
use image::Rgb;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl Hsl {
    pub fn new(hue: u16, saturation: u8, lightness: u8) -> Self {
        Hsl {
            hue,
            saturation,
            lightness,
        }
    }

    pub fn to_rgb(&self) -> Rgb<u8> {
        let h = (self.hue % 360) as f64 / 360.0;
        let s = self.saturation.min(100) as f64 / 100.0;
        let l = self.lightness.min(100) as f64 / 100.0;

        if s == 0.0 {
            let v = (l * 255.0).round() as u8;
            return Rgb([v, v, v]);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let channel = |t: f64| {
            let t = t.rem_euclid(1.0);
            let v = if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * (2.0 / 3.0 - t) * 6.0
            } else {
                p
            };
            (v * 255.0).round() as u8
        };

        Rgb([channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0)])
    }
}

impl std::fmt::Display for Hsl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.hue, self.saturation, self.lightness)
    }
}

/// Lightness is drawn from `lightness_min..lightness_max` (upper bound excluded)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub hue: u16,
    pub saturation: u8,
    pub lightness_min: u8,
    pub lightness_max: u8,
}

impl Palette {
    pub fn new(hue: u16, saturation: u8, lightness_min: u8, lightness_max: u8) -> Result<Self> {
        let palette = Palette {
            hue,
            saturation,
            lightness_min,
            lightness_max,
        };
        palette.validate()?;
        Ok(palette)
    }

    pub fn validate(&self) -> Result<()> {
        if self.lightness_min >= self.lightness_max || self.lightness_max > 100 {
            return Err(Error::InvalidLightness {
                min: self.lightness_min,
                max: self.lightness_max,
            });
        }
        Ok(())
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Hsl {
        let lightness = rng.gen_range(self.lightness_min..self.lightness_max);
        Hsl::new(self.hue, self.saturation, lightness)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    pub palette: Palette,
}

/// Known parties in processing order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyRegistry {
    parties: Vec<Party>,
}

impl Default for PartyRegistry {
    /// The parties of the 2021 Hessian Bundestag campaign
    fn default() -> Self {
        let party = |name: &str, hue, saturation, min, max| Party {
            name: name.to_string(),
            palette: Palette {
                hue,
                saturation,
                lightness_min: min,
                lightness_max: max,
            },
        };
        PartyRegistry {
            parties: vec![
                party("CDU", 0, 0, 0, 50),
                party("SPD", 1, 76, 50, 100),
                party("AfD", 215, 51, 40, 100),
                party("FDP", 48, 100, 70, 100),
                party("DIE LINKE", 331, 59, 60, 100),
                party("GRÜNE", 85, 75, 40, 100),
                party("Volt", 217, 0, 25, 70),
                party("TNT", 217, 0, 25, 70),
            ],
        }
    }
}

impl PartyRegistry {
    pub fn new(parties: Vec<Party>) -> Result<Self> {
        for party in &parties {
            party.palette.validate()?;
        }
        Ok(PartyRegistry { parties })
    }

    pub fn parties(&self) -> &[Party] {
        &self.parties
    }

    pub fn get(&self, name: &str) -> Result<&Party> {
        self.parties
            .iter()
            .find(|party| party.name == name)
            .ok_or_else(|| Error::UnknownParty(name.to_string()))
    }

    pub fn palette(&self, name: &str) -> Result<Palette> {
        self.get(name).map(|party| party.palette)
    }

    /// Sample a word color for `name`
    pub fn color_for<R: Rng + ?Sized>(&self, name: &str, rng: &mut R) -> Result<Hsl> {
        Ok(self.palette(name)?.sample(rng))
    }

    /// Keep only the named parties, in the order given
    pub fn select(&self, names: &[String]) -> Result<Self> {
        let parties = names
            .iter()
            .map(|name| self.get(name).cloned())
            .collect::<Result<Vec<_>>>()?;
        Ok(PartyRegistry { parties })
    }
}
