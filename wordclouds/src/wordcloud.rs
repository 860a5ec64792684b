//! Word cloud layout and rendering.
//!
//! Glyphs come from the embedded 8x8 bitmap font, scaled by whole pixels, so
//! rendering needs no font files. Font size is therefore always a multiple of
//! eight pixels and is handled as an integer `scale`.

use crate::error::{Error, Result};
use crate::palette::Palette;
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{Rgb, RgbImage};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

const GLYPH: u32 = 8;
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WordCloudConfig {
    pub width: u32,
    pub height: u32,
    pub background: [u8; 3],
    /// Scale of the heaviest word before it is shrunk to fit
    pub max_scale: u32,
    pub min_scale: u32,
    /// Blend between rank-only (0.0) and weight-proportional (1.0) sizing
    pub relative_scaling: f64,
    /// Chance that a word is laid out horizontally
    pub prefer_horizontal: f64,
    /// Free pixels kept around every word
    pub margin: u32,
    /// Height reserved at the top for the title
    pub title_band: u32,
    pub title_scale: u32,
}

impl Default for WordCloudConfig {
    fn default() -> Self {
        WordCloudConfig {
            width: 1280,
            height: 720,
            background: [255, 255, 255],
            max_scale: 12,
            min_scale: 1,
            relative_scaling: 0.5,
            prefer_horizontal: 0.9,
            margin: 4,
            title_band: 64,
            title_scale: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub text: String,
    pub weight: f64,
    pub scale: u32,
    pub x: u32,
    pub y: u32,
    pub vertical: bool,
    pub color: Rgb<u8>,
}

impl PlacedWord {
    pub fn font_size(&self) -> u32 {
        self.scale * GLYPH
    }

    /// Bounding box as `(width, height)`
    pub fn extent(&self) -> (u32, u32) {
        text_extent(&self.text, self.scale, self.vertical)
    }
}

fn text_extent(text: &str, scale: u32, vertical: bool) -> (u32, u32) {
    let along = text.chars().count() as u32 * GLYPH * scale;
    let across = GLYPH * scale;
    if vertical {
        (across, along)
    } else {
        (along, across)
    }
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Summed-area table over the occupied pixels of the canvas
struct Occupancy {
    width: usize,
    height: usize,
    filled: Vec<bool>,
    integral: Vec<u32>,
}

impl Occupancy {
    fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width as usize, height as usize);
        Occupancy {
            width,
            height,
            filled: vec![false; width * height],
            integral: vec![0; (width + 1) * (height + 1)],
        }
    }

    /// Whether the rectangle is inside the canvas and untouched
    fn is_free(&self, x: i64, y: i64, w: u32, h: u32) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let (x, y, w, h) = (x as usize, y as usize, w as usize, h as usize);
        if x + w > self.width || y + h > self.height {
            return false;
        }
        let stride = self.width + 1;
        let at = |x: usize, y: usize| self.integral[y * stride + x] as i64;
        at(x + w, y + h) - at(x, y + h) - at(x + w, y) + at(x, y) == 0
    }

    fn fill(&mut self, x: u32, y: u32, w: u32, h: u32) {
        let x_end = (x + w).min(self.width as u32) as usize;
        let y_end = (y + h).min(self.height as u32) as usize;
        for row in y as usize..y_end {
            for col in x as usize..x_end {
                self.filled[row * self.width + col] = true;
            }
        }
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let stride = self.width + 1;
        for y in 0..self.height {
            let mut row_sum = 0;
            for x in 0..self.width {
                row_sum += self.filled[y * self.width + x] as u32;
                self.integral[(y + 1) * stride + x + 1] = self.integral[y * stride + x + 1] + row_sum;
            }
        }
    }
}

pub struct WordCloud {
    config: WordCloudConfig,
    words: Vec<PlacedWord>,
}

impl WordCloud {
    pub fn new(config: WordCloudConfig) -> Self {
        WordCloud {
            config,
            words: Vec::new(),
        }
    }

    pub fn config(&self) -> &WordCloudConfig {
        &self.config
    }

    pub fn words(&self) -> &[PlacedWord] {
        &self.words
    }

    /// Lay out `frequencies`, heaviest word first. Words that cannot be placed
    /// even at the minimum scale are left out.
    pub fn fit_words<R: Rng + ?Sized>(&mut self, frequencies: &[(String, f64)], rng: &mut R) -> &mut Self {
        let mut words: Vec<(String, f64)> = frequencies
            .iter()
            .filter(|(word, weight)| !word.trim().is_empty() && weight.is_finite() && *weight > 0.0)
            .cloned()
            .collect();
        words.sort_by(|a, b| b.1.total_cmp(&a.1));
        self.words.clear();

        let Some(max_weight) = words.first().map(|(_, w)| *w) else {
            return self;
        };

        let cfg = &self.config;
        let area_top = cfg.title_band.min(cfg.height);
        let area_height = cfg.height - area_top;
        let mut occupancy = Occupancy::new(cfg.width, cfg.height);
        if area_top > 0 {
            occupancy.fill(0, 0, cfg.width, area_top);
        }

        let center_x = cfg.width as f64 / 2.0;
        let center_y = area_top as f64 + area_height as f64 / 2.0;
        let aspect = cfg.width as f64 / area_height.max(1) as f64;
        let min_scale = cfg.min_scale.max(1);

        let mut last_scale = cfg.max_scale.max(min_scale);
        for (text, weight) in words {
            let relative = weight / max_weight;
            let target = cfg.max_scale as f64
                * (cfg.relative_scaling * relative + (1.0 - cfg.relative_scaling));
            let mut scale = (target.round() as u32).clamp(min_scale, last_scale);
            let vertical = rng.gen::<f64>() >= cfg.prefer_horizontal;

            let placed = loop {
                let (w, h) = text_extent(&text, scale, vertical);
                let (pw, ph) = (w + 2 * cfg.margin, h + 2 * cfg.margin);
                if let Some((x, y)) = spiral_search(&occupancy, center_x, center_y, aspect, pw, ph, cfg) {
                    occupancy.fill(x, y, pw, ph);
                    break Some((x + cfg.margin, y + cfg.margin));
                }
                if scale <= min_scale {
                    break None;
                }
                scale -= 1;
            };

            match placed {
                Some((x, y)) => {
                    last_scale = scale;
                    self.words.push(PlacedWord {
                        text,
                        weight,
                        scale,
                        x,
                        y,
                        vertical,
                        color: BLACK,
                    });
                }
                None => tracing::debug!(word = %text, "no room left in word cloud"),
            }
        }
        self
    }

    /// Give every placed word a freshly sampled color from `palette`
    pub fn recolor<R: Rng + ?Sized>(&mut self, palette: &Palette, rng: &mut R) -> &mut Self {
        for word in &mut self.words {
            let hsl = palette.sample(rng);
            tracing::trace!(word = %word.text, color = %hsl, "recolor");
            word.color = hsl.to_rgb();
        }
        self
    }

    pub fn to_image(&self, title: Option<&str>) -> RgbImage {
        let cfg = &self.config;
        let mut image = RgbImage::from_pixel(cfg.width, cfg.height, Rgb(cfg.background));

        if let Some(title) = title {
            let scale = cfg.title_scale.max(1);
            let (w, h) = text_extent(title, scale, false);
            let x = cfg.width.saturating_sub(w) / 2;
            let y = cfg.title_band.saturating_sub(h) / 2;
            draw_text(&mut image, title, x, y, scale, false, BLACK);
        }

        for word in &self.words {
            draw_text(&mut image, &word.text, word.x, word.y, word.scale, word.vertical, word.color);
        }
        image
    }

    pub fn save(&self, title: Option<&str>, path: &Path) -> Result<()> {
        self.to_image(title).save(path).map_err(|source| Error::Image {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn spiral_search(
    occupancy: &Occupancy,
    center_x: f64,
    center_y: f64,
    aspect: f64,
    w: u32,
    h: u32,
    cfg: &WordCloudConfig,
) -> Option<(u32, u32)> {
    let reach = cfg.width.max(cfg.height) as f64;
    let mut t: f64 = 0.0;
    loop {
        let dx = aspect * t * t.cos();
        let dy = t * t.sin();
        if dx.abs() > reach && dy.abs() > reach {
            return None;
        }
        let x = (center_x + dx - w as f64 / 2.0).round() as i64;
        let y = (center_y + dy - h as f64 / 2.0).round() as i64;
        if occupancy.is_free(x, y, w, h) {
            return Some((x as u32, y as u32));
        }
        t += 0.1;
    }
}

/// Vertical text is rotated a quarter turn counter-clockwise and reads bottom
/// to top.
fn draw_text(image: &mut RgbImage, text: &str, x: u32, y: u32, scale: u32, vertical: bool, color: Rgb<u8>) {
    let run = text.chars().count() as u32 * GLYPH * scale;
    let (width, height) = image.dimensions();
    let mut plot = |u: u32, v: u32| {
        let (px, py) = if vertical {
            (x + v, y + run - 1 - u)
        } else {
            (x + u, y + v)
        };
        if px < width && py < height {
            image.put_pixel(px, py, color);
        }
    };

    for (i, c) in text.chars().enumerate() {
        let origin = i as u32 * GLYPH * scale;
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..GLYPH {
                if bits & (1 << col) == 0 {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        plot(origin + col * scale + sx, row as u32 * scale + sy);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Hsl;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn topic_words() -> Vec<(String, f64)> {
        [
            ("KLIMASCHUTZ", 0.21),
            ("ZUKUNFT", 0.14),
            ("FAMILIE", 0.11),
            ("ARBEIT", 0.08),
            ("BILDUNG", 0.07),
            ("HESSEN", 0.05),
            ("RENTE", 0.04),
            ("PFLEGE", 0.03),
            ("DIGITAL", 0.02),
            ("EUROPA", 0.01),
        ]
        .iter()
        .map(|(w, p)| (w.to_string(), *p))
        .collect()
    }

    fn overlaps(a: &PlacedWord, b: &PlacedWord) -> bool {
        let (aw, ah) = a.extent();
        let (bw, bh) = b.extent();
        a.x < b.x + bw && b.x < a.x + aw && a.y < b.y + bh && b.y < a.y + ah
    }

    #[test]
    fn test_layout_fits_all_words_without_overlap() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut cloud = WordCloud::new(WordCloudConfig::default());
        cloud.fit_words(&topic_words(), &mut rng);

        let words = cloud.words();
        assert_eq!(words.len(), 10);
        for (i, a) in words.iter().enumerate() {
            let (w, h) = a.extent();
            assert!(a.x + w <= 1280 && a.y + h <= 720);
            assert!(a.y >= cloud.config().title_band);
            for b in &words[i + 1..] {
                assert!(!overlaps(a, b), "{} overlaps {}", a.text, b.text);
            }
        }
    }

    #[test]
    fn test_heavier_words_are_not_smaller() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut cloud = WordCloud::new(WordCloudConfig::default());
        cloud.fit_words(&topic_words(), &mut rng);

        let words = cloud.words();
        assert_eq!(words[0].text, "KLIMASCHUTZ");
        assert!(words.windows(2).all(|w| w[0].scale >= w[1].scale));
        assert!(words[0].font_size() > words[9].font_size());
    }

    #[test]
    fn test_ignores_empty_and_non_positive_weights() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut cloud = WordCloud::new(WordCloudConfig::default());
        let words = vec![
            ("SCHULE".to_string(), 0.0),
            ("  ".to_string(), 0.5),
            ("KITA".to_string(), f64::NAN),
        ];
        cloud.fit_words(&words, &mut rng);
        assert!(cloud.words().is_empty());
    }

    #[test]
    fn test_words_are_dropped_when_canvas_is_full() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = WordCloudConfig {
            width: 64,
            height: 24,
            title_band: 0,
            margin: 0,
            prefer_horizontal: 1.0,
            ..Default::default()
        };
        let mut cloud = WordCloud::new(config);
        let words = vec![("ABCDEFGH".to_string(), 1.0), ("IJKLMNOP".to_string(), 0.9)];
        cloud.fit_words(&words, &mut rng);

        assert_eq!(cloud.words().len(), 1);
        assert_eq!(cloud.words()[0].scale, 1);
    }

    #[test]
    fn test_recolor_uses_palette() {
        let mut rng = StdRng::seed_from_u64(4);
        let palette = Palette::new(48, 100, 70, 100).unwrap();
        let allowed: Vec<Rgb<u8>> = (70..100).map(|l| Hsl::new(48, 100, l).to_rgb()).collect();

        let mut cloud = WordCloud::new(WordCloudConfig::default());
        cloud.fit_words(&topic_words(), &mut rng).recolor(&palette, &mut rng);

        assert!(cloud.words().iter().all(|w| allowed.contains(&w.color)));
    }

    #[test]
    fn test_render_and_save_png() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut cloud = WordCloud::new(WordCloudConfig::default());
        cloud.fit_words(&topic_words(), &mut rng);

        let image = cloud.to_image(Some("GRÜNE Wortwolke #1"));
        assert_eq!(image.dimensions(), (1280, 720));
        assert_eq!(*image.get_pixel(0, 719), Rgb([255, 255, 255]));
        assert!(image.pixels().any(|p| *p == BLACK));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("GRÜNE_facebook0.png");
        cloud.save(Some("GRÜNE Wortwolke #1"), &path).unwrap();
        let reloaded = image::open(&path).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (1280, 720));
    }

    #[test]
    fn test_vertical_text_is_rotated() {
        let mut image = RgbImage::from_pixel(16, 16, Rgb([255, 255, 255]));
        draw_text(&mut image, "I", 0, 0, 1, true, BLACK);
        let (w, h) = text_extent("I", 1, true);
        assert_eq!((w, h), (8, 8));
        assert!(image.pixels().any(|p| *p == BLACK));
        assert!((8..16).all(|x| (0..16).all(|y| *image.get_pixel(x, y) != BLACK)));
    }
}
