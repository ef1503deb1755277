//! Word-cloud images for stored word counts.

pub mod layout;

use anyhow::{anyhow, Context, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use layout::{layout, LayoutOptions, PlacedWord};
use rusttype::{Font, Scale};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use wordstat_core::{TermCounter, WordStat};

pub const DEFAULT_SIZE: u32 = 1000;
pub const DEFAULT_MAX_WORDS: usize = 200;

const BACKGROUND: Rgb<u8> = Rgb([0, 0, 0]);
const PALETTE: [Rgb<u8>; 8] = [
    Rgb([253, 231, 37]),
    Rgb([181, 222, 43]),
    Rgb([110, 206, 88]),
    Rgb([53, 183, 121]),
    Rgb([31, 158, 137]),
    Rgb([38, 130, 142]),
    Rgb([49, 104, 142]),
    Rgb([62, 73, 137]),
];

#[derive(Debug, Clone)]
pub struct CloudOptions {
    pub size: u32,
    pub max_words: usize,
    /// TrueType/OpenType font for the glyphs. Without one, words are drawn as tiles.
    pub font: Option<PathBuf>,
}

impl Default for CloudOptions {
    fn default() -> Self { Self { size: DEFAULT_SIZE, max_words: DEFAULT_MAX_WORDS, font: None } }
}

pub struct CloudRenderer {
    layout: LayoutOptions,
    font: Option<Font<'static>>,
}

impl CloudRenderer {
    pub fn new(options: &CloudOptions) -> Result<Self> {
        if options.size == 0 {
            return Err(anyhow!("image size must be positive"));
        }
        let font = match &options.font {
            Some(path) => {
                let data = fs::read(path).with_context(|| format!("read font {}", path.display()))?;
                let font = Font::try_from_vec(data).ok_or_else(|| anyhow!("unsupported font file {}", path.display()))?;
                Some(font)
            }
            None => {
                warn!("no font configured, drawing words as tiles");
                None
            }
        };
        let layout = LayoutOptions { max_words: options.max_words, ..LayoutOptions::for_size(options.size) };
        Ok(Self { layout, font })
    }

    fn measure(&self, text: &str, font_size: f32) -> (u32, u32) {
        match &self.font {
            Some(font) => {
                let (w, h) = text_size(Scale::uniform(font_size), font, text);
                (w.max(0) as u32, h.max(0) as u32)
            }
            None => ((text.chars().count() as f32 * font_size * 0.6).ceil() as u32, font_size.ceil() as u32),
        }
    }

    pub fn place(&self, counter: &TermCounter) -> Vec<PlacedWord> {
        let ranked = counter.ranked();
        layout(&ranked, &self.layout, |text, px| self.measure(text, px))
    }

    pub fn render(&self, counter: &TermCounter) -> RgbImage {
        let size = self.layout.size;
        let mut img = RgbImage::from_pixel(size, size, BACKGROUND);
        for word in self.place(counter) {
            let color = PALETTE[word.rank % PALETTE.len()];
            match &self.font {
                Some(font) => draw_text_mut(
                    &mut img,
                    color,
                    word.x as i32,
                    word.y as i32,
                    Scale::uniform(word.font_size),
                    font,
                    &word.text,
                ),
                None => draw_filled_rect_mut(
                    &mut img,
                    Rect::at(word.x as i32, word.y as i32).of_size(word.width.max(1), word.height.max(1)),
                    color,
                ),
            }
        }
        img
    }

    /// Writes one PNG per bucket of `stat` into `out_dir`, which is removed and
    /// recreated first. Returns the written paths in bucket order.
    pub fn render_all(&self, stat: &WordStat, out_dir: &Path) -> Result<Vec<PathBuf>> {
        reset_dir(out_dir)?;
        let total = stat.buckets().count();
        let mut written = Vec::with_capacity(total);
        for (i, (key, counter)) in stat.buckets().enumerate() {
            let path = out_dir.join(artifact_name(key));
            self.render(counter)
                .save(&path)
                .with_context(|| format!("write {}", path.display()))?;
            debug!(user = key, words = counter.len(), path = %path.display(), "cloud rendered");
            info!(done = i + 1, total, "rendering clouds");
            written.push(path);
        }
        Ok(written)
    }
}

/// File name for a bucket's image. Characters outside `[A-Za-z0-9_$-]` are
/// written as `%XX` per UTF-8 byte, so distinct keys never share a file.
pub fn artifact_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '_' | '$' | '-') {
            name.push(ch);
        } else {
            let mut buf = [0u8; 4];
            for b in ch.encode_utf8(&mut buf).bytes() {
                name.push_str(&format!("%{b:02X}"));
            }
        }
    }
    name.push_str(".png");
    name
}

fn reset_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        fs::remove_dir_all(dir).with_context(|| format!("clear {}", dir.display()))?;
    }
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_names_are_escaped() {
        assert_eq!(artifact_name("$0100ab"), "$0100ab.png");
        assert_eq!(artifact_name("all"), "all.png");
        assert_eq!(artifact_name("a/b"), "a%2Fb.png");
        assert_eq!(artifact_name("a.b"), "a%2Eb.png");
        assert_eq!(artifact_name("я"), "%D1%8F.png");
    }

    #[test]
    fn tiles_are_drawn_without_font() {
        let renderer = CloudRenderer::new(&CloudOptions { size: 120, ..CloudOptions::default() }).unwrap();
        let counter: TermCounter = [("cat", 3), ("dog", 1)].into_iter().collect();
        let img = renderer.render(&counter);
        assert_eq!(img.dimensions(), (120, 120));
        assert!(img.pixels().any(|p| *p != BACKGROUND));
    }

    #[test]
    fn empty_counter_gives_blank_image() {
        let renderer = CloudRenderer::new(&CloudOptions { size: 64, ..CloudOptions::default() }).unwrap();
        let img = renderer.render(&TermCounter::new());
        assert!(img.pixels().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn missing_font_file_is_an_error() {
        let opts = CloudOptions { font: Some(PathBuf::from("/definitely/not/here.ttf")), ..CloudOptions::default() };
        assert!(CloudRenderer::new(&opts).is_err());
    }
}
