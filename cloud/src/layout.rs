//! Word placement on a square canvas.
//!
//! Words are taken in rank order and sized relative to the most frequent word.
//! A word never gets a larger font than the word placed before it; when it
//! does not fit, its font shrinks until it does or the minimum is reached.
//! Space already used is tracked on a grid of `CELL`-pixel cells, with a
//! summed-area table so any rectangle is checked in constant time. Each word
//! goes to the free position closest to the canvas centre.

const CELL: u32 = 4;
/// Upper bound on the ratio between consecutive font sizes tried for a word.
const SHRINK: f32 = 0.9;

#[derive(Debug, Clone)]
pub struct LayoutOptions {
    pub size: u32,
    pub max_words: usize,
    pub max_font: f32,
    pub min_font: f32,
    /// Smallest decrement between two font sizes tried for one word.
    pub font_step: f32,
    /// Weight of the frequency ratio in the font size, 0.0..=1.0.
    pub relative_scaling: f32,
}

impl LayoutOptions {
    pub fn for_size(size: u32) -> Self {
        Self {
            size,
            max_words: 200,
            max_font: size as f32 * 0.2,
            min_font: 4.0,
            font_step: 2.0,
            relative_scaling: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub text: String,
    pub font_size: f32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in the frequency ranking, 0 for the most frequent word.
    pub rank: usize,
}

struct Occupancy {
    size: u32,
    cols: u32,
    rows: u32,
    cells: Vec<bool>,
    /// `(rows + 1) x (cols + 1)` prefix sums of `cells`.
    sums: Vec<u32>,
}

impl Occupancy {
    fn new(size: u32) -> Self {
        let cols = size.div_ceil(CELL);
        let sums = vec![0; ((cols + 1) * (cols + 1)) as usize];
        Self { size, cols, rows: cols, cells: vec![false; (cols * cols) as usize], sums }
    }

    fn sum_at(&self, r: u32, c: u32) -> u32 { self.sums[(r * (self.cols + 1) + c) as usize] }

    /// Used cells in rows `r0..r1`, columns `c0..c1`.
    fn used(&self, c0: u32, r0: u32, c1: u32, r1: u32) -> u32 {
        self.sum_at(r1, c1) + self.sum_at(r0, c0) - self.sum_at(r0, c1) - self.sum_at(r1, c0)
    }

    fn mark(&mut self, x: u32, y: u32, w: u32, h: u32) {
        let c1 = (x + w).div_ceil(CELL).min(self.cols);
        let r1 = (y + h).div_ceil(CELL).min(self.rows);
        for r in y / CELL..r1 {
            for c in x / CELL..c1 {
                self.cells[(r * self.cols + c) as usize] = true;
            }
        }
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let stride = (self.cols + 1) as usize;
        for r in 0..self.rows as usize {
            let mut row = 0u32;
            for c in 0..self.cols as usize {
                row += self.cells[r * self.cols as usize + c] as u32;
                self.sums[(r + 1) * stride + c + 1] = self.sums[r * stride + c + 1] + row;
            }
        }
    }

    /// Top-left corner of the free `w` x `h` pixel box whose centre is nearest
    /// the canvas centre. Ties go to the first position in row-major order.
    fn find_spot(&self, w: u32, h: u32) -> Option<(u32, u32)> {
        if w == 0 || h == 0 || w > self.size || h > self.size {
            return None;
        }
        let wc = w.div_ceil(CELL);
        let hc = h.div_ceil(CELL);
        let centre = self.size as i64;
        let mut best: Option<(i64, u32, u32)> = None;
        for r in 0..=self.rows.saturating_sub(hc) {
            let y = r * CELL;
            if y + h > self.size {
                break;
            }
            for c in 0..=self.cols.saturating_sub(wc) {
                let x = c * CELL;
                if x + w > self.size {
                    break;
                }
                if self.used(c, r, c + wc, r + hc) != 0 {
                    continue;
                }
                // doubled coordinates keep the distance integral
                let dx = (2 * x + w) as i64 - centre;
                let dy = (2 * y + h) as i64 - centre;
                let d = dx * dx + dy * dy;
                if best.map_or(true, |(bd, _, _)| d < bd) {
                    best = Some((d, x, y));
                }
            }
        }
        best.map(|(_, x, y)| (x, y))
    }
}

/// Font size for a word with `count` occurrences when the top word has `max_count`.
pub fn font_size_for(count: u64, max_count: u64, opts: &LayoutOptions) -> f32 {
    if max_count == 0 {
        return opts.min_font;
    }
    let ratio = count as f32 / max_count as f32;
    let rs = opts.relative_scaling.clamp(0.0, 1.0);
    (opts.max_font * (rs * ratio + (1.0 - rs))).max(opts.min_font)
}

/// Places `words` (already ranked, most frequent first). `measure` returns the
/// pixel box of a word at a font size. Words that fit nowhere even at the
/// minimum font size are left out.
pub fn layout<M>(words: &[(&str, u64)], opts: &LayoutOptions, measure: M) -> Vec<PlacedWord>
where
    M: Fn(&str, f32) -> (u32, u32),
{
    let mut grid = Occupancy::new(opts.size);
    let mut placed = Vec::new();
    let max_count = words.first().map(|(_, n)| *n).unwrap_or(0);
    let mut ceiling = opts.max_font.max(opts.min_font);
    for (rank, (text, count)) in words.iter().take(opts.max_words).enumerate() {
        let mut font_size = font_size_for(*count, max_count, opts).min(ceiling);
        loop {
            let (w, h) = measure(text, font_size);
            let (w, h) = (w.max(1), h.max(1));
            if let Some((x, y)) = grid.find_spot(w, h) {
                grid.mark(x, y, w, h);
                placed.push(PlacedWord { text: text.to_string(), font_size, x, y, width: w, height: h, rank });
                ceiling = font_size;
                break;
            }
            if font_size <= opts.min_font {
                break;
            }
            font_size = (font_size - opts.font_step).min(font_size * SHRINK).max(opts.min_font);
        }
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxes(text: &str, px: f32) -> (u32, u32) { ((text.chars().count() as f32 * px * 0.6) as u32, px as u32) }

    fn overlaps(a: &PlacedWord, b: &PlacedWord) -> bool {
        a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
    }

    #[test]
    fn top_word_gets_max_font_and_centre() {
        let opts = LayoutOptions::for_size(200);
        let placed = layout(&[("cat", 10), ("dog", 5)], &opts, boxes);
        assert_eq!(placed[0].font_size, opts.max_font);
        assert_eq!(font_size_for(5, 10, &opts), opts.max_font * 0.75);
        let mid_x = placed[0].x + placed[0].width / 2;
        assert!((mid_x as i64 - 100).abs() <= 2);
    }

    #[test]
    fn placed_words_do_not_overlap() {
        let opts = LayoutOptions::for_size(300);
        let words: Vec<(String, u64)> = (0..60).map(|i| (format!("word{i}"), 100 - i as u64)).collect();
        let refs: Vec<(&str, u64)> = words.iter().map(|(w, n)| (w.as_str(), *n)).collect();
        let placed = layout(&refs, &opts, boxes);
        assert!(!placed.is_empty());
        for (i, a) in placed.iter().enumerate() {
            assert!(a.x + a.width <= 300 && a.y + a.height <= 300);
            for b in &placed[i + 1..] {
                assert!(!overlaps(a, b), "{} overlaps {}", a.text, b.text);
            }
        }
    }

    #[test]
    fn oversized_word_is_dropped() {
        let opts = LayoutOptions { min_font: 40.0, ..LayoutOptions::for_size(50) };
        let placed = layout(&[("extraordinarily", 1)], &opts, boxes);
        assert!(placed.is_empty());
    }

    #[test]
    fn later_words_never_get_a_larger_font() {
        let opts = LayoutOptions::for_size(240);
        let words: Vec<(String, u64)> = (0..40).map(|i| (format!("term{i}"), 40 - i as u64)).collect();
        let refs: Vec<(&str, u64)> = words.iter().map(|(w, n)| (w.as_str(), *n)).collect();
        let placed = layout(&refs, &opts, boxes);
        assert_eq!(placed.len(), 40);
        assert!(placed.windows(2).all(|p| p[1].font_size <= p[0].font_size));
    }

    #[test]
    fn free_space_is_tracked_per_cell() {
        let mut grid = Occupancy::new(40);
        grid.mark(8, 8, 9, 4);
        assert_eq!(grid.used(0, 0, 10, 10), 3);
        assert_eq!(grid.used(2, 2, 5, 3), 3);
        assert_eq!(grid.used(5, 0, 10, 10), 0);
        let (x, y) = grid.find_spot(8, 8).unwrap();
        assert_eq!(grid.used(x / 4, y / 4, x / 4 + 2, y / 4 + 2), 0);
        assert!(grid.find_spot(41, 4).is_none());
    }

    #[test]
    fn max_words_caps_output() {
        let opts = LayoutOptions { max_words: 2, ..LayoutOptions::for_size(400) };
        let placed = layout(&[("a", 3), ("b", 2), ("c", 1)], &opts, boxes);
        assert_eq!(placed.len(), 2);
    }
}
