use std::fmt;

/// Measurements a font provides to the text flow engine. All results are in
/// text space units scaled by `size`, typically points.
pub trait FontMetrics: fmt::Debug {
    /// Advance width of `text`, including `character_spacing` after every
    /// character. `horizontal_scaling` is a ratio, where 1.0 is unscaled.
    fn text_width(
        &self,
        text: &str,
        size: f32,
        character_spacing: f32,
        horizontal_scaling: f32,
    ) -> f32;

    /// Advance width of a single space, measured like [`FontMetrics::text_width`]
    fn space_width(&self, size: f32, character_spacing: f32, horizontal_scaling: f32) -> f32;

    /// Distance below the baseline reached by descenders, as a non-negative number
    fn descent(&self, size: f32) -> f32;
}

/// Glyph widths indexed by character code
#[derive(Debug, Clone, PartialEq)]
pub struct Widths {
    /// Each element is the glyph width for the character code that equals
    /// `first_char` plus the array index. For character codes outside the
    /// range, `missing_width` is used.
    ///
    /// The glyph widths are measured in units in which 1000 units correspond to 1
    /// unit in text space
    widths: Vec<f32>,

    missing_width: f32,

    /// The first character code defined in `widths`
    first_char: u32,
}

impl Widths {
    pub fn new(widths: Vec<f32>, first_char: u32, missing_width: f32) -> Self {
        Self {
            widths,
            missing_width,
            first_char,
        }
    }

    /// Width of `codepoint` in text space units
    pub fn get(&self, codepoint: u32) -> f32 {
        let width = codepoint
            .checked_sub(self.first_char)
            .and_then(|idx| self.widths.get(idx as usize))
            .copied()
            .unwrap_or(self.missing_width);

        width / 1000.0
    }
}

/// A font measured from a fixed width table, such as the metrics of the
/// standard 14 fonts
#[derive(Debug, Clone, PartialEq)]
pub struct FixedWidthFont {
    widths: Widths,

    /// Maximum depth below the baseline, in 1/1000 text space units. Stored as
    /// a positive number.
    descent: f32,
}

impl FixedWidthFont {
    pub fn new(widths: Widths, descent: f32) -> Self {
        Self {
            widths,
            descent: descent.abs(),
        }
    }

    /// A font where every character is `width` units wide
    pub fn monospace(width: f32, descent: f32) -> Self {
        Self::new(Widths::new(Vec::new(), 0, width), descent)
    }

    fn char_width(&self, c: char) -> f32 {
        // Characters outside Latin-1 have no entry in a single byte table
        let code = c as u32;
        if code > 0xff {
            return self.widths.missing_width / 1000.0;
        }

        self.widths.get(code)
    }
}

impl FontMetrics for FixedWidthFont {
    fn text_width(
        &self,
        text: &str,
        size: f32,
        character_spacing: f32,
        horizontal_scaling: f32,
    ) -> f32 {
        text.chars()
            .map(|c| self.char_width(c) * size + character_spacing)
            .sum::<f32>()
            * horizontal_scaling
    }

    fn space_width(&self, size: f32, character_spacing: f32, horizontal_scaling: f32) -> f32 {
        (self.char_width(' ') * size + character_spacing) * horizontal_scaling
    }

    fn descent(&self, size: f32) -> f32 {
        self.descent / 1000.0 * size
    }
}
