use crate::data_structures::Rectangle;

use super::{chunk::Chunk, FlowFont};

/// A run of text in one font and size, positioned on a line
#[derive(Debug, Clone)]
pub struct LineSpan<F> {
    /// Left edge of the first glyph
    pub x: f32,
    pub baseline: f32,
    pub width: f32,
    pub size: f32,
    pub font: F,

    /// Extra space added to each literal space in `text`, in unscaled text
    /// space units as taken by `Tw`
    pub word_spacing: f32,
    pub text: String,
}

impl<F> LineSpan<F> {
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(self.x, self.baseline, self.width, self.size)
    }
}

#[derive(Debug, Clone)]
pub struct Line<F> {
    pub left: f32,
    pub baseline: f32,
    pub width: f32,

    /// Largest font size on the line
    pub height: f32,
    pub spans: Vec<LineSpan<F>>,
}

impl<F> Line<F> {
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(self.left, self.baseline, self.width, self.height)
    }

    pub(super) fn shift(&mut self, dy: f32) {
        self.baseline += dy;
        for span in &mut self.spans {
            span.baseline += dy;
        }
    }
}

/// Places `chunks` left to right from `left`. Each gap between chunks is the
/// natural space width plus `extra`. Adjacent words sharing a font and size
/// become one span, with a literal space wherever a gap separated them.
pub(super) fn layout<F: FlowFont>(
    chunks: Vec<Chunk<F>>,
    left: f32,
    baseline: f32,
    height: f32,
    extra: f32,
    horizontal_scaling: f32,
) -> Line<F> {
    let word_spacing = if extra == 0.0 || horizontal_scaling == 0.0 {
        0.0
    } else {
        extra / horizontal_scaling
    };

    let mut spans: Vec<LineSpan<F>> = Vec::new();
    let mut x = left;
    let mut pending_gap = None;

    for chunk in chunks {
        for (idx, word) in chunk.words.into_iter().enumerate() {
            let gap = if idx == 0 { pending_gap.take() } else { None };

            match spans.last_mut() {
                Some(span) if span.size == word.size && span.font.same_font(&word.font) => {
                    if let Some(gap) = gap {
                        span.text.push(' ');
                        span.width += gap;
                        x += gap;
                    }

                    span.text.push_str(&word.text);
                    span.width += word.width;
                }
                _ => {
                    x += gap.unwrap_or(0.0);

                    spans.push(LineSpan {
                        x,
                        baseline,
                        width: word.width,
                        size: word.size,
                        font: word.font,
                        word_spacing,
                        text: word.text,
                    });
                }
            }

            x += word.width;
        }

        pending_gap = Some(chunk.space_after + extra);
    }

    Line {
        left,
        baseline,
        width: x - left,
        height,
        spans,
    }
}
