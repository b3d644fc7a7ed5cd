use std::mem;

use crate::data_structures::Rectangle;

use super::{
    chunk::Chunk,
    line::{self, Line},
    FlowFont, FlowOptions, HorizontalAlign, Overflow, VerticalAlignment,
};

/// Working state of a single flow. Built fresh for every call and consumed by
/// [`LineBuilder::run`].
pub(super) struct LineBuilder<'a, F> {
    options: &'a FlowOptions,
    rect: Rectangle,
    lines: Vec<Line<F>>,

    /// Chunks of the line being filled
    current: Vec<Chunk<F>>,

    /// Natural width of `current`, including the gaps between chunks
    width: f32,
    remaining_height: f32,

    /// Baseline of the most recently finished line
    baseline: f32,
}

impl<'a, F: FlowFont> LineBuilder<'a, F> {
    pub fn new(options: &'a FlowOptions, rect: Rectangle) -> Self {
        Self {
            options,
            rect,
            lines: Vec::new(),
            current: Vec::new(),
            width: 0.0,
            remaining_height: rect.height,
            baseline: rect.top(),
        }
    }

    pub fn run(mut self, chunks: Vec<Chunk<F>>) -> Result<Vec<Line<F>>, Overflow<F>> {
        for chunk in chunks {
            if let Some(last) = self.current.last() {
                if self.width + last.space_after + chunk.width > self.rect.width {
                    self.finish_line(false)?;
                }
            }

            self.push(chunk);
        }

        if !self.current.is_empty() {
            self.finish_line(true)?;
        }

        self.align_vertically()
    }

    fn push(&mut self, chunk: Chunk<F>) {
        if let Some(last) = self.current.last() {
            self.width += last.space_after;
        }

        self.width += chunk.width;
        self.current.push(chunk);
    }

    fn finish_line(&mut self, is_last: bool) -> Result<(), Overflow<F>> {
        let chunks = mem::take(&mut self.current);
        let natural_width = mem::replace(&mut self.width, 0.0);

        let height = chunks.iter().map(Chunk::height).fold(0.0, f32::max);
        let spacing = if self.lines.is_empty() {
            0.0
        } else {
            self.options.line_spacing
        };

        self.remaining_height -= height + spacing;
        if self.remaining_height < 0.0 {
            log::debug!(
                "text overflows its rectangle after {} lines",
                self.lines.len()
            );

            return Err(Overflow {
                lines: mem::take(&mut self.lines),
            });
        }

        self.baseline -= spacing + height;

        let free = self.rect.width - natural_width;
        let alignment = self.options.alignment;

        let (left, extra) = if alignment.justify && !is_last && chunks.len() > 1 {
            (self.rect.left, free / (chunks.len() - 1) as f32)
        } else {
            let offset = match alignment.horizontal {
                HorizontalAlign::Left => 0.0,
                HorizontalAlign::Center => free / 2.0,
                HorizontalAlign::Right => free,
            };

            (self.rect.left + offset, 0.0)
        };

        self.lines.push(line::layout(
            chunks,
            left,
            self.baseline,
            height,
            extra,
            self.options.horizontal_scaling,
        ));

        Ok(())
    }

    /// Moves every line by one offset so the block sits at the top, middle or
    /// bottom of the rectangle. The descent of the last line counts as
    /// content, so descenders stay inside the rectangle. When they cannot,
    /// the last line overflows.
    fn align_vertically(mut self) -> Result<Vec<Line<F>>, Overflow<F>> {
        let descent = self
            .lines
            .last()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.font.metrics().descent(span.size))
                    .fold(0.0, f32::max)
            })
            .unwrap_or(0.0);

        let content_height = self.rect.top() - self.baseline + descent;
        if content_height > self.rect.height {
            log::debug!("descenders of the last line fall below the rectangle");

            self.lines.pop();
            return Err(Overflow { lines: self.lines });
        }

        let slack = self.rect.height - content_height;

        let dy = match self.options.vertical_alignment {
            VerticalAlignment::Top => 0.0,
            VerticalAlignment::Middle => -slack / 2.0,
            VerticalAlignment::Bottom => -slack,
        };

        if dy != 0.0 {
            for line in &mut self.lines {
                line.shift(dy);
            }
        }

        Ok(self.lines)
    }
}
