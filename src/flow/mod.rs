use std::{fmt, rc::Rc};

use crate::{data_structures::Rectangle, font::FontMetrics};

pub use line::{Line, LineSpan};
pub use options::{Alignment, FlowOptions, HorizontalAlign, VerticalAlignment};

use builder::LineBuilder;

mod builder;
mod chunk;
mod line;
mod options;

/// A font as seen by the flow engine
pub trait FlowFont: Clone {
    fn metrics(&self) -> &dyn FontMetrics;

    /// Whether two handles refer to the same font, so their words may share
    /// a [`LineSpan`]
    fn same_font(&self, other: &Self) -> bool;
}

impl FlowFont for Rc<dyn FontMetrics> {
    fn metrics(&self) -> &dyn FontMetrics {
        &**self
    }

    fn same_font(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

/// Input text in one font and size
#[derive(Debug, Clone)]
pub struct Span<F> {
    pub text: String,
    pub font: F,
    pub size: f32,
}

/// The text did not fit in the rectangle. `lines` holds the lines that did.
#[derive(Debug, Clone)]
pub struct Overflow<F> {
    pub lines: Vec<Line<F>>,
}

impl<F> fmt::Display for Overflow<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "text does not fit its rectangle, {} lines placed",
            self.lines.len()
        )
    }
}

/// Greedy line breaking of spans into a rectangle
#[derive(Debug, Clone, Default)]
pub struct TextFlow {
    options: FlowOptions,
}

impl TextFlow {
    pub fn new(options: FlowOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FlowOptions {
        &self.options
    }

    /// Lays `spans` out in `rect`, top line first.
    ///
    /// A rectangle without positive width yields no lines. Running out of
    /// height is reported as an [`Overflow`], which is not a parse error.
    pub fn flow<F: FlowFont>(
        &self,
        spans: &[Span<F>],
        rect: Rectangle,
    ) -> Result<Vec<Line<F>>, Overflow<F>> {
        if rect.width <= 0.0 {
            return Ok(Vec::new());
        }

        let chunks = chunk::split(spans, &self.options);

        LineBuilder::new(&self.options, rect).run(chunks)
    }
}
