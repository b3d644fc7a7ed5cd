use pdf_script_macro::script_enum;

use crate::{
    color::{ColorSpace, ColorSpaceName},
    data_structures::Rectangle,
    error::PdfResult,
    objects::{Dictionary, Value},
    ParseError,
};

#[script_enum(Name)]
pub enum PatternKind {
    /// Colours blend along the axis from the rectangle's left edge to its right edge
    LinearGradient = "LinearGradient",

    /// Colours blend outward from the centre of the rectangle
    RadialGradient = "RadialGradient",
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorStop {
    /// Position along the gradient, conventionally between 0 and 1
    pub position: f32,
    pub color: ColorSpace,
}

/// A gradient pattern declared in the prolog
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub color_space: ColorSpaceName,

    /// The area the gradient spans
    pub rect: Rectangle,

    /// Ordered colour stops. There is exactly one per `/Cn` entry.
    pub stops: Vec<ColorStop>,
}

impl Pattern {
    const RECT: &'static str = "Rect";
    const STOPS: &'static str = "Stops";

    /// Validates a pattern dictionary of the form
    ///
    /// ```text
    /// << /Rect [l b w h] /C0 [..] /C1 [..] ... /Stops [s0 s1 ...] >>
    /// ```
    ///
    /// Colours are read from `/C0` upward and stop at the first missing index.
    pub fn from_dict(
        kind: PatternKind,
        color_space: ColorSpaceName,
        mut dict: Dictionary,
    ) -> PdfResult<Self> {
        let rect = Rectangle::from_arr(dict.expect_arr(Self::RECT)?)?;

        let mut colors = Vec::new();
        loop {
            let key = format!("C{}", colors.len());

            let components = match dict.get_arr(&key)? {
                Some(arr) => Value::assert_numbers(arr)?,
                None => break,
            };

            if components.len() != color_space.components() {
                anyhow::bail!(ParseError::ComponentCountMismatch {
                    what: format!("pattern colour /{}", key),
                    expected: color_space.components(),
                    found: components.len(),
                });
            }

            colors.push(ColorSpace::from_components(color_space, &components)?);
        }

        let positions = Value::assert_numbers(dict.expect_arr(Self::STOPS)?)?;

        if positions.len() != colors.len() {
            anyhow::bail!(ParseError::ComponentCountMismatch {
                what: "pattern /Stops".to_owned(),
                expected: colors.len(),
                found: positions.len(),
            });
        }

        for (key, _) in dict.iter() {
            log::warn!("ignoring unrecognized pattern key /{}", key);
        }

        let stops = positions
            .into_iter()
            .zip(colors)
            .map(|(position, color)| ColorStop { position, color })
            .collect();

        Ok(Self {
            kind,
            color_space,
            rect,
            stops,
        })
    }
}
