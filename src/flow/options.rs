use pdf_script_macro::script_enum;

use crate::{error::PdfResult, objects::Dictionary};

#[script_enum(Name)]
pub enum HorizontalAlign {
    Left = "Left",
    Center = "Center",
    Right = "Right",
}

#[script_enum(Name)]
pub enum VerticalAlignment {
    Top = "Top",
    Middle = "Middle",
    Bottom = "Bottom",
}

/// Horizontal placement of each line. With `justify`, every line except the
/// last is stretched to the full width and `horizontal` only applies to the
/// last line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    pub horizontal: HorizontalAlign,
    pub justify: bool,
}

impl Default for Alignment {
    fn default() -> Self {
        Self {
            horizontal: HorizontalAlign::Left,
            justify: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowOptions {
    pub alignment: Alignment,
    pub vertical_alignment: VerticalAlignment,

    /// Extra vertical gap between consecutive lines
    pub line_spacing: f32,

    /// Extra space after every character, as set by `Tc`
    pub character_spacing: f32,

    /// Horizontal scaling as a ratio, where 1.0 is unscaled. `Tz` takes this
    /// value as a percentage.
    pub horizontal_scaling: f32,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            alignment: Alignment::default(),
            vertical_alignment: VerticalAlignment::Top,
            line_spacing: 0.0,
            character_spacing: 0.0,
            horizontal_scaling: 1.0,
        }
    }
}

impl FlowOptions {
    /// Reads the options dictionary of the `ft` operator. Absent keys keep
    /// their defaults.
    pub fn from_dict(mut dict: Dictionary) -> PdfResult<Self> {
        let mut options = Self::default();

        if let Some(align) = dict.get_name("Align")? {
            options.alignment.horizontal = HorizontalAlign::from_name(&align)?;
        }

        if let Some(justify) = dict.get_bool("Justify")? {
            options.alignment.justify = justify;
        }

        if let Some(valign) = dict.get_name("VAlign")? {
            options.vertical_alignment = VerticalAlignment::from_name(&valign)?;
        }

        if let Some(line_spacing) = dict.get_number("LineSpacing")? {
            options.line_spacing = line_spacing;
        }

        if let Some(character_spacing) = dict.get_number("CharSpacing")? {
            options.character_spacing = character_spacing;
        }

        if let Some(ratio) = dict.get_number("TextRatio")? {
            options.horizontal_scaling = ratio;
        }

        for (key, _) in dict.iter() {
            log::warn!("ignoring unrecognized text flow option /{}", key);
        }

        Ok(options)
    }
}
