use pdf_script_macro::script_enum;

use crate::{content::Operator, error::PdfResult, ParseError};

/// A colour value in one of the device colour spaces
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorSpace {
    DeviceGray(f32),
    DeviceRGB {
        red: f32,
        green: f32,
        blue: f32,
    },
    DeviceCMYK {
        cyan: f32,
        magenta: f32,
        yellow: f32,
        key: f32,
    },
}

impl ColorSpace {
    /// Builds a colour from exactly as many components as `name` requires
    pub fn from_components(name: ColorSpaceName, components: &[f32]) -> PdfResult<Self> {
        if components.len() != name.components() {
            anyhow::bail!(ParseError::ComponentCountMismatch {
                what: format!("colour space {}", name),
                expected: name.components(),
                found: components.len(),
            });
        }

        Ok(match (name, components) {
            (ColorSpaceName::DeviceGray, &[gray]) => ColorSpace::DeviceGray(gray),
            (ColorSpaceName::DeviceRGB, &[red, green, blue]) => {
                ColorSpace::DeviceRGB { red, green, blue }
            }
            (ColorSpaceName::DeviceCMYK, &[cyan, magenta, yellow, key]) => ColorSpace::DeviceCMYK {
                cyan,
                magenta,
                yellow,
                key,
            },
            _ => unreachable!("component count checked above"),
        })
    }

    pub fn name(&self) -> ColorSpaceName {
        match self {
            ColorSpace::DeviceGray(..) => ColorSpaceName::DeviceGray,
            ColorSpace::DeviceRGB { .. } => ColorSpaceName::DeviceRGB,
            ColorSpace::DeviceCMYK { .. } => ColorSpaceName::DeviceCMYK,
        }
    }

    pub fn components(&self) -> Vec<f32> {
        match *self {
            ColorSpace::DeviceGray(gray) => vec![gray],
            ColorSpace::DeviceRGB { red, green, blue } => vec![red, green, blue],
            ColorSpace::DeviceCMYK {
                cyan,
                magenta,
                yellow,
                key,
            } => vec![cyan, magenta, yellow, key],
        }
    }

    /// The device operator that sets this colour directly
    pub fn set_operator(&self, stroking: bool) -> Operator {
        match (self.name(), stroking) {
            (ColorSpaceName::DeviceGray, true) => Operator::G,
            (ColorSpaceName::DeviceGray, false) => Operator::g,
            (ColorSpaceName::DeviceRGB, true) => Operator::RG,
            (ColorSpaceName::DeviceRGB, false) => Operator::rg,
            (ColorSpaceName::DeviceCMYK, true) => Operator::K,
            (ColorSpaceName::DeviceCMYK, false) => Operator::k,
        }
    }
}

#[script_enum(Name)]
pub enum ColorSpaceName {
    DeviceGray = "DeviceGray",
    DeviceRGB = "DeviceRGB",
    DeviceCMYK = "DeviceCMYK",
}

impl ColorSpaceName {
    pub fn components(self) -> usize {
        match self {
            Self::DeviceGray => 1,
            Self::DeviceRGB => 3,
            Self::DeviceCMYK => 4,
        }
    }
}
