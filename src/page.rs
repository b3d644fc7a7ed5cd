use pdf_script_macro::script_enum;

/// Standard portrait page sizes
#[script_enum(Name)]
pub enum PageTemplate {
    A3 = "A3",
    A4 = "A4",
    A5 = "A5",
    Letter = "Letter",
    Legal = "Legal",
}

impl PageTemplate {
    /// Width and height in points
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            Self::A3 => (841.89, 1190.55),
            Self::A4 => (595.28, 841.89),
            Self::A5 => (419.53, 595.28),
            Self::Letter => (612.0, 792.0),
            Self::Legal => (612.0, 1008.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageSize {
    Template(PageTemplate),
    Explicit { width: f32, height: f32 },
}

impl PageSize {
    pub fn width(&self) -> f32 {
        self.dimensions().0
    }

    pub fn height(&self) -> f32 {
        self.dimensions().1
    }

    pub fn dimensions(&self) -> (f32, f32) {
        match *self {
            Self::Template(template) => template.dimensions(),
            Self::Explicit { width, height } => (width, height),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn template_sizes() {
        let a4 = PageSize::Template(PageTemplate::from_name("/A4").unwrap());
        assert_eq!(a4.width(), 595.28);
        assert_eq!(a4.height(), 841.89);

        let letter = PageSize::Template(PageTemplate::Letter);
        assert_eq!(letter.dimensions(), (612.0, 792.0));
    }

    #[test]
    fn explicit_size() {
        let size = PageSize::Explicit {
            width: 300.0,
            height: 200.0,
        };
        assert_eq!(size.dimensions(), (300.0, 200.0));
    }
}
