use crate::{error::PdfResult, objects::Value, ParseError};

/// An axis-aligned rectangle in user space, y growing upward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub left: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    pub fn new(left: f32, bottom: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            bottom,
            width,
            height,
        }
    }

    /// Reads `[left bottom width height]`
    pub fn from_arr(arr: Vec<Value>) -> PdfResult<Self> {
        if arr.len() != 4 {
            anyhow::bail!(ParseError::ComponentCountMismatch {
                what: "rectangle".to_owned(),
                expected: 4,
                found: arr.len(),
            });
        }

        let mut numbers = Value::assert_numbers(arr)?.into_iter();
        let mut next = || numbers.next().unwrap_or_default();

        Ok(Self::new(next(), next(), next(), next()))
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn top(&self) -> f32 {
        self.bottom + self.height
    }
}
