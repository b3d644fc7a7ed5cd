use std::{fmt, ops::BitOr};

use crate::{error::PdfResult, ParseError};

use super::{Operator, Transition};

/// A graphics context, or a set of them when used as a mask
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Context(u8);

impl Context {
    pub const NONE: Self = Self(0);
    pub const PAGE: Self = Self(1);
    pub const PATH: Self = Self(1 << 1);
    pub const TEXT: Self = Self(1 << 2);

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Whether `self` (a single context) is part of the mask `allowed`
    pub fn is_in(self, allowed: Self) -> bool {
        self.0 & allowed.0 != 0
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::NONE => "none",
            Self::PAGE => "page",
            Self::PATH => "path",
            Self::TEXT => "text",
            _ => "mixed",
        }
    }
}

impl BitOr for Context {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [Self::PAGE, Self::PATH, Self::TEXT]
            .into_iter()
            .filter(|ctx| self.0 & ctx.0 != 0)
            .map(Context::name)
            .collect::<Vec<_>>();

        if names.is_empty() {
            f.write_str("Context(none)")
        } else {
            write!(f, "Context({})", names.join(" | "))
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tracks whether the script is outside any page, at page level, or inside
/// a path or text object. Path and text objects do not nest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphicsContext {
    current: Context,
}

impl Default for GraphicsContext {
    fn default() -> Self {
        Self {
            current: Context::NONE,
        }
    }
}

impl GraphicsContext {
    pub fn current(&self) -> Context {
        self.current
    }

    pub fn begin_page(&mut self) {
        self.current = Context::PAGE;
    }

    /// Leaves the page. Ending a page with a path or text object still open
    /// is rejected.
    pub fn end_page(&mut self) -> PdfResult<()> {
        match self.current {
            Context::PATH | Context::TEXT => anyhow::bail!(ParseError::UnclosedContext {
                context: self.current,
            }),
            _ => {
                self.current = Context::NONE;
                Ok(())
            }
        }
    }

    /// Checks `op` against its allowed contexts and applies its transition
    pub fn accept(&mut self, op: Operator) -> PdfResult<()> {
        let info = op.info();

        if !self.current.is_in(info.contexts) {
            anyhow::bail!(ParseError::NotAllowedInContext {
                operator: op.as_str(),
                context: self.current,
            });
        }

        let next = match (info.transition, self.current) {
            (Some(Transition::BeginPath), Context::PAGE) => Context::PATH,
            (Some(Transition::EndPath), Context::PATH) => Context::PAGE,
            (Some(Transition::BeginText), Context::PAGE) => Context::TEXT,
            (Some(Transition::EndText), Context::TEXT) => Context::PAGE,
            (_, current) => current,
        };

        if next != self.current {
            log::debug!("{} moves context {} -> {}", op, self.current, next);
            self.current = next;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn on_page() -> GraphicsContext {
        let mut ctx = GraphicsContext::default();
        ctx.begin_page();
        ctx
    }

    #[test]
    fn mask_membership() {
        let mask = Context::PAGE | Context::TEXT;

        assert!(Context::PAGE.is_in(mask));
        assert!(Context::TEXT.is_in(mask));
        assert!(!Context::PATH.is_in(mask));
        assert!(!Context::NONE.is_in(mask));
    }

    #[test]
    fn path_opens_and_closes() {
        let mut ctx = on_page();

        ctx.accept(Operator::m).unwrap();
        assert_eq!(ctx.current(), Context::PATH);
        ctx.accept(Operator::l).unwrap();
        assert_eq!(ctx.current(), Context::PATH);
        ctx.accept(Operator::S).unwrap();
        assert_eq!(ctx.current(), Context::PAGE);
    }

    #[test]
    fn clip_closes_path_and_n_stays_legal() {
        let mut ctx = on_page();

        ctx.accept(Operator::re).unwrap();
        ctx.accept(Operator::W).unwrap();
        assert_eq!(ctx.current(), Context::PAGE);
        ctx.accept(Operator::n).unwrap();
        assert_eq!(ctx.current(), Context::PAGE);
    }

    #[test]
    fn text_object() {
        let mut ctx = on_page();

        ctx.accept(Operator::BT).unwrap();
        assert_eq!(ctx.current(), Context::TEXT);
        ctx.accept(Operator::Tj).unwrap();
        ctx.accept(Operator::ET).unwrap();
        assert_eq!(ctx.current(), Context::PAGE);
    }

    #[test]
    fn text_operator_outside_text_object() {
        let mut ctx = on_page();

        let err = ctx.accept(Operator::Tj).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ParseError>(),
            Some(&ParseError::NotAllowedInContext {
                operator: "Tj",
                context: Context::PAGE,
            })
        );
    }

    #[test]
    fn nothing_is_allowed_before_a_page() {
        let mut ctx = GraphicsContext::default();
        assert!(ctx.accept(Operator::q).is_err());
    }

    #[test]
    fn path_operators_rejected_inside_text() {
        let mut ctx = on_page();
        ctx.accept(Operator::BT).unwrap();
        assert!(ctx.accept(Operator::m).is_err());
    }

    #[test]
    fn end_page_with_open_path_is_rejected() {
        let mut ctx = on_page();
        ctx.accept(Operator::m).unwrap();

        let err = ctx.end_page().unwrap_err();
        assert_eq!(
            err.downcast_ref::<ParseError>(),
            Some(&ParseError::UnclosedContext {
                context: Context::PATH
            })
        );
    }

    #[test]
    fn end_page_returns_to_none() {
        let mut ctx = on_page();
        ctx.end_page().unwrap();
        assert_eq!(ctx.current(), Context::NONE);
    }
}
