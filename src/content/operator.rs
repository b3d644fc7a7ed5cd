use std::collections::HashMap;

use once_cell::sync::Lazy;
use pdf_script_macro::script_enum;

use crate::{
    error::PdfResult,
    objects::{
        Value,
        ValueKind::{self, Array as A, Dictionary as D, Name as Nm, Number as N, String as S},
    },
    ParseError,
};

use super::Context;

#[script_enum]
#[allow(non_camel_case_types)]
pub enum Operator {
    /// Close, fill, and stroke path using nonzero winding number rule
    b = "b",

    /// Fill and stroke path using nonzero winding number rule
    B = "B",

    /// Close, fill, and stroke path using even-odd rule
    b_star = "b*",

    /// Fill and stroke path using even-odd rule
    B_star = "B*",

    /// Begin text object
    BT = "BT",

    /// Append curved segment to path (three control points)
    c = "c",

    /// Concatenate matrix to current transformation matrix
    cm = "cm",

    /// Set color space for stroking operations
    CS = "CS",

    /// Set color space for nonstroking operations
    cs = "cs",

    /// Set line dash pattern
    d = "d",

    /// Draw a declared image resource into a rectangle
    di = "di",

    /// Invoke named XObject
    Do = "Do",

    /// End text object
    ET = "ET",

    /// Fill path using nonzero winding number rule
    f = "f",

    /// Fill path using nonzero winding number rule (obsolete)
    F = "F",

    /// Fill path using even-odd rule
    f_star = "f*",

    /// Flow text spans into a rectangle
    ft = "ft",

    /// Set gray level for stroking operations
    G = "G",

    /// Set gray level for nonstroking operations
    g = "g",

    /// Set parameters from graphics state parameter dictionary
    gs = "gs",

    /// Close subpath
    h = "h",

    /// Set flatness tolerance
    i = "i",

    /// Set line join style
    j = "j",

    /// Set line cap style
    J = "J",

    /// Set CMYK color for stroking operations
    K = "K",

    /// Set CMYK color for nonstroking operations
    k = "k",

    /// Append straight line segment to path
    l = "l",

    /// Begin new subpath
    m = "m",

    /// Set miter limit
    M = "M",

    /// End path without filling or stroking
    n = "n",

    /// Save graphics state
    q = "q",

    /// Restore graphics state
    Q = "Q",

    /// Append rectangle to path
    re = "re",

    /// Set RGB color for stroking operations
    RG = "RG",

    /// Set RGB color for nonstroking operations
    rg = "rg",

    /// Set color rendering intent
    ri = "ri",

    /// Append rounded rectangle to path
    rr = "rr",

    /// Close and stroke path
    s = "s",

    /// Stroke path
    S = "S",

    /// Set color for stroking operations
    SC = "SC",

    /// Set color for nonstroking operations
    sc = "sc",

    /// Set color for stroking operations (pattern and special colour spaces)
    SCN = "SCN",

    /// Set color for nonstroking operations (pattern and special colour spaces)
    scn = "scn",

    /// Paint area defined by shading pattern
    sh = "sh",

    /// Move to start of next text line
    T_star = "T*",

    /// Set character spacing
    Tc = "Tc",

    /// Move text position
    Td = "Td",

    /// Move text position and set leading
    TD = "TD",

    /// Set text font and size
    Tf = "Tf",

    /// Show text
    Tj = "Tj",

    /// Show text, allowing individual glyph positioning
    TJ = "TJ",

    /// Set text leading
    TL = "TL",

    /// Set text matrix and text line matrix
    Tm = "Tm",

    /// Set text rendering mode
    Tr = "Tr",

    /// Set text rise
    Ts = "Ts",

    /// Set word spacing
    Tw = "Tw",

    /// Set horizontal text scaling
    Tz = "Tz",

    /// Append curved segment to path (initial point replicated)
    v = "v",

    /// Set line width
    w = "w",

    /// Set clipping path using nonzero winding number rule
    W = "W",

    /// Set clipping path using even-odd rule
    W_star = "W*",

    /// Append curved segment to path (final point replicated)
    y = "y",

    /// Move to next line and show text
    single_quote = "'",

    /// Set word and character spacing, move to next line, and show text
    double_quote = "\"",
}

/// How an operator moves the graphics context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    BeginPath,
    EndPath,
    BeginText,
    EndText,
}

#[derive(Debug, Clone)]
pub struct OperatorInfo {
    /// Descriptive name, used where the symbol alone is unreadable
    pub name: &'static str,

    /// Accepted operand kinds, longest signature first
    pub signatures: Vec<&'static [ValueKind]>,
    pub contexts: Context,
    pub transition: Option<Transition>,
}

const PAGE: Context = Context::PAGE;
const PATH: Context = Context::PATH;
const TEXT: Context = Context::TEXT;
const PAGE_OR_PATH: Context = Context::PAGE.union(Context::PATH);
const PAGE_OR_TEXT: Context = Context::PAGE.union(Context::TEXT);

const NO_OPERANDS: &[&[ValueKind]] = &[&[]];
const ONE_NUMBER: &[&[ValueKind]] = &[&[N]];
const TWO_NUMBERS: &[&[ValueKind]] = &[&[N, N]];
const FOUR_NUMBERS: &[&[ValueKind]] = &[&[N, N, N, N]];
const SIX_NUMBERS: &[&[ValueKind]] = &[&[N, N, N, N, N, N]];
const ONE_NAME: &[&[ValueKind]] = &[&[Nm]];
const COLOR: &[&[ValueKind]] = &[&[N, N, N, N], &[N, N, N], &[N], &[Nm]];
const COLOR_OR_PATTERN: &[&[ValueKind]] = &[
    &[N, N, N, N, Nm],
    &[N, N, N, N],
    &[N, N, N, Nm],
    &[N, N, N],
    &[N, Nm],
    &[N],
    &[Nm],
];

static OPERATORS: Lazy<HashMap<Operator, OperatorInfo>> = Lazy::new(|| {
    Operator::ALL
        .iter()
        .map(|&op| {
            let (name, signatures, contexts, transition) = op.describe();

            let mut signatures = signatures.to_vec();
            signatures.sort_by(|a, b| b.len().cmp(&a.len()));

            (
                op,
                OperatorInfo {
                    name,
                    signatures,
                    contexts,
                    transition,
                },
            )
        })
        .collect()
});

impl Operator {
    /// Looks up an operator by its source symbol
    pub fn lookup(symbol: &str) -> PdfResult<Self> {
        match Self::from_str(symbol) {
            Ok(op) => Ok(op),
            Err(..) => anyhow::bail!(ParseError::UnknownOperator {
                found: symbol.to_owned(),
            }),
        }
    }

    pub fn info(self) -> &'static OperatorInfo {
        &OPERATORS[&self]
    }

    #[rustfmt::skip]
    fn describe(self) -> (&'static str, &'static [&'static [ValueKind]], Context, Option<Transition>) {
        use Transition::*;

        match self {
            Self::w => ("setLineWidth", ONE_NUMBER, PAGE_OR_TEXT, None),
            Self::J => ("setLineCap", ONE_NUMBER, PAGE_OR_TEXT, None),
            Self::j => ("setLineJoin", ONE_NUMBER, PAGE_OR_TEXT, None),
            Self::M => ("setMiterLimit", ONE_NUMBER, PAGE_OR_TEXT, None),
            Self::d => ("setDash", &[&[A, N]], PAGE_OR_TEXT, None),
            Self::ri => ("setRenderingIntent", ONE_NAME, PAGE_OR_TEXT, None),
            Self::i => ("setFlatness", ONE_NUMBER, PAGE_OR_TEXT, None),
            Self::gs => ("setGraphicsState", ONE_NAME, PAGE_OR_TEXT, None),
            Self::q => ("saveState", NO_OPERANDS, PAGE, None),
            Self::Q => ("restoreState", NO_OPERANDS, PAGE, None),
            Self::cm => ("concatMatrix", SIX_NUMBERS, PAGE, None),

            Self::m => ("moveTo", TWO_NUMBERS, PAGE_OR_PATH, Some(BeginPath)),
            Self::re => ("rectangle", FOUR_NUMBERS, PAGE_OR_PATH, Some(BeginPath)),
            Self::rr => ("roundedRectangle", &[&[N, N, N, N, N, N], &[N, N, N, N, N]], PAGE_OR_PATH, Some(BeginPath)),
            Self::l => ("lineTo", TWO_NUMBERS, PATH, None),
            Self::c => ("curveTo", SIX_NUMBERS, PATH, None),
            Self::v => ("curveToInitialReplicated", FOUR_NUMBERS, PATH, None),
            Self::y => ("curveToFinalReplicated", FOUR_NUMBERS, PATH, None),
            Self::h => ("closePath", NO_OPERANDS, PATH, None),

            Self::S => ("stroke", NO_OPERANDS, PATH, Some(EndPath)),
            Self::s => ("closeStroke", NO_OPERANDS, PATH, Some(EndPath)),
            Self::f => ("fill", NO_OPERANDS, PATH, Some(EndPath)),
            Self::F => ("fillObsolete", NO_OPERANDS, PATH, Some(EndPath)),
            Self::f_star => ("fillEvenOdd", NO_OPERANDS, PATH, Some(EndPath)),
            Self::B => ("fillStroke", NO_OPERANDS, PATH, Some(EndPath)),
            Self::B_star => ("fillStrokeEvenOdd", NO_OPERANDS, PATH, Some(EndPath)),
            Self::b => ("closeFillStroke", NO_OPERANDS, PATH, Some(EndPath)),
            Self::b_star => ("closeFillStrokeEvenOdd", NO_OPERANDS, PATH, Some(EndPath)),
            Self::n => ("endPath", NO_OPERANDS, PAGE_OR_PATH, Some(EndPath)),
            Self::W => ("clip", NO_OPERANDS, PATH, Some(EndPath)),
            Self::W_star => ("clipEvenOdd", NO_OPERANDS, PATH, Some(EndPath)),

            Self::CS => ("setStrokeColorSpace", ONE_NAME, PAGE_OR_TEXT, None),
            Self::cs => ("setFillColorSpace", ONE_NAME, PAGE_OR_TEXT, None),
            Self::SC => ("setStrokeColor", COLOR, PAGE_OR_TEXT, None),
            Self::sc => ("setFillColor", COLOR, PAGE_OR_TEXT, None),
            Self::SCN => ("setStrokeColorN", COLOR_OR_PATTERN, PAGE_OR_TEXT, None),
            Self::scn => ("setFillColorN", COLOR_OR_PATTERN, PAGE_OR_TEXT, None),
            Self::G => ("setStrokeGray", ONE_NUMBER, PAGE_OR_TEXT, None),
            Self::g => ("setFillGray", ONE_NUMBER, PAGE_OR_TEXT, None),
            Self::RG => ("setStrokeRGB", &[&[N, N, N]], PAGE_OR_TEXT, None),
            Self::rg => ("setFillRGB", &[&[N, N, N]], PAGE_OR_TEXT, None),
            Self::K => ("setStrokeCMYK", FOUR_NUMBERS, PAGE_OR_TEXT, None),
            Self::k => ("setFillCMYK", FOUR_NUMBERS, PAGE_OR_TEXT, None),

            Self::sh => ("shade", ONE_NAME, PAGE, None),
            Self::Do => ("paintXObject", ONE_NAME, PAGE, None),
            Self::di => ("drawImage", &[&[Nm, N, N, N, N]], PAGE, None),

            Self::BT => ("beginText", NO_OPERANDS, PAGE, Some(BeginText)),
            Self::ET => ("endText", NO_OPERANDS, TEXT, Some(EndText)),
            Self::Tc => ("setCharSpacing", ONE_NUMBER, PAGE_OR_TEXT, None),
            Self::Tw => ("setWordSpacing", ONE_NUMBER, PAGE_OR_TEXT, None),
            Self::Tz => ("setHorizontalScaling", ONE_NUMBER, PAGE_OR_TEXT, None),
            Self::TL => ("setLeading", ONE_NUMBER, PAGE_OR_TEXT, None),
            Self::Tr => ("setTextRenderingMode", ONE_NUMBER, PAGE_OR_TEXT, None),
            Self::Ts => ("setTextRise", ONE_NUMBER, PAGE_OR_TEXT, None),
            Self::Tf => ("setFont", &[&[Nm, N]], PAGE_OR_TEXT, None),
            Self::Td => ("moveText", TWO_NUMBERS, TEXT, None),
            Self::TD => ("moveTextSetLeading", TWO_NUMBERS, TEXT, None),
            Self::Tm => ("setTextMatrix", SIX_NUMBERS, TEXT, None),
            Self::T_star => ("nextLine", NO_OPERANDS, TEXT, None),
            Self::Tj => ("showText", &[&[S]], TEXT, None),
            Self::TJ => ("showSpacedText", &[&[A]], TEXT, None),
            Self::single_quote => ("nextLineShowText", &[&[S]], TEXT, None),
            Self::double_quote => ("nextLineSetSpacingShowText", &[&[N, N, S]], TEXT, None),

            Self::ft => ("flowText", &[&[A, N, N, N, N, D], &[A, N, N, N, N]], PAGE, None),
        }
    }
}

impl OperatorInfo {
    fn matches_top(signature: &[ValueKind], stack: &[Value]) -> bool {
        signature.len() <= stack.len()
            && stack[stack.len() - signature.len()..]
                .iter()
                .zip(signature)
                .all(|(value, &expected)| value.kind() == Some(expected))
    }

    /// Pops the operands of `op` off `stack`, in source order.
    ///
    /// A single signature is checked position by position. Overloaded
    /// operators take the first signature, longest first, whose kinds match
    /// the top of the stack exactly. Variables without a declaration never
    /// match. Operands left over afterwards are an error.
    pub fn take_operands(&self, op: Operator, stack: &mut Vec<Value>) -> PdfResult<Vec<Value>> {
        let operator = op.as_str();

        let operands = if let [signature] = self.signatures.as_slice() {
            if stack.len() < signature.len() {
                anyhow::bail!(ParseError::InsufficientOperands {
                    operator,
                    expected: signature.len(),
                    found: stack.len(),
                });
            }

            let operands = stack.split_off(stack.len() - signature.len());

            for (position, (value, &expected)) in operands.iter().zip(signature.iter()).enumerate()
            {
                if value.kind() != Some(expected) {
                    anyhow::bail!(ParseError::TypeMismatch {
                        operator,
                        position,
                        expected,
                        found: value.kind(),
                    });
                }
            }

            operands
        } else {
            match self
                .signatures
                .iter()
                .find(|signature| Self::matches_top(signature, stack))
            {
                Some(signature) => stack.split_off(stack.len() - signature.len()),
                None => {
                    let longest = self.signatures.first().map_or(0, |sig| sig.len());
                    let found = stack[stack.len().saturating_sub(longest)..]
                        .iter()
                        .map(Value::kind)
                        .collect();

                    anyhow::bail!(ParseError::NoOperandMatch { operator, found });
                }
            }
        };

        if !stack.is_empty() {
            anyhow::bail!(ParseError::UnconsumedOperands {
                operator,
                count: stack.len(),
            });
        }

        Ok(operands)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::objects::Variable;

    fn numbers(ns: &[f32]) -> Vec<Value> {
        ns.iter().copied().map(Value::Number).collect()
    }

    fn error_of(result: PdfResult<Vec<Value>>) -> ParseError {
        result
            .unwrap_err()
            .downcast_ref::<ParseError>()
            .cloned()
            .unwrap()
    }

    #[test]
    fn every_operator_has_metadata() {
        for &op in Operator::ALL {
            let info = op.info();
            assert!(!info.signatures.is_empty(), "{}", op);
            assert_ne!(info.contexts, Context::NONE, "{}", op);
        }
    }

    #[test]
    fn signatures_are_longest_first() {
        for &op in Operator::ALL {
            let lens = op
                .info()
                .signatures
                .iter()
                .map(|sig| sig.len())
                .collect::<Vec<_>>();
            let mut sorted = lens.clone();
            sorted.sort_by(|a, b| b.cmp(a));
            assert_eq!(lens, sorted, "{}", op);
        }
    }

    #[test]
    fn lookup_symbols() {
        assert_eq!(Operator::lookup("b*").unwrap(), Operator::b_star);
        assert_eq!(Operator::lookup("'").unwrap(), Operator::single_quote);
        assert_eq!(Operator::single_quote.info().name, "nextLineShowText");

        let err = Operator::lookup("zz").unwrap_err();
        assert_eq!(
            err.downcast_ref::<ParseError>(),
            Some(&ParseError::UnknownOperator {
                found: "zz".to_owned()
            })
        );
    }

    #[test]
    fn single_signature_preserves_source_order() {
        let mut stack = vec![Value::Name("/F1".to_owned()), Value::Number(12.0)];
        let operands = Operator::Tf.info().take_operands(Operator::Tf, &mut stack).unwrap();

        assert_eq!(
            operands,
            vec![Value::Name("/F1".to_owned()), Value::Number(12.0)]
        );
        assert!(stack.is_empty());
    }

    #[test]
    fn single_signature_type_mismatch() {
        let mut stack = vec![Value::String(b"String".to_vec()), Value::Number(10.0)];

        assert_eq!(
            error_of(Operator::m.info().take_operands(Operator::m, &mut stack)),
            ParseError::TypeMismatch {
                operator: "m",
                position: 0,
                expected: ValueKind::Number,
                found: Some(ValueKind::String),
            }
        );
    }

    #[test]
    fn single_signature_underflow() {
        let mut stack = numbers(&[1.0]);

        assert_eq!(
            error_of(Operator::l.info().take_operands(Operator::l, &mut stack)),
            ParseError::InsufficientOperands {
                operator: "l",
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn rounded_rectangle_overloads() {
        let info = Operator::rr.info();

        let mut stack = numbers(&[10.0, 10.0, 200.0, 150.0, 10.0, 10.0]);
        assert_eq!(info.take_operands(Operator::rr, &mut stack).unwrap().len(), 6);

        let mut stack = numbers(&[10.0, 10.0, 200.0, 150.0, 10.0]);
        assert_eq!(info.take_operands(Operator::rr, &mut stack).unwrap().len(), 5);

        let mut stack = numbers(&[10.0, 10.0, 200.0, 150.0]);
        assert!(matches!(
            error_of(info.take_operands(Operator::rr, &mut stack)),
            ParseError::NoOperandMatch { operator: "rr", .. }
        ));
    }

    #[test]
    fn color_overloads_pick_longest_match() {
        let info = Operator::scn.info();

        let mut stack = numbers(&[0.1, 0.2, 0.3]);
        stack.push(Value::Name("/P1".to_owned()));
        let operands = info.take_operands(Operator::scn, &mut stack).unwrap();
        assert_eq!(operands.len(), 4);

        let mut stack = numbers(&[0.5]);
        assert_eq!(
            info.take_operands(Operator::scn, &mut stack).unwrap(),
            numbers(&[0.5])
        );
    }

    #[test]
    fn leftover_operands_are_rejected() {
        let mut stack = numbers(&[1.0, 2.0, 3.0, 4.0]);

        assert_eq!(
            error_of(Operator::rg.info().take_operands(Operator::rg, &mut stack)),
            ParseError::UnconsumedOperands {
                operator: "rg",
                count: 1,
            }
        );
    }

    #[test]
    fn unresolved_variable_never_matches() {
        let mut stack = vec![Value::Variable(Variable::unresolved("$gray".to_owned()))];

        assert!(matches!(
            error_of(Operator::sc.info().take_operands(Operator::sc, &mut stack)),
            ParseError::NoOperandMatch { .. }
        ));

        let mut stack = vec![Value::Variable(Variable::unresolved("$gray".to_owned()))];
        assert_eq!(
            error_of(Operator::g.info().take_operands(Operator::g, &mut stack)),
            ParseError::TypeMismatch {
                operator: "g",
                position: 0,
                expected: ValueKind::Number,
                found: None,
            }
        );
    }

    #[test]
    fn resolved_variable_matches_declared_kind() {
        let mut stack = vec![Value::Variable(Variable::resolved(
            "$gray".to_owned(),
            ValueKind::Number,
        ))];

        assert!(Operator::g
            .info()
            .take_operands(Operator::g, &mut stack)
            .is_ok());
    }
}
