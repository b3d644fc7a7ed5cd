use pdf_script_macro::script_enum;

use crate::{
    color::ColorSpace,
    content::Operator,
    error::PdfResult,
    objects::{Value, ValueKind},
    page::PageSize,
    resources::{Pattern, ResourceKind},
};

/// One unit of a script, in source order
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Prolog(PrologStatement),
    Graphics(GraphicsOperation),
    Page(PageSize),
    EndPage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PrologStatement {
    Variable(VariableDeclaration),
    Resource(ResourceDeclaration),
    Color(ColorDeclaration),
    Pattern(PatternDeclaration),
}

impl PrologStatement {
    pub fn name(&self) -> &str {
        match self {
            Self::Variable(decl) => &decl.name,
            Self::Resource(decl) => &decl.name,
            Self::Color(decl) => &decl.name,
            Self::Pattern(decl) => &decl.name,
        }
    }
}

/// The types a `# var` declaration may use
#[script_enum(Name)]
pub enum VariableType {
    Number = "Number",
    String = "String",
    Boolean = "Boolean",
    Name = "Name",
}

impl VariableType {
    pub fn kind(self) -> ValueKind {
        match self {
            Self::Number => ValueKind::Number,
            Self::String => ValueKind::String,
            Self::Boolean => ValueKind::Boolean,
            Self::Name => ValueKind::Name,
        }
    }
}

/// `# var $name /Type value`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    /// Includes the leading `$`
    pub name: String,
    pub kind: ValueKind,
    pub value: Value,
}

/// `# resource /Name /Kind (location)`
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDeclaration {
    /// Includes the leading `/`
    pub name: String,
    pub kind: ResourceKind,
    pub location: String,
}

/// `# color /Name /ColorSpace c1 ... cn`
#[derive(Debug, Clone, PartialEq)]
pub struct ColorDeclaration {
    pub name: String,
    pub color: ColorSpace,
}

/// `# pattern /Name /Kind /ColorSpace << ... >>`
#[derive(Debug, Clone, PartialEq)]
pub struct PatternDeclaration {
    pub name: String,
    pub pattern: Pattern,
}

/// An operator with operands that match one of its signatures. Only
/// constructed through [`GraphicsOperation::parse`].
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsOperation {
    operator: Operator,
    operands: Vec<Value>,
}

impl GraphicsOperation {
    /// Pops the operands of `operator` off `stack`. On success the stack is
    /// left empty.
    pub fn parse(operator: Operator, stack: &mut Vec<Value>) -> PdfResult<Self> {
        let operands = operator.info().take_operands(operator, stack)?;

        Ok(Self { operator, operands })
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operands(&self) -> &[Value] {
        &self.operands
    }

    pub fn into_operands(self) -> Vec<Value> {
        self.operands
    }
}
