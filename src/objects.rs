use std::collections::HashMap;

use pdf_script_macro::script_enum;

use crate::{error::PdfResult, ParseError};

/// The kind of a [`Value`], and the type names accepted in variable
/// declarations (`/Number`, `/String`, ...)
#[script_enum(Name)]
pub enum ValueKind {
    Number = "Number",
    String = "String",
    Boolean = "Boolean",
    Name = "Name",
    Array = "Array",
    Dictionary = "Dictionary",
    Keyword = "Keyword",
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f32),

    /// Raw bytes, Latin-1 or a UTF-8 subset
    String(Vec<u8>),
    Boolean(bool),

    /// Includes the leading `/`
    Name(String),
    Array(Vec<Self>),
    Dictionary(Dictionary),
    Variable(Variable),

    /// An instruction symbol that is not otherwise classified, only found
    /// nested inside arrays and dictionaries
    Keyword(String),
}

/// A `$name` reference to a variable declared in the prolog
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Includes the leading `$`
    pub name: String,
    kind: Option<ValueKind>,
}

impl Variable {
    /// A variable whose declaration has been seen
    pub fn resolved(name: String, kind: ValueKind) -> Self {
        Self {
            name,
            kind: Some(kind),
        }
    }

    /// A variable used before (or without) its declaration. It never matches
    /// an operand signature.
    pub fn unresolved(name: String) -> Self {
        Self { name, kind: None }
    }

    pub fn kind(&self) -> Option<ValueKind> {
        self.kind
    }
}

impl Value {
    /// The effective kind of this value. Variables report their declared kind,
    /// or `None` if the declaration is unknown.
    pub fn kind(&self) -> Option<ValueKind> {
        Some(match self {
            Value::Number(..) => ValueKind::Number,
            Value::String(..) => ValueKind::String,
            Value::Boolean(..) => ValueKind::Boolean,
            Value::Name(..) => ValueKind::Name,
            Value::Array(..) => ValueKind::Array,
            Value::Dictionary(..) => ValueKind::Dictionary,
            Value::Keyword(..) => ValueKind::Keyword,
            Value::Variable(var) => return var.kind(),
        })
    }

    fn mismatch(&self, expected: ValueKind) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.as_str(),
            found: format!("{:?}", self),
        }
    }

    pub fn assert_number(self) -> PdfResult<f32> {
        match self {
            Value::Number(n) => Ok(n),
            other => anyhow::bail!(other.mismatch(ValueKind::Number)),
        }
    }

    pub fn assert_name(self) -> PdfResult<String> {
        match self {
            Value::Name(name) => Ok(name),
            other => anyhow::bail!(other.mismatch(ValueKind::Name)),
        }
    }

    pub fn assert_string(self) -> PdfResult<Vec<u8>> {
        match self {
            Value::String(s) => Ok(s),
            other => anyhow::bail!(other.mismatch(ValueKind::String)),
        }
    }

    pub fn assert_arr(self) -> PdfResult<Vec<Value>> {
        match self {
            Value::Array(arr) => Ok(arr),
            other => anyhow::bail!(other.mismatch(ValueKind::Array)),
        }
    }

    pub fn assert_dict(self) -> PdfResult<Dictionary> {
        match self {
            Value::Dictionary(dict) => Ok(dict),
            other => anyhow::bail!(other.mismatch(ValueKind::Dictionary)),
        }
    }

    pub fn assert_bool(self) -> PdfResult<bool> {
        match self {
            Value::Boolean(b) => Ok(b),
            other => anyhow::bail!(other.mismatch(ValueKind::Boolean)),
        }
    }

    pub fn assert_numbers(arr: Vec<Value>) -> PdfResult<Vec<f32>> {
        arr.into_iter().map(Value::assert_number).collect()
    }
}

/// A `<< /Key value ... >>` literal. Keys are stored without their leading `/`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    dict: HashMap<String, Value>,
}

impl Dictionary {
    pub fn new(dict: HashMap<String, Value>) -> Self {
        Self { dict }
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        let key = key.strip_prefix('/').unwrap_or(key);
        self.dict.insert(key.to_owned(), value);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.dict.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.dict.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dict.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.dict.get(key)
    }

    pub fn get_object(&mut self, key: &str) -> Option<Value> {
        self.dict.remove(key)
    }

    fn typed<T>(
        &mut self,
        key: &str,
        expected: ValueKind,
        convert: impl Fn(Value) -> PdfResult<T>,
    ) -> PdfResult<Option<T>> {
        match self.dict.remove(key) {
            Some(obj) if obj.kind() == Some(expected) => convert(obj).map(Some),
            Some(obj) => anyhow::bail!(ParseError::InvalidDictionaryValue {
                key: key.to_owned(),
                expected,
                found: obj.kind().unwrap_or(ValueKind::Keyword),
            }),
            None => Ok(None),
        }
    }

    fn required<T>(key: &str, value: Option<T>) -> PdfResult<T> {
        value.ok_or_else(|| {
            anyhow::anyhow!(ParseError::MissingRequiredKey {
                key: key.to_owned()
            })
        })
    }

    pub fn get_number(&mut self, key: &str) -> PdfResult<Option<f32>> {
        self.typed(key, ValueKind::Number, Value::assert_number)
    }

    pub fn expect_number(&mut self, key: &str) -> PdfResult<f32> {
        let value = self.get_number(key)?;
        Self::required(key, value)
    }

    pub fn get_name(&mut self, key: &str) -> PdfResult<Option<String>> {
        self.typed(key, ValueKind::Name, Value::assert_name)
    }

    pub fn get_bool(&mut self, key: &str) -> PdfResult<Option<bool>> {
        self.typed(key, ValueKind::Boolean, Value::assert_bool)
    }

    pub fn get_arr(&mut self, key: &str) -> PdfResult<Option<Vec<Value>>> {
        self.typed(key, ValueKind::Array, Value::assert_arr)
    }

    pub fn expect_arr(&mut self, key: &str) -> PdfResult<Vec<Value>> {
        let value = self.get_arr(key)?;
        Self::required(key, value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.dict.iter()
    }
}
