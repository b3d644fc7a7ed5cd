use std::{
    collections::{HashMap, HashSet, VecDeque},
    io::Read,
};

use anyhow::Context as _;

use crate::{
    content::{Context, GraphicsContext, Operator},
    error::PdfResult,
    lex::{LexerOptions, ScriptLexer, Token},
    objects::{Dictionary, Value, ValueKind, Variable},
    statement::{GraphicsOperation, Statement},
    ParseError,
};

mod prolog;

/// Parses a script into [`Statement`]s, one at a time.
///
/// Operands are pushed onto a stack until an operator keyword is read, at
/// which point the operator takes exactly the operands of one of its
/// signatures. Every accepted operator drives the graphics context, so an
/// operator outside its legal context is rejected here. Reading stops at the
/// first error.
pub struct StatementReader<R> {
    lexer: ScriptLexer<R>,

    /// Declared kind of every `$variable` seen so far
    variables: HashMap<String, ValueKind>,

    /// Names of declared resources, colours and patterns
    declared: HashSet<String>,
    context: GraphicsContext,
    stack: Vec<Value>,

    /// Statements produced ahead of time, such as the `Page` following an
    /// implicit `EndPage`
    pending: VecDeque<Statement>,
    page_open: bool,
    finished: bool,
}

impl<'a> StatementReader<&'a [u8]> {
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

impl<R: Read> StatementReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, LexerOptions::default())
    }

    pub fn with_options(reader: R, options: LexerOptions) -> Self {
        Self {
            lexer: ScriptLexer::with_options(reader, options),
            variables: HashMap::new(),
            declared: HashSet::new(),
            context: GraphicsContext::default(),
            stack: Vec::new(),
            pending: VecDeque::new(),
            page_open: false,
            finished: false,
        }
    }

    /// The graphics context after the last statement returned
    pub fn context(&self) -> Context {
        self.context.current()
    }

    /// Reads the next statement, or `None` once the input is exhausted
    pub fn read_statement(&mut self) -> PdfResult<Option<Statement>> {
        if let Some(statement) = self.pending.pop_front() {
            return Ok(Some(statement));
        }

        let offset = self.lexer.position();

        self.read_statement_inner()
            .with_context(|| format!("in statement starting at byte {}", offset))
    }

    fn read_statement_inner(&mut self) -> PdfResult<Option<Statement>> {
        loop {
            let token = self.lexer.read_significant()?;
            log::trace!("token {:?}", token);

            match token {
                Token::EndOfInput => {
                    if !self.stack.is_empty() {
                        anyhow::bail!(ParseError::DanglingOperands {
                            count: self.stack.len(),
                        });
                    }

                    if self.page_open {
                        log::debug!("end of input closes the open page");
                        self.end_page()?;
                        return Ok(Some(Statement::EndPage));
                    }

                    return Ok(None);
                }
                Token::Keyword(keyword) if keyword == "#" => {
                    if !self.stack.is_empty() {
                        anyhow::bail!(ParseError::DanglingOperands {
                            count: self.stack.len(),
                        });
                    }

                    let statement = self.read_fragment()?;
                    log::debug!("{:?}", statement);
                    return Ok(Some(statement));
                }
                Token::Keyword(keyword) if keyword == "true" || keyword == "false" => {
                    self.stack.push(Value::Boolean(keyword == "true"));
                }
                Token::Keyword(keyword) => {
                    let operator = Operator::lookup(&keyword)?;
                    let operation = GraphicsOperation::parse(operator, &mut self.stack)?;
                    self.context.accept(operator)?;

                    log::debug!("{} {:?}", operator, operation.operands());
                    return Ok(Some(Statement::Graphics(operation)));
                }
                token => {
                    let value = self.read_value(token)?;
                    self.stack.push(value);
                }
            }
        }
    }

    /// Rejects a string the lexer cut off at end of input
    fn terminated(&self, s: Vec<u8>) -> PdfResult<Vec<u8>> {
        if self.lexer.last_token_unterminated() {
            anyhow::bail!(ParseError::UnexpectedEof {
                expected: "end of string"
            });
        }

        Ok(s)
    }

    /// Converts `token`, reading further tokens for arrays and dictionaries
    fn read_value(&mut self, token: Token) -> PdfResult<Value> {
        Ok(match token {
            Token::Number(n) => Value::Number(n),
            Token::String(s) => Value::String(self.terminated(s)?),
            Token::Name(name) => Value::Name(name),
            Token::Variable(name) => Value::Variable(self.variable(name)),
            Token::ArrayStart => Value::Array(self.read_array()?),
            Token::DictionaryStart => Value::Dictionary(self.read_dictionary()?),
            Token::Keyword(keyword) => match keyword.as_str() {
                "true" => Value::Boolean(true),
                "false" => Value::Boolean(false),
                _ => Value::Keyword(keyword),
            },
            Token::ObjectReference => anyhow::bail!(ParseError::ObjectReferenceNotSupported),
            Token::EndOfInput => anyhow::bail!(ParseError::UnexpectedEof { expected: "value" }),
            token @ (Token::ArrayEnd | Token::DictionaryEnd | Token::Whitespace | Token::Comment(..)) => {
                anyhow::bail!(ParseError::UnexpectedToken {
                    expected: "value",
                    found: format!("{:?}", token),
                })
            }
        })
    }

    fn variable(&self, name: String) -> Variable {
        match self.variables.get(&name) {
            Some(&kind) => Variable::resolved(name, kind),
            None => {
                log::debug!("{} is used before its declaration", name);
                Variable::unresolved(name)
            }
        }
    }

    fn read_array(&mut self) -> PdfResult<Vec<Value>> {
        let mut arr = Vec::new();

        loop {
            match self.lexer.read_significant()? {
                Token::ArrayEnd => return Ok(arr),
                Token::EndOfInput => anyhow::bail!(ParseError::UnexpectedEof {
                    expected: "end of array"
                }),
                token => arr.push(self.read_value(token)?),
            }
        }
    }

    fn read_dictionary(&mut self) -> PdfResult<Dictionary> {
        let mut dict = Dictionary::default();

        loop {
            let key = match self.lexer.read_significant()? {
                Token::DictionaryEnd => return Ok(dict),
                Token::Name(key) => key,
                Token::EndOfInput => anyhow::bail!(ParseError::UnexpectedEof {
                    expected: "end of dictionary"
                }),
                token => anyhow::bail!(ParseError::UnexpectedToken {
                    expected: "dictionary key",
                    found: format!("{:?}", token),
                }),
            };

            let token = self.lexer.read_significant()?;
            let value = self.read_value(token)?;
            dict.insert(&key, value);
        }
    }

    fn end_page(&mut self) -> PdfResult<()> {
        self.context.end_page()?;
        self.page_open = false;
        Ok(())
    }
}

impl<R: Read> Iterator for StatementReader<R> {
    type Item = PdfResult<Statement>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.read_statement() {
            Ok(Some(statement)) => Some(Ok(statement)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{page::PageSize, page::PageTemplate, statement::PrologStatement};

    fn read_all(script: &str) -> PdfResult<Vec<Statement>> {
        StatementReader::from_bytes(script.as_bytes()).collect()
    }

    fn parse_error(script: &str) -> ParseError {
        let err = read_all(script).unwrap_err();
        err.downcast_ref::<ParseError>().cloned().unwrap()
    }

    fn operators(statements: &[Statement]) -> Vec<Operator> {
        statements
            .iter()
            .filter_map(|statement| match statement {
                Statement::Graphics(op) => Some(op.operator()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn simple_page() {
        let statements =
            read_all("# page /A4\n10 10 m 100 100 l S\nBT /F1 12 Tf (Hi) Tj ET\n# endpage\n")
                .unwrap();

        assert_eq!(
            statements.first(),
            Some(&Statement::Page(PageSize::Template(PageTemplate::A4)))
        );
        assert_eq!(statements.last(), Some(&Statement::EndPage));
        assert_eq!(
            operators(&statements),
            vec![
                Operator::m,
                Operator::l,
                Operator::S,
                Operator::BT,
                Operator::Tf,
                Operator::Tj,
                Operator::ET
            ]
        );
    }

    #[test]
    fn operands_keep_source_order() {
        let statements = read_all("# page 200 100\n1 0 0 1 50 60 cm\n").unwrap();

        match &statements[1] {
            Statement::Graphics(op) => assert_eq!(
                op.operands(),
                &[
                    Value::Number(1.0),
                    Value::Number(0.0),
                    Value::Number(0.0),
                    Value::Number(1.0),
                    Value::Number(50.0),
                    Value::Number(60.0),
                ]
            ),
            other => panic!("expected graphics operation, found {:?}", other),
        }
    }

    #[test]
    fn string_operand_for_moveto_is_a_type_mismatch() {
        assert_eq!(
            parse_error("# page /A4\n(String) 10 m"),
            ParseError::TypeMismatch {
                operator: "m",
                position: 0,
                expected: ValueKind::Number,
                found: Some(ValueKind::String),
            }
        );
    }

    #[test]
    fn rounded_rectangles() {
        assert!(read_all("# page /A4\n10 10 200 150 10 10 rr n").is_ok());
        assert!(read_all("# page /A4\n10 10 200 150 10 rr n").is_ok());
        assert!(matches!(
            parse_error("# page /A4\n10 10 200 150 rr n"),
            ParseError::NoOperandMatch { operator: "rr", .. }
        ));
    }

    #[test]
    fn declared_variable_resolves_to_its_kind() {
        let statements = read_all(
            "# var $fontSize /Number 12\n# page /A4\nBT /F1 $fontSize Tf ET",
        )
        .unwrap();

        assert_eq!(operators(&statements), vec![Operator::BT, Operator::Tf, Operator::ET]);

        assert_eq!(
            parse_error("# var $fontSize /Number 12\n# page /A4\nBT $fontSize 12 Tf ET"),
            ParseError::TypeMismatch {
                operator: "Tf",
                position: 0,
                expected: ValueKind::Name,
                found: Some(ValueKind::Number),
            }
        );
    }

    #[test]
    fn undeclared_variable_never_matches() {
        assert!(matches!(
            parse_error("# page /A4\n$size 0 m"),
            ParseError::TypeMismatch { found: None, .. }
        ));
    }

    #[test]
    fn unknown_operator() {
        assert_eq!(
            parse_error("# page /A4\n1 2 foo"),
            ParseError::UnknownOperator {
                found: "foo".to_owned()
            }
        );
    }

    #[test]
    fn operator_outside_page() {
        assert_eq!(
            parse_error("10 10 m"),
            ParseError::NotAllowedInContext {
                operator: "m",
                context: Context::NONE,
            }
        );
    }

    #[test]
    fn text_operator_in_path() {
        assert_eq!(
            parse_error("# page /A4\n0 0 m (x) Tj"),
            ParseError::NotAllowedInContext {
                operator: "Tj",
                context: Context::PATH,
            }
        );
    }

    #[test]
    fn leftover_operands_before_operator() {
        assert_eq!(
            parse_error("# page /A4\n1 2 3 m"),
            ParseError::UnconsumedOperands {
                operator: "m",
                count: 1,
            }
        );
    }

    #[test]
    fn dangling_operands_at_end_of_input() {
        assert_eq!(
            parse_error("# page /A4\n1 2"),
            ParseError::DanglingOperands { count: 2 }
        );
    }

    #[test]
    fn implicit_page_ends() {
        let statements = read_all("# page /A4\n# page /Letter\nq Q").unwrap();

        assert_eq!(
            statements,
            vec![
                Statement::Page(PageSize::Template(PageTemplate::A4)),
                Statement::EndPage,
                Statement::Page(PageSize::Template(PageTemplate::Letter)),
                Statement::Graphics(GraphicsOperation::parse(Operator::q, &mut Vec::new()).unwrap()),
                Statement::Graphics(GraphicsOperation::parse(Operator::Q, &mut Vec::new()).unwrap()),
                Statement::EndPage,
            ]
        );
    }

    #[test]
    fn page_end_inside_text_object() {
        assert_eq!(
            parse_error("# page /A4\nBT\n# endpage"),
            ParseError::UnclosedContext {
                context: Context::TEXT
            }
        );
        assert_eq!(
            parse_error("# page /A4\n0 0 m"),
            ParseError::UnclosedContext {
                context: Context::PATH
            }
        );
    }

    #[test]
    fn arrays_and_dictionaries() {
        let statements = read_all(
            "# page /A4\n[3 2] 0 d\n[(The quick fox) /F1 12] 10 10 200 100 << /Align /Center /Justify true >> ft",
        )
        .unwrap();

        match &statements[2] {
            Statement::Graphics(op) => {
                assert_eq!(op.operator(), Operator::ft);

                let mut dict = op.operands()[5].clone().assert_dict().unwrap();
                assert_eq!(dict.get_name("Align").unwrap(), Some("/Center".to_owned()));
                assert_eq!(dict.get_bool("Justify").unwrap(), Some(true));
            }
            other => panic!("expected ft, found {:?}", other),
        }
    }

    #[test]
    fn object_references_are_rejected() {
        assert_eq!(
            parse_error("# page /A4\n[1 0 R] 0 d"),
            ParseError::ObjectReferenceNotSupported
        );
    }

    #[test]
    fn unterminated_array() {
        assert_eq!(
            parse_error("# page /A4\n[1 2"),
            ParseError::UnexpectedEof {
                expected: "end of array"
            }
        );
    }

    #[test]
    fn unterminated_string_operand() {
        assert_eq!(
            parse_error("# page /A4\nBT (Hello Tj"),
            ParseError::UnexpectedEof {
                expected: "end of string"
            }
        );
        assert_eq!(
            parse_error("# page /A4\n[<414"),
            ParseError::UnexpectedEof {
                expected: "end of string"
            }
        );
    }

    #[test]
    fn prolog_statements_are_yielded() {
        let statements = read_all("# var $title /String (Hello)\n").unwrap();

        match &statements[..] {
            [Statement::Prolog(PrologStatement::Variable(var))] => {
                assert_eq!(var.name, "$title");
                assert_eq!(var.value, Value::String(b"Hello".to_vec()));
            }
            other => panic!("unexpected statements {:?}", other),
        }
    }

    #[test]
    fn iteration_stops_after_error() {
        let mut reader = StatementReader::from_bytes(b"# page /A4\nfoo\n0 0 m");

        assert!(reader.next().unwrap().is_ok());
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }
}
