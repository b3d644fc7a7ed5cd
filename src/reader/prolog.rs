use std::io::Read;

use crate::{
    color::{ColorSpace, ColorSpaceName},
    content::Context,
    error::PdfResult,
    lex::Token,
    objects::Value,
    page::{PageSize, PageTemplate},
    resources::{Pattern, PatternKind, ResourceKind},
    statement::{
        ColorDeclaration, PatternDeclaration, PrologStatement, ResourceDeclaration, Statement,
        VariableDeclaration, VariableType,
    },
    ParseError,
};

use super::StatementReader;

fn unexpected<T>(expected: &'static str, token: Token) -> PdfResult<T> {
    if token == Token::EndOfInput {
        anyhow::bail!(ParseError::UnexpectedEof { expected });
    }

    anyhow::bail!(ParseError::UnexpectedToken {
        expected,
        found: format!("{:?}", token),
    })
}

impl<R: Read> StatementReader<R> {
    /// Reads the statement following a `#` marker
    pub(super) fn read_fragment(&mut self) -> PdfResult<Statement> {
        let keyword = match self.lexer.read_significant()? {
            Token::Keyword(keyword) => keyword,
            token => unexpected("fragment keyword", token)?,
        };

        let statement = match keyword.as_str() {
            "var" => PrologStatement::Variable(self.read_variable_declaration()?),
            "resource" => PrologStatement::Resource(self.read_resource_declaration()?),
            "color" => PrologStatement::Color(self.read_color_declaration()?),
            "pattern" => PrologStatement::Pattern(self.read_pattern_declaration()?),
            "page" => return self.read_page(),
            "endpage" => {
                if !self.page_open {
                    anyhow::bail!(ParseError::NotAllowedInContext {
                        operator: "endpage",
                        context: Context::NONE,
                    });
                }

                self.end_page()?;
                return Ok(Statement::EndPage);
            }
            _ => anyhow::bail!(ParseError::UnexpectedToken {
                expected: "var, resource, color, pattern, page or endpage",
                found: keyword,
            }),
        };

        Ok(Statement::Prolog(statement))
    }

    fn expect_name(&mut self, expected: &'static str) -> PdfResult<String> {
        match self.lexer.read_significant()? {
            Token::Name(name) => Ok(name),
            token => unexpected(expected, token),
        }
    }

    fn expect_number(&mut self, expected: &'static str) -> PdfResult<f32> {
        match self.lexer.read_significant()? {
            Token::Number(n) => Ok(n),
            token => unexpected(expected, token),
        }
    }

    /// Records a resource, colour or pattern name
    fn declare(&mut self, name: &str) -> PdfResult<()> {
        if !self.declared.insert(name.to_owned()) {
            anyhow::bail!(ParseError::DuplicateDeclaration {
                name: name.to_owned()
            });
        }

        Ok(())
    }

    fn read_variable_declaration(&mut self) -> PdfResult<VariableDeclaration> {
        let name = match self.lexer.read_significant()? {
            Token::Variable(name) => name,
            token => unexpected("variable name", token)?,
        };

        let type_name = self.expect_name("variable type")?;
        let ty = match VariableType::from_name(&type_name) {
            Ok(ty) => ty,
            Err(..) => anyhow::bail!(ParseError::UnsupportedVariableType { found: type_name }),
        };

        let value = match (ty, self.lexer.read_significant()?) {
            (VariableType::Number, Token::Number(n)) => Value::Number(n),
            (VariableType::String, Token::String(s)) => Value::String(self.terminated(s)?),
            (VariableType::Name, Token::Name(name)) => Value::Name(name),
            (VariableType::Boolean, Token::Keyword(keyword)) if keyword == "true" => {
                Value::Boolean(true)
            }
            (VariableType::Boolean, Token::Keyword(keyword)) if keyword == "false" => {
                Value::Boolean(false)
            }
            (ty, token) => unexpected(ty.as_str(), token)?,
        };

        if self.variables.contains_key(&name) {
            anyhow::bail!(ParseError::DuplicateDeclaration { name });
        }

        self.variables.insert(name.clone(), ty.kind());

        Ok(VariableDeclaration {
            name,
            kind: ty.kind(),
            value,
        })
    }

    fn read_resource_declaration(&mut self) -> PdfResult<ResourceDeclaration> {
        let name = self.expect_name("resource name")?;
        let kind = ResourceKind::from_name(&self.expect_name("resource type")?)?;

        let location = match self.lexer.read_significant()? {
            Token::String(s) => String::from_utf8_lossy(&self.terminated(s)?).into_owned(),
            token => unexpected("resource location", token)?,
        };

        self.declare(&name)?;

        Ok(ResourceDeclaration {
            name,
            kind,
            location,
        })
    }

    fn read_color_declaration(&mut self) -> PdfResult<ColorDeclaration> {
        let name = self.expect_name("colour name")?;
        let color_space = ColorSpaceName::from_name(&self.expect_name("colour space")?)?;

        let mut components = Vec::with_capacity(color_space.components());
        while components.len() < color_space.components() {
            match self.lexer.peek_significant()? {
                Token::Number(..) => components.push(self.expect_number("colour component")?),
                Token::EndOfInput => anyhow::bail!(ParseError::UnexpectedEof {
                    expected: "colour component"
                }),
                _ => break,
            }
        }

        let surplus = self.count_surplus_numbers()?;
        if components.len() != color_space.components() || surplus > 0 {
            anyhow::bail!(ParseError::ComponentCountMismatch {
                what: format!("colour {}", name),
                expected: color_space.components(),
                found: components.len() + surplus,
            });
        }

        let color = ColorSpace::from_components(color_space, &components)?;
        self.declare(&name)?;

        Ok(ColorDeclaration { name, color })
    }

    /// Counts a run of numbers that cannot be operands of a following
    /// operator, because the run ends at another `#` or at end of input.
    /// The stream position is left unchanged.
    fn count_surplus_numbers(&mut self) -> PdfResult<usize> {
        self.lexer.save_position();

        let mut count = 0;
        let result = loop {
            match self.lexer.read_significant() {
                Ok(Token::Number(..)) => count += 1,
                Ok(Token::EndOfInput) => break Ok(count),
                Ok(Token::Keyword(keyword)) if keyword == "#" => break Ok(count),
                Ok(..) => break Ok(0),
                Err(err) => break Err(err),
            }
        };

        self.lexer.restore_position();
        result
    }

    fn read_pattern_declaration(&mut self) -> PdfResult<PatternDeclaration> {
        let name = self.expect_name("pattern name")?;
        let kind = PatternKind::from_name(&self.expect_name("pattern type")?)?;
        let color_space = ColorSpaceName::from_name(&self.expect_name("colour space")?)?;

        let dict = match self.lexer.read_significant()? {
            Token::DictionaryStart => self.read_dictionary()?,
            token => unexpected("pattern dictionary", token)?,
        };

        let pattern = Pattern::from_dict(kind, color_space, dict)?;
        self.declare(&name)?;

        Ok(PatternDeclaration { name, pattern })
    }

    /// `# page /Template` or `# page width height`. A page that is still open
    /// is ended first.
    fn read_page(&mut self) -> PdfResult<Statement> {
        let size = match self.lexer.read_significant()? {
            Token::Name(name) => match PageTemplate::from_name(&name) {
                Ok(template) => PageSize::Template(template),
                Err(..) => anyhow::bail!(ParseError::UnknownPageTemplate { found: name }),
            },
            Token::Number(width) => {
                let height = self.expect_number("page height")?;
                PageSize::Explicit { width, height }
            }
            token => unexpected("page template or size", token)?,
        };

        let page = Statement::Page(size);

        if self.page_open {
            log::debug!("new page implicitly ends the previous one");
            self.end_page()?;
            self.context.begin_page();
            self.page_open = true;
            self.pending.push_back(page);
            return Ok(Statement::EndPage);
        }

        self.context.begin_page();
        self.page_open = true;

        Ok(page)
    }
}
