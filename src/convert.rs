use std::{
    collections::{HashMap, HashSet},
    io::Read,
    rc::Rc,
};

use crate::{
    color::ColorSpace,
    content::{Context, GraphicsContext, Operator},
    data_structures::Rectangle,
    error::PdfResult,
    flow::{FlowFont, FlowOptions, Line, Span, TextFlow},
    font::FontMetrics,
    objects::{Dictionary, Value, ValueKind},
    page::PageSize,
    reader::StatementReader,
    resources::ResourceKind,
    statement::{
        GraphicsOperation, PatternDeclaration, PrologStatement, ResourceDeclaration, Statement,
        VariableDeclaration,
    },
    ParseError,
};

/// The document writer a script is converted into. Implementations own
/// object allocation, resource embedding and content serialization.
pub trait Writer {
    fn begin_page(&mut self, size: PageSize) -> PdfResult<()>;
    fn end_page(&mut self) -> PdfResult<()>;

    /// Called before the operator that opens a path
    fn begin_path(&mut self) -> PdfResult<()> {
        Ok(())
    }

    /// Called after the operator that paints or discards a path
    fn end_path(&mut self) -> PdfResult<()> {
        Ok(())
    }

    /// Called before `BT`
    fn begin_text(&mut self) -> PdfResult<()>;

    /// Called after `ET`
    fn end_text(&mut self) -> PdfResult<()>;

    fn write_operand(&mut self, value: &Value) -> PdfResult<()>;
    fn write_operator(&mut self, operator: &str) -> PdfResult<()>;

    /// Returns the name, with its leading `/`, under which the font is used
    /// in page content. Called once per declared font.
    fn font_handle(&mut self, resource: &ResourceDeclaration) -> PdfResult<String>;
    fn image_handle(&mut self, resource: &ResourceDeclaration) -> PdfResult<String>;
    fn pattern_handle(&mut self, pattern: &PatternDeclaration) -> PdfResult<String>;

    fn flush(&mut self) -> PdfResult<()>;
}

/// Loads metrics for declared font resources
pub trait FontSource {
    fn load(&mut self, resource: &ResourceDeclaration) -> PdfResult<Rc<dyn FontMetrics>>;
}

/// Caller supplied values that replace the initial values of declared
/// variables
#[derive(Debug, Clone, Default)]
pub struct Variables {
    values: HashMap<String, Value>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// `name` may be given with or without its leading `$`
    pub fn set(&mut self, name: &str, value: Value) -> &mut Self {
        let name = if name.starts_with('$') {
            name.to_owned()
        } else {
            format!("${}", name)
        };

        self.values.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionReport {
    pub statements: usize,
    pub pages: usize,

    /// Text flows that ran out of room. Only the lines that fit were written.
    pub overflows: usize,
}

/// A declared font together with the handle the writer gave it
#[derive(Debug, Clone)]
struct ScriptFont {
    handle: String,
    metrics: Rc<dyn FontMetrics>,
}

impl FlowFont for ScriptFont {
    fn metrics(&self) -> &dyn FontMetrics {
        &*self.metrics
    }

    fn same_font(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

/// Drives a [`StatementReader`] and feeds the statements to a [`Writer`].
///
/// Variables are replaced by their values and declared names by writer
/// handles. The script's own operators (`rr` aside) are expanded here: `di`
/// into an image placement and `ft` into a text object laid out by
/// [`TextFlow`].
pub struct Converter<W, S> {
    writer: W,
    fonts: S,
    overrides: Variables,
    context: GraphicsContext,

    variables: HashMap<String, Value>,
    resources: HashMap<String, ResourceDeclaration>,
    colors: HashMap<String, ColorSpace>,
    patterns: HashMap<String, PatternDeclaration>,

    /// Writer handles by declared name
    handles: HashMap<String, String>,
    loaded_fonts: HashMap<String, Rc<dyn FontMetrics>>,
    report: ConversionReport,
}

impl<W: Writer, S: FontSource> Converter<W, S> {
    pub fn new(writer: W, fonts: S) -> Self {
        Self {
            writer,
            fonts,
            overrides: Variables::default(),
            context: GraphicsContext::default(),
            variables: HashMap::new(),
            resources: HashMap::new(),
            colors: HashMap::new(),
            patterns: HashMap::new(),
            handles: HashMap::new(),
            loaded_fonts: HashMap::new(),
            report: ConversionReport::default(),
        }
    }

    /// Values replacing the declared ones. Every override must name a
    /// variable the document declares, see [`Converter::convert`].
    pub fn with_variables(mut self, variables: Variables) -> Self {
        self.overrides = variables;
        self
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Converts a whole document. Stops at the first error.
    ///
    /// Variables may be declared anywhere in a document, so an override for a
    /// variable that is never declared is only detected at end of input. By
    /// then every page has been handed to the writer, which is left
    /// unflushed and whose output must be discarded.
    pub fn convert<R: Read>(&mut self, reader: StatementReader<R>) -> PdfResult<ConversionReport> {
        for statement in reader {
            self.statement(statement?)?;
        }

        let declared = self.variables.keys().collect::<HashSet<_>>();
        if let Some(unknown) = self
            .overrides
            .values
            .keys()
            .find(|name| !declared.contains(name))
        {
            anyhow::bail!(ParseError::UndeclaredVariable {
                name: unknown.clone()
            });
        }

        self.writer.flush()?;

        log::debug!("{:?}", self.report);

        Ok(self.report)
    }

    pub fn statement(&mut self, statement: Statement) -> PdfResult<()> {
        self.report.statements += 1;

        match statement {
            Statement::Prolog(prolog) => self.declare(prolog),
            Statement::Page(size) => {
                self.context.begin_page();
                self.report.pages += 1;
                self.writer.begin_page(size)
            }
            Statement::EndPage => {
                self.context.end_page()?;
                self.writer.end_page()
            }
            Statement::Graphics(op) => self.operation(op),
        }
    }

    fn declare(&mut self, prolog: PrologStatement) -> PdfResult<()> {
        match prolog {
            PrologStatement::Variable(VariableDeclaration { name, kind, value }) => {
                let value = match self.overrides.get(&name) {
                    Some(value) if value.kind() == Some(kind) => value.clone(),
                    Some(value) => anyhow::bail!(ParseError::VariableTypeMismatch {
                        name,
                        expected: kind,
                        found: value.kind().unwrap_or(ValueKind::Keyword),
                    }),
                    None => value,
                };

                self.variables.insert(name, value);
            }
            PrologStatement::Resource(resource) => {
                self.resources.insert(resource.name.clone(), resource);
            }
            PrologStatement::Color(color) => {
                self.colors.insert(color.name, color.color);
            }
            PrologStatement::Pattern(pattern) => {
                self.patterns.insert(pattern.name.clone(), pattern);
            }
        }

        Ok(())
    }

    /// Replaces variables by their values, including inside arrays and
    /// dictionaries
    fn substitute(&self, value: Value) -> PdfResult<Value> {
        Ok(match value {
            Value::Variable(var) => match self.variables.get(&var.name) {
                Some(value) => value.clone(),
                None => anyhow::bail!(ParseError::UndeclaredVariable { name: var.name }),
            },
            Value::Array(arr) => Value::Array(
                arr.into_iter()
                    .map(|value| self.substitute(value))
                    .collect::<PdfResult<_>>()?,
            ),
            Value::Dictionary(dict) => {
                let mut substituted = Dictionary::default();
                for (key, value) in dict.iter() {
                    substituted.insert(key, self.substitute(value.clone())?);
                }

                Value::Dictionary(substituted)
            }
            value => value,
        })
    }

    fn resource(&self, name: &str, kind: ResourceKind) -> PdfResult<&ResourceDeclaration> {
        match self.resources.get(name) {
            Some(resource) if resource.kind == kind => Ok(resource),
            _ => anyhow::bail!(ParseError::UndeclaredResource {
                name: name.to_owned()
            }),
        }
    }

    fn resource_handle(&mut self, name: &str, kind: ResourceKind) -> PdfResult<String> {
        if let Some(handle) = self.handles.get(name) {
            return Ok(handle.clone());
        }

        let resource = self.resource(name, kind)?.clone();
        let handle = match kind {
            ResourceKind::Font => self.writer.font_handle(&resource)?,
            ResourceKind::Image => self.writer.image_handle(&resource)?,
        };

        self.handles.insert(name.to_owned(), handle.clone());
        Ok(handle)
    }

    fn pattern_handle(&mut self, name: &str) -> PdfResult<String> {
        if let Some(handle) = self.handles.get(name) {
            return Ok(handle.clone());
        }

        let pattern = match self.patterns.get(name) {
            Some(pattern) => pattern.clone(),
            None => anyhow::bail!(ParseError::UndeclaredResource {
                name: name.to_owned()
            }),
        };

        let handle = self.writer.pattern_handle(&pattern)?;
        self.handles.insert(name.to_owned(), handle.clone());
        Ok(handle)
    }

    fn font(&mut self, name: &str) -> PdfResult<ScriptFont> {
        let handle = self.resource_handle(name, ResourceKind::Font)?;

        let metrics = match self.loaded_fonts.get(name) {
            Some(metrics) => Rc::clone(metrics),
            None => {
                let resource = self.resource(name, ResourceKind::Font)?.clone();
                let metrics = self.fonts.load(&resource)?;
                self.loaded_fonts.insert(name.to_owned(), Rc::clone(&metrics));
                metrics
            }
        };

        Ok(ScriptFont { handle, metrics })
    }

    fn write(&mut self, operator: Operator, operands: &[Value]) -> PdfResult<()> {
        for operand in operands {
            self.writer.write_operand(operand)?;
        }

        self.writer.write_operator(operator.as_str())
    }

    fn operation(&mut self, op: GraphicsOperation) -> PdfResult<()> {
        let operator = op.operator();
        let mut operands = op
            .into_operands()
            .into_iter()
            .map(|value| self.substitute(value))
            .collect::<PdfResult<Vec<_>>>()?;

        let before = self.context.current();
        self.context.accept(operator)?;
        let after = self.context.current();

        if before != Context::PATH && after == Context::PATH {
            self.writer.begin_path()?;
        }

        if before != Context::TEXT && after == Context::TEXT {
            self.writer.begin_text()?;
        }

        match operator {
            Operator::di => self.draw_image(operands)?,
            Operator::ft => self.flow_text(operands)?,
            Operator::Tf | Operator::Do => {
                let kind = if operator == Operator::Tf {
                    ResourceKind::Font
                } else {
                    ResourceKind::Image
                };

                let name = operands[0].clone().assert_name()?;
                operands[0] = Value::Name(self.resource_handle(&name, kind)?);
                self.write(operator, &operands)?;
            }
            Operator::sh => {
                let name = operands[0].clone().assert_name()?;
                operands[0] = Value::Name(self.pattern_handle(&name)?);
                self.write(operator, &operands)?;
            }
            Operator::sc | Operator::SC | Operator::scn | Operator::SCN => {
                self.set_color(operator, operands)?
            }
            _ => self.write(operator, &operands)?,
        }

        if before == Context::PATH && after != Context::PATH {
            self.writer.end_path()?;
        }

        if before == Context::TEXT && after != Context::TEXT {
            self.writer.end_text()?;
        }

        Ok(())
    }

    /// Colour operators may name a declared colour, which becomes the
    /// matching device colour operator, or a declared pattern, which selects
    /// the pattern colour space first.
    fn set_color(&mut self, operator: Operator, mut operands: Vec<Value>) -> PdfResult<()> {
        let stroking = matches!(operator, Operator::SC | Operator::SCN);

        let name = match operands.last() {
            Some(Value::Name(name)) => name.clone(),
            _ => return self.write(operator, &operands),
        };

        if let Some(color) = self.colors.get(&name).copied() {
            if operands.len() == 1 {
                let components = color
                    .components()
                    .into_iter()
                    .map(Value::Number)
                    .collect::<Vec<_>>();

                return self.write(color.set_operator(stroking), &components);
            }
        }

        if self.patterns.contains_key(&name) {
            let handle = self.pattern_handle(&name)?;
            let space = if stroking { Operator::CS } else { Operator::cs };
            self.write(space, &[Value::Name("/Pattern".to_owned())])?;

            if let Some(last) = operands.last_mut() {
                *last = Value::Name(handle);
            }

            let operator = if stroking {
                Operator::SCN
            } else {
                Operator::scn
            };

            return self.write(operator, &operands);
        }

        self.write(operator, &operands)
    }

    /// `/Image x y w h di` becomes `q w 0 0 h x y cm /Handle Do Q`
    fn draw_image(&mut self, operands: Vec<Value>) -> PdfResult<()> {
        let mut operands = operands.into_iter();
        let mut next = || operands.next().unwrap_or(Value::Number(0.0));

        let name = next().assert_name()?;
        let x = next().assert_number()?;
        let y = next().assert_number()?;
        let width = next().assert_number()?;
        let height = next().assert_number()?;

        let handle = self.resource_handle(&name, ResourceKind::Image)?;

        self.write(Operator::q, &[])?;
        self.write(
            Operator::cm,
            &[
                Value::Number(width),
                Value::Number(0.0),
                Value::Number(0.0),
                Value::Number(height),
                Value::Number(x),
                Value::Number(y),
            ],
        )?;
        self.write(Operator::Do, &[Value::Name(handle)])?;
        self.write(Operator::Q, &[])
    }

    /// Reads the `[(text) /Font size ...]` span array of `ft`
    fn flow_spans(&mut self, arr: Vec<Value>) -> PdfResult<Vec<Span<ScriptFont>>> {
        if arr.len() % 3 != 0 {
            anyhow::bail!(ParseError::ComponentCountMismatch {
                what: "text flow span".to_owned(),
                expected: 3,
                found: arr.len() % 3,
            });
        }

        let mut spans = Vec::with_capacity(arr.len() / 3);
        let mut values = arr.into_iter();

        while let (Some(text), Some(font), Some(size)) = (values.next(), values.next(), values.next())
        {
            let text = decode_text(text.assert_string()?);
            let font = self.font(&font.assert_name()?)?;
            let size = size.assert_number()?;

            spans.push(Span { text, font, size });
        }

        Ok(spans)
    }

    /// `[spans] x y w h <<options>> ft`
    fn flow_text(&mut self, operands: Vec<Value>) -> PdfResult<()> {
        let mut operands = operands.into_iter();

        let spans = match operands.next() {
            Some(arr) => self.flow_spans(arr.assert_arr()?)?,
            None => Vec::new(),
        };

        let mut numbers = operands
            .by_ref()
            .take(4)
            .map(Value::assert_number)
            .collect::<PdfResult<Vec<_>>>()?
            .into_iter();
        let mut next = || numbers.next().unwrap_or_default();
        let rect = Rectangle::new(next(), next(), next(), next());

        let options = match operands.next() {
            Some(dict) => FlowOptions::from_dict(dict.assert_dict()?)?,
            None => FlowOptions::default(),
        };

        let lines = match TextFlow::new(options).flow(&spans, rect) {
            Ok(lines) => lines,
            Err(overflow) => {
                log::warn!("{}", overflow);
                self.report.overflows += 1;
                overflow.lines
            }
        };

        self.write_lines(&lines, &options)
    }

    fn write_lines(&mut self, lines: &[Line<ScriptFont>], options: &FlowOptions) -> PdfResult<()> {
        if lines.is_empty() {
            return Ok(());
        }

        self.write(Operator::q, &[])?;
        self.writer.begin_text()?;
        self.write(Operator::BT, &[])?;

        if options.character_spacing != 0.0 {
            self.write(Operator::Tc, &[Value::Number(options.character_spacing)])?;
        }

        if options.horizontal_scaling != 1.0 {
            self.write(
                Operator::Tz,
                &[Value::Number(options.horizontal_scaling * 100.0)],
            )?;
        }

        let mut font: Option<(&str, f32)> = None;
        let mut word_spacing = 0.0;
        let (mut x, mut y) = (0.0, 0.0);

        for span in lines.iter().flat_map(|line| &line.spans) {
            if font != Some((span.font.handle.as_str(), span.size)) {
                self.write(
                    Operator::Tf,
                    &[
                        Value::Name(span.font.handle.clone()),
                        Value::Number(span.size),
                    ],
                )?;
                font = Some((span.font.handle.as_str(), span.size));
            }

            if span.word_spacing != word_spacing {
                self.write(Operator::Tw, &[Value::Number(span.word_spacing)])?;
                word_spacing = span.word_spacing;
            }

            self.write(
                Operator::Td,
                &[Value::Number(span.x - x), Value::Number(span.baseline - y)],
            )?;
            x = span.x;
            y = span.baseline;

            self.write(Operator::Tj, &[Value::String(encode_text(&span.text))])?;
        }

        self.write(Operator::ET, &[])?;
        self.writer.end_text()?;
        self.write(Operator::Q, &[])
    }
}

/// Script strings are UTF-8 where valid, Latin-1 otherwise
fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().into_iter().map(char::from).collect(),
    }
}

/// Single byte encoding for show-text operators. Characters outside Latin-1
/// become `?`.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::font::FixedWidthFont;

    /// Writes content as text, one token per word
    #[derive(Default)]
    struct RecordingWriter {
        out: Vec<String>,
        flushed: bool,
    }

    impl RecordingWriter {
        fn content(&self) -> String {
            self.out.join(" ")
        }
    }

    impl Writer for RecordingWriter {
        fn begin_page(&mut self, size: PageSize) -> PdfResult<()> {
            self.out.push(format!("<page {}x{}>", size.width(), size.height()));
            Ok(())
        }

        fn end_page(&mut self) -> PdfResult<()> {
            self.out.push("</page>".to_owned());
            Ok(())
        }

        fn begin_path(&mut self) -> PdfResult<()> {
            self.out.push("<path>".to_owned());
            Ok(())
        }

        fn end_path(&mut self) -> PdfResult<()> {
            self.out.push("</path>".to_owned());
            Ok(())
        }

        fn begin_text(&mut self) -> PdfResult<()> {
            Ok(())
        }

        fn end_text(&mut self) -> PdfResult<()> {
            Ok(())
        }

        fn write_operand(&mut self, value: &Value) -> PdfResult<()> {
            self.out.push(match value {
                Value::Number(n) => format!("{}", n),
                Value::Name(name) => name.clone(),
                Value::String(s) => format!("({})", String::from_utf8_lossy(s)),
                other => format!("{:?}", other),
            });
            Ok(())
        }

        fn write_operator(&mut self, operator: &str) -> PdfResult<()> {
            self.out.push(operator.to_owned());
            Ok(())
        }

        fn font_handle(&mut self, _resource: &ResourceDeclaration) -> PdfResult<String> {
            Ok("/F1".to_owned())
        }

        fn image_handle(&mut self, _resource: &ResourceDeclaration) -> PdfResult<String> {
            Ok("/Im0".to_owned())
        }

        fn pattern_handle(&mut self, _pattern: &PatternDeclaration) -> PdfResult<String> {
            Ok("/P0".to_owned())
        }

        fn flush(&mut self) -> PdfResult<()> {
            self.flushed = true;
            Ok(())
        }
    }

    struct Monospace;

    impl FontSource for Monospace {
        fn load(&mut self, _resource: &ResourceDeclaration) -> PdfResult<Rc<dyn FontMetrics>> {
            Ok(Rc::new(FixedWidthFont::monospace(500.0, -200.0)))
        }
    }

    fn convert_with(
        script: &str,
        variables: Variables,
    ) -> PdfResult<(String, ConversionReport)> {
        let mut converter =
            Converter::new(RecordingWriter::default(), Monospace).with_variables(variables);
        let report = converter.convert(StatementReader::from_bytes(script.as_bytes()))?;

        let writer = converter.into_writer();
        assert!(writer.flushed);

        Ok((writer.content(), report))
    }

    fn convert(script: &str) -> String {
        convert_with(script, Variables::default()).unwrap().0
    }

    fn parse_error(result: PdfResult<(String, ConversionReport)>) -> ParseError {
        result
            .unwrap_err()
            .downcast_ref::<ParseError>()
            .cloned()
            .unwrap()
    }

    #[test]
    fn passes_plain_operators_through() {
        assert_eq!(
            convert("# page 200 100\nq 1 0 0 RG 2 w Q"),
            "<page 200x100> q 1 0 0 RG 2 w Q </page>"
        );
    }

    #[test]
    fn path_markers() {
        assert_eq!(
            convert("# page 200 100\n0 0 m 10 10 l S"),
            "<page 200x100> <path> 0 0 m 10 10 l S </path> </page>"
        );
    }

    #[test]
    fn declared_variable_values() {
        assert_eq!(
            convert("# var $width /Number 3\n# page 200 100\n$width w"),
            "<page 200x100> 3 w </page>"
        );
    }

    #[test]
    fn overridden_variable() {
        let mut variables = Variables::new();
        variables.set("width", Value::Number(7.0));

        let (content, _) =
            convert_with("# var $width /Number 3\n# page 200 100\n$width w", variables).unwrap();

        assert_eq!(content, "<page 200x100> 7 w </page>");
    }

    #[test]
    fn override_with_wrong_kind() {
        let mut variables = Variables::new();
        variables.set("$width", Value::String(b"wide".to_vec()));

        assert_eq!(
            parse_error(convert_with(
                "# var $width /Number 3\n# page 200 100\n$width w",
                variables
            )),
            ParseError::VariableTypeMismatch {
                name: "$width".to_owned(),
                expected: ValueKind::Number,
                found: ValueKind::String,
            }
        );
    }

    #[test]
    fn override_for_unknown_variable() {
        let mut variables = Variables::new();
        variables.set("height", Value::Number(1.0));

        assert_eq!(
            parse_error(convert_with("# page 200 100\n", variables)),
            ParseError::UndeclaredVariable {
                name: "$height".to_owned()
            }
        );
    }

    #[test]
    fn unknown_override_leaves_writer_unflushed() {
        let mut variables = Variables::new();
        variables.set("height", Value::Number(1.0));

        let mut converter =
            Converter::new(RecordingWriter::default(), Monospace).with_variables(variables);
        let result = converter.convert(StatementReader::from_bytes(
            b"# var $width /Number 10\n# page 200 100\n$width 0 m 0 0 l S",
        ));

        assert!(result.is_err());
        assert!(!converter.writer().flushed);
    }

    #[test]
    fn declared_colours_expand() {
        assert_eq!(
            convert("# color /Red /DeviceRGB 1 0 0\n# page 200 100\n/Red sc /Red SC"),
            "<page 200x100> 1 0 0 rg 1 0 0 RG </page>"
        );
    }

    #[test]
    fn declared_patterns_select_pattern_space() {
        let script = "# pattern /Fade /LinearGradient /DeviceGray \
                      << /Rect [0 0 100 20] /C0 [0] /C1 [1] /Stops [0 1] >>\n\
                      # page 200 100\n/Fade scn";

        assert_eq!(
            convert(script),
            "<page 200x100> /Pattern cs /P0 scn </page>"
        );
    }

    #[test]
    fn draw_image_expands() {
        assert_eq!(
            convert("# resource /Logo /Image (logo.png)\n# page 200 100\n/Logo 10 20 100 50 di"),
            "<page 200x100> q 100 0 0 50 10 20 cm /Im0 Do Q </page>"
        );
    }

    #[test]
    fn undeclared_font() {
        assert_eq!(
            parse_error(convert_with(
                "# page 200 100\nBT /F9 12 Tf ET",
                Variables::default()
            )),
            ParseError::UndeclaredResource {
                name: "/F9".to_owned()
            }
        );
    }

    #[test]
    fn image_is_not_a_font() {
        assert!(convert_with(
            "# resource /Logo /Image (logo.png)\n# page 200 100\nBT /Logo 12 Tf ET",
            Variables::default()
        )
        .is_err());
    }

    #[test]
    fn flow_text_emits_text_object() {
        let content = convert(
            "# resource /Body /Font (Courier)\n# page 200 100\n\
             [(hello world) /Body 10] 0 0 100 100 ft",
        );

        assert_eq!(
            content,
            "<page 200x100> q BT /F1 10 Tf 0 90 Td (hello world) Tj ET Q </page>"
        );
    }

    #[test]
    fn flow_text_relative_moves() {
        let content = convert(
            "# resource /Body /Font (Courier)\n# page 200 100\n\
             [(aaaa bbbb) /Body 10] 0 0 25 100 ft",
        );

        assert_eq!(
            content,
            "<page 200x100> q BT /F1 10 Tf 0 90 Td (aaaa) Tj 0 -10 Td (bbbb) Tj ET Q </page>"
        );
    }

    #[test]
    fn flow_overflow_is_reported_not_fatal() {
        let (content, report) = convert_with(
            "# resource /Body /Font (Courier)\n# page 200 100\n\
             [(aaaa bbbb) /Body 10] 0 0 25 15 ft 0 g",
            Variables::default(),
        )
        .unwrap();

        assert_eq!(report.overflows, 1);
        assert_eq!(report.pages, 1);
        assert!(content.contains("(aaaa) Tj"));
        assert!(!content.contains("bbbb"));
        assert!(content.ends_with("0 g </page>"));
    }

    #[test]
    fn flow_text_spans_come_in_threes() {
        assert!(matches!(
            parse_error(convert_with(
                "# resource /Body /Font (Courier)\n# page 200 100\n[(a) /Body] 0 0 25 15 ft",
                Variables::default()
            )),
            ParseError::ComponentCountMismatch { .. }
        ));
    }

    #[test]
    fn text_encoding() {
        assert_eq!(decode_text(vec![0xe9]), "\u{e9}");
        assert_eq!(encode_text("caf\u{e9} \u{2603}"), b"caf\xe9 ?".to_vec());
    }
}
