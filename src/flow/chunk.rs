use super::{FlowFont, FlowOptions, Span};

const WORD_SEPARATORS: &[char] = &[' ', '\t', '\r', '\n', '\x0C'];

/// A measured word, or the part of a word that falls in one span
#[derive(Debug, Clone)]
pub(super) struct Word<F> {
    pub text: String,
    pub font: F,
    pub size: f32,
    pub width: f32,
}

/// Words with no whitespace between them. Usually a single word, but a span
/// boundary inside a word glues the pieces on either side. A chunk is never
/// split across lines.
#[derive(Debug, Clone)]
pub(super) struct Chunk<F> {
    pub words: Vec<Word<F>>,
    pub width: f32,

    /// Width of the space that separates this chunk from the next one,
    /// measured in the font of the last word
    pub space_after: f32,
}

impl<F> Chunk<F> {
    fn new(word: Word<F>, space: f32) -> Self {
        Self {
            width: word.width,
            words: vec![word],
            space_after: space,
        }
    }

    fn glue(&mut self, word: Word<F>, space: f32) {
        self.width += word.width;
        self.words.push(word);
        self.space_after = space;
    }

    pub fn height(&self) -> f32 {
        self.words.iter().map(|word| word.size).fold(0.0, f32::max)
    }
}

/// Splits every span into measured words and groups them into chunks
pub(super) fn split<F: FlowFont>(spans: &[Span<F>], options: &FlowOptions) -> Vec<Chunk<F>> {
    let mut chunks: Vec<Chunk<F>> = Vec::new();

    // whether the previous span ended inside a word
    let mut inside_word = false;

    for span in spans {
        if span.text.is_empty() {
            continue;
        }

        let metrics = span.font.metrics();
        let space = metrics.space_width(
            span.size,
            options.character_spacing,
            options.horizontal_scaling,
        );
        let continues_word = inside_word && !span.text.starts_with(WORD_SEPARATORS);

        for (idx, text) in span
            .text
            .split(WORD_SEPARATORS)
            .filter(|text| !text.is_empty())
            .enumerate()
        {
            let word = Word {
                text: text.to_owned(),
                font: span.font.clone(),
                size: span.size,
                width: metrics.text_width(
                    text,
                    span.size,
                    options.character_spacing,
                    options.horizontal_scaling,
                ),
            };

            match chunks.last_mut() {
                Some(chunk) if idx == 0 && continues_word => chunk.glue(word, space),
                _ => chunks.push(Chunk::new(word, space)),
            }
        }

        inside_word = !span.text.ends_with(WORD_SEPARATORS);
    }

    chunks
}

#[cfg(test)]
mod test {
    use std::rc::Rc;

    use super::*;
    use crate::font::{FixedWidthFont, FontMetrics};

    fn span(text: &str, size: f32) -> Span<Rc<dyn FontMetrics>> {
        Span {
            text: text.to_owned(),
            font: Rc::new(FixedWidthFont::monospace(500.0, 0.0)),
            size,
        }
    }

    fn texts(chunks: &[Chunk<Rc<dyn FontMetrics>>]) -> Vec<Vec<&str>> {
        chunks
            .iter()
            .map(|chunk| chunk.words.iter().map(|word| word.text.as_str()).collect())
            .collect()
    }

    #[test]
    fn words_split_on_whitespace() {
        let chunks = split(&[span("one\ttwo\n three", 10.0)], &FlowOptions::default());

        assert_eq!(texts(&chunks), vec![vec!["one"], vec!["two"], vec!["three"]]);
        assert_eq!(chunks[0].width, 15.0);
        assert_eq!(chunks[0].space_after, 5.0);
    }

    #[test]
    fn span_boundary_inside_word_glues() {
        let chunks = split(
            &[span("big Hel", 10.0), span("lo world", 20.0)],
            &FlowOptions::default(),
        );

        assert_eq!(
            texts(&chunks),
            vec![vec!["big"], vec!["Hel", "lo"], vec!["world"]]
        );
        assert_eq!(chunks[1].width, 15.0 + 20.0);
        assert_eq!(chunks[1].height(), 20.0);
        assert_eq!(chunks[1].space_after, 10.0);
    }

    #[test]
    fn whitespace_at_boundary_separates() {
        let chunks = split(
            &[span("a ", 10.0), span("b", 10.0), span(" c", 10.0)],
            &FlowOptions::default(),
        );

        assert_eq!(texts(&chunks), vec![vec!["a"], vec!["b"], vec!["c"]]);
    }

    #[test]
    fn empty_spans_are_skipped() {
        let chunks = split(
            &[span("ab", 10.0), span("", 10.0), span("cd", 10.0)],
            &FlowOptions::default(),
        );

        assert_eq!(texts(&chunks), vec![vec!["ab", "cd"]]);
    }
}
