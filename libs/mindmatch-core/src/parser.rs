//! Markdown parser for matching-game content.
//!
//! # Format
//! ```markdown
//! ID: 1
//! T: Neuron
//! D: Sel yang menyusun sistem saraf dan menghantarkan impuls
//!
//! ID: 2
//! T: Mielin
//! D: Selubung lemak yang melindungi akson.
//! Multiple lines are supported.
//! ```
//!
//! Lines before the first field (titles, notes) are ignored.

use crate::error::ParseError;
use crate::types::TermDefinitionPair;
use std::collections::HashSet;

type Result<T> = std::result::Result<T, ParseError>;

/// Parse markdown content into term/definition pairs.
pub fn parse(content: &str) -> Result<Vec<TermDefinitionPair>> {
    let mut parser = Parser::new();

    for (idx, line) in content.lines().enumerate() {
        parser.process_line(line, idx + 1)?;
    }

    parser.finalize()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Term,
    Definition,
}

struct PairBuilder {
    id: Option<i64>,
    term: Option<String>,
    definition: Option<String>,
    start_line: usize,
}

impl PairBuilder {
    fn new(start_line: usize) -> Self {
        Self {
            id: None,
            term: None,
            definition: None,
            start_line,
        }
    }

    fn build(self) -> Result<(TermDefinitionPair, usize)> {
        let line = self.start_line;
        let id = self.id.ok_or(ParseError::MissingId { line })?;
        let term = self.term.ok_or(ParseError::MissingTerm { line })?;
        let definition = self
            .definition
            .ok_or(ParseError::MissingDefinition { line })?;

        Ok((
            TermDefinitionPair {
                id,
                term: term.trim().to_string(),
                definition: definition.trim().to_string(),
            },
            line,
        ))
    }
}

struct Parser {
    pairs: Vec<TermDefinitionPair>,
    seen_ids: HashSet<i64>,
    current: Option<PairBuilder>,
    current_field: Option<Field>,
    buffer: Vec<String>,
}

impl Parser {
    fn new() -> Self {
        Self {
            pairs: Vec::new(),
            seen_ids: HashSet::new(),
            current: None,
            current_field: None,
            buffer: Vec::new(),
        }
    }

    fn process_line(&mut self, line: &str, line_num: usize) -> Result<()> {
        match Self::parse_line(line) {
            LineType::Id(id_str) => self.handle_id(id_str, line_num)?,
            LineType::Term(text) => self.handle_term(text, line_num)?,
            LineType::Definition(text) => self.handle_definition(text, line_num),
            LineType::Text(text) => {
                if self.current_field.is_some() {
                    self.buffer.push(text.to_string());
                }
            }
            LineType::Empty => {
                if self.current_field.is_some() {
                    self.buffer.push(String::new());
                }
            }
        }
        Ok(())
    }

    fn parse_line(line: &str) -> LineType<'_> {
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix("ID:") {
            LineType::Id(rest.trim())
        } else if let Some(rest) = trimmed.strip_prefix("T:") {
            LineType::Term(rest.trim())
        } else if let Some(rest) = trimmed.strip_prefix("D:") {
            LineType::Definition(rest.trim())
        } else if trimmed.is_empty() {
            LineType::Empty
        } else {
            LineType::Text(line)
        }
    }

    fn handle_id(&mut self, id_str: &str, line_num: usize) -> Result<()> {
        self.flush_buffer();

        let id = id_str.parse::<i64>().map_err(|_| ParseError::InvalidId {
            line: line_num,
            value: id_str.to_string(),
        })?;

        self.finish_current()?;
        let mut builder = PairBuilder::new(line_num);
        builder.id = Some(id);
        self.current = Some(builder);
        self.current_field = None;
        Ok(())
    }

    fn handle_term(&mut self, text: &str, line_num: usize) -> Result<()> {
        self.flush_buffer();

        // A second term without an ID line in between starts a new pair
        let starts_new = self.current.as_ref().map_or(true, |p| p.term.is_some());
        if starts_new {
            self.finish_current()?;
            self.current = Some(PairBuilder::new(line_num));
        }

        self.current_field = Some(Field::Term);
        self.buffer.push(text.to_string());
        Ok(())
    }

    fn handle_definition(&mut self, text: &str, line_num: usize) {
        self.flush_buffer();

        if self.current.is_none() {
            self.current = Some(PairBuilder::new(line_num));
        }

        self.current_field = Some(Field::Definition);
        self.buffer.push(text.to_string());
    }

    fn flush_buffer(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        let content = self.buffer.join("\n");
        self.buffer.clear();

        if let Some(ref mut pair) = self.current {
            match self.current_field {
                Some(Field::Term) => pair.term = Some(content),
                Some(Field::Definition) => pair.definition = Some(content),
                None => {}
            }
        }
    }

    fn finish_current(&mut self) -> Result<()> {
        if let Some(builder) = self.current.take() {
            let (pair, line) = builder.build()?;
            if !self.seen_ids.insert(pair.id) {
                return Err(ParseError::DuplicateId { id: pair.id, line });
            }
            self.pairs.push(pair);
        }
        self.current_field = None;
        Ok(())
    }

    fn finalize(mut self) -> Result<Vec<TermDefinitionPair>> {
        self.flush_buffer();
        self.finish_current()?;
        Ok(self.pairs)
    }
}

enum LineType<'a> {
    Id(&'a str),
    Term(&'a str),
    Definition(&'a str),
    Text(&'a str),
    Empty,
}
