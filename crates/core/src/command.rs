//! Free-text command parsing.
//!
//! Recognizes requests such as `criar apresentação slides: Intro; Fim` or
//! `gerar excel dados: Nome,Idade|Ana,30` and turns them into slides or rows.
//! Intent keywords are matched on an NFC-normalized copy of the input; the
//! payload is always sliced from the original text.

use crate::types::{DocumentKind, Row, Slide};
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static PRESENTATION_INTENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(criar apresentação|gerar pptx?|create presentation|generate pptx?)\b")
        .unwrap()
});

static SPREADSHEET_INTENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(criar planilha|gerar excel|create spreadsheet|generate xlsx)\b").unwrap()
});

static SLIDES_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bslides:").unwrap());

static DATA_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(dados|data):").unwrap());

const SLIDE_SEPARATOR: char = ';';
const ROW_SEPARATOR: char = '|';
const CELL_SEPARATOR: char = ',';

/// A parsed generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Presentation(Vec<Slide>),
    Spreadsheet(Vec<Row>),
}

impl Command {
    /// The document kind this command produces.
    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Presentation(_) => DocumentKind::Presentation,
            Self::Spreadsheet(_) => DocumentKind::Spreadsheet,
        }
    }
}

/// Parser for free-text generation commands.
#[derive(Debug, Clone)]
pub struct CommandParser {
    default_slides: Vec<Slide>,
    default_rows: Vec<Row>,
}

impl Default for CommandParser {
    fn default() -> Self {
        Self {
            default_slides: vec![
                Slide::new("Título da Apresentação"),
                Slide::new("Tópico 1: Introdução"),
                Slide::new("Tópico 2: Desenvolvimento"),
                Slide::new("Tópico 3: Conclusão"),
            ],
            default_rows: vec![
                Row::new(["Nome", "Idade", "Cidade"]),
                Row::new(["João", "25", "São Paulo"]),
                Row::new(["Maria", "30", "Rio de Janeiro"]),
                Row::new(["Carlos", "22", "Belo Horizonte"]),
            ],
        }
    }
}

impl CommandParser {
    /// Create a parser with the built-in default content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Detect which document the input asks for, if any.
    pub fn detect_intent(&self, input: &str) -> Option<DocumentKind> {
        let normalized: String = input.nfc().collect();

        if PRESENTATION_INTENT_REGEX.is_match(&normalized) {
            Some(DocumentKind::Presentation)
        } else if SPREADSHEET_INTENT_REGEX.is_match(&normalized) {
            Some(DocumentKind::Spreadsheet)
        } else {
            None
        }
    }

    /// Parse a command. Returns `None` when the input is not a generation request.
    pub fn parse(&self, input: &str) -> Option<Command> {
        let command = match self.detect_intent(input)? {
            DocumentKind::Presentation => {
                Command::Presentation(match SLIDES_MARKER_REGEX.find(input) {
                    Some(m) => parse_slides(&input[m.end()..]),
                    None => self.default_slides.clone(),
                })
            }
            DocumentKind::Spreadsheet => {
                Command::Spreadsheet(match DATA_MARKER_REGEX.find(input) {
                    Some(m) => parse_rows(&input[m.end()..]),
                    None => self.default_rows.clone(),
                })
            }
        };

        log::debug!("Parsed {:?} command", command.kind());
        Some(command)
    }
}

fn parse_slides(payload: &str) -> Vec<Slide> {
    non_empty_segments(payload, SLIDE_SEPARATOR)
        .map(Slide::new)
        .collect()
}

fn parse_rows(payload: &str) -> Vec<Row> {
    non_empty_segments(payload, ROW_SEPARATOR)
        .map(|row| Row::from_delimited(row, CELL_SEPARATOR))
        .collect()
}

fn non_empty_segments(text: &str, separator: char) -> impl Iterator<Item = &str> {
    text.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presentation_with_slides() {
        let parser = CommandParser::new();
        let command = parser
            .parse("Por favor criar apresentação slides: Intro; Meio ;Fim")
            .unwrap();

        assert_eq!(
            command,
            Command::Presentation(vec![
                Slide::new("Intro"),
                Slide::new("Meio"),
                Slide::new("Fim"),
            ])
        );
    }

    #[test]
    fn test_presentation_defaults() {
        let parser = CommandParser::new();
        let command = parser.parse("gerar ppt").unwrap();

        match command {
            Command::Presentation(slides) => {
                assert_eq!(slides.len(), 4);
                assert_eq!(slides[0].text, "Título da Apresentação");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_spreadsheet_rows_keep_trailing_row() {
        let parser = CommandParser::new();
        let command = parser
            .parse("gerar excel dados: Nome,Idade|Ana,30|Bia")
            .unwrap();

        assert_eq!(
            command,
            Command::Spreadsheet(vec![
                Row::new(["Nome", "Idade"]),
                Row::new(["Ana", "30"]),
                Row::new(["Bia"]),
            ])
        );
    }

    #[test]
    fn test_spreadsheet_defaults() {
        let parser = CommandParser::new();
        let command = parser.parse("Create Spreadsheet please").unwrap();

        match command {
            Command::Spreadsheet(rows) => {
                assert_eq!(rows.len(), 4);
                assert_eq!(rows[0], Row::new(["Nome", "Idade", "Cidade"]));
                assert!(rows.iter().all(|row| row.len() == 3));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_decomposed_keyword_matches() {
        let parser = CommandParser::new();
        // "ç" and "ã" written as base letter + combining mark
        let input = "criar apresenta\u{0063}\u{0327}a\u{0303}o slides: Um";
        assert_eq!(
            parser.detect_intent(input),
            Some(DocumentKind::Presentation)
        );
        assert_eq!(
            parser.parse(input),
            Some(Command::Presentation(vec![Slide::new("Um")]))
        );
    }

    #[test]
    fn test_not_a_command() {
        let parser = CommandParser::new();
        assert_eq!(parser.detect_intent("olá, tudo bem?"), None);
        assert!(parser.parse("slides: a; b").is_none());
    }
}
