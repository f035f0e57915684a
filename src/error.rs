//! Error types for template parsing and component lifecycle

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::dom::DomError;
use crate::fetch::FetchError;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Parse error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl ParseError {
    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        match self {
            ParseError::Syntax {
                span,
                message,
                expected,
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };

                let written = Report::build(ReportKind::Error, filename, span.start)
                    .with_message(message)
                    .with_label(
                        Label::new((filename, span.clone()))
                            .with_message(format!("{}{}", message, expected_str))
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((filename, Source::from(source)), &mut buf);
                if written.is_err() {
                    return self.to_string();
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl<'a> From<chumsky::error::Rich<'a, crate::template::lexer::Token>> for ParseError {
    fn from(err: chumsky::error::Rich<'a, crate::template::lexer::Token>) -> Self {
        use chumsky::error::RichReason;

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of input".to_string(),
                };
                format!("Unexpected {}", found_str)
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                chumsky::error::RichPattern::EndOfInput => Some("end of input".to_string()),
                chumsky::error::RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                chumsky::error::RichPattern::Any => Some("any token".to_string()),
                chumsky::error::RichPattern::SomethingElse => None,
            })
            .collect();

        ParseError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &crate::template::lexer::Token) -> String {
    use crate::template::lexer::Token;
    match tok {
        Token::StartTag(tag) => format!("start tag <{}>", tag.name),
        Token::EndTag(name) => format!("closing tag </{}>", name),
        Token::Binding(key) => format!("binding {{{{{}}}}}", key),
        Token::Text(_) => "text".to_string(),
        _ => format!("{:?}", tok),
    }
}

/// Errors raised while loading or instantiating components
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    /// The template source could not be fetched
    #[error("failed to load component {name}: {error}")]
    Fetch { name: String, error: FetchError },

    /// The template source was fetched but does not parse
    #[error("invalid template for component {name}: {}", format_parse_errors(.errors))]
    Template {
        name: String,
        /// The template text that failed to parse
        contents: String,
        errors: Vec<ParseError>,
    },

    /// `instance` was called for a name that was never initialized
    #[error("component not registered: {name}")]
    NotRegistered { name: String },

    /// A behavior's own initialization failed
    #[error("component {name} failed to initialize: {message}")]
    Setup { name: String, message: String },

    /// The host document rejected a mutation
    #[error("document error: {0}")]
    Dom(#[from] DomError),
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
