//! Lexer for component templates using logos

use logos::Logos;

use super::ast::{Attribute, StartTag};

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    // Markup
    #[regex(r#"<[a-zA-Z][a-zA-Z0-9-]*([^>"']|"[^"]*"|'[^']*')*>"#, |lex| parse_start_tag(lex.slice()))]
    StartTag(StartTag),

    #[regex(r"</[a-zA-Z][a-zA-Z0-9-]*[ \t\n\r]*>", |lex| {
        let s = lex.slice();
        s[2..s.len() - 1].trim().to_string()
    })]
    EndTag(String),

    // Model reference: {{ key }}
    #[regex(r"\{\{[ \t]*[a-zA-Z_$][a-zA-Z0-9_$.-]*[ \t]*\}\}", |lex| {
        let s = lex.slice();
        s[2..s.len() - 2].trim().to_string()
    })]
    Binding(String),

    // Literal text; a lone `<` or `{` that starts nothing else is text too
    #[regex(r"[^<{]+", |lex| lex.slice().to_string())]
    #[token("<", |_| "<".to_string())]
    #[token("{", |_| "{".to_string())]
    Text(String),

    // Comments and doctype (skip)
    #[regex(r"<!--([^-]|-[^-])*-->", logos::skip)]
    Comment,

    #[regex(r"<![a-zA-Z][^>]*>", logos::skip)]
    Doctype,
}

/// Split the raw `<tag a="1" b>` slice into name and attributes
fn parse_start_tag(slice: &str) -> Option<StartTag> {
    let inner = slice.strip_prefix('<')?.strip_suffix('>')?;
    let (inner, self_closing) = match inner.trim_end().strip_suffix('/') {
        Some(rest) => (rest, true),
        None => (inner, false),
    };

    let name_end = inner
        .find(|c: char| c.is_whitespace() || c == '/')
        .unwrap_or(inner.len());
    let name = inner[..name_end].to_string();
    let mut rest = inner[name_end..].trim_start();
    let mut attributes = Vec::new();

    while !rest.is_empty() {
        let key_end = rest
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(rest.len());
        let key = &rest[..key_end];
        if key.is_empty() {
            return None;
        }
        rest = rest[key_end..].trim_start();

        let value = if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            let (value, remaining) = match after_eq.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &after_eq[1..];
                    let close = body.find(quote)?;
                    (&body[..close], &body[close + 1..])
                }
                Some(_) => {
                    let end = after_eq
                        .find(char::is_whitespace)
                        .unwrap_or(after_eq.len());
                    (&after_eq[..end], &after_eq[end..])
                }
                None => return None,
            };
            rest = remaining.trim_start();
            Some(value.to_string())
        } else {
            None
        };

        attributes.push(Attribute {
            name: key.to_string(),
            value,
        });
    }

    Some(StartTag {
        name,
        attributes,
        self_closing,
    })
}

/// Lex template source into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}
