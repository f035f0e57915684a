//! Template parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::template::ast::*;
use crate::template::lexer::Token;

/// Parse template markup into a [`Template`]
pub fn parse(input: &str) -> Result<Template, Vec<crate::ParseError>> {
    let len = input.len();

    // Create a logos lexer and convert to token stream
    let token_iter = crate::template::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    template_parser()
        .parse(token_stream)
        .into_result()
        .map(Template::new)
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn template_parser<'a, I>() -> impl Parser<'a, I, Vec<Node>, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let nodes = recursive(|nodes| {
        // Adjacent text tokens collapse into one text node
        let text = select! { Token::Text(s) => s }
            .repeated()
            .at_least(1)
            .collect::<Vec<_>>()
            .map(|parts| Node::Text(parts.concat()));

        let binding = select! { Token::Binding(key) => key }
            .map_with(|key, e| Node::Binding(BindingRef {
                key,
                span: span_range(&e.span()),
            }));

        let void_element = select! { Token::StartTag(tag) if tag.is_void() => tag }
            .map(|tag| Node::Element(Element::from_start(tag, Vec::new())));

        let element = select! { Token::StartTag(tag) if !tag.is_void() => tag }
            .then(nodes)
            .then(select! { Token::EndTag(name) => name })
            .try_map(|((start, children), end), span: SimpleSpan| {
                if start.name.eq_ignore_ascii_case(&end) {
                    Ok(Node::Element(Element::from_start(start, children)))
                } else {
                    Err(Rich::custom(
                        span,
                        format!("mismatched closing tag: <{}> closed by </{}>", start.name, end),
                    ))
                }
            });

        choice((element, void_element, binding, text))
            .repeated()
            .collect::<Vec<_>>()
    });

    nodes.then_ignore(end())
}
