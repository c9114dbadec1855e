//! Script parsing: a pre-lex alphabet scan followed by the pest grammar in
//! `script.pest`, then a bottom-up build of the [`Script`] tree with local
//! normalization (additive children deduplicated and sorted, single-child
//! unions and all-null multiplications collapsed).

use lazy_static::lazy_static;
use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;
use pest_derive::Parser;
use regex::Regex;

use crate::error::{Result, ScriptError};
use crate::script::Script;

#[derive(Parser)]
#[grammar = "script.pest"]
struct ScriptParser;

lazy_static! {
    /// Anything outside the fixed alphabet: primitives, shorthand codes,
    /// layer marks and the addition separator.
    static ref FOREIGN: Regex =
        Regex::new(r"[^EUASBTOMFIwyoeuaijgsbthckmnpxdfl:.\-',_;+]").unwrap();
}

/// Parses a script string into its canonical [`Script`] tree.
///
/// Unrecognized characters surface as [`ScriptError::Lex`] with the byte
/// position; structurally invalid token sequences (unbalanced layer marks,
/// more than three multiplicative slots, trailing text) surface as
/// [`ScriptError::Parse`]. Re-parsing a render yields an equal tree.
pub fn parse_script(text: &str) -> Result<Script> {
    if let Some(found) = FOREIGN.find(text) {
        let character = text[found.start()..]
            .chars()
            .next()
            .expect("match starts at a character boundary");
        return Err(ScriptError::Lex {
            position: found.start(),
            character,
        });
    }
    if text.is_empty() {
        return Err(ScriptError::Parse {
            input: String::new(),
            reason: String::from("empty script"),
            position: 0,
        });
    }
    let mut pairs = ScriptParser::parse(Rule::script, text).map_err(|e| {
        let position = match e.location {
            InputLocation::Pos(p) => p,
            InputLocation::Span((start, _)) => start,
        };
        ScriptError::Parse {
            input: text.to_string(),
            reason: e.variant.message().into_owned(),
            position,
        }
    })?;
    let script = pairs.next().expect("the script rule matched");
    build(script, text)
}

fn parse_failure(text: &str, pair: &Pair<Rule>, reason: &str) -> ScriptError {
    ScriptError::Parse {
        input: text.to_string(),
        reason: reason.to_string(),
        position: pair.as_span().start(),
    }
}

fn build(pair: Pair<Rule>, text: &str) -> Result<Script> {
    match pair.as_rule() {
        Rule::script => {
            let inner = pair
                .into_inner()
                .find(|p| p.as_rule() != Rule::EOI)
                .expect("a top-level additive rule");
            build(inner, text)
        }
        Rule::add0 | Rule::add1 | Rule::add2 | Rule::add3 | Rule::add4 | Rule::add5
        | Rule::add6 => {
            let span = pair.as_span().start();
            let mut children = Vec::new();
            for inner in pair.into_inner() {
                children.push(build(inner, text)?);
            }
            if children.len() == 1 {
                return Ok(children.pop().expect("one child"));
            }
            Script::additive(children).ok_or_else(|| ScriptError::Parse {
                input: text.to_string(),
                reason: String::from("additive children must share one layer"),
                position: span,
            })
        }
        Rule::unit0 => {
            let inner = pair
                .into_inner()
                .next()
                .expect("a primitive or addition shorthand");
            let glyph = inner
                .as_str()
                .chars()
                .next()
                .expect("a single glyph");
            match inner.as_rule() {
                Rule::primitive => {
                    let primitive = crate::script::Primitive::from_char(glyph)
                        .ok_or_else(|| parse_failure(text, &inner, "unknown primitive"))?;
                    Ok(Script::primitive(primitive))
                }
                Rule::remarkable_addition => Script::remarkable_addition(glyph)
                    .ok_or_else(|| parse_failure(text, &inner, "unknown addition shorthand")),
                rule => unreachable!("unit0 never contains {:?}", rule),
            }
        }
        Rule::mult1 | Rule::mult2 | Rule::mult3 | Rule::mult4 | Rule::mult5 | Rule::mult6 => {
            let span = pair.as_span().start();
            let mut slots = Vec::new();
            for inner in pair.into_inner() {
                if inner.as_rule() == Rule::remarkable_multiplication {
                    let code = inner.as_str().to_string();
                    return Script::remarkable_multiplication(&code).ok_or_else(|| {
                        parse_failure(text, &inner, "unknown multiplication shorthand")
                    });
                }
                slots.push(build(inner, text)?);
            }
            let mut slots = slots.into_iter();
            let substance = slots.next().ok_or_else(|| ScriptError::Parse {
                input: text.to_string(),
                reason: String::from("a multiplication needs a substance"),
                position: span,
            })?;
            Script::multiplicative(substance, slots.next(), slots.next()).ok_or_else(|| {
                ScriptError::Parse {
                    input: text.to_string(),
                    reason: String::from("multiplicative slots must share one layer"),
                    position: span,
                }
            })
        }
        rule => unreachable!("no build step for {:?}", rule),
    }
}
