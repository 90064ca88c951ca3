//! Textual space-dependence specifications.
//!
//! A specification is one of:
//!
//! - nothing at all, meaning no symbol depends on space,
//! - a list of symbol names (`A, B`), each depending on every discretized coordinate,
//! - a list of mapping entries (`A: {x}, B: {y, z}`), each naming the coordinates its symbol
//!   depends on.

use crate::{
    parser::{
        ast::literal::LitSym,
        error::{Error, MappingValueNotSet, MixedSpaceDependence, UnclosedDelimiter},
        token::{CloseCurly, Colon, OpenCurly},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single entry of a space-dependence specification: a symbol name, optionally followed by the
/// set of coordinates it depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpaceEntry {
    /// The name of the space-dependent symbol.
    pub name: LitSym,

    /// The coordinates written in braces after the name, if any.
    pub coordinates: Option<Vec<LitSym>>,

    /// The region of the source code that this entry was parsed from.
    pub span: Range<usize>,
}

impl Parse for SpaceEntry {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name = input.try_parse::<LitSym>()?;
        if input.try_parse::<Colon>().is_err() {
            return Ok(Self {
                span: name.span.clone(),
                name,
                coordinates: None,
            });
        }

        let open = input.try_parse::<OpenCurly>()
            .map_err(|_| {
                input.skip_whitespace();
                input.error(MappingValueNotSet { name: name.name.clone() })
            })?;
        let coordinates = match input.peek_token() {
            Some(token) if token.kind == TokenKind::CloseCurly => Vec::new(),
            _ => input.try_parse_comma_separated::<LitSym>()?,
        };
        let close = input.try_parse::<CloseCurly>()
            .map_err(|_| Error::new(
                vec![open.span.clone()],
                UnclosedDelimiter { opening: '{', closing: '}' },
            ))?;

        Ok(Self {
            span: name.span.start..close.span.end,
            name,
            coordinates: Some(coordinates),
        })
    }
}

impl fmt::Display for SpaceEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(coordinates) = &self.coordinates {
            let names = coordinates.iter().map(|c| c.name.as_str()).collect::<Vec<_>>();
            write!(f, ": {{{}}}", names.join(", "))?;
        }
        Ok(())
    }
}

/// A parsed space-dependence specification.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpaceSpec {
    /// No symbol depends on space.
    None,

    /// The listed symbols depend on every discretized coordinate.
    Names(Vec<LitSym>),

    /// Each symbol depends on the listed coordinates.
    Mapping(Vec<(LitSym, Vec<LitSym>)>),
}

impl Parse for SpaceSpec {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        if input.peek_token().is_none() {
            input.skip_whitespace();
            return Ok(SpaceSpec::None);
        }

        let entries = input.try_parse_comma_separated::<SpaceEntry>()?;
        let bare = entries.iter().find(|entry| entry.coordinates.is_none());
        let mapped = entries.iter().find(|entry| entry.coordinates.is_some());
        match (bare, mapped) {
            (Some(bare), Some(mapped)) => Err(Error::new(
                vec![bare.span.clone(), mapped.span.clone()],
                MixedSpaceDependence,
            )),
            (_, None) => Ok(SpaceSpec::Names(
                entries.into_iter().map(|entry| entry.name).collect(),
            )),
            (None, Some(_)) => Ok(SpaceSpec::Mapping(
                entries
                    .into_iter()
                    .map(|entry| (entry.name, entry.coordinates.unwrap_or_default()))
                    .collect(),
            )),
        }
    }
}

impl fmt::Display for SpaceSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SpaceSpec::None => Ok(()),
            SpaceSpec::Names(names) => {
                let names = names.iter().map(|n| n.name.as_str()).collect::<Vec<_>>();
                write!(f, "{}", names.join(", "))
            },
            SpaceSpec::Mapping(entries) => {
                let entries = entries
                    .iter()
                    .map(|(name, coordinates)| {
                        let coordinates = coordinates.iter().map(|c| c.name.as_str()).collect::<Vec<_>>();
                        format!("{}: {{{}}}", name, coordinates.join(", "))
                    })
                    .collect::<Vec<_>>();
                write!(f, "{}", entries.join(", "))
            },
        }
    }
}
