use crate::{
    parser::{
        ast::{expr::Expr, literal::LitSym},
        error::{Error, UnclosedDelimiter, UnexpectedEof, UnexpectedToken},
        token::{CloseParen, OpenParen},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A function call, such as `V(x, y)`. The opening parenthesis must directly follow the name;
/// `V (x)` is the implicit product of `V` and `(x)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    /// The name of the function being called.
    pub name: LitSym,

    /// The arguments passed to the function.
    pub args: Vec<Expr>,

    /// The region of the source code that this call was parsed from.
    pub span: Range<usize>,

    /// The span of the parentheses that surround the arguments.
    pub paren_span: Range<usize>,
}

impl Call {
    /// Returns the span of the function call.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns true if the tokens at the cursor begin a function call.
    pub(crate) fn is_next(input: &Parser) -> bool {
        let mut rest = input.tokens[input.cursor.min(input.tokens.len())..]
            .iter()
            .skip_while(|token| token.is_whitespace());
        matches!(
            (rest.next(), rest.next()),
            (Some(name), Some(paren)) if name.kind == TokenKind::Name && paren.kind == TokenKind::OpenParen
        )
    }
}

impl Parse for Call {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name = input.try_parse::<LitSym>()?;
        match input.current_token() {
            Some(token) if token.kind == TokenKind::OpenParen => (),
            Some(token) => return Err(Error::new(vec![token.span.clone()], UnexpectedToken {
                expected: &[TokenKind::OpenParen],
                found: token.kind,
            })),
            None => return Err(input.error(UnexpectedEof)),
        }

        let open_paren = input.try_parse::<OpenParen>()?;
        let args = input.try_parse_comma_separated::<Expr>()?;
        let close_paren = input.try_parse::<CloseParen>()
            .map_err(|_| Error::new(
                vec![open_paren.span.clone()],
                UnclosedDelimiter { opening: '(', closing: ')' },
            ))?;

        Ok(Self {
            span: name.span.start..close_paren.span.end,
            name,
            args,
            paren_span: open_paren.span.start..close_paren.span.end,
        })
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        if let Some((last, args)) = self.args.split_last() {
            for arg in args {
                write!(f, "{}, ", arg)?;
            }
            write!(f, "{}", last)?;
        }
        write!(f, ")")
    }
}
