pub mod token;

use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer. This allows us
/// to backtrack in case of an error.
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(Ok(kind)) = lexer.next() {
        tokens.push(Token {
            span: lexer.span(),
            kind,
            lexeme: lexer.slice(),
        });
    }

    tokens.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compares the tokens produced by the tokenizer to the raw expected tokens.
    fn compare_tokens<'source, const N: usize>(input: &'source str, expected: [(TokenKind, &'source str); N]) {
        let mut lexer = tokenize(input);

        for (expected_kind, expected_lexeme) in expected.into_iter() {
            assert_eq!(lexer.next(), Some(Ok(expected_kind)));
            assert_eq!(lexer.slice(), expected_lexeme);
        }

        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn momentum_term() {
        compare_tokens(
            "A*k_x^2",
            [
                (TokenKind::Name, "A"),
                (TokenKind::Mul, "*"),
                (TokenKind::Name, "k_x"),
                (TokenKind::Exp, "^"),
                (TokenKind::Int, "2"),
            ],
        );
    }

    #[test]
    fn python_power_and_decimal() {
        compare_tokens(
            "0.5 * k_y**2",
            [
                (TokenKind::Float, "0.5"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Mul, "*"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Name, "k_y"),
                (TokenKind::Exp, "**"),
                (TokenKind::Int, "2"),
            ],
        );
    }

    #[test]
    fn matrix_and_space_dependence() {
        compare_tokens(
            "[[V1(x)]] A: {x}",
            [
                (TokenKind::OpenSquare, "["),
                (TokenKind::OpenSquare, "["),
                (TokenKind::Name, "V1"),
                (TokenKind::OpenParen, "("),
                (TokenKind::Name, "x"),
                (TokenKind::CloseParen, ")"),
                (TokenKind::CloseSquare, "]"),
                (TokenKind::CloseSquare, "]"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Name, "A"),
                (TokenKind::Colon, ":"),
                (TokenKind::Whitespace, " "),
                (TokenKind::OpenCurly, "{"),
                (TokenKind::Name, "x"),
                (TokenKind::CloseCurly, "}"),
            ],
        );
    }

    #[test]
    fn unknown_characters() {
        compare_tokens(
            "k_x $ 1",
            [
                (TokenKind::Name, "k_x"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Symbol, "$"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Int, "1"),
            ],
        );
    }
}
