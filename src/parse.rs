//! Análisis sintáctico.
//!
//! Descenso recursivo sobre la siguiente gramática, con precedencia
//! creciente hacia abajo:
//!
//! ```text
//! expr    = mul ( ("+" | "-") mul )*
//! mul     = unary ( ("*" | "/") unary )*
//! unary   = ("+" | "-")? primary
//! primary = NUMBER | "(" expr ")"
//! ```
//!
//! Ambos niveles binarios son asociativos a la izquierda. El menos
//! unario se reescribe como `0 - primary`.

use std::fmt::{self, Display};
use thiserror::Error;

use crate::{
    lex::Token,
    source::{Located, Location, Source},
};
use log::debug;

/// Árbol de expresión.
///
/// Cada nodo binario es dueño exclusivo de sus dos hijos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Integer(i64),
    Binary(Box<Expr>, BinOp, Box<Expr>),
}

impl Expr {
    pub fn binary(lhs: Expr, op: BinOp, rhs: Expr) -> Self {
        Expr::Binary(Box::new(lhs), op, Box::new(rhs))
    }
}

/// Se imprime con paréntesis explícitos en cada nodo binario.
impl Display for Expr {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Integer(integer) => write!(fmt, "{}", integer),
            Expr::Binary(lhs, op, rhs) => write!(fmt, "({} {} {})", lhs, op, rhs),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl Display for BinOp {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        };

        fmt.write_str(symbol)
    }
}

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    #[error("Expected token {0}, found {1} instead")]
    UnexpectedToken(Token, Token),

    #[error("Expected an expression, found {0}")]
    ExpectedExpr(Token),

    #[error("Expected end of input, found {0}")]
    TrailingInput(Token),
}

type Parse<T> = Result<T, Located<ParserError>>;

/// Construye el árbol de una expresión completa.
///
/// `tokens` debe terminar en [`Token::Eof`], tal como lo produce
/// [`crate::lex::tokenize()`]. Cualquier token después de la expresión
/// raíz es un error. Una secuencia vacía equivale a `[Eof]`.
pub fn parse(tokens: &[Located<Token>]) -> Result<Expr, Located<ParserError>> {
    let mut parser = Parser { tokens, cursor: 0 };

    let expr = parser.expr()?;
    match parser.peek() {
        Token::Eof => {
            debug!("Parsed {}", expr);
            Ok(expr)
        }

        found => parser.fail(ParserError::TrailingInput(found)),
    }
}

struct Parser<'a> {
    tokens: &'a [Located<Token>],
    cursor: usize,
}

impl Parser<'_> {
    fn expr(&mut self) -> Parse<Expr> {
        let mut node = self.mul()?;

        loop {
            let op = match self.peek() {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break Ok(node),
            };

            self.advance();
            node = Expr::binary(node, op, self.mul()?);
        }
    }

    fn mul(&mut self) -> Parse<Expr> {
        let mut node = self.unary()?;

        loop {
            let op = match self.peek() {
                Token::Times => BinOp::Mul,
                Token::Slash => BinOp::Div,
                _ => break Ok(node),
            };

            self.advance();
            node = Expr::binary(node, op, self.unary()?);
        }
    }

    fn unary(&mut self) -> Parse<Expr> {
        if self.accept(Token::Plus) {
            self.primary()
        } else if self.accept(Token::Minus) {
            Ok(Expr::binary(Expr::Integer(0), BinOp::Sub, self.primary()?))
        } else {
            self.primary()
        }
    }

    fn primary(&mut self) -> Parse<Expr> {
        match self.peek() {
            Token::IntLiteral(integer) => {
                self.advance();
                Ok(Expr::Integer(integer))
            }

            Token::OpenParen => {
                self.advance();

                let expr = self.expr()?;
                self.expect(Token::CloseParen)?;

                Ok(expr)
            }

            found => self.fail(ParserError::ExpectedExpr(found)),
        }
    }

    fn expect(&mut self, token: Token) -> Parse<()> {
        if self.accept(token) {
            Ok(())
        } else {
            let found = self.peek();
            self.fail(ParserError::UnexpectedToken(token, found))
        }
    }

    fn accept(&mut self, token: Token) -> bool {
        let found = self.peek() == token;
        if found {
            self.advance();
        }

        found
    }

    fn peek(&self) -> Token {
        self.current().map_or(Token::Eof, |token| *token.val())
    }

    /// El cursor nunca avanza más allá de [`Token::Eof`].
    fn advance(&mut self) {
        if !matches!(self.peek(), Token::Eof) {
            self.cursor += 1;
        }
    }

    fn current(&self) -> Option<&Located<Token>> {
        self.tokens.get(self.cursor)
    }

    /// Falla en la ubicación del token bajo el cursor.
    fn fail<T>(&self, error: ParserError) -> Parse<T> {
        let location = match self.current().or_else(|| self.tokens.last()) {
            Some(token) => token.location().clone(),

            // Sin tokens no hay texto al cual apuntar
            None => Location::new(&Source::new(crate::SOURCE_NAME, ""), 0..0),
        };

        Err(Located::at(error, location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lex;

    fn parse_str(text: &str) -> Parse<Expr> {
        let source = Source::new("<expr>", text);
        let tokens = lex::tokenize(&source).expect("lexing failed");
        parse(&tokens)
    }

    fn shape(text: &str) -> String {
        parse_str(text).unwrap().to_string()
    }

    #[test]
    fn precedence() {
        assert_eq!(shape("2+3*4"), "(2 + (3 * 4))");
        assert_eq!(shape("2*3+4"), "((2 * 3) + 4)");
        assert_eq!(shape("(2+3)*4"), "((2 + 3) * 4)");
    }

    #[test]
    fn left_associativity() {
        assert_eq!(shape("1-2-3"), "((1 - 2) - 3)");
        assert_eq!(shape("8/4/2"), "((8 / 4) / 2)");
        assert_eq!(shape("2*3/4*5"), "(((2 * 3) / 4) * 5)");
    }

    #[test]
    fn unary_signs() {
        assert_eq!(shape("-(3+4)"), "(0 - (3 + 4))");
        assert_eq!(shape("+5"), "5");
        assert_eq!(shape("7/-2"), "(7 / (0 - 2))");
        assert_eq!(shape("-2*-3"), "((0 - 2) * (0 - 3))");
    }

    #[test]
    fn literal_tree() {
        assert_eq!(parse_str(" 42 ").unwrap(), Expr::Integer(42));
    }

    #[test]
    fn missing_operand_points_at_end() {
        let error = parse_str("1+").unwrap_err();

        assert_eq!(error.val(), &ParserError::ExpectedExpr(Token::Eof));
        assert_eq!(error.location().start(), 2);
    }

    #[test]
    fn operator_in_operand_position() {
        let error = parse_str("1+*2").unwrap_err();

        assert_eq!(error.val(), &ParserError::ExpectedExpr(Token::Times));
        assert_eq!(error.location().start(), 2);
    }

    #[test]
    fn unterminated_group() {
        let error = parse_str("(1+2").unwrap_err();

        assert_eq!(
            error.val(),
            &ParserError::UnexpectedToken(Token::CloseParen, Token::Eof)
        );
        assert_eq!(error.location().start(), 4);
    }

    #[test]
    fn double_unary_is_rejected() {
        let error = parse_str("--1").unwrap_err();
        assert_eq!(error.val(), &ParserError::ExpectedExpr(Token::Minus));
    }

    #[test]
    fn trailing_tokens() {
        let error = parse_str("1 2").unwrap_err();
        assert_eq!(error.val(), &ParserError::TrailingInput(Token::IntLiteral(2)));
        assert_eq!(error.location().start(), 2);

        let error = parse_str("(1))").unwrap_err();
        assert_eq!(error.val(), &ParserError::TrailingInput(Token::CloseParen));
        assert_eq!(error.location().start(), 3);
    }

    #[test]
    fn empty_input() {
        let error = parse_str("  ").unwrap_err();
        assert_eq!(error.val(), &ParserError::ExpectedExpr(Token::Eof));
    }

    #[test]
    fn empty_token_slice() {
        let error = parse(&[]).unwrap_err();

        assert_eq!(error.val(), &ParserError::ExpectedExpr(Token::Eof));
        assert_eq!(error.location().start(), 0);
        assert_eq!(error.location().to_string(), "<expr>:1:1");
    }
}
