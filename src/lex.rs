//! Análisis léxico.
//!
//! # Tokenization
//! Esta es la primera fase del compilador. Descompone el texto de una
//! [`Source`] en unidades léxicas denominadas tokens. Los espacios en
//! blanco se descartan durante esta operación. Cada token emitido está
//! asociado a una ubicación en el código fuente original, lo cual permite
//! rastrear errores de fases posteriores hasta el byte que los originó.
//!
//! # Contenido de un token
//! Operadores y paréntesis se identifican por el hecho de lo que son y no
//! incluyen lexemas. Las constantes literales se resuelven a sus valores
//! en vez de preservar sus lexemas.
//!
//! # Errores
//! A diferencia de un lexer de archivos completos, aquí no hay recuperación:
//! el primer carácter desconocido termina el análisis.

use crate::source::{Located, Location, Source};
use log::{debug, trace};
use std::{
    fmt::{self, Display},
    iter::Peekable,
    rc::Rc,
    str::CharIndices,
};

use thiserror::Error;

/// Error de escaneo.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexerError {
    /// Carácter desconocido o inesperado en el flujo de entrada.
    #[error("Bad character {0:?} in input stream")]
    BadChar(char),

    /// Una constante entera se encuentra fuera de rango.
    #[error("Integer literal overflow, valid range is [0, {}]", i64::MAX)]
    IntOverflow,
}

/// Objeto resultante del análisis léxico.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Literal de entero.
    IntLiteral(i64),

    /// `+`
    Plus,

    /// `-`
    Minus,

    /// `*`
    Times,

    /// `/`
    Slash,

    /// `(`
    OpenParen,

    /// `)`
    CloseParen,

    /// Fin de la entrada, siempre el último token.
    Eof,
}

impl Display for Token {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Token::*;

        match self {
            IntLiteral(integer) => write!(fmt, "literal `{}`", integer),
            Plus => fmt.write_str("`+`"),
            Minus => fmt.write_str("`-`"),
            Times => fmt.write_str("`*`"),
            Slash => fmt.write_str("`/`"),
            OpenParen => fmt.write_str("`(`"),
            CloseParen => fmt.write_str("`)`"),
            Eof => fmt.write_str("end of input"),
        }
    }
}

/// Reduce una entrada completa a su secuencia de tokens.
///
/// La secuencia termina siempre en exactamente un [`Token::Eof`].
/// Ante el primer error no se retorna ningún token.
pub fn tokenize(source: &Rc<Source>) -> Result<Vec<Located<Token>>, Located<LexerError>> {
    let mut tokens = Vec::new();
    for token in Lexer::new(source) {
        tokens.push(token?);
    }

    let end = source.text().len();
    tokens.push(Located::at(Token::Eof, Location::new(source, end..end)));

    debug!("Lexed {} tokens", tokens.len());
    Ok(tokens)
}

/// Máquina de estados para análisis léxico.
///
/// La salida del lexer, así como su siguiente estado, se define
/// a partir de tanto su estado actual como el siguiente carácter
/// encontrado en la entrada.
pub struct Lexer<'a> {
    source: &'a Rc<Source>,
    chars: Peekable<CharIndices<'a>>,
    state: State,
    start: usize,
}

/// Posibles estados del lexer.
enum State {
    /// Estado que ocurre antes de encontrar el inicio de un token.
    Start,

    /// Estado de completitud; siempre emite el token incluido,
    /// consume la entrada actual y pasa a [`State::Start`].
    Complete(Token),

    /// Constante entera.
    ///
    /// Este estado incluirá dígitos en el token mientras que
    /// el siguiente carácter sea un dígito.
    Integer(i64),

    /// Se encontró un error, no se emiten más tokens.
    Error,
}

impl<'a> Lexer<'a> {
    /// Crea un lexer en estado inicial.
    pub fn new(source: &'a Rc<Source>) -> Self {
        Lexer {
            source,
            chars: source.text().char_indices().peekable(),
            state: State::Start,
            start: 0,
        }
    }

    /// Offset del siguiente carácter sin consumir.
    fn offset(&mut self) -> usize {
        match self.chars.peek() {
            Some(&(offset, _)) => offset,
            None => self.source.text().len(),
        }
    }

    /// Intenta construir un siguiente token.
    fn lex(&mut self) -> Result<Option<Token>, LexerError> {
        use {State::*, Token::*};

        loop {
            let next_char = self.chars.peek().map(|&(_, c)| c);

            // La posición de origen se mueve junto a la posición
            // siguiente siempre que no se haya encontrado una
            // frontera de token
            if let Start = self.state {
                self.start = self.offset();
            }

            match (&mut self.state, next_char) {
                (Error, _) => return Ok(None),

                // Tokens triviales
                (Start, None) => return Ok(None),
                (Start, Some('+')) => self.state = Complete(Plus),
                (Start, Some('-')) => self.state = Complete(Minus),
                (Start, Some('*')) => self.state = Complete(Times),
                (Start, Some('/')) => self.state = Complete(Slash),
                (Start, Some('(')) => self.state = Complete(OpenParen),
                (Start, Some(')')) => self.state = Complete(CloseParen),

                // Inicio de una constante numérica. No se consume el
                // dígito, el caso de estado entero se encarga de ello
                (Start, Some(c)) if c.is_ascii_digit() => {
                    self.state = Integer(0);
                    continue;
                }

                (Start, Some(c)) if c.is_whitespace() => (),
                (Start, Some(c)) => return Err(LexerError::BadChar(c)),

                // Emisión retardada, el carácter ya fue consumido
                (Complete(token), _) => return Ok(Some(*token)),

                // Acumulación dígito por dígito de constantes enteras
                (Integer(accumulated), Some(digit)) if digit.is_ascii_digit() => {
                    let digit = i64::from(digit as u8 - b'0');

                    match accumulated
                        .checked_mul(10)
                        .and_then(|n| n.checked_add(digit))
                    {
                        Some(result) => *accumulated = result,
                        None => return Err(LexerError::IntOverflow),
                    }
                }

                // Si sigue algo que no es un dígito, la constante ha terminado
                (Integer(integer), _) => return Ok(Some(IntLiteral(*integer))),
            }

            // Si no hubo `continue` ni retorno, se consume el carácter
            // que se observó con lookahead
            self.chars.next();
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Located<Token>, Located<LexerError>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.lex() {
            Ok(None) => None,
            Ok(Some(token)) => {
                self.state = State::Start;

                let location = Location::new(self.source, self.start..self.offset());
                trace!("Token {} at {:?}", token, location);

                Some(Ok(Located::at(token, location)))
            }

            Err(error) => {
                // Un desbordamiento abarca los dígitos ya leídos,
                // un carácter inválido se señala a sí mismo
                let range = match error {
                    LexerError::IntOverflow => self.start..self.offset(),
                    LexerError::BadChar(c) => {
                        let at = self.offset();
                        at..at + c.len_utf8()
                    }
                };

                self.state = State::Error;
                Some(Err(Located::at(error, Location::new(self.source, range))))
            }
        }
    }
}
