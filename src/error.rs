use crate::source::{Located, Location};
use std::{
    error::Error,
    fmt::{self, Debug, Display},
};

mod sealed {
    pub trait Sealed {}
}

pub trait LocatedError: sealed::Sealed {
    fn source(&self) -> &dyn Error;
    fn location(&self) -> &Location;
}

/// Errores con ubicación listos para mostrarse al usuario.
pub struct Diagnostics {
    kind: &'static str,
    errors: Vec<Box<dyn 'static + LocatedError>>,
}

impl Diagnostics {
    pub fn kind(self, kind: &'static str) -> Self {
        Diagnostics { kind, ..self }
    }

    /// Ubicaciones de todos los errores reportados, en orden.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.errors.iter().map(|error| error.location())
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Diagnostics {
            kind: "error",
            errors: Default::default(),
        }
    }
}

impl<E: 'static + LocatedError> From<E> for Diagnostics {
    fn from(error: E) -> Self {
        Diagnostics {
            errors: vec![Box::new(error)],
            ..Default::default()
        }
    }
}

impl Display for Diagnostics {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Diagnostics { kind, errors } = self;

        if errors.is_empty() {
            return writeln!(fmt, "No errors were reported");
        }

        for error in errors {
            writeln!(fmt, "{}: {}", kind, error.source())?;

            let location = error.location();
            writeln!(fmt, " --> {}", location)?;

            // La entrada es de una sola línea, pero puede traer saltos
            // o tabuladores que desalinearían el marcador
            let line: String = location
                .source()
                .text()
                .chars()
                .map(|c| if c.is_whitespace() { ' ' } else { c })
                .collect();

            writeln!(fmt, "  |")?;
            writeln!(fmt, "1 | {}", line)?;

            let skip = location.column() - 1;
            let highlight = location.width();

            writeln!(
                fmt,
                "  | {:skip$}{:^<highlight$}",
                "",
                "",
                skip = skip,
                highlight = highlight
            )?;

            writeln!(fmt)?;
        }

        let error_or_errors = if errors.len() == 1 { "error" } else { "errors" };
        writeln!(
            fmt,
            "Compilation failed with {} {}",
            errors.len(),
            error_or_errors
        )
    }
}

impl Debug for Diagnostics {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        <Self as Display>::fmt(self, fmt)
    }
}

impl<E: Error> sealed::Sealed for Located<E> {}

impl<E: Error> LocatedError for Located<E> {
    fn source(&self) -> &dyn Error {
        self.as_ref()
    }

    fn location(&self) -> &Location {
        Located::location(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lex::LexerError, source::Source};

    #[test]
    fn caret_under_offending_character() {
        let source = Source::new("<expr>", "1 +\t@");
        let error = Located::at(LexerError::BadChar('@'), Location::new(&source, 4..5));

        let rendered = Diagnostics::from(error).kind("Lexical error").to_string();
        let expected = "\
Lexical error: Bad character '@' in input stream
 --> <expr>:1:5
  |
1 | 1 +  @
  |     ^

Compilation failed with 1 error
";
        assert_eq!(rendered, expected);
    }
}
