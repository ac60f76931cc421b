//! Compilador de expresiones aritméticas a ensamblador x86-64.
//!
//! # Front end
//! Cada compilación deriva de una única expresión de una línea.
//! La expresión se somete primero a análisis léxico en [`lex`], de
//! lo cual se obtiene un flujo de tokens. El flujo de tokens se
//! dispone en un árbol de expresión por medio de análisis sintáctico
//! en [`parse`].
//!
//! # Back end
//! El árbol se recorre en post-orden para generar instrucciones de una
//! máquina de pila, descritas en [`ir`]. Estas instrucciones se imprimen
//! como texto en alguno de los dialectos de ensamblador que soporta
//! [`target`]. El resultado es una función que retorna el valor de la
//! expresión en `%rax`. Ensamblar y enlazar ese texto queda fuera de
//! este compilador.

#[macro_use]
mod macros;

pub mod error;
pub mod ir;
pub mod lex;
pub mod parse;
pub mod source;

mod arch;
mod codegen;

use error::Diagnostics;
use source::{Located, Source};

/// Emisión de código.
///
/// Este módulo reexporta suficientes ítems internos relacionados a generación
/// de código para traducir árboles de expresión a ensamblador.
pub mod target {
    pub use crate::arch::{Syntax, UnknownSyntax};
    pub use crate::codegen::{emit, generate, lower};
}

/// Nombre con el que se reporta la expresión en diagnósticos.
pub const SOURCE_NAME: &str = "<expr>";

/// Parámetros de una compilación.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Dialecto de ensamblador a emitir.
    pub syntax: target::Syntax,

    /// Símbolo global de la función generada.
    pub entry: String,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            syntax: target::Syntax::default(),
            entry: String::from("main"),
        }
    }
}

/// Análisis léxico de una expresión completa.
pub fn scan(text: &str) -> Result<Vec<Located<lex::Token>>, Diagnostics> {
    let source = Source::new(SOURCE_NAME, text);
    lex::tokenize(&source).map_err(|error| Diagnostics::from(error).kind("Lexical error"))
}

/// Fases delanteras: texto a árbol de expresión.
pub fn frontend(text: &str) -> Result<parse::Expr, Diagnostics> {
    let tokens = scan(text)?;
    parse::parse(&tokens).map_err(|error| Diagnostics::from(error).kind("Syntax error"))
}

/// Compila una expresión a una función de máquina de pila.
pub fn compile(text: &str, entry: &str) -> Result<ir::Function, Diagnostics> {
    let root = frontend(text)?;
    Ok(target::lower(entry, &root))
}

/// Compila una expresión hasta texto de ensamblador.
///
/// El texto se construye por completo en memoria, de forma que un error
/// nunca deja salida parcial.
pub fn compile_to_string(text: &str, options: &Options) -> Result<String, Diagnostics> {
    let function = compile(text, &options.entry)?;

    let mut output = Vec::new();
    target::emit(&function, options.syntax, &mut output)
        .expect("writing to memory cannot fail");

    Ok(String::from_utf8(output).expect("assembly is always UTF-8"))
}
