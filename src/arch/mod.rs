//! Detalles específicos de la sintaxis de ensamblador objetivo.
//!
//! Este módulo expone la interfaz de emisión que implementa cada
//! dialecto en sus propios submódulos. En general, debe utilizarse
//! la macro `dispatch_syntax!()` para acceder a estas implementaciones.

use crate::{codegen::Context, ir::Instruction};
use std::{io, str::FromStr};
use thiserror::Error;
use unicase::Ascii as NoCase;

/// Dialecto de ensamblador para x86-64.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Syntax {
    /// `.intel_syntax noprefix`, destino a la izquierda.
    #[default]
    Intel,

    /// Sintaxis AT&T de GNU as, destino a la derecha.
    Att,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown assembler syntax {0:?}, expected `intel` or `att`")]
pub struct UnknownSyntax(String);

impl FromStr for Syntax {
    type Err = UnknownSyntax;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        const SYNTAXES: &[(NoCase<&str>, Syntax)] = &[
            (NoCase::new("intel"), Syntax::Intel),
            (NoCase::new("att"), Syntax::Att),
        ];

        SYNTAXES
            .iter()
            .find(|&&(name, _)| name == NoCase::new(string))
            .map(|&(_, syntax)| syntax)
            .ok_or_else(|| UnknownSyntax(string.to_owned()))
    }
}

mod x86_64;

pub use x86_64::{Att, Intel};

/// Emisión de código ensamblador para un dialecto.
///
/// Los tipos que implementan este trait traducen instrucciones
/// de la máquina de pila a texto de ensamblador.
pub trait Emitter {
    /// Directiva que selecciona el dialecto en el ensamblador.
    const DIRECTIVE: &'static str;

    /// Emite una instrucción, posiblemente como varias líneas.
    fn instruction(cx: &mut Context<'_>, instruction: Instruction) -> io::Result<()>;
}
