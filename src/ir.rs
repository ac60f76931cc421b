//! Representación intermedia de máquina de pila.
//!
//! Cada subexpresión deja exactamente un valor en la pila de evaluación.
//! Los operadores sacan sus dos operandos a registros de trabajo
//! ([`Slot`]), operan sobre ellos y vuelven a apilar un único resultado.

use thiserror::Error;

/// Registro de trabajo.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    /// Operando izquierdo, acumulador y registro de retorno.
    Lhs,

    /// Operando derecho.
    Rhs,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// Apila una constante.
    PushConst(i64),

    /// Desapila hacia un registro de trabajo.
    Pop(Slot),

    /// Apila un registro de trabajo.
    Push(Slot),

    /// `Lhs <- Lhs + Rhs`
    Add,

    /// `Lhs <- Lhs - Rhs`
    Sub,

    /// `Lhs <- Lhs * Rhs`, con signo.
    Mul,

    /// `Lhs <- Lhs / Rhs`, con signo y truncando hacia cero.
    Div,

    /// Retorna de la función con el resultado en [`Slot::Lhs`].
    Return,
}

/// Una función generada.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub body: Vec<Instruction>,
}

/// Falla al ejecutar una secuencia de instrucciones.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    #[error("Pop from an empty evaluation stack")]
    StackUnderflow,

    #[error("Division by zero")]
    DivideByZero,

    #[error("Signed division overflow")]
    Overflow,

    #[error("Instruction stream ended without returning")]
    MissingReturn,
}

/// Ejecuta el cuerpo de una función y obtiene su valor de retorno.
///
/// La semántica es la misma que la del código que se emite para x86-64:
/// suma, resta y multiplicación envuelven en complemento a dos, mientras
/// que las condiciones que el hardware atraparía en `idiv` son errores.
pub fn execute(body: &[Instruction]) -> Result<i64, ExecError> {
    let mut stack = Vec::new();
    let (mut lhs, mut rhs) = (0i64, 0i64);

    for instruction in body {
        match *instruction {
            Instruction::PushConst(value) => stack.push(value),
            Instruction::Push(slot) => stack.push(match slot {
                Slot::Lhs => lhs,
                Slot::Rhs => rhs,
            }),

            Instruction::Pop(slot) => {
                let value = stack.pop().ok_or(ExecError::StackUnderflow)?;
                match slot {
                    Slot::Lhs => lhs = value,
                    Slot::Rhs => rhs = value,
                }
            }

            Instruction::Add => lhs = lhs.wrapping_add(rhs),
            Instruction::Sub => lhs = lhs.wrapping_sub(rhs),
            Instruction::Mul => lhs = lhs.wrapping_mul(rhs),
            Instruction::Div => {
                if rhs == 0 {
                    return Err(ExecError::DivideByZero);
                }

                lhs = lhs.checked_div(rhs).ok_or(ExecError::Overflow)?;
            }

            Instruction::Return => return Ok(lhs),
        }
    }

    Err(ExecError::MissingReturn)
}

#[cfg(test)]
mod tests {
    use super::{Instruction::*, Slot::*, *};

    #[test]
    fn returns_accumulator() {
        let body = [PushConst(-7), PushConst(2), Pop(Rhs), Pop(Lhs), Div, Push(Lhs), Pop(Lhs), Return];
        assert_eq!(execute(&body), Ok(-3));
    }

    #[test]
    fn division_faults() {
        let by_zero = [PushConst(1), PushConst(0), Pop(Rhs), Pop(Lhs), Div, Return];
        assert_eq!(execute(&by_zero), Err(ExecError::DivideByZero));

        let overflow = [PushConst(i64::MIN), PushConst(-1), Pop(Rhs), Pop(Lhs), Div, Return];
        assert_eq!(execute(&overflow), Err(ExecError::Overflow));
    }

    #[test]
    fn malformed_streams() {
        assert_eq!(execute(&[Pop(Lhs), Return]), Err(ExecError::StackUnderflow));
        assert_eq!(execute(&[PushConst(1)]), Err(ExecError::MissingReturn));
    }
}
