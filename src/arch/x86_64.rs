use super::Emitter;
use crate::{
    codegen::Context,
    ir::{Instruction, Slot},
};

use std::{fmt, io};

#[derive(Copy, Clone)]
enum Reg {
    Rax,
    Rdi,
}

impl Reg {
    /* El operando izquierdo vive en %rax ya que `idiv` divide %rdx:%rax y deja
     * el cociente ahí mismo, que además es el registro de retorno de la ABI.
     */
    fn of(slot: Slot) -> Reg {
        match slot {
            Slot::Lhs => Reg::Rax,
            Slot::Rhs => Reg::Rdi,
        }
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Reg::Rax => "rax",
            Reg::Rdi => "rdi",
        };

        formatter.write_str(name)
    }
}

pub struct Intel;

impl Emitter for Intel {
    const DIRECTIVE: &'static str = ".intel_syntax noprefix";

    fn instruction(cx: &mut Context<'_>, instruction: Instruction) -> io::Result<()> {
        use Instruction::*;

        let (lhs, rhs) = (Reg::Rax, Reg::Rdi);
        match instruction {
            PushConst(value) => {
                emit!(cx, "mov", "{}, {}", lhs, value)?;
                emit!(cx, "push", "{}", lhs)
            }

            Pop(slot) => emit!(cx, "pop", "{}", Reg::of(slot)),
            Push(slot) => emit!(cx, "push", "{}", Reg::of(slot)),
            Add => emit!(cx, "add", "{}, {}", lhs, rhs),
            Sub => emit!(cx, "sub", "{}, {}", lhs, rhs),
            Mul => emit!(cx, "imul", "{}, {}", lhs, rhs),

            // Extensión de signo de %rax hacia %rdx antes de dividir
            Div => {
                emit!(cx, "cqo")?;
                emit!(cx, "idiv", "{}", rhs)
            }

            Return => emit!(cx, "ret"),
        }
    }
}

pub struct Att;

impl Emitter for Att {
    const DIRECTIVE: &'static str = ".att_syntax prefix";

    fn instruction(cx: &mut Context<'_>, instruction: Instruction) -> io::Result<()> {
        use Instruction::*;

        let (lhs, rhs) = (Reg::Rax, Reg::Rdi);
        match instruction {
            PushConst(value) => {
                emit!(cx, "mov", "${}, %{}", value, lhs)?;
                emit!(cx, "push", "%{}", lhs)
            }

            Pop(slot) => emit!(cx, "pop", "%{}", Reg::of(slot)),
            Push(slot) => emit!(cx, "push", "%{}", Reg::of(slot)),
            Add => emit!(cx, "add", "%{}, %{}", rhs, lhs),
            Sub => emit!(cx, "sub", "%{}, %{}", rhs, lhs),
            Mul => emit!(cx, "imul", "%{}, %{}", rhs, lhs),
            Div => {
                emit!(cx, "cqo")?;
                emit!(cx, "idiv", "%{}", rhs)
            }

            Return => emit!(cx, "ret"),
        }
    }
}
