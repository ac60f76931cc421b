//! Generación de código.
//!
//! El árbol de expresión se recorre en post-orden hacia instrucciones
//! de máquina de pila ([`crate::ir`]), que luego se imprimen en algún
//! dialecto de ensamblador x86-64 por medio de [`emit()`].

use crate::{
    arch::{Emitter, Syntax},
    ir::{Function, Instruction, Slot},
    parse::{BinOp, Expr},
};

use log::debug;
use std::io::{self, Write};

/// Contexto de emisión compartido por todos los dialectos.
pub struct Context<'a> {
    output: &'a mut dyn Write,
}

impl<'a> Context<'a> {
    pub fn output(&mut self) -> &mut (dyn Write + 'a) {
        &mut *self.output
    }
}

/// Evalúa un árbol sobre la pila, dejando un único valor en ella.
pub fn generate(root: &Expr) -> Vec<Instruction> {
    let mut body = Vec::new();
    generate_into(root, &mut body);

    body
}

fn generate_into(node: &Expr, body: &mut Vec<Instruction>) {
    match node {
        Expr::Integer(value) => body.push(Instruction::PushConst(*value)),

        Expr::Binary(lhs, op, rhs) => {
            // Tras ambas llamadas el operando derecho queda en el tope
            generate_into(lhs, body);
            generate_into(rhs, body);

            body.push(Instruction::Pop(Slot::Rhs));
            body.push(Instruction::Pop(Slot::Lhs));
            body.push(match op {
                BinOp::Add => Instruction::Add,
                BinOp::Sub => Instruction::Sub,
                BinOp::Mul => Instruction::Mul,
                BinOp::Div => Instruction::Div,
            });
            body.push(Instruction::Push(Slot::Lhs));
        }
    }
}

/// Construye una función completa que retorna el valor de `root`.
pub fn lower(name: &str, root: &Expr) -> Function {
    let mut body = generate(root);

    // El único valor restante en la pila pasa al registro de retorno
    body.push(Instruction::Pop(Slot::Lhs));
    body.push(Instruction::Return);

    debug!("Lowered `{}` into {} instructions", name, body.len());
    Function {
        name: name.to_owned(),
        body,
    }
}

/// Imprime una función como texto de ensamblador.
pub fn emit<W: Write>(function: &Function, syntax: Syntax, output: &mut W) -> io::Result<()> {
    let mut cx = Context { output };
    dispatch_syntax!(E: syntax => write_function::<E>(&mut cx, function))
}

fn write_function<E: Emitter>(cx: &mut Context<'_>, function: &Function) -> io::Result<()> {
    writeln!(cx.output(), "{}", E::DIRECTIVE)?;
    writeln!(cx.output(), ".globl {0}\n{0}:", function.name)?;

    for instruction in &function.body {
        E::instruction(cx, *instruction)?;
    }

    Ok(())
}
