macro_rules! dispatch_syntax {
    ($type:ident: $syntax:expr => $expr:expr) => {{
        use crate::arch::{Att, Intel, Syntax};

        match $syntax {
            Syntax::Intel => {
                type $type = Intel;
                $expr
            }

            Syntax::Att => {
                type $type = Att;
                $expr
            }
        }
    }};
}

macro_rules! emit {
    ($context:expr, $opcode:expr) => {
        writeln!($context.output(), "\t{}", $opcode)
    };

    ($context:expr, $opcode:expr, $($format:tt)*) => {{
        write!($context.output(), "\t{:8}", $opcode)?;
        writeln!($context.output(), $($format)*)
    }};
}
