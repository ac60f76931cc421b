//! Punto de entrada ("driver").
//!
//! Este módulo orquesta las diferentes fases del proceso de
//! compilación y expone una CLI.

use anyhow::Context;
use clap::{crate_version, App, AppSettings, Arg, ArgMatches};
use exprc::{target::Syntax, Options};

use log::{info, LevelFilter};
use std::{
    io::{self, Write},
    process,
};

fn main() {
    let args = match cli().try_get_matches() {
        Ok(args) => args,

        // --help y --version también llegan por aquí, pero a stdout y con éxito
        Err(error) => {
            let code = if error.use_stderr() { 1 } else { 0 };
            let _ = error.print();
            process::exit(code);
        }
    };

    init_logging(args.occurrences_of("verbose"));

    match run(&args) {
        Ok(true) => (),
        Ok(false) => process::exit(1),
        Err(error) => {
            eprintln!("Error: {:?}", error);
            process::exit(1);
        }
    }
}

fn cli() -> App<'static> {
    App::new("exprc")
        .version(crate_version!())
        .about("Compiles one arithmetic expression into x86-64 assembly")
        // Expresiones como `-7/2` no son banderas
        .setting(AppSettings::AllowHyphenValues)
        .arg(
            Arg::new("expr")
                .value_name("EXPR")
                .required(true)
                .help("Expression to compile, e.g. '-(3+4)*2'"),
        )
        .arg(
            Arg::new("syntax")
                .short('s')
                .long("syntax")
                .value_name("SYNTAX")
                .takes_value(true)
                .default_value("intel")
                .validator(|value| value.parse::<Syntax>())
                .help("Assembler syntax: intel or att"),
        )
        .arg(
            Arg::new("entry")
                .short('e')
                .long("entry")
                .value_name("LABEL")
                .takes_value(true)
                .default_value("main")
                .validator(validate_label)
                .help("Global symbol of the generated function"),
        )
        .arg(
            Arg::new("emit")
                .long("emit")
                .value_name("STAGE")
                .takes_value(true)
                .default_value("asm")
                .possible_values(["tokens", "ast", "asm"])
                .help("Stop after the given stage and print its output"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .multiple_occurrences(true)
                .help("Log pipeline progress to stderr (repeat for more detail)"),
        )
}

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    // Sin `parse_env()`: la configuración viene únicamente de la CLI
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

fn validate_label(label: &str) -> Result<(), String> {
    let mut chars = label.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || matches!(first, '_' | '.'))
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$'))
        }

        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(format!("`{}` is not a valid assembler symbol", label))
    }
}

/// Ejecuta el pipeline. `Ok(false)` indica que ya se reportó un
/// diagnóstico y no se emitió nada.
fn run(args: &ArgMatches) -> anyhow::Result<bool> {
    // Se extraen argumentos, ya validados por clap
    let text = args.value_of("expr").unwrap_or_default();
    let options = Options {
        syntax: args.value_of_t("syntax")?,
        entry: args.value_of("entry").unwrap_or("main").to_owned(),
    };

    info!("Compiling {:?} with {:?}", text, options);

    let output = match args.value_of("emit") {
        Some("tokens") => exprc::scan(text).map(|tokens| format!("{:#?}\n", tokens)),
        Some("ast") => exprc::frontend(text).map(|ast| format!("{}\n{:#?}\n", ast, ast)),
        _ => exprc::compile_to_string(text, &options),
    };

    let output = match output {
        Ok(output) => output,
        Err(diagnostics) => {
            eprint!("{}", diagnostics);
            return Ok(false);
        }
    };

    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    stdout
        .write_all(output.as_bytes())
        .and_then(|()| stdout.flush())
        .context("Failed to write to stdout")?;

    Ok(true)
}
