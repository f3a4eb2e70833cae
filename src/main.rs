// minic: tokenizer and parser driver

use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use crossterm::tty::IsTty;
use tracing::subscriber::SetGlobalDefaultError;
use tracing::{debug, Level};

use minic::diagnostics::Renderer;
use minic::error::CompileError;
use minic::parser::lexer::tokenize;
use minic::parser::printer::print_program;

#[derive(Parser)]
#[command(name = "minic")]
#[command(about = "Tokenizer and parser for a small C-like language", version)]
struct Cli {
    /// When to color diagnostics
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token stream, one token per line
    Tokens {
        /// Source file
        input: String,
    },

    /// Parse a file and print the resulting tree
    Parse {
        /// Source file
        input: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Debug)]
        format: OutputFormat,
    },

    /// Report diagnostics only
    Check {
        /// Source file
        input: String,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Rust debug representation of the tree
    Debug,
    /// Canonical source text
    Source,
}

fn init_subscriber(level: Level) -> Result<(), SetGlobalDefaultError> {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

impl Commands {
    fn input(&self) -> &str {
        match self {
            Commands::Tokens { input }
            | Commands::Parse { input, .. }
            | Commands::Check { input } => input,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_subscriber(log_level(cli.verbose)) {
        eprintln!("Warning: failed to install logger: {}", e);
    }

    let color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => io::stderr().is_tty(),
    };
    let renderer = Renderer::new(color);

    let input = cli.command.input();
    let source = match fs::read_to_string(input) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {}: {}", input, e);
            return ExitCode::FAILURE;
        }
    };
    debug!(input, bytes = source.len(), "read source");

    let mut stdout = io::stdout().lock();
    let result = match &cli.command {
        Commands::Tokens { .. } => run_tokens(&source, &mut stdout),
        Commands::Parse { format, .. } => run_parse(&source, *format, &mut stdout),
        Commands::Check { .. } => run_check(&source, &mut stdout),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&renderer, &mut io::stderr().lock(), input, &err, &source);
            ExitCode::FAILURE
        }
    }
}

/// Print `err` for `input`. Diagnostics get caret lines from `source`, the
/// same text that was tokenized.
fn report<W: Write>(
    renderer: &Renderer,
    out: &mut W,
    input: &str,
    err: &CompileError,
    source: &str,
) {
    let written = match err {
        CompileError::Io { source } => writeln!(out, "Error: {}: {}", input, source),
        _ => renderer.render_all(out, &err.diagnostics(), Some(source)),
    };
    if let Err(e) = written {
        eprintln!("Error: failed to write diagnostics: {}", e);
    }
}

fn run_tokens<W: Write>(source: &str, out: &mut W) -> Result<(), CompileError> {
    let lexed = tokenize(source);

    for token in &lexed.tokens {
        writeln!(
            out,
            "{}:{}-{}:{} {}",
            token.begin.line, token.begin.column, token.end.line, token.end.column, token
        )?;
    }

    if lexed.had_error() {
        return Err(CompileError::Lex(lexed.diagnostics));
    }
    Ok(())
}

fn run_parse<W: Write>(
    source: &str,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), CompileError> {
    let program = minic::parser::parse_source(source)?;

    match format {
        OutputFormat::Debug => writeln!(out, "{:#?}", program)?,
        OutputFormat::Source => write!(out, "{}", print_program(&program))?,
    }
    Ok(())
}

fn run_check<W: Write>(source: &str, out: &mut W) -> Result<(), CompileError> {
    minic::parser::parse_source(source)?;

    writeln!(out, "ok")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(
        run: impl FnOnce(&mut Vec<u8>) -> Result<(), CompileError>,
    ) -> (String, Result<(), CompileError>) {
        let mut out = Vec::new();
        let result = run(&mut out);
        (String::from_utf8(out).unwrap(), result)
    }

    #[test]
    fn test_tokens_output() {
        let (text, result) = output(|out| run_tokens("x = 1;", out));

        assert!(result.is_ok());
        assert_eq!(
            text,
            "1:1-1:2 IDENTIFIER 'x'\n1:3-1:4 EQUALS '='\n1:5-1:6 INT_LITERAL '1'\n1:6-1:7 SEMICOLON ';'\n"
        );
    }

    #[test]
    fn test_parse_source_format() {
        let (text, result) = output(|out| run_parse("int f(){x;}", OutputFormat::Source, out));

        assert!(result.is_ok());
        assert_eq!(text, "int f() {\n    x;\n}\n");
    }

    #[test]
    fn test_check_reports_ok() {
        let (text, result) = output(|out| run_check("int main() { return 0; }", out));

        assert!(result.is_ok());
        assert_eq!(text, "ok\n");
    }

    #[test]
    fn test_report_uses_checked_source_for_carets() {
        let source = "int main() {\n    x\n}\n";
        let (text, result) = output(|out| run_check(source, out));
        assert!(text.is_empty());
        let err = result.unwrap_err();

        let mut rendered = Vec::new();
        report(&Renderer::new(false), &mut rendered, "main.mc", &err, source);
        let rendered = String::from_utf8(rendered).unwrap();

        assert_eq!(
            rendered,
            "parser: error: 3:1: Expected ';' after expression\n   3 | }\n       ^\n"
        );
    }

    #[test]
    fn test_report_io_error() {
        let err = CompileError::from(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));

        let mut rendered = Vec::new();
        report(&Renderer::new(false), &mut rendered, "main.mc", &err, "");
        assert_eq!(String::from_utf8(rendered).unwrap(), "Error: main.mc: closed\n");
    }
}
