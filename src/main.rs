use std::io::{self, Write};
use std::process;

use clap::{Parser as ClapParser, ValueEnum};
use r9cc::{CompileResult, tokenizer};

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
  /// Program text, e.g. "a=1; b=2; a+b;"
  #[arg(value_name = "SOURCE", allow_hyphen_values = true)]
  source: String,

  /// What to print
  #[arg(long, value_enum, default_value_t = Emit::Asm)]
  emit: Emit,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Emit {
  /// Assembly for the GNU assembler
  Asm,
  /// The token stream, one token per line
  Tokens,
  /// The parsed statements
  Ast,
}

fn render(cli: &Cli) -> CompileResult<String> {
  let source = cli.source.as_str();
  let out = match cli.emit {
    Emit::Asm => r9cc::generate_assembly(source)?,
    Emit::Tokens => tokenizer::tokenize(source)?
      .iter()
      .map(|token| format!("{:>4} {}\n", token.loc, token.kind))
      .collect(),
    Emit::Ast => r9cc::parse_program(source)?
      .body
      .iter()
      .map(|stmt| format!("{:#?}\n", stmt.expr))
      .collect(),
  };
  Ok(out)
}

fn main() {
  env_logger::init();

  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(err) => {
      let code = if err.use_stderr() { 1 } else { 0 };
      if err.print().is_err() {
        eprintln!("{err}");
      }
      process::exit(code);
    }
  };
  log::debug!("compiling {} bytes, emitting {:?}", cli.source.len(), cli.emit);

  let out = match render(&cli) {
    Ok(out) => out,
    Err(err) => {
      eprintln!("error: {err}");
      process::exit(1);
    }
  };

  let mut stdout = io::stdout().lock();
  if let Err(err) = stdout.write_all(out.as_bytes()).and_then(|()| stdout.flush()) {
    eprintln!("error: cannot write output: {err}");
    process::exit(1);
  }
}
