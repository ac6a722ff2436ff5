use std::env;
use std::io;
use std::process;

use tracing_subscriber::EnvFilter;

fn main() {
  // Assembly goes to stdout, so logs must stay on stderr.
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .init();

  // Arguments may hold bytes that are not UTF-8; those decode to U+FFFD and
  // the tokenizer rejects them with a caret diagnostic.
  let args: Vec<String> = env::args_os()
    .map(|arg| arg.to_string_lossy().into_owned())
    .collect();
  if args.len() != 2 {
    let program = args.first().map(String::as_str).unwrap_or("ninecc");
    eprintln!("usage: {program} <expr>");
    process::exit(1);
  }

  match ninecc::compile(&args[1]) {
    Ok(asm) => print!("{asm}"),
    Err(err) => {
      eprintln!("{err}");
      process::exit(1);
    }
  }
}
