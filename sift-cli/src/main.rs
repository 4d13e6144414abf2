//! The `sift` command-line tool.
//!
//! Exit codes: 0 success, 1 usage or compile error, 2 verification
//! failure, 3 runtime error.

use std::env;

mod commands;
mod json;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let result = match args.first().map(String::as_str) {
        Some("run") => commands::run(&args[1..]),
        Some("compile") => commands::compile(&args[1..]),
        Some("check") => commands::check(&args[1..]),
        Some("help") | Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        Some(other) => {
            eprintln!("unknown command '{other}'");
            print_usage();
            Err(1)
        }
        None => {
            print_usage();
            Err(1)
        }
    };
    if let Err(code) = result {
        std::process::exit(code);
    }
}

fn print_usage() {
    eprintln!("usage: sift <command> [options]");
    eprintln!();
    eprintln!("commands:");
    eprintln!("  run <expr> [--context file.json] [--path]");
    eprintln!("      evaluate an expression and print the result;");
    eprintln!("      with --path, '@' is the context object and '@path' an empty path");
    eprintln!("  compile <expr>");
    eprintln!("      print the compiled instruction list");
    eprintln!("  check <expr>");
    eprintln!("      compile and verify the instruction list");
}
