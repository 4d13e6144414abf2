//! Command implementations. Each returns the process exit code on
//! failure; messages go to stderr, results to stdout.

use sift_common::{Context, Value};
use sift_compiler::dump;
use sift_script::{PathScript, Script};
use sift_verifier::verify;

use crate::json;

pub fn run(args: &[String]) -> Result<(), i32> {
    let mut expr = None;
    let mut context_file = None;
    let mut path_mode = false;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--context" => {
                let Some(file) = iter.next() else {
                    eprintln!("--context needs a file argument");
                    return Err(1);
                };
                context_file = Some(file.clone());
            }
            "--path" => path_mode = true,
            other if expr.is_none() => expr = Some(other.to_string()),
            other => {
                eprintln!("unexpected argument '{other}'");
                return Err(1);
            }
        }
    }
    let Some(expr) = expr else {
        eprintln!("usage: sift run <expr> [--context file.json] [--path]");
        return Err(1);
    };

    let context = match &context_file {
        Some(file) => json::load_context(file)?,
        None => Context::new(),
    };

    let result = if path_mode {
        let script = PathScript::new(&expr).map_err(|e| {
            eprintln!("error: {e}");
            1
        })?;
        // The whole context doubles as the current value; paths are
        // empty at the top level.
        let current = Value::object(context.clone());
        script.run_in_new_context(current, Value::array(Vec::new()), &context)
    } else {
        let script = Script::new(&expr).map_err(|e| {
            eprintln!("error: {e}");
            1
        })?;
        script.run_in_new_context(&context)
    };

    match result {
        Ok(value) => {
            println!("{}", render(&value));
            Ok(())
        }
        Err(e) => {
            eprintln!("runtime error: {e}");
            Err(3)
        }
    }
}

pub fn compile(args: &[String]) -> Result<(), i32> {
    let [expr] = args else {
        eprintln!("usage: sift compile <expr>");
        return Err(1);
    };
    let script = Script::new(expr).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;
    print!("{}", dump(script.code()));
    Ok(())
}

pub fn check(args: &[String]) -> Result<(), i32> {
    let [expr] = args else {
        eprintln!("usage: sift check <expr>");
        return Err(1);
    };
    let script = Script::new(expr).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;
    match verify(script.code()) {
        Ok(()) => {
            println!("ok");
            Ok(())
        }
        Err(errors) => {
            for error in &errors {
                eprintln!("verify error: {error}");
            }
            Err(2)
        }
    }
}

/// Primitives print the way the language would coerce them to string;
/// arrays and objects print as JSON.
fn render(value: &Value) -> String {
    match value {
        Value::Array(_) | Value::Object(_) => serde_json::to_string(&json::to_json(value))
            .unwrap_or_else(|_| value.to_js_string()),
        other => other.to_js_string(),
    }
}
