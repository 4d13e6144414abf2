//! Path expressions.
//!
//! `@` is not a legal identifier character, so path expressions are
//! compiled by textual substitution: every `@` becomes a placeholder
//! identifier that provably does not occur in the source, the result
//! compiles normally, and the placeholder is then rewritten back to
//! `@` inside the compiled list. That restores string literals the
//! substitution mangled and leaves `@`/`@path` as ordinary identifier
//! operands for the evaluation context to bind.

use std::fmt;

use sift_common::{Code, Instr, Literal, Scope};
use sift_compiler::{compile, parse};
use sift_vm::execute;

use crate::{Context, RuntimeError, ScriptError, Value};

/// A script with path syntax: `@` is the current value, `@path` its
/// location.
#[derive(Debug, Clone)]
pub struct PathScript {
    source: String,
    code: Code,
    uses_path: bool,
}

impl PathScript {
    /// The identifier the current value is bound to.
    pub const CURRENT: &'static str = "@";

    /// The identifier the current value's path is bound to.
    pub const CURRENT_PATH: &'static str = "@path";

    /// Compile a path expression.
    pub fn new(source: &str) -> Result<Self, ScriptError> {
        let placeholder = unique_placeholder(source);
        let substituted = source.replace('@', &placeholder);
        // Compiling here (rather than through `Script`) keeps every
        // closure definition uniquely owned, so the rewrite below can
        // reach closure bodies through `Rc::get_mut`.
        let expr = parse(&substituted)?;
        let mut code = compile(&expr)?;
        let mut uses_path = false;
        code.for_each_instr_mut(&mut |instr| match instr {
            Instr::Ident(name) if name.contains(&placeholder) => {
                *name = name.replace(&placeholder, "@");
                if name == Self::CURRENT_PATH {
                    uses_path = true;
                }
            }
            Instr::Const(Literal::Str(text)) if text.contains(&placeholder) => {
                *text = text.replace(&placeholder, "@");
            }
            _ => {}
        });

        Ok(Self {
            source: source.to_string(),
            code,
            uses_path,
        })
    }

    /// Whether the expression references `@path`. Callers that have to
    /// materialize a path can skip the work when it is not.
    pub fn uses_path(&self) -> bool {
        self.uses_path
    }

    /// Evaluate with `@` bound to `current`, `@path` bound to `path`,
    /// and the rest of the context available by name.
    pub fn run_in_new_context(
        &self,
        current: Value,
        path: Value,
        context: &Context,
    ) -> Result<Value, RuntimeError> {
        let mut bindings = context.clone();
        bindings.insert(Self::CURRENT.to_string(), current);
        bindings.insert(Self::CURRENT_PATH.to_string(), path);
        execute(&self.code, &Scope::root(bindings))
    }

    /// The original source text, `@` and all.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The compiled instruction list, after the placeholder rewrite.
    pub fn code(&self) -> &Code {
        &self.code
    }
}

impl fmt::Display for PathScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// An identifier guaranteed not to occur in `source`: the base name
/// extended with underscores until no occurrence remains.
fn unique_placeholder(source: &str) -> String {
    let mut placeholder = String::from("__current");
    while source.contains(&placeholder) {
        placeholder.push('_');
    }
    placeholder
}
