//! Human-readable rendering of instruction lists.
//!
//! One instruction per line, uppercase mnemonics, nested sub-lists
//! indented two spaces. Meant for inspection and the CLI `compile`
//! command, not for round-tripping.

use sift_common::{Code, DefaultExpr, Instr, Param, ParamKey};

/// Render an instruction list.
pub fn dump(code: &Code) -> String {
    let mut out = String::new();
    write_code(code, 0, &mut out);
    out
}

fn write_line(out: &mut String, indent: usize, text: &str) {
    for _ in 0..indent {
        out.push_str("  ");
    }
    out.push_str(text);
    out.push('\n');
}

fn write_code(code: &Code, indent: usize, out: &mut String) {
    for instr in &code.instructions {
        match instr {
            Instr::Const(literal) => write_line(out, indent, &format!("CONST {literal}")),
            Instr::Ident(name) => write_line(out, indent, &format!("IDENT {name}")),
            Instr::Member => write_line(out, indent, "MEMBER"),
            Instr::OptionalMember => write_line(out, indent, "MEMBER?"),
            Instr::Dup => write_line(out, indent, "DUP"),
            Instr::Container => write_line(out, indent, "CONTAINER"),
            Instr::Array => write_line(out, indent, "ARRAY"),
            Instr::Object => write_line(out, indent, "OBJECT"),
            Instr::ArraySpread => write_line(out, indent, "SPREAD"),
            Instr::ObjectSpread => write_line(out, indent, "SPREAD-ENTRIES"),
            Instr::Call { method } => {
                write_line(out, indent, if *method { "CALL-METHOD" } else { "CALL" })
            }
            Instr::OptionalCall { method } => {
                write_line(out, indent, if *method { "CALL-METHOD?" } else { "CALL?" })
            }
            Instr::Unary(op) => write_line(out, indent, &format!("UNARY {op}")),
            Instr::Binary(op) => write_line(out, indent, &format!("BINARY {op}")),
            Instr::And(sub) => {
                write_line(out, indent, "AND");
                write_code(sub, indent + 1, out);
            }
            Instr::Or(sub) => {
                write_line(out, indent, "OR");
                write_code(sub, indent + 1, out);
            }
            Instr::Coalesce(sub) => {
                write_line(out, indent, "COALESCE");
                write_code(sub, indent + 1, out);
            }
            Instr::Conditional {
                then_code,
                else_code,
            } => {
                write_line(out, indent, "COND");
                write_line(out, indent, "THEN");
                write_code(then_code, indent + 1, out);
                write_line(out, indent, "ELSE");
                write_code(else_code, indent + 1, out);
            }
            Instr::Closure(def) => {
                let params: Vec<String> = def.params.iter().map(param_text).collect();
                write_line(out, indent, &format!("CLOSURE ({})", params.join(", ")));
                write_code(&def.body, indent + 1, out);
            }
        }
    }
}

fn param_text(param: &Param) -> String {
    match param {
        Param::Ident(name) => name.clone(),
        Param::Rest(inner) => format!("...{}", param_text(inner)),
        Param::Array(elements) => {
            let parts: Vec<String> = elements
                .iter()
                .map(|e| e.as_ref().map(param_text).unwrap_or_default())
                .collect();
            format!("[{}]", parts.join(", "))
        }
        Param::Object(entries) => {
            let parts: Vec<String> = entries
                .iter()
                .map(|e| {
                    let key = match &e.key {
                        ParamKey::Fixed(name) => name.clone(),
                        ParamKey::Computed(_) => "[...]".to_string(),
                    };
                    format!("{key}: {}", param_text(&e.value))
                })
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
        Param::Default { inner, default } => match default {
            DefaultExpr::Const(literal) => format!("{} = {literal}", param_text(inner)),
            DefaultExpr::Code(_) => format!("{} = <expr>", param_text(inner)),
        },
    }
}
