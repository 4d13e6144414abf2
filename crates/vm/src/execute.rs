//! Instruction execution.
//!
//! The machine interprets a list one instruction at a time. Lazy
//! constructs never use jumps: a logical or conditional instruction
//! runs its nested sub-list on the same machine, which pushes a fresh
//! base frame and leaves exactly one value. Closure calls run the body
//! on a brand-new machine over a child of the captured scope.

use std::rc::Rc;

use indexmap::IndexMap;
use sift_common::{operators, Closure, Code, Instr, RuntimeError, Scope, Value};

use crate::machine::{Machine, MAX_CALL_DEPTH};

impl Machine {
    /// Run a list to its single result value.
    pub fn run(&mut self, code: &Code, scope: &Scope) -> Result<Value, RuntimeError> {
        let depth = self.frame_count();
        self.open_frame();
        let result = self.run_list(code, scope).and_then(|()| self.pop());
        // Drop the base frame, and any container frames an error left
        // open.
        self.truncate_frames(depth);
        result
    }

    fn run_list(&mut self, code: &Code, scope: &Scope) -> Result<(), RuntimeError> {
        for instr in &code.instructions {
            self.step(instr, scope)?;
        }
        Ok(())
    }

    fn step(&mut self, instr: &Instr, scope: &Scope) -> Result<(), RuntimeError> {
        match instr {
            Instr::Const(literal) => self.push(literal.to_value()),

            Instr::Ident(name) => {
                let value = scope
                    .lookup(name)
                    .ok_or_else(|| RuntimeError::UndefinedIdentifier { name: name.clone() })?;
                self.push(value);
            }

            Instr::Member => {
                let key = self.pop()?;
                let base = self.pop()?;
                let value = get_member(&base, &key)?;
                self.push(value);
            }

            Instr::OptionalMember => {
                let key = self.pop()?;
                let base = self.pop()?;
                if base.is_nil() {
                    self.push(Value::Undefined);
                } else {
                    let value = get_member(&base, &key)?;
                    self.push(value);
                }
            }

            Instr::Dup => {
                let top = self.peek()?.clone();
                self.push(top);
            }

            Instr::Container => self.open_frame(),

            Instr::Array => {
                let elements = self.close_frame()?;
                self.push(Value::array(elements));
            }

            Instr::Object => {
                let slots = self.close_frame()?;
                if slots.len() % 2 != 0 {
                    return Err(RuntimeError::StackUnderflow);
                }
                let mut entries = IndexMap::new();
                let mut slots = slots.into_iter();
                while let (Some(key), Some(value)) = (slots.next(), slots.next()) {
                    entries.insert(key.to_js_string(), value);
                }
                self.push(Value::object(entries));
            }

            Instr::ArraySpread => {
                let value = self.pop()?;
                let items = iterate(&value)?;
                self.extend(items);
            }

            Instr::ObjectSpread => {
                let value = self.pop()?;
                let entries = entries_of(&value);
                self.extend(entries.into_iter().flat_map(|(k, v)| [Value::Str(k), v]));
            }

            Instr::Call { method } => {
                let (callee, receiver, args) = self.call_operands(*method)?;
                let result = self.invoke(&callee, &receiver, &args)?;
                self.push(result);
            }

            Instr::OptionalCall { method } => {
                let (callee, receiver, args) = self.call_operands(*method)?;
                if callee.is_nil() {
                    self.push(Value::Undefined);
                } else {
                    let result = self.invoke(&callee, &receiver, &args)?;
                    self.push(result);
                }
            }

            Instr::Unary(op) => {
                let f = operators::unary(op)
                    .ok_or_else(|| RuntimeError::UnknownOperator { op: op.clone() })?;
                let operand = self.pop()?;
                self.push(f(&operand)?);
            }

            Instr::Binary(op) => {
                let f = operators::binary(op)
                    .ok_or_else(|| RuntimeError::UnknownOperator { op: op.clone() })?;
                let right = self.pop()?;
                let left = self.pop()?;
                self.push(f(&left, &right)?);
            }

            Instr::And(rhs) => {
                let left = self.pop()?;
                if left.is_truthy() {
                    let value = self.run(rhs, scope)?;
                    self.push(value);
                } else {
                    self.push(left);
                }
            }

            Instr::Or(rhs) => {
                let left = self.pop()?;
                if left.is_truthy() {
                    self.push(left);
                } else {
                    let value = self.run(rhs, scope)?;
                    self.push(value);
                }
            }

            Instr::Coalesce(rhs) => {
                let left = self.pop()?;
                if left.is_nil() {
                    let value = self.run(rhs, scope)?;
                    self.push(value);
                } else {
                    self.push(left);
                }
            }

            Instr::Conditional {
                then_code,
                else_code,
            } => {
                let test = self.pop()?;
                let branch = if test.is_truthy() { then_code } else { else_code };
                let value = self.run(branch, scope)?;
                self.push(value);
            }

            Instr::Closure(def) => {
                self.push(Value::Function(Rc::new(Closure {
                    def: Rc::clone(def),
                    scope: scope.clone(),
                })));
            }
        }
        Ok(())
    }

    /// Pop the argument frame, the callee, and the receiver when the
    /// call carries one.
    fn call_operands(
        &mut self,
        method: bool,
    ) -> Result<(Value, Value, Vec<Value>), RuntimeError> {
        let args = self.close_frame()?;
        let callee = self.pop()?;
        let receiver = if method { self.pop()? } else { Value::Undefined };
        Ok((callee, receiver, args))
    }

    pub(crate) fn invoke(
        &mut self,
        callee: &Value,
        receiver: &Value,
        args: &[Value],
    ) -> Result<Value, RuntimeError> {
        match callee {
            Value::Function(closure) => self.call_closure(closure, args),
            Value::Native(f) => f(receiver, args),
            other => Err(RuntimeError::NotCallable {
                type_of: other.type_of(),
            }),
        }
    }

    fn call_closure(&mut self, closure: &Closure, args: &[Value]) -> Result<Value, RuntimeError> {
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::CallDepthExceeded {
                limit: MAX_CALL_DEPTH,
            });
        }
        let scope = closure.scope.child();
        let mut machine = Machine::at_depth(self.call_depth + 1);
        machine.bind_params(&closure.def.params, args, &scope)?;
        machine.run(&closure.def.body, &scope)
    }
}

/// Property lookup. A `null`/`undefined` base is an error here; the
/// optional-member path checks for nil before calling. Missing
/// properties are `undefined`, and primitives other than strings have
/// no properties at all.
pub(crate) fn get_member(base: &Value, key: &Value) -> Result<Value, RuntimeError> {
    match base {
        Value::Undefined => Err(RuntimeError::PropertyOnNil { base: "undefined" }),
        Value::Null => Err(RuntimeError::PropertyOnNil { base: "null" }),
        Value::Object(entries) => {
            let key = key.to_js_string();
            Ok(entries.borrow().get(&key).cloned().unwrap_or(Value::Undefined))
        }
        Value::Array(elements) => {
            let key = key.to_js_string();
            if key == "length" {
                return Ok(Value::Number(elements.borrow().len() as f64));
            }
            let value = key
                .parse::<usize>()
                .ok()
                .and_then(|index| elements.borrow().get(index).cloned());
            Ok(value.unwrap_or(Value::Undefined))
        }
        Value::Str(s) => {
            let key = key.to_js_string();
            if key == "length" {
                return Ok(Value::Number(s.chars().count() as f64));
            }
            let value = key
                .parse::<usize>()
                .ok()
                .and_then(|index| s.chars().nth(index))
                .map(|c| Value::Str(c.to_string()));
            Ok(value.unwrap_or(Value::Undefined))
        }
        _ => Ok(Value::Undefined),
    }
}

/// The iteration protocol for spreads and array destructuring: arrays
/// yield their elements, strings their characters, everything else is
/// not iterable.
pub(crate) fn iterate(value: &Value) -> Result<Vec<Value>, RuntimeError> {
    match value {
        Value::Array(elements) => Ok(elements.borrow().clone()),
        Value::Str(s) => Ok(s.chars().map(|c| Value::Str(c.to_string())).collect()),
        other => Err(RuntimeError::NotIterable {
            type_of: other.type_of(),
        }),
    }
}

/// Enumerable entries for object spread. Primitives without properties
/// spread to nothing, matching `{ ...1 }`.
fn entries_of(value: &Value) -> Vec<(String, Value)> {
    match value {
        Value::Object(entries) => entries
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        Value::Array(elements) => elements
            .borrow()
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v.clone()))
            .collect(),
        Value::Str(s) => s
            .chars()
            .enumerate()
            .map(|(i, c)| (i.to_string(), Value::Str(c.to_string())))
            .collect(),
        _ => Vec::new(),
    }
}
