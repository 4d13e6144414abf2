//! Parameter binding.
//!
//! Runs at the start of every closure call, binding argument values to
//! parameter patterns in the call's fresh scope. Defaults evaluate in
//! that same scope, so a default can see parameters bound before it.

use sift_common::{DefaultExpr, Param, ParamKey, RuntimeError, Scope, Value};

use crate::execute::{get_member, iterate};
use crate::machine::Machine;

impl Machine {
    /// Bind positional arguments against the parameter patterns.
    pub(crate) fn bind_params(
        &mut self,
        params: &[Param],
        args: &[Value],
        scope: &Scope,
    ) -> Result<(), RuntimeError> {
        for (index, param) in params.iter().enumerate() {
            if let Param::Rest(inner) = param {
                let rest = args.get(index..).unwrap_or(&[]).to_vec();
                self.bind_one(inner, Value::array(rest), scope)?;
                break;
            }
            let arg = args.get(index).cloned().unwrap_or(Value::Undefined);
            self.bind_one(param, arg, scope)?;
        }
        Ok(())
    }

    fn bind_one(
        &mut self,
        param: &Param,
        value: Value,
        scope: &Scope,
    ) -> Result<(), RuntimeError> {
        match param {
            Param::Ident(name) => {
                scope.define(name.clone(), value);
                Ok(())
            }

            Param::Default { inner, default } => {
                let value = if matches!(value, Value::Undefined) {
                    match default {
                        DefaultExpr::Const(literal) => literal.to_value(),
                        DefaultExpr::Code(code) => self.run(code, scope)?,
                    }
                } else {
                    value
                };
                self.bind_one(inner, value, scope)
            }

            Param::Array(elements) => {
                let items = iterate(&value)?;
                for (index, slot) in elements.iter().enumerate() {
                    let Some(element) = slot else { continue };
                    if let Param::Rest(inner) = element {
                        let rest = items.get(index..).unwrap_or(&[]).to_vec();
                        self.bind_one(inner, Value::array(rest), scope)?;
                        break;
                    }
                    let item = items.get(index).cloned().unwrap_or(Value::Undefined);
                    self.bind_one(element, item, scope)?;
                }
                Ok(())
            }

            Param::Object(entries) => {
                for entry in entries {
                    let key = match &entry.key {
                        ParamKey::Fixed(name) => Value::Str(name.clone()),
                        ParamKey::Computed(code) => self.run(code, scope)?,
                    };
                    // Destructuring nil raises the same error a member
                    // access would.
                    let prop = get_member(&value, &key)?;
                    self.bind_one(&entry.value, prop, scope)?;
                }
                Ok(())
            }

            // Rest positions are consumed by the enclosing list; a bare
            // rest binds whatever it was handed.
            Param::Rest(inner) => self.bind_one(inner, value, scope),
        }
    }
}
