//! Lexical scope chains.
//!
//! A [`Scope`] is a shared, mutable frame of name bindings with an
//! optional parent. Closures capture the scope they were created in;
//! each closure call adds a child frame for its parameter bindings.
//! Lookup walks the chain from innermost to outermost.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::value::Value;

/// The top-level bindings an expression is evaluated against.
pub type Context = IndexMap<String, Value>;

/// One frame in a lexical scope chain. Cloning is cheap and shares the
/// underlying bindings.
#[derive(Clone)]
pub struct Scope {
    inner: Rc<RefCell<ScopeInner>>,
}

struct ScopeInner {
    vars: IndexMap<String, Value>,
    parent: Option<Scope>,
}

impl Scope {
    /// A root scope holding the given context bindings.
    pub fn root(context: Context) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ScopeInner {
                vars: context,
                parent: None,
            })),
        }
    }

    /// A root scope with no bindings.
    pub fn empty() -> Self {
        Self::root(Context::new())
    }

    /// A new innermost frame whose parent is `self`.
    pub fn child(&self) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ScopeInner {
                vars: IndexMap::new(),
                parent: Some(self.clone()),
            })),
        }
    }

    /// Walk the chain from innermost to outermost and return the first
    /// binding for `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let inner = self.inner.borrow();
        if let Some(value) = inner.vars.get(name) {
            return Some(value.clone());
        }
        inner.parent.as_ref().and_then(|p| p.lookup(name))
    }

    /// Bind `name` in this frame, shadowing any outer binding.
    pub fn define(&self, name: String, value: Value) {
        self.inner.borrow_mut().vars.insert(name, value);
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Scope")
            .field("vars", &inner.vars.keys().collect::<Vec<_>>())
            .field("has_parent", &inner.parent.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_parents() {
        let root = Scope::empty();
        root.define("x".to_string(), Value::Number(1.0));
        let child = root.child();
        assert_eq!(child.lookup("x"), Some(Value::Number(1.0)));
        assert_eq!(child.lookup("y"), None);
    }

    #[test]
    fn child_shadows_parent() {
        let root = Scope::empty();
        root.define("x".to_string(), Value::Number(1.0));
        let child = root.child();
        child.define("x".to_string(), Value::Number(2.0));
        assert_eq!(child.lookup("x"), Some(Value::Number(2.0)));
        assert_eq!(root.lookup("x"), Some(Value::Number(1.0)));
    }

    #[test]
    fn clones_share_bindings() {
        let scope = Scope::empty();
        let alias = scope.clone();
        alias.define("shared".to_string(), Value::Bool(true));
        assert_eq!(scope.lookup("shared"), Some(Value::Bool(true)));
    }
}
