//! Facade-level behavior: the properties callers rely on.

use std::cell::Cell;
use std::rc::Rc;

use indexmap::IndexMap;
use sift_common::{Context, RuntimeError, Value};
use sift_script::{PathScript, Script, ScriptError};

fn num(n: f64) -> Value {
    Value::Number(n)
}

fn context(entries: &[(&str, Value)]) -> Context {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn compile_once_evaluate_many() {
    let script = Script::new("price * quantity").expect("script");
    for (price, quantity, expected) in [(2.0, 3.0, 6.0), (5.0, 4.0, 20.0)] {
        let ctx = context(&[("price", num(price)), ("quantity", num(quantity))]);
        assert_eq!(script.run_in_new_context(&ctx), Ok(num(expected)));
    }
}

#[test]
fn evaluation_is_deterministic() {
    let script = Script::new("a?.b ?? [1, 2, 3].length").expect("script");
    let ctx = context(&[("a", Value::Null)]);
    let first = script.run_in_new_context(&ctx);
    for _ in 0..5 {
        assert_eq!(script.run_in_new_context(&ctx), first);
    }
}

#[test]
fn evaluations_share_no_state() {
    // A closure bound in one evaluation must not leak into the next.
    let script = Script::new("(x => x + step)(1)").expect("script");
    assert_eq!(
        script.run_in_new_context(&context(&[("step", num(10.0))])),
        Ok(num(11.0))
    );
    assert_eq!(
        script.run_in_new_context(&context(&[("step", num(20.0))])),
        Ok(num(21.0))
    );
    assert_eq!(
        script.run_in_new_context(&Context::new()),
        Err(RuntimeError::UndefinedIdentifier {
            name: "step".to_string()
        })
    );
}

#[test]
fn short_circuit_laws_hold_through_the_facade() {
    let calls = Rc::new(Cell::new(0u32));
    let seen = Rc::clone(&calls);
    let ctx = context(&[(
        "probe",
        Value::native(move |_, _| {
            seen.set(seen.get() + 1);
            Ok(Value::Bool(true))
        }),
    )]);
    for source in ["false && probe()", "true || probe()", "0 ?? probe()"] {
        Script::new(source)
            .expect("script")
            .run_in_new_context(&ctx)
            .expect("run");
    }
    assert_eq!(calls.get(), 0);
    // null is nil, so coalescing does reach the right side.
    Script::new("null ?? probe()")
        .expect("script")
        .run_in_new_context(&ctx)
        .expect("run");
    assert_eq!(calls.get(), 1);
}

#[test]
fn operator_fidelity_end_to_end() {
    for (source, expected) in [
        ("1 + '2'", Value::Str("12".to_string())),
        ("0.1 + 0.2 === 0.30000000000000004", Value::Bool(true)),
        ("'' + true", Value::Str("true".to_string())),
        ("typeof null", Value::Str("object".to_string())),
        ("'b' in { a: 1 }", Value::Bool(false)),
    ] {
        let script = Script::new(source).expect("script");
        assert_eq!(
            script.run_in_new_context(&Context::new()),
            Ok(expected),
            "source: {source}"
        );
    }
}

#[test]
fn arrow_functions_with_destructuring() {
    let script = Script::new("(({ a, b = 5 }) => a + b)({ a: 1 })").expect("script");
    assert_eq!(script.run_in_new_context(&Context::new()), Ok(num(6.0)));
}

#[test]
fn rejected_forms_fail_at_construction() {
    assert!(matches!(
        Script::new("x = 5"),
        Err(ScriptError::Compile(_))
    ));
    assert!(matches!(
        Script::new("a, b"),
        Err(ScriptError::Compile(_))
    ));
    assert!(matches!(Script::new("1 +"), Err(ScriptError::Parse(_))));
}

#[test]
fn path_scripts_bind_current_and_path() {
    let mut item = IndexMap::new();
    item.insert("price".to_string(), num(7.0));
    let script = PathScript::new("@.price < 10").expect("script");
    assert!(!script.uses_path());
    assert_eq!(
        script.run_in_new_context(Value::object(item), Value::array(vec![]), &Context::new()),
        Ok(Value::Bool(true))
    );

    let script = PathScript::new("@path.length > 1").expect("script");
    assert!(script.uses_path());
    let path = Value::array(vec![
        Value::Str("items".to_string()),
        Value::Str("0".to_string()),
    ]);
    assert_eq!(
        script.run_in_new_context(num(0.0), path, &Context::new()),
        Ok(Value::Bool(true))
    );
}

#[test]
fn path_script_source_keeps_at_signs() {
    let script = PathScript::new("@ > limit").expect("script");
    assert_eq!(script.to_string(), "@ > limit");
    assert_eq!(
        script.run_in_new_context(num(5.0), Value::Undefined, &context(&[("limit", num(3.0))])),
        Ok(Value::Bool(true))
    );
}

#[test]
fn path_rewrite_reaches_closure_bodies() {
    let script = PathScript::new("(x => x + @)(1)").expect("script");
    assert_eq!(
        script.run_in_new_context(num(41.0), Value::Undefined, &Context::new()),
        Ok(num(42.0))
    );
}

#[test]
fn optional_chaining_guards_single_nodes() {
    let mut inner = IndexMap::new();
    inner.insert("b".to_string(), Value::Null);
    let ctx = context(&[("a", Value::object(inner))]);

    // ?. guards a, not b: the .c access still hits null.
    assert_eq!(
        Script::new("a?.b.c")
            .expect("script")
            .run_in_new_context(&ctx),
        Err(RuntimeError::PropertyOnNil { base: "null" })
    );
    assert_eq!(
        Script::new("a.b?.c")
            .expect("script")
            .run_in_new_context(&ctx),
        Ok(Value::Undefined)
    );

    let nil_ctx = context(&[("a", Value::Null)]);
    assert_eq!(
        Script::new("a?.b.c")
            .expect("script")
            .run_in_new_context(&nil_ctx),
        Err(RuntimeError::PropertyOnNil { base: "undefined" })
    );
    assert_eq!(
        Script::new("a?.b?.c")
            .expect("script")
            .run_in_new_context(&nil_ctx),
        Ok(Value::Undefined)
    );
}
