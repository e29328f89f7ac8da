use std::cell::Cell;
use std::rc::Rc;

use sable_runtime::{FunctionRegistry, RuntimeError, Value};

fn counting_fn(counter: Rc<Cell<u32>>) -> impl Fn(&[Value]) -> Value {
    move |_args| {
        counter.set(counter.get() + 1);
        Value::Int(counter.get() as i64)
    }
}

#[test]
fn registered_functions_dispatch() {
    let mut reg = FunctionRegistry::new();
    reg.register("double", |args| match args {
        [Value::Int(n)] => Value::Int(n * 2),
        _ => Value::Null,
    })
    .unwrap();
    assert_eq!(reg.invoke("double", &[Value::Int(21)]).unwrap(), Value::Int(42));
    assert!(reg.is_registered("double"));
}

#[test]
fn duplicate_registration_is_fatal() {
    let mut reg = FunctionRegistry::new();
    reg.register("fmt", |_| Value::Null).unwrap();
    let err = reg.register("fmt", |_| Value::Null).unwrap_err();
    assert_eq!(
        err,
        RuntimeError::DuplicateFunction { name: "fmt".into() }
    );
}

#[test]
fn unknown_names_are_reported() {
    let mut reg = FunctionRegistry::new();
    let err = reg.invoke("ghost", &[]).unwrap_err();
    assert_eq!(err, RuntimeError::UnknownFunction { name: "ghost".into() });
}

#[test]
fn results_recompute_after_the_cache_bound() {
    let counter = Rc::new(Cell::new(0));
    let mut reg = FunctionRegistry::new();
    reg.register_with_bound("tick", counting_fn(counter.clone()), 2)
        .unwrap();

    let args = [Value::Str("same".into())];
    assert_eq!(reg.invoke("tick", &args).unwrap(), Value::Int(1)); // computed
    assert_eq!(reg.invoke("tick", &args).unwrap(), Value::Int(1)); // cached
    assert_eq!(reg.invoke("tick", &args).unwrap(), Value::Int(1)); // cached
    assert_eq!(reg.invoke("tick", &args).unwrap(), Value::Int(2)); // bound hit, recomputed
    assert_eq!(reg.invoke("tick", &args).unwrap(), Value::Int(2)); // counter reset, cached again
}

#[test]
fn zero_bound_disables_caching() {
    let counter = Rc::new(Cell::new(0));
    let mut reg = FunctionRegistry::new();
    reg.register_with_bound("tick", counting_fn(counter.clone()), 0)
        .unwrap();

    assert_eq!(reg.invoke("tick", &[]).unwrap(), Value::Int(1));
    assert_eq!(reg.invoke("tick", &[]).unwrap(), Value::Int(2));
    assert_eq!(reg.invoke("tick", &[]).unwrap(), Value::Int(3));
}

#[test]
fn distinct_arguments_cache_separately() {
    let counter = Rc::new(Cell::new(0));
    let mut reg = FunctionRegistry::new();
    reg.register("tick", counting_fn(counter.clone())).unwrap();

    let a = reg.invoke("tick", &[Value::Int(1)]).unwrap();
    let b = reg.invoke("tick", &[Value::Int(2)]).unwrap();
    assert_ne!(a, b);
    // repeats of each argument set serve their own cached result
    assert_eq!(reg.invoke("tick", &[Value::Int(1)]).unwrap(), a);
    assert_eq!(reg.invoke("tick", &[Value::Int(2)]).unwrap(), b);
}
