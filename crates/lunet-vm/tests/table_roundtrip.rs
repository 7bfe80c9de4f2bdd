//! Integration tests for table serialization onto the runtime stack
//!
//! Tables are pushed as single aggregate slots and verified through the
//! runtime's own table-read primitives, so the structure check does not
//! depend on the codec that produced it.

use lunet_sdk::{call, push_args, MarshalError, ScriptValue, StackContext, Table, TypeTag};
use lunet_vm::{Value, Vm};

#[test]
fn test_nested_table_structure_survives_push() {
    let mut inner = Table::new();
    inner.set("Nine", 10i64);
    let mut table = Table::new();
    table.set("Six", 7i64);
    table.set_table("Eight", inner);

    let mut vm = Vm::new();
    table.push(&mut vm).unwrap();

    // One aggregate slot on the stack, regardless of entry count.
    assert_eq!(vm.depth(), 1);
    assert_eq!(vm.table_len(0).unwrap(), 2);
    assert_eq!(vm.table_field(0, "Six").unwrap(), Some(Value::Int(7)));

    let eight = vm.table_field(0, "Eight").unwrap().expect("key present");
    let nested = eight.as_table().expect("nested value is a table");
    assert_eq!(nested.borrow().len(), 1);
    assert_eq!(nested.borrow().get("Nine"), Some(&Value::Int(10)));
}

#[test]
fn test_table_argument_counts_as_one_slot() {
    let mut sub_sub = Table::new();
    sub_sub.set("Another", 50i64);
    let mut sub = Table::new();
    sub.set("Six", 7i64);
    sub.set("Nine", 10i64);
    sub.set_table("Eight", sub_sub);

    let mut first = Table::new();
    first.set("Test", 3i64);

    let args: Vec<ScriptValue> = vec![
        first.into(),
        "One".into(),
        2i64.into(),
        "Three".into(),
        4.12f64.into(),
        "Five".into(),
        sub.into(),
    ];

    let mut vm = Vm::new();
    let pushed = push_args(&mut vm, &args).unwrap();
    assert_eq!(pushed, 7);
    assert_eq!(vm.depth(), 7);

    // Slots 0 and 6 are aggregates; everything between is scalar.
    assert_eq!(vm.tag_at(0).unwrap(), TypeTag::Table);
    assert_eq!(vm.tag_at(1).unwrap(), TypeTag::Str);
    assert_eq!(vm.tag_at(2).unwrap(), TypeTag::Int);
    assert_eq!(vm.tag_at(4).unwrap(), TypeTag::Float);
    assert_eq!(vm.tag_at(6).unwrap(), TypeTag::Table);

    let deep = vm.table_field(6, "Eight").unwrap().expect("key present");
    let deep = deep.as_table().unwrap();
    assert_eq!(deep.borrow().get("Another"), Some(&Value::Int(50)));
}

#[test]
fn test_shared_table_pushes_current_state() {
    let shared = Table::new().into_shared();
    shared.borrow_mut().set("Ten", 11i64);

    let mut outer = Table::new();
    outer.set("Twelve", 12i64);
    outer.set_table_ref("Inner", &shared);

    // Mutation after wiring is observed at push time.
    shared.borrow_mut().set("Ten", 99i64);

    let mut vm = Vm::new();
    let args = [ScriptValue::TableRef(shared.clone()), outer.into()];
    push_args(&mut vm, &args).unwrap();

    assert_eq!(vm.table_field(0, "Ten").unwrap(), Some(Value::Int(99)));
    let inner = vm.table_field(1, "Inner").unwrap().expect("key present");
    let inner = inner.as_table().unwrap();
    assert_eq!(inner.borrow().get("Ten"), Some(&Value::Int(99)));
}

#[test]
fn test_call_with_table_argument() {
    let mut sub = Table::new();
    sub.set("Six", 7i64);
    sub.set("Eight", 9.14f64);
    let mut table = Table::new();
    table.set("One", 2.0f64);
    table.set("Three", 4.14f64);
    table.set_table("Five", sub);

    let mut vm = Vm::new();
    vm.load_chunk(|vm| {
        // Verifies the aggregate structure from inside the runtime and
        // reports success as an integer flag.
        vm.register_global("inspect", |_, args| {
            let ok = args.first().and_then(Value::as_float) == Some(3.14)
                && args.get(1).and_then(Value::as_table).is_some_and(|t| {
                    let t = t.borrow();
                    t.get("One") == Some(&Value::Float(2.0))
                        && t.get("Five").is_some_and(|five| {
                            five.as_table().is_some_and(|five| {
                                five.borrow().get("Six") == Some(&Value::Int(7))
                            })
                        })
                });
            Ok(vec![Value::Int(ok as i64)])
        });
        Ok(())
    })
    .unwrap();

    let base = vm.depth();
    let results = call(&mut vm, "inspect", &[3.14f64.into(), table.into()]).unwrap();
    assert_eq!(results, 1);
    assert_eq!(vm.int_at(base).unwrap(), 1);
}

#[test]
fn test_cyclic_shared_reference_push_fails_recoverably() {
    let shared = Table::new().into_shared();
    shared.borrow_mut().set("Six", 7i64);
    shared.borrow_mut().set_table_ref("myself", &shared);

    let mut vm = Vm::new();
    let err = shared.borrow().push(&mut vm).unwrap_err();
    match err {
        MarshalError::Runtime(msg) => assert!(msg.contains("nesting")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_failed_push_through_call_leaves_depth_unchanged() {
    let shared = Table::new().into_shared();
    shared.borrow_mut().set_table_ref("myself", &shared);

    let mut vm = Vm::new();
    vm.push(Value::Int(42));
    let base = vm.depth();

    let args = [1i64.into(), ScriptValue::TableRef(shared.clone())];
    assert!(call(&mut vm, "anything", &args).is_err());
    // The scalar argument and every partial aggregate were released.
    assert_eq!(vm.depth(), base);
    assert_eq!(vm.value_at(0), Some(&Value::Int(42)));
}

#[test]
fn test_empty_table_pushes_empty_aggregate() {
    let table = Table::new();
    let mut vm = Vm::new();
    table.push(&mut vm).unwrap();
    assert_eq!(vm.depth(), 1);
    assert_eq!(vm.table_len(0).unwrap(), 0);
}
