// vim: tw=80
//! Aggregating statements into chains.

use mockbind::*;

fn formats(s: &dyn Sequenceable) -> Vec<String> {
    let mut v = Vec::new();
    s.expected_sequence(&mut v);
    v.iter().map(|m| m.format()).collect()
}

#[test]
fn single_statement() {
    let mock = Mock::new("m");
    let foo = mock.method::<(u32,), ()>("foo");
    let calls = foo.calls().using((1,));
    assert_eq!(1, calls.size());
    assert_eq!(vec!["m.foo(var == 1)"], formats(&calls));
}

#[test]
fn chain_preserves_order() {
    let mock = Mock::new("m");
    let foo = mock.method::<(u32,), ()>("foo");
    let bar = mock.method::<(), ()>("bar");
    let (a, b, c) = (foo.calls().using((1,)),
                     bar.calls(),
                     foo.calls().using((2,)));
    let ch = chain![&a, &b, &c];
    assert_eq!(3, ch.size());
    assert_eq!(vec!["m.foo(var == 1)", "m.bar(<any arguments>)",
                    "m.foo(var == 2)"],
               formats(&ch));
}

#[test]
fn chain_of_chains() {
    let mock = Mock::new("m");
    let foo = mock.method::<(), ()>("foo");
    let bar = mock.method::<(), ()>("bar");
    let (f, b) = (foo.calls(), bar.calls());
    let inner = chain![&f, &b];
    let outer = chain![&b, &inner, &f];
    assert_eq!(4, outer.size());
    assert_eq!(vec!["m.bar(<any arguments>)", "m.foo(<any arguments>)",
                    "m.bar(<any arguments>)", "m.foo(<any arguments>)"],
               formats(&outer));
}

#[test]
fn empty_chain() {
    let c = Chain::new();
    assert_eq!(0, c.size());
    assert!(formats(&c).is_empty());
    let mut mocks = InvolvedMocks::new();
    c.involved_mocks(&mut mocks);
    assert!(mocks.is_empty());
}

#[test]
fn repeated() {
    let mock = Mock::new("m");
    let foo = mock.method::<(), ()>("foo");
    let bar = mock.method::<(), ()>("bar");
    let (f, b) = (foo.calls(), bar.calls());
    let c = chain![&f, &b];
    let r = Repeated::new(&c, 3);
    assert_eq!(6, r.size());
    assert_eq!(formats(&chain![&c, &c, &c]), formats(&r));
    assert_eq!(0, Repeated::new(&c, 0).size());
}

#[test]
fn involved_mocks() {
    let m1 = Mock::new("a");
    let m2 = Mock::new("b");
    let foo = m1.method::<(), ()>("foo");
    let bar = m1.method::<(), ()>("bar");
    let baz = m2.method::<(), ()>("baz");
    let (f, b, z) = (foo.calls(), bar.calls(), baz.calls());

    let mut mocks = InvolvedMocks::new();
    chain![&f, &b].involved_mocks(&mut mocks);
    assert_eq!(vec![m1.id()], mocks.keys().cloned().collect::<Vec<_>>());

    let across = chain![&z, &f];
    assert_eq!(2, across.size());
    assert_eq!(vec!["b.baz(<any arguments>)", "a.foo(<any arguments>)"],
               formats(&across));
    across.involved_mocks(&mut mocks);
    let mut expected = vec![m1.id(), m2.id()];
    expected.sort();
    assert_eq!(expected, mocks.keys().cloned().collect::<Vec<_>>());
}

/// A chain's calls are the union of its members' calls, without duplicates.
#[test]
fn actual_invocations_union() {
    let mock = Mock::new("m");
    let foo = mock.method::<(u32,), ()>("foo");
    let bar = mock.method::<(), ()>("bar");
    foo.stub().always_returns(()).commit();
    bar.stub().always_returns(()).commit();
    foo.call((1,));
    foo.call((2,));
    bar.call(());

    let (all, one) = (foo.calls(), foo.calls().using((1,)));
    let mut found = InvocationSet::new();
    chain![&all, &one].actual_invocations(&mut found);
    assert_eq!(2, found.len());

    let mut everything = InvocationSet::new();
    mock.actual_invocations(&mut everything);
    assert_eq!(3, everything.len());
    let rest = everything.difference(&found);
    assert_eq!(vec!["m.bar()".to_owned()],
               rest.iter().map(|i| i.format()).collect::<Vec<_>>());
}
