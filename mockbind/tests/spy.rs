// vim: tw=80
//! Spied methods, and replacing a method's body outright.

use mockbind::*;
use mockbind::predicate::*;

fn spy() -> (Mock, MockMethod<(u32,), u32>) {
    let mock = Mock::new("s");
    let double = mock.spy("double", |(x,): &(u32,)| x * 2);
    (mock, double)
}

#[test]
fn unstubbed_calls_reach_the_original() {
    let (_mock, double) = spy();
    assert_eq!(4, double.call((2,)));
    assert_eq!(0, double.handler_count());
}

#[test]
fn stubs_take_precedence() {
    let (_mock, double) = spy();
    double.stub().with((eq(3),)).always_returns(0).commit();
    assert_eq!(0, double.call((3,)));
    assert_eq!(8, double.call((4,)));
}

#[test]
fn calls_are_recorded() {
    let (_mock, double) = spy();
    double.call((1,));
    double.call((2,));
    assert!(Verification::of(&double.calls()).times(2).verify().is_ok());
}

#[test]
fn does_original() {
    let (_mock, double) = spy();
    double.stub()
        .returns(100)
        .does_original()
        .returns(200)
        .commit();
    assert_eq!(100, double.call((5,)));
    assert_eq!(10, double.call((5,)));
    assert_eq!(200, double.call((5,)));
}

/// A recorded `does_original` keeps the implementation it was written with.
#[test]
fn does_original_is_captured_when_recorded() {
    let (_mock, double) = spy();
    double.stub().using((1,)).does_original().commit();
    double.set_original(|(x,)| x * 3);
    assert_eq!(2, double.call((1,)));
    assert_eq!(6, double.call((2,)));
}

#[test]
#[should_panic(expected = "m.foo: m.foo has no original implementation")]
fn does_original_without_one() {
    let mock = Mock::new("m");
    let foo = mock.method::<(u32,), u32>("foo");
    foo.stub().does_original();
}

#[test]
fn set_original_later() {
    let mock = Mock::new("m");
    let foo = mock.method::<(u32,), u32>("foo");
    assert!(foo.try_call((1,)).is_err());
    foo.set_original(|(x,)| x + 1);
    assert_eq!(Ok(2), foo.try_call((1,)));
}

mod assign {
    use super::*;

    #[test]
    fn replaces_the_body() {
        let mock = Mock::new("m");
        let foo = mock.method::<(u32,), u32>("foo");
        foo.stub().assign(|(x,)| x + 10);
        assert_eq!(11, foo.call((1,)));
        assert_eq!(12, foo.call((2,)));
        assert_eq!(1, foo.handler_count());
    }

    #[test]
    fn value() {
        let mock = Mock::new("m");
        let foo = mock.method::<(u32,), String>("foo");
        foo.stub().assign_value(String::from("hello"));
        assert_eq!("hello", foo.call((1,)));
        assert_eq!("hello", foo.call((2,)));
    }

    #[test]
    fn respects_the_matcher() {
        let (_mock, double) = spy();
        double.stub().using((1,)).assign_value(7);
        assert_eq!(7, double.call((1,)));
        assert_eq!(4, double.call((2,)));
    }

    #[test]
    fn overrides_earlier_statements() {
        let mock = Mock::new("m");
        let foo = mock.method::<(u32,), u32>("foo");
        foo.stub().returns(1).returns(2).commit();
        foo.stub().assign_value(3);
        assert_eq!(3, foo.call((0,)));
    }

    /// Actions recorded before the assignment run first.
    #[test]
    fn after_other_actions() {
        let mock = Mock::new("m");
        let foo = mock.method::<(u32,), u32>("foo");
        foo.stub().returns(1).assign_value(3);
        assert_eq!(1, foo.call((0,)));
        assert_eq!(3, foo.call((0,)));
        assert_eq!(3, foo.call((0,)));
    }

    #[test]
    fn binding_set_method_body() {
        let mock = Mock::new("m");
        let foo = mock.method::<(u32,), u32>("foo");
        let mut b = foo.stub().into_binding();
        assert_eq!(Ok(()), b.set_method_body(|(x,)| *x));
        assert!(b.is_committed());
        assert_eq!(9, foo.call((9,)));
    }
}
