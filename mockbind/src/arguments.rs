// vim: tw=80
//! Argument tuples, and matchers for individual arguments.

use predicates::prelude::{Predicate, predicate};
use predicates_tree::CaseTreeExt;
use std::{
    any::{Any, TypeId, type_name},
    fmt::Debug,
    marker::PhantomData
};

/// The arguments of a mocked method, as a tuple.
///
/// Implemented for tuples of up to eight `Debug + 'static` elements.  A method
/// that takes no arguments uses `()`, and a method with one argument uses a
/// one-element tuple like `(u32,)`.
pub trait Arguments: Debug + 'static {
    /// Number of arguments
    const ARITY: usize;

    /// The type of each argument, by position.
    fn type_ids() -> Vec<TypeId>;

    /// Names of the argument types, for error messages.
    fn type_names() -> Vec<&'static str>;

    /// Access a single argument, type-erased.
    fn get(&self, position: usize) -> Option<&dyn Any>;

    /// Render the arguments like a call: `(1, "two")`
    fn format(&self) -> String;
}

/// Argument tuples whose elements can serve as example values for equality
/// matching.
pub trait ExampleArguments: Arguments {
    /// One equality matcher per position.
    fn equality_matchers(&self) -> Vec<Box<dyn ArgMatcher>>;
}

/// A matcher for a single argument position.
///
/// The argument type is checked against the method's signature when the
/// matcher is installed, not when a call is matched.
pub trait ArgMatcher {
    /// The type of argument this matcher accepts.
    fn arg_type(&self) -> TypeId;

    fn arg_type_name(&self) -> &'static str;

    /// Does `arg` satisfy this matcher?  Arguments of the wrong type never do.
    fn matches(&self, arg: &dyn Any) -> bool;

    /// Describe why `arg` fails this matcher, or `None` if it doesn't.
    fn explain(&self, arg: &dyn Any) -> Option<String>;

    fn describe(&self) -> String;
}

struct PredicateArg<T, P> {
    predicate: P,
    // fn(&T) keeps the matcher's auto traits independent of T
    _t: PhantomData<fn(&T)>
}

impl<T, P> ArgMatcher for PredicateArg<T, P>
    where T: 'static, P: Predicate<T>
{
    fn arg_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn arg_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn matches(&self, arg: &dyn Any) -> bool {
        arg.downcast_ref::<T>()
            .map_or(false, |v| self.predicate.eval(v))
    }

    fn explain(&self, arg: &dyn Any) -> Option<String> {
        let v = match arg.downcast_ref::<T>() {
            Some(v) => v,
            None => return Some(format!("argument is not a {}",
                                        type_name::<T>()))
        };
        self.predicate.find_case(false, v)
            .map(|case| case.tree().to_string())
    }

    fn describe(&self) -> String {
        self.predicate.to_string()
    }
}

/// Build an [`ArgMatcher`] for an argument of type `T` from any
/// [`Predicate`].
///
/// # Examples
/// ```
/// # use mockbind::*;
/// let m = arg::<u32, _>(predicate::eq(5));
/// assert!(m.matches(&5u32));
/// assert!(!m.matches(&6u32));
/// assert!(!m.matches(&5i64));
/// ```
pub fn arg<T, P>(predicate: P) -> Box<dyn ArgMatcher>
    where T: 'static, P: Predicate<T> + 'static
{
    Box::new(PredicateArg{predicate, _t: PhantomData})
}

/// Tuples of [`Predicate`]s that line up with an argument tuple `A`.
///
/// Because the tuple shapes must agree, the compiler checks arity.
pub trait IntoArgMatchers<A> {
    fn into_arg_matchers(self) -> Vec<Box<dyn ArgMatcher>>;
}

macro_rules! arguments_tuple {
    ($arity:expr; $( $idx:tt $argty:ident $predty:ident ),*) => {
        impl<$( $argty: Debug + 'static, )*> Arguments for ($( $argty, )*) {
            const ARITY: usize = $arity;

            fn type_ids() -> Vec<TypeId> {
                vec![$( TypeId::of::<$argty>(), )*]
            }

            fn type_names() -> Vec<&'static str> {
                vec![$( type_name::<$argty>(), )*]
            }

            #[allow(unused_variables)]
            fn get(&self, position: usize) -> Option<&dyn Any> {
                match position {
                    $( $idx => Some(&self.$idx), )*
                    _ => None
                }
            }

            fn format(&self) -> String {
                let parts: Vec<String> = vec![$( format!("{:?}", self.$idx), )*];
                format!("({})", parts.join(", "))
            }
        }

        impl<$( $argty, )*> ExampleArguments for ($( $argty, )*)
            where $( $argty: Clone + Debug + PartialEq + 'static, )*
        {
            fn equality_matchers(&self) -> Vec<Box<dyn ArgMatcher>> {
                vec![$( arg::<$argty, _>(predicate::eq(self.$idx.clone())), )*]
            }
        }

        impl<$( $argty, $predty, )*> IntoArgMatchers<($( $argty, )*)>
            for ($( $predty, )*)
            where $( $argty: 'static, $predty: Predicate<$argty> + 'static, )*
        {
            fn into_arg_matchers(self) -> Vec<Box<dyn ArgMatcher>> {
                vec![$( arg::<$argty, $predty>(self.$idx), )*]
            }
        }
    }
}

arguments_tuple!{0; }
arguments_tuple!{1; 0 T0 P0}
arguments_tuple!{2; 0 T0 P0, 1 T1 P1}
arguments_tuple!{3; 0 T0 P0, 1 T1 P1, 2 T2 P2}
arguments_tuple!{4; 0 T0 P0, 1 T1 P1, 2 T2 P2, 3 T3 P3}
arguments_tuple!{5; 0 T0 P0, 1 T1 P1, 2 T2 P2, 3 T3 P3, 4 T4 P4}
arguments_tuple!{6; 0 T0 P0, 1 T1 P1, 2 T2 P2, 3 T3 P3, 4 T4 P4, 5 T5 P5}
arguments_tuple!{7; 0 T0 P0, 1 T1 P1, 2 T2 P2, 3 T3 P3, 4 T4 P4, 5 T5 P5,
    6 T6 P6}
arguments_tuple!{8; 0 T0 P0, 1 T1 P1, 2 T2 P2, 3 T3 P3, 4 T4 P4, 5 T5 P5,
    6 T6 P6, 7 T7 P7}
