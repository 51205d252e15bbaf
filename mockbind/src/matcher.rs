// vim: tw=80
//! Selecting which calls a statement cares about.

use std::fmt;

use crate::{
    arguments::{ArgMatcher, Arguments},
    error::ConfigError,
    invocation::Invocation
};

/// A predicate over the arguments of calls to one method.
///
/// Immutable once built.
pub enum ArgumentsMatcher<A> {
    /// Accept every call.
    Any,
    /// Accept calls for which the function returns true.
    Predicate(Box<dyn Fn(&A) -> bool>),
    /// Accept calls whose every argument satisfies the matcher at the same
    /// position.
    PerArgument(Vec<Box<dyn ArgMatcher>>)
}

impl<A: Arguments> ArgumentsMatcher<A> {
    pub fn predicate<F>(f: F) -> Self
        where F: Fn(&A) -> bool + 'static
    {
        ArgumentsMatcher::Predicate(Box::new(f))
    }

    /// Build a matcher with one [`ArgMatcher`] per argument position.
    ///
    /// Fails if the number of matchers, or the type any of them expects,
    /// disagrees with the method's arguments.
    pub fn per_argument(matchers: Vec<Box<dyn ArgMatcher>>)
        -> Result<Self, ConfigError>
    {
        if matchers.len() != A::ARITY {
            return Err(ConfigError::ArityMismatch {
                expected: A::ARITY,
                found: matchers.len()
            });
        }
        let types = A::type_ids().into_iter().zip(A::type_names());
        for (position, (m, (ty, name))) in matchers.iter().zip(types)
            .enumerate()
        {
            if m.arg_type() != ty {
                return Err(ConfigError::ArgumentType {
                    position,
                    expected: name,
                    found: m.arg_type_name()
                });
            }
        }
        Ok(ArgumentsMatcher::PerArgument(matchers))
    }

    pub fn matches(&self, args: &A) -> bool {
        match self {
            ArgumentsMatcher::Any => true,
            ArgumentsMatcher::Predicate(f) => f(args),
            ArgumentsMatcher::PerArgument(matchers) => matchers.iter()
                .enumerate()
                .all(|(i, m)| args.get(i).map_or(false, |a| m.matches(a)))
        }
    }

    /// Explain, argument by argument, why `args` doesn't match.
    ///
    /// Only per-argument matchers can say more than "no".
    pub fn explain(&self, args: &A) -> Option<String> {
        match self {
            ArgumentsMatcher::PerArgument(matchers) => {
                let reasons = matchers.iter()
                    .enumerate()
                    .filter_map(|(i, m)| {
                        args.get(i)
                            .and_then(|a| m.explain(a))
                            .map(|why| format!("argument {}: {}", i, why))
                    }).collect::<Vec<_>>();
                if reasons.is_empty() {
                    None
                } else {
                    Some(reasons.join("\n"))
                }
            },
            _ => None
        }
    }
}

impl<A> Default for ArgumentsMatcher<A> {
    fn default() -> Self {
        ArgumentsMatcher::Any
    }
}

impl<A> fmt::Display for ArgumentsMatcher<A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ArgumentsMatcher::Any => f.write_str("(<any arguments>)"),
            ArgumentsMatcher::Predicate(_) =>
                f.write_str("(<user defined matcher>)"),
            ArgumentsMatcher::PerArgument(matchers) => {
                let parts = matchers.iter()
                    .map(|m| m.describe())
                    .collect::<Vec<_>>();
                write!(f, "({})", parts.join(", "))
            }
        }
    }
}

/// A predicate over type-erased invocations, as used by verification.
pub trait Matchable {
    fn matches(&self, invocation: &dyn Invocation) -> bool;

    /// Human readable label, like `mock.method(var == 5)`.
    fn format(&self) -> String;

    /// Why `invocation` fails this matcher, if there's more to say than "it
    /// doesn't".
    fn explain(&self, _invocation: &dyn Invocation) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod t {
    use super::*;
    use crate::arguments::arg;
    use predicates::prelude::predicate::*;

    #[test]
    fn any() {
        let m = ArgumentsMatcher::<(u32,)>::default();
        assert!(m.matches(&(0,)));
        assert_eq!("(<any arguments>)", m.to_string());
    }

    #[test]
    fn predicate() {
        let m = ArgumentsMatcher::<(u32, u32)>::predicate(|(x, y)| x > y);
        assert!(m.matches(&(2, 1)));
        assert!(!m.matches(&(1, 2)));
        assert_eq!("(<user defined matcher>)", m.to_string());
    }

    #[test]
    fn per_argument() {
        let m = ArgumentsMatcher::<(u32, i16)>::per_argument(vec![
            arg::<u32, _>(eq(1)),
            arg::<i16, _>(lt(0))
        ]).unwrap();
        assert!(m.matches(&(1, -1)));
        assert!(!m.matches(&(2, -1)));
        assert!(!m.matches(&(1, 1)));
        assert_eq!("(var == 1, var < 0)", m.to_string());
    }

    #[test]
    fn per_argument_explains_only_failures() {
        let m = ArgumentsMatcher::<(u32, i16)>::per_argument(vec![
            arg::<u32, _>(eq(1)),
            arg::<i16, _>(lt(0))
        ]).unwrap();
        assert!(m.explain(&(1, -1)).is_none());
        let why = m.explain(&(1, 5)).unwrap();
        assert!(why.starts_with("argument 1:"), "{}", why);
    }

    #[test]
    fn per_argument_arity_mismatch() {
        let r = ArgumentsMatcher::<(u32, i16)>::per_argument(vec![
            arg::<u32, _>(eq(1)),
        ]);
        assert_eq!(Some(ConfigError::ArityMismatch{expected: 2, found: 1}),
                   r.err());
    }

    #[test]
    fn per_argument_type_mismatch() {
        let r = ArgumentsMatcher::<(u32, i16)>::per_argument(vec![
            arg::<u32, _>(eq(1)),
            arg::<u16, _>(eq(1)),
        ]);
        assert_eq!(Some(ConfigError::ArgumentType {
                       position: 1,
                       expected: "i16",
                       found: "u16"
                   }),
                   r.err());
    }
}
