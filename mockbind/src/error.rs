// vim: tw=80
//! Error types.

use thiserror::Error;

/// Mistakes made while writing a stubbing or verification statement.
///
/// These are reported immediately, never deferred until a call is dispatched.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ConfigError {
    /// The number of argument matchers differs from the number of arguments.
    #[error("expected {expected} argument matchers but got {found}")]
    ArityMismatch {
        expected: usize,
        found: usize
    },

    /// An argument matcher accepts a different type than its position holds.
    #[error("argument {position} is a {expected} but its matcher accepts {found}")]
    ArgumentType {
        position: usize,
        expected: &'static str,
        found: &'static str
    },

    /// The statement was already committed and can no longer change.
    #[error("{method} was already committed")]
    AlreadyCommitted {
        method: String
    },

    /// A statement must record at least one action before it is committed.
    #[error("{method} has no recorded actions")]
    NoActions {
        method: String
    },

    /// Only spied methods have an original implementation to fall back to.
    #[error("{method} has no original implementation")]
    NoOriginalMethod {
        method: String
    }
}

/// Failures while choosing or running the behavior for an actual call.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DispatchError {
    #[error("No more recorded actions")]
    NoBehavior,

    #[error("Unexpected method invocation: {invocation}")]
    UnexpectedCall {
        invocation: String
    }
}

/// A verification that didn't hold.  Fails the check, not the process.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum VerificationError {
    /// No ordered run of calls matched the whole pattern.
    #[error("Expected pattern: {pattern}\nMatcher #{index} {matcher} was not satisfied{after}{nearest}\nActual invocations:\n{history}")]
    NotSatisfied {
        pattern: String,
        /// Zero-based position of the first matcher that found no call
        index: usize,
        matcher: String,
        /// " after <call>" naming the previous match, or empty
        after: String,
        /// The nearest rejected candidate and why, or empty
        nearest: String,
        history: String
    },

    /// The pattern occurred, but not as many times as required.
    #[error("Expected pattern: {pattern}\nExpected {expected} but it occurred {actual} time(s)\nActual invocations:\n{history}")]
    WrongCount {
        pattern: String,
        expected: String,
        actual: usize,
        history: String
    },

    /// Calls that no expectation accounts for.
    #[error("Found {count} unverified invocation(s):\n{invocations}")]
    UnexpectedInvocations {
        count: usize,
        invocations: String
    }
}
