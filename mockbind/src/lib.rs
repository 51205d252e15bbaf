// vim: tw=80
//! The stubbing and verification core of a mock object framework.
//!
//! A mocked method is configured by a [`MockingContext`]: a statement that
//! names the calls it cares about (an [`ArgumentsMatcher`]) and what should
//! happen on each of them (an [`ActionSequence`]).  Committing the statement
//! installs the pair into the method's dispatch table.  The same kind of
//! statement, left uncommitted, can later be asked which recorded calls it
//! matches, which is how [`Verification`] works.
//!
//! # Stubbing
//!
//! Actions are consumed front to back, one per matching call.  The last one
//! is never consumed, so it becomes the steady state behavior.
//! ```
//! use mockbind::*;
//!
//! let mock = Mock::new("calculator");
//! let add = mock.method::<(i32, i32), i32>("add");
//! add.stub()
//!     .returns(1)
//!     .returns(2)
//!     .commit();
//! assert_eq!(1, add.call((0, 0)));
//! assert_eq!(2, add.call((0, 0)));
//! assert_eq!(2, add.call((0, 0)));
//! ```
//!
//! # Matching arguments
//!
//! A statement may constrain the arguments with example values, with one
//! [`Predicate`] per argument, or with a single function over all of them.
//! When several installed statements accept a call, the newest one wins.
//! ```
//! use mockbind::*;
//! use mockbind::predicate::*;
//!
//! let mock = Mock::new("calculator");
//! let add = mock.method::<(i32, i32), i32>("add");
//! add.stub().always_returns(0).commit();
//! add.stub().using((1, 1)).always_returns(2).commit();
//! add.stub().with((eq(2), gt(0))).always_returns(4).commit();
//! add.stub().matching(|(x, y)| x < y).always_returns(-1).commit();
//! assert_eq!(2, add.call((1, 1)));
//! assert_eq!(4, add.call((2, 2)));
//! assert_eq!(-1, add.call((3, 4)));
//! assert_eq!(0, add.call((5, 0)));
//! ```
//!
//! # Verification
//!
//! Several statements, possibly on different mocks, can be chained.  The chain
//! is satisfied when its members are matched by calls in the same relative
//! order, each call being used at most once.
//! ```
//! use mockbind::*;
//!
//! let mock = Mock::new("door");
//! let open = mock.method::<(), ()>("open");
//! let close = mock.method::<(), ()>("close");
//! open.stub().always_returns(()).commit();
//! close.stub().always_returns(()).commit();
//! open.call(());
//! close.call(());
//!
//! let opened = open.calls();
//! let closed = close.calls();
//! assert!(Verification::of(&chain![&opened, &closed]).verify().is_ok());
//! assert!(Verification::of(&chain![&closed, &opened]).verify().is_err());
//! ```

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(feature = "tracing")] {
        macro_rules! log_debug {
            ($($arg:tt)*) => { ::tracing::debug!($($arg)*) }
        }
        macro_rules! log_trace {
            ($($arg:tt)*) => { ::tracing::trace!($($arg)*) }
        }
    } else {
        macro_rules! log_debug {
            ($($arg:tt)*) => {}
        }
        macro_rules! log_trace {
            ($($arg:tt)*) => {}
        }
    }
}

mod action;
mod arguments;
mod binding;
mod context;
mod error;
mod invocation;
mod matcher;
mod mock;
mod sequence;
mod verify;

pub use predicates::prelude::{Predicate, predicate};

pub use crate::action::{Action, ActionSequence};
pub use crate::arguments::{
    ArgMatcher,
    Arguments,
    ExampleArguments,
    IntoArgMatchers,
    arg
};
pub use crate::binding::{MethodBinding, MethodContext};
pub use crate::context::MockingContext;
pub use crate::error::{ConfigError, DispatchError, VerificationError};
pub use crate::invocation::{
    ActualInvocation,
    Invocation,
    InvocationSet,
    InvocationSource,
    MethodId,
    MockId
};
pub use crate::matcher::{ArgumentsMatcher, Matchable};
pub use crate::mock::{Mock, MockMethod};
pub use crate::sequence::{Chain, InvolvedMocks, Repeated, Sequenceable};
pub use crate::verify::{Quantity, Verification, verify_no_other_invocations};

/// Chain several [`Sequenceable`]s, in order, into a single expectation.
///
/// # Examples
/// ```
/// # use mockbind::*;
/// let mock = Mock::new("m");
/// let foo = mock.method::<(), ()>("foo");
/// let bar = mock.method::<(), ()>("bar");
/// let (f, b) = (foo.calls(), bar.calls());
/// assert_eq!(2, chain![&f, &b].size());
/// ```
#[macro_export]
macro_rules! chain {
    ($($member:expr),* $(,)?) => {
        $crate::Chain::new()$(.then($member))*
    };
}
