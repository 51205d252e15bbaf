// vim: tw=80
//! Checking recorded calls against expectations.

use std::{
    fmt,
    rc::Rc
};

use crate::{
    error::VerificationError,
    invocation::{Invocation, InvocationSet, InvocationSource},
    matcher::Matchable,
    sequence::{InvolvedMocks, Sequenceable}
};

/// How many times a pattern must occur.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Quantity {
    Exactly(usize),
    AtLeast(usize)
}

impl Quantity {
    fn accepts(&self, count: usize) -> bool {
        match *self {
            Quantity::Exactly(n) => count == n,
            Quantity::AtLeast(n) => count >= n
        }
    }

    fn required(&self) -> usize {
        match *self {
            Quantity::Exactly(n) | Quantity::AtLeast(n) => n
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Quantity::Exactly(0) => f.write_str("never"),
            Quantity::Exactly(1) => f.write_str("exactly once"),
            Quantity::Exactly(n) => write!(f, "exactly {} times", n),
            Quantity::AtLeast(1) => f.write_str("at least once"),
            Quantity::AtLeast(n) => write!(f, "at least {} times", n)
        }
    }
}

/// The greedy search stopped at `index`, the first matcher without a call.
struct Unmatched {
    index: usize,
    /// Position in the history of the previous matcher's call
    after: Option<usize>
}

/// Find the earliest run of calls, starting at `start`, that satisfies the
/// whole pattern in order.  Returns the position just past its last call.
fn find_occurrence(pattern: &[&dyn Matchable],
                   history: &[Rc<dyn Invocation>],
                   start: usize) -> Result<usize, Unmatched>
{
    let mut pos = start;
    let mut after = None;
    for (index, m) in pattern.iter().enumerate() {
        match history[pos..].iter().position(|c| m.matches(&**c)) {
            Some(offset) => {
                after = Some(pos + offset);
                pos += offset + 1;
            },
            None => return Err(Unmatched{index, after})
        }
    }
    Ok(pos)
}

fn merged_history(mocks: &InvolvedMocks) -> Vec<Rc<dyn Invocation>> {
    let mut all = InvocationSet::new();
    for mock in mocks.values() {
        mock.actual_invocations(&mut all);
    }
    all.to_vec()
}

fn format_history(history: &[Rc<dyn Invocation>]) -> String {
    if history.is_empty() {
        return "  <none>".to_owned();
    }
    history.iter()
        .map(|i| format!("  {}", i.format()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_pattern(pattern: &[&dyn Matchable]) -> String {
    pattern.iter()
        .map(|m| m.format())
        .collect::<Vec<_>>()
        .join(" then ")
}

/// A check that an expectation was met by the calls recorded so far.
///
/// The history considered is the merged history of every mock the expectation
/// touches.  The expectation's matchers must be satisfied by calls in the same
/// relative order, each call being used at most once; other calls may come in
/// between.  Occurrences are counted without overlap.
///
/// # Examples
/// ```
/// # use mockbind::*;
/// let mock = Mock::new("m");
/// let foo = mock.method::<(u32,), ()>("foo");
/// foo.stub().always_returns(()).commit();
/// foo.call((1,));
/// foo.call((2,));
/// foo.call((1,));
///
/// assert!(Verification::of(&foo.calls()).times(3).verify().is_ok());
/// assert!(Verification::of(&foo.calls().using((1,))).times(2).verify()
///     .is_ok());
/// assert!(Verification::of(&foo.calls().using((3,))).never().verify()
///     .is_ok());
/// ```
pub struct Verification<'a> {
    expected: &'a dyn Sequenceable,
    quantity: Quantity
}

impl<'a> Verification<'a> {
    /// Verify `expected`, by default requiring it at least once.
    pub fn of(expected: &'a dyn Sequenceable) -> Self {
        Verification{expected, quantity: Quantity::AtLeast(1)}
    }

    pub fn at_least_once(self) -> Self {
        self.at_least(1)
    }

    pub fn at_least(mut self, n: usize) -> Self {
        self.quantity = Quantity::AtLeast(n);
        self
    }

    pub fn once(self) -> Self {
        self.times(1)
    }

    pub fn times(mut self, n: usize) -> Self {
        self.quantity = Quantity::Exactly(n);
        self
    }

    pub fn never(self) -> Self {
        self.times(0)
    }

    pub fn verify(&self) -> Result<(), VerificationError> {
        let mut pattern = Vec::new();
        self.expected.expected_sequence(&mut pattern);
        if pattern.is_empty() {
            // Nothing to look for, so nothing can be missing
            return Ok(());
        }
        let mut mocks = InvolvedMocks::new();
        self.expected.involved_mocks(&mut mocks);
        let history = merged_history(&mocks);

        let mut count = 0;
        let mut start = 0;
        let first_miss = loop {
            match find_occurrence(&pattern, &history, start) {
                Ok(end) => {
                    count += 1;
                    start = end;
                },
                Err(miss) => break miss
            }
        };

        if self.quantity.accepts(count) {
            return Ok(());
        }
        let e = if count == 0 && self.quantity.required() > 0 {
            self.not_satisfied(&pattern, &history, first_miss)
        } else {
            VerificationError::WrongCount {
                pattern: format_pattern(&pattern),
                expected: self.quantity.to_string(),
                actual: count,
                history: format_history(&history)
            }
        };
        log_debug!("verification failed: {}", e);
        Err(e)
    }

    fn not_satisfied(&self,
                     pattern: &[&dyn Matchable],
                     history: &[Rc<dyn Invocation>],
                     miss: Unmatched) -> VerificationError
    {
        let matcher = pattern[miss.index];
        let candidates = match miss.after {
            Some(i) => &history[i + 1..],
            None => history
        };
        let nearest = candidates.iter()
            .find_map(|c| {
                matcher.explain(&**c)
                    .map(|why| format!("\nNearest candidate: {}\n{}",
                                       c.format(), why))
            }).unwrap_or_default();
        let after = miss.after
            .map(|i| format!(" after {}", history[i].format()))
            .unwrap_or_default();
        VerificationError::NotSatisfied {
            pattern: format_pattern(pattern),
            index: miss.index,
            matcher: matcher.format(),
            after,
            nearest,
            history: format_history(history)
        }
    }
}

/// Check that every call on the mocks touched by `expected` is accounted for
/// by at least one of them.
///
/// # Examples
/// ```
/// # use mockbind::*;
/// let mock = Mock::new("m");
/// let foo = mock.method::<(u32,), ()>("foo");
/// foo.stub().always_returns(()).commit();
/// foo.call((1,));
/// foo.call((2,));
///
/// let one = foo.calls().using((1,));
/// let two = foo.calls().using((2,));
/// assert!(verify_no_other_invocations(&[&one]).is_err());
/// assert!(verify_no_other_invocations(&[&one, &two]).is_ok());
/// ```
pub fn verify_no_other_invocations(expected: &[&dyn Sequenceable])
    -> Result<(), VerificationError>
{
    let mut mocks = InvolvedMocks::new();
    let mut accounted = InvocationSet::new();
    for e in expected.iter() {
        e.involved_mocks(&mut mocks);
        e.actual_invocations(&mut accounted);
    }
    let mut all = InvocationSet::new();
    for mock in mocks.values() {
        mock.actual_invocations(&mut all);
    }
    let unexpected = all.difference(&accounted);
    if unexpected.is_empty() {
        return Ok(());
    }
    let e = VerificationError::UnexpectedInvocations {
        count: unexpected.len(),
        invocations: format_history(&unexpected)
    };
    log_debug!("verification failed: {}", e);
    Err(e)
}
