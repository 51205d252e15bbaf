// vim: tw=80
//! Aggregating bindings into orderable expectations.

use std::{
    collections::BTreeMap,
    rc::Rc
};

use crate::{
    invocation::{InvocationSet, InvocationSource, MockId},
    matcher::Matchable
};

/// The mocks touched by an expectation, by id.
pub type InvolvedMocks = BTreeMap<MockId, Rc<dyn InvocationSource>>;

/// An expectation that verification can treat as an ordered list of matchers.
///
/// A single binding is a sequence of size one.  [`Chain`] and [`Repeated`]
/// build longer ones, possibly spanning several mocks.
pub trait Sequenceable: InvocationSource {
    /// Number of call sites represented.
    fn size(&self) -> usize;

    /// Append every member matcher to `into`, in declaration order.
    fn expected_sequence<'a>(&'a self, into: &mut Vec<&'a dyn Matchable>);

    /// Insert every mock touched by any member.
    fn involved_mocks(&self, into: &mut InvolvedMocks);
}

/// Several expectations that must be satisfied in order.
///
/// # Examples
/// ```
/// # use mockbind::*;
/// let mock = Mock::new("m");
/// let foo = mock.method::<(u32,), ()>("foo");
/// let (a, b) = (foo.calls().using((1,)), foo.calls().using((2,)));
/// let c = Chain::new().then(&a).then(&b);
/// assert_eq!(2, c.size());
/// ```
#[derive(Clone, Default)]
pub struct Chain<'a> {
    members: Vec<&'a dyn Sequenceable>
}

impl<'a> Chain<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append another member.  It must be satisfied after the existing ones.
    pub fn then(mut self, member: &'a dyn Sequenceable) -> Self {
        self.members.push(member);
        self
    }
}

impl<'a> InvocationSource for Chain<'a> {
    fn actual_invocations(&self, into: &mut InvocationSet) {
        for m in self.members.iter() {
            m.actual_invocations(into);
        }
    }
}

impl<'a> Sequenceable for Chain<'a> {
    fn size(&self) -> usize {
        self.members.iter().map(|m| m.size()).sum()
    }

    fn expected_sequence<'b>(&'b self, into: &mut Vec<&'b dyn Matchable>) {
        for m in self.members.iter() {
            m.expected_sequence(into);
        }
    }

    fn involved_mocks(&self, into: &mut InvolvedMocks) {
        for m in self.members.iter() {
            m.involved_mocks(into);
        }
    }
}

/// An expectation repeated back to back a fixed number of times.
pub struct Repeated<'a> {
    inner: &'a dyn Sequenceable,
    times: usize
}

impl<'a> Repeated<'a> {
    pub fn new(inner: &'a dyn Sequenceable, times: usize) -> Self {
        Repeated{inner, times}
    }
}

impl<'a> InvocationSource for Repeated<'a> {
    fn actual_invocations(&self, into: &mut InvocationSet) {
        self.inner.actual_invocations(into);
    }
}

impl<'a> Sequenceable for Repeated<'a> {
    fn size(&self) -> usize {
        self.inner.size() * self.times
    }

    fn expected_sequence<'b>(&'b self, into: &mut Vec<&'b dyn Matchable>) {
        for _ in 0..self.times {
            self.inner.expected_sequence(into);
        }
    }

    fn involved_mocks(&self, into: &mut InvolvedMocks) {
        self.inner.involved_mocks(into);
    }
}
