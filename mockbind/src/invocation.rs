// vim: tw=80
//! Records of the calls made on mocked methods.

use downcast::*;
use std::{
    collections::btree_map::{self, BTreeMap},
    fmt,
    rc::Rc,
    sync::atomic::{AtomicUsize, Ordering}
};

use crate::arguments::Arguments;

/// Sequence numbers are shared by every mock, so that the histories of
/// different mocks can be merged.
static NEXT_SEQUENCE: AtomicUsize = AtomicUsize::new(0);
static NEXT_MOCK: AtomicUsize = AtomicUsize::new(0);

/// Identifies a single mock instance.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MockId(usize);

impl MockId {
    /// Allocate an id that has never been used before.
    pub fn next() -> Self {
        MockId(NEXT_MOCK.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for MockId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "mock#{}", self.0)
    }
}

/// Identifies one method on one mock instance.  Only ever compared.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MethodId {
    mock: MockId,
    index: usize
}

impl MethodId {
    pub fn new(mock: MockId, index: usize) -> Self {
        MethodId{mock, index}
    }

    /// The mock that owns this method.
    pub fn mock(&self) -> MockId {
        self.mock
    }
}

/// A call that actually happened, with its arguments erased.
///
/// Use `downcast_ref::<ActualInvocation<A>>()` to get at the arguments.
pub trait Invocation: Any {
    /// Which method was called.
    fn method(&self) -> MethodId;

    /// Position of this call among all the calls made on any mock.
    fn sequence(&self) -> usize;

    /// A human readable rendition, like `mock.method(1, "two")`.
    fn format(&self) -> String;
}

downcast!(dyn Invocation);

impl fmt::Debug for dyn Invocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{} {}", self.sequence(), self.format())
    }
}

/// "Method M was called with arguments A."  Immutable once created.
pub struct ActualInvocation<A> {
    method: MethodId,
    label: String,
    args: A,
    sequence: usize
}

impl<A: Arguments> ActualInvocation<A> {
    /// Record a new call, taking the next sequence number.
    ///
    /// `label` names the method, usually as `mock.method`.
    pub fn new(method: MethodId, label: String, args: A) -> Self {
        let sequence = NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        ActualInvocation{method, label, args, sequence}
    }

    pub fn args(&self) -> &A {
        &self.args
    }
}

impl<A: Arguments> Invocation for ActualInvocation<A> {
    fn method(&self) -> MethodId {
        self.method
    }

    fn sequence(&self) -> usize {
        self.sequence
    }

    fn format(&self) -> String {
        format!("{}{}", self.label, self.args.format())
    }
}

/// A duplicate-free set of invocations, iterated in call order.
#[derive(Clone, Default)]
pub struct InvocationSet(BTreeMap<usize, Rc<dyn Invocation>>);

impl InvocationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an invocation.  Returns false if it was already present.
    pub fn insert(&mut self, invocation: Rc<dyn Invocation>) -> bool {
        match self.0.entry(invocation.sequence()) {
            btree_map::Entry::Occupied(_) => false,
            btree_map::Entry::Vacant(v) => {
                v.insert(invocation);
                true
            }
        }
    }

    pub fn contains(&self, invocation: &dyn Invocation) -> bool {
        self.0.contains_key(&invocation.sequence())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item=&Rc<dyn Invocation>> {
        self.0.values()
    }

    /// Every member of `self` that isn't also in `other`, in call order.
    pub fn difference(&self, other: &InvocationSet) -> Vec<Rc<dyn Invocation>>
    {
        self.0.iter()
            .filter(|(seq, _)| !other.0.contains_key(*seq))
            .map(|(_, i)| i.clone())
            .collect()
    }

    /// All members, in call order.
    pub fn to_vec(&self) -> Vec<Rc<dyn Invocation>> {
        self.0.values().cloned().collect()
    }
}

impl fmt::Debug for InvocationSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.0.values()).finish()
    }
}

/// Anything that can report calls that actually happened: a single binding,
/// a chain of them, or a whole mock.
pub trait InvocationSource {
    /// Insert every relevant recorded call into `into`.
    fn actual_invocations(&self, into: &mut InvocationSet);
}
