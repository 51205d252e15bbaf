// vim: tw=80
//! An in-memory mock: invocation logs and dispatch tables for its methods.
//!
//! Generating mock types for a trait is left to the caller.  A hand-written
//! mock holds a [`Mock`] and one [`MockMethod`] per method, and forwards each
//! trait method to [`MockMethod::call`].
//!
//! ```
//! # use mockbind::*;
//! trait Greeter {
//!     fn greet(&self, name: &'static str) -> String;
//! }
//!
//! struct MockGreeter {
//!     greet: MockMethod<(&'static str,), String>
//! }
//!
//! impl Greeter for MockGreeter {
//!     fn greet(&self, name: &'static str) -> String {
//!         self.greet.call((name,))
//!     }
//! }
//!
//! let mock = Mock::new("greeter");
//! let greeter = MockGreeter{greet: mock.method("greet")};
//! greeter.greet.stub().always_does(|(n,)| format!("hi {}", n)).commit();
//! assert_eq!("hi bob", greeter.greet("bob"));
//! ```

use std::{
    cell::RefCell,
    rc::Rc
};

use crate::{
    action::ActionSequence,
    arguments::Arguments,
    binding::MethodContext,
    context::MockingContext,
    error::DispatchError,
    invocation::{
        ActualInvocation,
        Invocation,
        InvocationSet,
        InvocationSource,
        MethodId,
        MockId
    },
    matcher::ArgumentsMatcher
};

struct MockState {
    id: MockId,
    name: String,
    /// One log per method, in declaration order
    logs: RefCell<Vec<Rc<dyn InvocationSource>>>
}

impl InvocationSource for MockState {
    fn actual_invocations(&self, into: &mut InvocationSet) {
        for log in self.logs.borrow().iter() {
            log.actual_invocations(into);
        }
    }
}

/// A mock instance: a name, an identity, and the methods created from it.
#[derive(Clone)]
pub struct Mock {
    state: Rc<MockState>
}

impl Mock {
    pub fn new(name: &str) -> Self {
        let state = MockState {
            id: MockId::next(),
            name: name.to_owned(),
            logs: RefCell::new(Vec::new())
        };
        Mock{state: Rc::new(state)}
    }

    pub fn id(&self) -> MockId {
        self.state.id
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// Create a new method on this mock, with no behavior configured.
    pub fn method<A: Arguments, R: 'static>(&self, name: &str)
        -> MockMethod<A, R>
    {
        let mut logs = self.state.logs.borrow_mut();
        let log = Rc::new(MethodLog::<A>::default());
        let id = MethodId::new(self.state.id, logs.len());
        logs.push(log.clone());
        let method = MethodState {
            id,
            mock: self.state.clone(),
            details: RefCell::new(MethodDetails {
                mock: self.state.name.clone(),
                method: name.to_owned()
            }),
            log,
            handlers: RefCell::new(Vec::new()),
            original: RefCell::new(None)
        };
        MockMethod{state: Rc::new(method)}
    }

    /// Create a new method that passes every call through to `original`,
    /// except those later stubbed otherwise.
    pub fn spy<A, R, F>(&self, name: &str, original: F) -> MockMethod<A, R>
        where A: Arguments, R: 'static, F: Fn(&A) -> R + 'static
    {
        let method = self.method(name);
        method.set_original(original);
        method
    }
}

impl InvocationSource for Mock {
    /// Every call made on any of this mock's methods.
    fn actual_invocations(&self, into: &mut InvocationSet) {
        self.state.actual_invocations(into)
    }
}

struct MethodLog<A>(RefCell<Vec<Rc<ActualInvocation<A>>>>);

impl<A> Default for MethodLog<A> {
    fn default() -> Self {
        MethodLog(RefCell::new(Vec::new()))
    }
}

impl<A: Arguments> InvocationSource for MethodLog<A> {
    fn actual_invocations(&self, into: &mut InvocationSet) {
        for i in self.0.borrow().iter() {
            into.insert(i.clone());
        }
    }
}

struct MethodDetails {
    mock: String,
    method: String
}

struct Handler<A, R> {
    matcher: Rc<ArgumentsMatcher<A>>,
    actions: ActionSequence<A, R>
}

struct MethodState<A, R> {
    id: MethodId,
    mock: Rc<MockState>,
    details: RefCell<MethodDetails>,
    log: Rc<MethodLog<A>>,
    /// Oldest first; dispatch searches newest first.
    handlers: RefCell<Vec<Handler<A, R>>>,
    original: RefCell<Option<Rc<dyn Fn(&A) -> R>>>
}

/// One method of a [`Mock`].  Cloning yields another handle to the same
/// method.
///
/// Calls are dispatched to the newest installed statement whose matcher
/// accepts them.  Without one, a spied method falls through to its original
/// implementation, and any other method fails.  Actions must not call back
/// into the method that is running them.
pub struct MockMethod<A, R> {
    state: Rc<MethodState<A, R>>
}

impl<A, R> Clone for MockMethod<A, R> {
    fn clone(&self) -> Self {
        MockMethod{state: self.state.clone()}
    }
}

impl<A: Arguments, R: 'static> MockMethod<A, R> {
    pub fn id(&self) -> MethodId {
        self.state.id
    }

    fn label(&self) -> String {
        let details = self.state.details.borrow();
        format!("{}.{}", details.mock, details.method)
    }

    /// Set the implementation that unstubbed calls fall through to.
    pub fn set_original<F>(&self, original: F)
        where F: Fn(&A) -> R + 'static
    {
        *self.state.original.borrow_mut() = Some(Rc::new(original));
    }

    /// Begin a stubbing statement for this method.
    pub fn stub(&self) -> MockingContext<A, R> {
        MockingContext::new(Box::new(self.clone()))
    }

    /// Begin a statement describing calls to this method, for verification.
    ///
    /// It is the same kind of statement as [`stub`](MockMethod::stub); the
    /// separate name only documents intent.
    pub fn calls(&self) -> MockingContext<A, R> {
        MockingContext::new(Box::new(self.clone()))
    }

    /// Number of handlers in the dispatch table.
    pub fn handler_count(&self) -> usize {
        self.state.handlers.borrow().len()
    }

    /// Record a call and dispatch it.
    pub fn try_call(&self, args: A) -> Result<R, DispatchError> {
        let invocation = Rc::new(ActualInvocation::new(self.state.id,
                                                       self.label(), args));
        self.state.log.0.borrow_mut().push(invocation.clone());
        let args = invocation.args();

        let mut handlers = self.state.handlers.borrow_mut();
        if let Some(h) = handlers.iter_mut()
            .rev()
            .find(|h| h.matcher.matches(args))
        {
            log_trace!("{}: dispatching to {}", invocation.format(), h.matcher);
            return h.actions.dispatch(args);
        }
        drop(handlers);

        let original = self.state.original.borrow().clone();
        match original {
            Some(f) => {
                log_trace!("{}: calling the original", invocation.format());
                Ok(f(args))
            },
            None => Err(DispatchError::UnexpectedCall {
                invocation: invocation.format()
            })
        }
    }

    /// Record a call and dispatch it, panicking if it can't be handled.
    pub fn call(&self, args: A) -> R {
        match self.try_call(args) {
            Ok(r) => r,
            Err(e) => panic!("{}", e)
        }
    }
}

impl<A: Arguments, R: 'static> MethodContext<A, R> for MockMethod<A, R> {
    fn original_method(&self) -> Option<Rc<dyn Fn(&A) -> R>> {
        self.state.original.borrow().clone()
    }

    fn method_name(&self) -> String {
        self.label()
    }

    fn set_method_details(&self, mock_name: &str, method_name: &str) {
        let mut details = self.state.details.borrow_mut();
        details.mock = mock_name.to_owned();
        details.method = method_name.to_owned();
    }

    fn add_invocation_handler(&self,
                              matcher: Rc<ArgumentsMatcher<A>>,
                              actions: ActionSequence<A, R>)
    {
        self.state.handlers.borrow_mut().push(Handler{matcher, actions});
    }

    fn scan_invocations(&self,
                        scanner: &mut dyn FnMut(&Rc<ActualInvocation<A>>))
    {
        for i in self.state.log.0.borrow().iter() {
            scanner(i);
        }
    }

    fn is_of_method(&self, method: MethodId) -> bool {
        self.state.id == method
    }

    fn involved_mock(&self) -> (MockId, Rc<dyn InvocationSource>) {
        let mock: Rc<dyn InvocationSource> = self.state.mock.clone();
        (self.state.mock.id, mock)
    }
}
