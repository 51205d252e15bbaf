// vim: tw=80
//! The binding between a method, a matcher, and a sequence of actions.

use std::{
    mem,
    rc::Rc
};

use crate::{
    action::{Action, ActionSequence},
    arguments::{ArgMatcher, Arguments, ExampleArguments},
    error::ConfigError,
    invocation::{
        ActualInvocation,
        Invocation,
        InvocationSet,
        InvocationSource,
        MethodId,
        MockId
    },
    matcher::{ArgumentsMatcher, Matchable},
    sequence::{InvolvedMocks, Sequenceable}
};

/// What a binding needs from the mocked method it configures.
///
/// The mock object, its invocation log, and its dispatch table live behind
/// this interface.  [`MockMethod`](crate::MockMethod) is one implementation.
pub trait MethodContext<A, R> {
    /// The method's real implementation, if it is being spied on.
    fn original_method(&self) -> Option<Rc<dyn Fn(&A) -> R>>;

    fn method_name(&self) -> String;

    fn set_method_details(&self, mock_name: &str, method_name: &str);

    /// Install a handler into the method's dispatch table.
    fn add_invocation_handler(&self,
                              matcher: Rc<ArgumentsMatcher<A>>,
                              actions: ActionSequence<A, R>);

    /// Visit every recorded call of this method, oldest first.
    fn scan_invocations(&self,
                        scanner: &mut dyn FnMut(&Rc<ActualInvocation<A>>));

    fn is_of_method(&self, method: MethodId) -> bool;

    /// The mock that owns this method, as a source of all its calls.
    fn involved_mock(&self) -> (MockId, Rc<dyn InvocationSource>);
}

/// One stubbing or verification statement for a single method.
///
/// The binding exclusively owns its matcher and its recorded actions until
/// [`commit`](MethodBinding::commit), which hands them to the method's
/// dispatch table.  A binding dropped without committing drops them too.
pub struct MethodBinding<A, R> {
    context: Box<dyn MethodContext<A, R>>,
    /// `None` once the actions have moved into the dispatch table.
    actions: Option<ActionSequence<A, R>>,
    matcher: Rc<ArgumentsMatcher<A>>
}

impl<A: Arguments, R: 'static> MethodBinding<A, R> {
    pub fn new(context: Box<dyn MethodContext<A, R>>) -> Self {
        MethodBinding {
            context,
            actions: Some(ActionSequence::new()),
            matcher: Rc::new(ArgumentsMatcher::Any)
        }
    }

    pub fn is_committed(&self) -> bool {
        self.actions.is_none()
    }

    pub fn method_name(&self) -> String {
        self.context.method_name()
    }

    /// The actions recorded so far, if not yet committed.
    pub fn recorded_actions(&self) -> Option<&ActionSequence<A, R>> {
        self.actions.as_ref()
    }

    fn uncommitted(&mut self) -> Result<&mut ActionSequence<A, R>, ConfigError>
    {
        let method = self.context.method_name();
        self.actions.as_mut()
            .ok_or(ConfigError::AlreadyCommitted{method})
    }

    pub fn append_action(&mut self, action: Action<A, R>)
        -> Result<(), ConfigError>
    {
        self.uncommitted()?.append(action);
        Ok(())
    }

    /// Replace the current matcher.  The old one is dropped.
    pub fn set_matcher(&mut self, matcher: ArgumentsMatcher<A>)
        -> Result<(), ConfigError>
    {
        self.uncommitted()?;
        log_debug!("{}: matcher {} replaced by {}",
            self.context.method_name(), self.matcher, matcher);
        drop(mem::replace(&mut self.matcher, Rc::new(matcher)));
        Ok(())
    }

    /// Match calls for which `f` returns true.
    pub fn set_matching_predicate<F>(&mut self, f: F)
        -> Result<(), ConfigError>
        where F: Fn(&A) -> bool + 'static
    {
        self.set_matcher(ArgumentsMatcher::predicate(f))
    }

    /// Match calls whose arguments satisfy `matchers`, position by position.
    pub fn set_matching_args(&mut self, matchers: Vec<Box<dyn ArgMatcher>>)
        -> Result<(), ConfigError>
    {
        self.uncommitted()?;
        self.set_matcher(ArgumentsMatcher::per_argument(matchers)?)
    }

    /// Match calls whose arguments equal `values`.
    pub fn set_matching_values(&mut self, values: A)
        -> Result<(), ConfigError>
        where A: ExampleArguments
    {
        self.set_matching_args(values.equality_matchers())
    }

    /// Install the matcher and the recorded actions into the method's
    /// dispatch table.
    pub fn commit(&mut self) -> Result<(), ConfigError> {
        let method = self.context.method_name();
        match self.actions.take() {
            None => Err(ConfigError::AlreadyCommitted{method}),
            Some(actions) if actions.is_empty() => {
                self.actions = Some(actions);
                Err(ConfigError::NoActions{method})
            },
            Some(actions) => {
                log_debug!("{}: committing {:?}", self.format(), actions);
                self.context.add_invocation_handler(self.matcher.clone(),
                                                    actions);
                Ok(())
            }
        }
    }

    /// Replace the method's body: `f` handles every matching call from now
    /// on.
    pub fn set_method_body<F>(&mut self, f: F) -> Result<(), ConfigError>
        where F: FnMut(&A) -> R + 'static
    {
        self.append_action(Action::forever(f))?;
        self.commit()
    }

    pub fn set_method_details(&mut self, mock_name: &str, method_name: &str)
        -> Result<(), ConfigError>
    {
        self.uncommitted()?;
        self.context.set_method_details(mock_name, method_name);
        Ok(())
    }

    pub fn original_method(&self) -> Option<Rc<dyn Fn(&A) -> R>> {
        self.context.original_method()
    }

    /// A label for diagnostics, like `mock.foo(var == 5)`
    pub fn format(&self) -> String {
        format!("{}{}", self.context.method_name(), self.matcher)
    }

    fn actual_invocation<'i>(&self, invocation: &'i dyn Invocation)
        -> Option<&'i ActualInvocation<A>>
    {
        if !self.context.is_of_method(invocation.method()) {
            return None;
        }
        invocation.downcast_ref::<ActualInvocation<A>>().ok()
    }
}

impl<A: Arguments, R: 'static> Matchable for MethodBinding<A, R> {
    /// Only used by verification; dispatch consults the installed matcher
    /// directly.
    fn matches(&self, invocation: &dyn Invocation) -> bool {
        self.actual_invocation(invocation)
            .map_or(false, |a| self.matcher.matches(a.args()))
    }

    fn format(&self) -> String {
        MethodBinding::format(self)
    }

    fn explain(&self, invocation: &dyn Invocation) -> Option<String> {
        self.actual_invocation(invocation)
            .and_then(|a| self.matcher.explain(a.args()))
    }
}

impl<A: Arguments, R: 'static> InvocationSource for MethodBinding<A, R> {
    fn actual_invocations(&self, into: &mut InvocationSet) {
        let matcher = &self.matcher;
        self.context.scan_invocations(&mut |a: &Rc<ActualInvocation<A>>| {
            if matcher.matches(a.args()) {
                into.insert(a.clone());
            }
        });
    }
}

impl<A: Arguments, R: 'static> Sequenceable for MethodBinding<A, R> {
    fn size(&self) -> usize {
        1
    }

    fn expected_sequence<'a>(&'a self, into: &mut Vec<&'a dyn Matchable>) {
        into.push(self);
    }

    fn involved_mocks(&self, into: &mut InvolvedMocks) {
        let (id, mock) = self.context.involved_mock();
        into.entry(id).or_insert(mock);
    }
}
