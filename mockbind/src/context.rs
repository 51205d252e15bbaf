// vim: tw=80
//! The statement-level surface over a [`MethodBinding`].

use crate::{
    action::Action,
    arguments::{ArgMatcher, Arguments, ExampleArguments, IntoArgMatchers},
    binding::{MethodBinding, MethodContext},
    error::ConfigError,
    invocation::{Invocation, InvocationSet, InvocationSource},
    matcher::Matchable,
    sequence::{InvolvedMocks, Sequenceable}
};

/// A stubbing, spying, or verification statement under construction.
///
/// Each method consumes and returns the context, so a statement reads as a
/// single chained expression.  Configuration mistakes panic on the spot, with
/// the method's name in the message.  A stubbing statement must end with
/// [`commit`](MockingContext::commit) or an assignment-style method like
/// [`assign`](MockingContext::assign); a verification statement is never
/// committed.
///
/// # Examples
/// ```
/// # use mockbind::*;
/// let mock = Mock::new("m");
/// let foo = mock.method::<(u32,), u32>("foo");
/// foo.stub()
///     .using((1,))
///     .returns(10)
///     .returns_times(20, 2)
///     .throws("out of values")
///     .commit();
/// assert_eq!(10, foo.call((1,)));
/// assert_eq!(20, foo.call((1,)));
/// assert_eq!(20, foo.call((1,)));
/// ```
pub struct MockingContext<A, R> {
    binding: MethodBinding<A, R>
}

impl<A: Arguments, R: 'static> MockingContext<A, R> {
    pub fn new(context: Box<dyn MethodContext<A, R>>) -> Self {
        MockingContext{binding: MethodBinding::new(context)}
    }

    pub fn binding(&self) -> &MethodBinding<A, R> {
        &self.binding
    }

    pub fn into_binding(self) -> MethodBinding<A, R> {
        self.binding
    }

    fn check<T>(&self, r: Result<T, ConfigError>) -> T {
        match r {
            Ok(t) => t,
            Err(e) => panic!("{}: {}", self.binding.method_name(), e)
        }
    }

    fn append(mut self, action: Action<A, R>) -> Self {
        let r = self.binding.append_action(action);
        self.check(r);
        self
    }

    /// Rename the mock and the method, for diagnostics.
    pub fn set_method_details(mut self, mock_name: &str, method_name: &str)
        -> Self
    {
        let r = self.binding.set_method_details(mock_name, method_name);
        self.check(r);
        self
    }

    /// Only calls whose arguments equal `values`.
    pub fn using(mut self, values: A) -> Self
        where A: ExampleArguments
    {
        let r = self.binding.set_matching_values(values);
        self.check(r);
        self
    }

    /// Only calls whose arguments satisfy the [`Predicate`](crate::Predicate)
    /// at the same position.
    ///
    /// # Examples
    /// ```
    /// # use mockbind::*;
    /// use mockbind::predicate::*;
    /// let mock = Mock::new("m");
    /// let foo = mock.method::<(u32, String), bool>("foo");
    /// foo.stub()
    ///     .with((lt(5), function(|s: &String| s.is_empty())))
    ///     .always_returns(true)
    ///     .commit();
    /// assert!(foo.call((4, String::new())));
    /// ```
    pub fn with<M>(mut self, matchers: M) -> Self
        where M: IntoArgMatchers<A>
    {
        let r = self.binding.set_matching_args(matchers.into_arg_matchers());
        self.check(r);
        self
    }

    /// Like [`with`](MockingContext::with), but the matchers are assembled at
    /// runtime, so their number and types are only checked now.
    pub fn try_with_matchers(mut self, matchers: Vec<Box<dyn ArgMatcher>>)
        -> Result<Self, ConfigError>
    {
        self.binding.set_matching_args(matchers)?;
        Ok(self)
    }

    /// Panicking version of
    /// [`try_with_matchers`](MockingContext::try_with_matchers).
    pub fn with_matchers(mut self, matchers: Vec<Box<dyn ArgMatcher>>) -> Self
    {
        let r = self.binding.set_matching_args(matchers);
        self.check(r);
        self
    }

    /// Only calls for which `f` returns true.
    pub fn matching<F>(mut self, f: F) -> Self
        where F: Fn(&A) -> bool + 'static
    {
        let r = self.binding.set_matching_predicate(f);
        self.check(r);
        self
    }

    /// Append an arbitrary [`Action`].
    pub fn then(self, action: Action<A, R>) -> Self {
        self.append(action)
    }

    /// Return `value` on the next matching call.
    pub fn returns(self, value: R) -> Self
        where R: Clone
    {
        self.append(Action::returning_value(value))
    }

    /// Return `value` on the next `n` matching calls.
    pub fn returns_times(self, value: R, n: usize) -> Self
        where R: Clone
    {
        self.append(Action::returning_value(value).times(n))
    }

    /// Return `value` on every matching call from now on.
    pub fn always_returns(self, value: R) -> Self
        where R: Clone
    {
        self.append(Action::forever(move |_| value.clone()))
    }

    /// Unwind with `error` on the next matching call.
    pub fn throws<E>(self, error: E) -> Self
        where E: Clone + Send + 'static
    {
        self.append(Action::throwing(error))
    }

    /// Run `f` on the next matching call.
    pub fn does<F>(self, f: F) -> Self
        where F: FnMut(&A) -> R + 'static
    {
        self.append(Action::run(f))
    }

    /// Run `f` on every matching call from now on.
    pub fn always_does<F>(self, f: F) -> Self
        where F: FnMut(&A) -> R + 'static
    {
        self.append(Action::forever(f))
    }

    /// Pass the next matching call through to the real implementation.
    ///
    /// The implementation is looked up now, so a later
    /// [`MockMethod::set_original`](crate::MockMethod::set_original) only
    /// affects calls that fall through without a matching statement.
    pub fn does_original(self) -> Self {
        let original = self.binding.original_method()
            .ok_or_else(|| ConfigError::NoOriginalMethod {
                method: self.binding.method_name()
            });
        let original = self.check(original);
        self.append(Action::calling_original(original))
    }

    /// Install the statement into the method's dispatch table.
    ///
    /// The committed context can still be used for diagnostics and
    /// verification.
    pub fn commit(mut self) -> Self {
        let r = self.binding.commit();
        self.check(r);
        self
    }

    /// Replace the method's body with `f`, effective immediately.
    pub fn assign<F>(mut self, f: F)
        where F: FnMut(&A) -> R + 'static
    {
        let r = self.binding.set_method_body(f);
        self.check(r);
    }

    /// Make the method return `value` on every matching call, effective
    /// immediately.
    pub fn assign_value(self, value: R)
        where R: Clone
    {
        self.assign(move |_| value.clone())
    }

    pub fn format(&self) -> String {
        self.binding.format()
    }
}

impl<A: Arguments, R: 'static> Matchable for MockingContext<A, R> {
    fn matches(&self, invocation: &dyn Invocation) -> bool {
        self.binding.matches(invocation)
    }

    fn format(&self) -> String {
        self.binding.format()
    }

    fn explain(&self, invocation: &dyn Invocation) -> Option<String> {
        self.binding.explain(invocation)
    }
}

impl<A: Arguments, R: 'static> InvocationSource for MockingContext<A, R> {
    fn actual_invocations(&self, into: &mut InvocationSet) {
        self.binding.actual_invocations(into)
    }
}

impl<A: Arguments, R: 'static> Sequenceable for MockingContext<A, R> {
    fn size(&self) -> usize {
        self.binding.size()
    }

    fn expected_sequence<'a>(&'a self, into: &mut Vec<&'a dyn Matchable>) {
        self.binding.expected_sequence(into)
    }

    fn involved_mocks(&self, into: &mut InvolvedMocks) {
        self.binding.involved_mocks(into)
    }
}
