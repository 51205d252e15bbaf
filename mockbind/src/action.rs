// vim: tw=80
//! What a stubbed method does on each matching call.

use std::{
    any::Any,
    collections::VecDeque,
    fmt,
    panic,
    rc::Rc
};

use crate::error::DispatchError;

/// One behavior of a stubbed method.
///
/// `A` is the method's argument tuple and `R` its return type.  Methods that
/// return nothing use `R = ()`.
pub enum Action<A, R> {
    /// Return a clone of a stored value.
    Return(Box<dyn FnMut() -> R>),
    /// Unwind with a stored payload, like a thrown exception.
    Throw(Box<dyn Fn() -> Box<dyn Any + Send>>),
    /// Run a callback on one matching call, or on every call if it is the last
    /// action.
    Run(Box<dyn FnMut(&A) -> R>),
    /// Run a callback on this and every subsequent call.  Never advances.
    RepeatForever(Box<dyn FnMut(&A) -> R>),
    /// Perform the inner action `times` more times.
    RepeatTimes {
        action: Box<Action<A, R>>,
        times: usize
    }
}

impl<A: 'static, R: 'static> Action<A, R> {
    /// Return `value`, once.
    pub fn returning_value(value: R) -> Self
        where R: Clone
    {
        Action::Return(Box::new(move || value.clone()))
    }

    /// Unwind with a clone of `error` as the panic payload.
    ///
    /// Tests can observe it with `std::panic::catch_unwind` or
    /// `#[should_panic]`.
    pub fn throwing<E>(error: E) -> Self
        where E: Clone + Send + 'static
    {
        Action::Throw(Box::new(move || Box::new(error.clone())))
    }

    /// Run `f` with the call's arguments, on one matching call, or on every
    /// call if it is the last action.
    pub fn run<F>(f: F) -> Self
        where F: FnMut(&A) -> R + 'static
    {
        Action::Run(Box::new(f))
    }

    /// Pass the call through to `original`, the method's real implementation.
    ///
    /// `original` is captured when the action is built.  Replacing the
    /// method's original implementation afterwards doesn't affect it.
    pub fn calling_original(original: Rc<dyn Fn(&A) -> R>) -> Self {
        Action::Run(Box::new(move |args: &A| original(args)))
    }

    /// Run `f` with the call's arguments, on every call from now on.
    pub fn forever<F>(f: F) -> Self
        where F: FnMut(&A) -> R + 'static
    {
        Action::RepeatForever(Box::new(f))
    }

    /// Repeat this action `n` times, as a single unit.
    ///
    /// Repeating an action that is already repeated multiplies the counts, so
    /// `a.times(2).times(3)` performs `a` six times.
    pub fn times(self, n: usize) -> Self {
        match self {
            Action::RepeatTimes{action, times} => Action::RepeatTimes {
                action,
                times: times.saturating_mul(n)
            },
            action => Action::RepeatTimes{action: Box::new(action), times: n}
        }
    }
}

impl<A, R> Action<A, R> {
    /// A short label, for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Action::Return(_) => "Return".to_owned(),
            Action::Throw(_) => "Throw".to_owned(),
            Action::Run(_) => "Do".to_owned(),
            Action::RepeatForever(_) => "AlwaysDo".to_owned(),
            Action::RepeatTimes{action, times} =>
                format!("{} x{}", action.describe(), times)
        }
    }

    fn invoke(&mut self, args: &A) -> R {
        match self {
            Action::Return(f) => f(),
            Action::Throw(payload) => panic::resume_unwind(payload()),
            Action::Run(f) | Action::RepeatForever(f) => f(args),
            Action::RepeatTimes{action, ..} => action.invoke(args)
        }
    }

    /// Account for one use of this action, and report whether that was its
    /// last.
    fn spend(&mut self) -> bool {
        match self {
            Action::RepeatForever(_) => false,
            Action::RepeatTimes{times, ..} if *times > 1 => {
                *times -= 1;
                false
            },
            _ => true
        }
    }

    /// Would this action never run?
    fn is_empty(&self) -> bool {
        match self {
            Action::RepeatTimes{times: 0, ..} => true,
            Action::RepeatTimes{action, ..} => action.is_empty(),
            _ => false
        }
    }
}

impl<A, R> fmt::Debug for Action<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// An ordered list of actions, consumed front to back.
///
/// The last remaining action is sticky: it runs on every further call
/// without ever being removed.  So `[Return(1), Return(2)]` produces 1, 2, 2,
/// 2, ...
pub struct ActionSequence<A, R> {
    actions: VecDeque<Action<A, R>>
}

impl<A, R> ActionSequence<A, R> {
    pub fn new() -> Self {
        ActionSequence{actions: VecDeque::new()}
    }

    /// Add an action to the end of the sequence.
    ///
    /// An action repeated zero times contributes nothing and is dropped.
    pub fn append(&mut self, action: Action<A, R>) {
        if !action.is_empty() {
            self.actions.push_back(action);
        }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Run the next action for a matched call.
    ///
    /// The action is consumed before it runs, so a throwing action still
    /// advances the sequence.
    pub fn dispatch(&mut self, args: &A) -> Result<R, DispatchError> {
        let sticky = self.actions.len() == 1;
        let front = self.actions.front_mut()
            .ok_or(DispatchError::NoBehavior)?;
        if sticky || !front.spend() {
            log_trace!("dispatching {:?} in place", front);
            return Ok(front.invoke(args));
        }
        let mut spent = self.actions.pop_front()
            .ok_or(DispatchError::NoBehavior)?;
        log_trace!("dispatching {:?}, {} remain", spent, self.actions.len());
        Ok(spent.invoke(args))
    }
}

impl<A, R> Default for ActionSequence<A, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, R> fmt::Debug for ActionSequence<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.actions.iter()).finish()
    }
}
