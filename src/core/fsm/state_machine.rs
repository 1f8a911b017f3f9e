//=========================================================================
// State Machine
//=========================================================================
//
// Manages state registration, transitions and per-update dispatch.
//
// States are registered as factories and constructed on demand. At most
// one state is current; the outgoing state always exits before the
// incoming state is constructed and entered.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, error, trace};

//=== Internal Dependencies ===============================================

use super::{FsmError, State, StateFamily};

//=== Types ===============================================================

/// Constructs a state from the parameters of a transition.
pub type StateFactory<F> =
    Box<dyn Fn(<F as StateFamily>::Params) -> Result<Box<dyn State<F>>, FsmError>>;

/// Result of a successful [`StateMachine::transition`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// A new state was constructed and entered.
    Entered,

    /// The requested state was already current; nothing happened.
    Unchanged,
}

//=== StateMachine ========================================================

/// Generic finite-state machine over a [`StateFamily`].
pub struct StateMachine<F: StateFamily> {
    factories: HashMap<F::Key, StateFactory<F>>,
    current: Option<Box<dyn State<F>>>,
}

impl<F: StateFamily> StateMachine<F> {
    //--- Construction -----------------------------------------------------

    /// Creates a machine with no registered states and no current state.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            current: None,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a state factory under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`FsmError::DuplicateState`] if `key` is already registered;
    /// the existing factory is kept.
    pub fn register<T>(&mut self, key: F::Key, factory: T) -> Result<(), FsmError>
    where
        T: Fn(F::Params) -> Result<Box<dyn State<F>>, FsmError> + 'static,
    {
        if self.factories.contains_key(&key) {
            return Err(FsmError::DuplicateState(format!("{:?}", key)));
        }

        debug!("Registered state {:?}", key);
        self.factories.insert(key, Box::new(factory));
        Ok(())
    }

    /// Returns `true` if a factory is registered under `key`.
    pub fn is_registered(&self, key: F::Key) -> bool {
        self.factories.contains_key(&key)
    }

    //--- Queries ----------------------------------------------------------

    /// Key of the current state, if any.
    pub fn current_key(&self) -> Option<F::Key> {
        self.current.as_ref().map(|state| state.key())
    }

    /// The current state, if any.
    pub fn current(&self) -> Option<&dyn State<F>> {
        self.current.as_deref()
    }

    //--- Transitions ------------------------------------------------------

    /// Switches to the state registered under `key`.
    ///
    /// Transitioning to the current key is a no-op. Otherwise the current
    /// state exits, the new state is built from `params` and entered with the
    /// exited state as its predecessor.
    ///
    /// # Errors
    ///
    /// - [`FsmError::UnknownState`] if `key` was never registered (the
    ///   current state is left untouched)
    /// - Any error from the factory or from `enter`. The transition is
    ///   aborted: the half-built state is exited and dropped, and the machine
    ///   is left without a current state.
    pub fn transition(
        &mut self,
        key: F::Key,
        params: F::Params,
        context: &mut F::Context,
    ) -> Result<TransitionOutcome, FsmError> {
        if self.current_key() == Some(key) {
            trace!("State {:?} is already current, skipping transition", key);
            return Ok(TransitionOutcome::Unchanged);
        }

        let Some(factory) = self.factories.get(&key) else {
            return Err(FsmError::UnknownState(format!("{:?}", key)));
        };

        let mut previous = self.current.take();
        if let Some(state) = previous.as_mut() {
            debug!("Exiting state {:?}", state.key());
            state.exit(context);
        }

        let mut next = factory(params)?;

        debug!(
            "Entering state {:?} (from {:?})",
            key,
            previous.as_ref().map(|state| state.key())
        );

        if let Err(e) = next.enter(previous.as_deref(), context) {
            error!("Transition to {:?} aborted: {}", key, e);
            next.exit(context);
            return Err(e);
        }

        self.current = Some(next);
        Ok(TransitionOutcome::Entered)
    }

    //--- Update Loop ------------------------------------------------------

    /// Updates the current state and returns the transition it requested,
    /// without applying it.
    pub fn dispatch(
        &mut self,
        dt: f32,
        input: &F::Input,
        context: &mut F::Context,
    ) -> Result<Option<F::Key>, FsmError> {
        match self.current.as_mut() {
            Some(state) => state.update(dt, input, context),
            None => Ok(None),
        }
    }

    /// Updates the current state and applies any transition it requested
    /// before returning.
    pub fn update(
        &mut self,
        dt: f32,
        input: &F::Input,
        context: &mut F::Context,
    ) -> Result<(), FsmError>
    where
        F::Params: Default,
    {
        if let Some(next) = self.dispatch(dt, input, context)? {
            self.transition(next, F::Params::default(), context)?;
        }
        Ok(())
    }

    //--- Teardown ---------------------------------------------------------

    /// Exits and drops the current state. Safe to call repeatedly.
    pub fn shutdown(&mut self, context: &mut F::Context) {
        if let Some(mut state) = self.current.take() {
            debug!("Shutting down state {:?}", state.key());
            state.exit(context);
        }
    }
}

impl<F: StateFamily> Default for StateMachine<F> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fsm::StateKey;

    //--- Fixtures ---------------------------------------------------------

    #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
    enum Light {
        Red,
        Green,
        Broken,
    }

    impl StateKey for Light {}

    /// Journal of lifecycle calls.
    #[derive(Default)]
    struct Journal {
        calls: Vec<String>,
    }

    struct Lights;

    impl StateFamily for Lights {
        type Key = Light;
        type Context = Journal;
        type Input = bool;
        type Params = ();
    }

    struct Lamp {
        key: Light,
        next: Light,
        id: usize,
    }

    impl State<Lights> for Lamp {
        fn key(&self) -> Light {
            self.key
        }

        fn enter(
            &mut self,
            previous: Option<&dyn State<Lights>>,
            journal: &mut Journal,
        ) -> Result<(), FsmError> {
            journal
                .calls
                .push(format!("enter {:?} from {:?}", self.key, previous.map(|p| p.key())));
            if self.key == Light::Broken {
                return Err(FsmError::EnterFailed {
                    state: "Broken".into(),
                    reason: "bulb missing".into(),
                });
            }
            Ok(())
        }

        fn exit(&mut self, journal: &mut Journal) {
            journal.calls.push(format!("exit {:?}#{}", self.key, self.id));
        }

        fn update(
            &mut self,
            _dt: f32,
            switch: &bool,
            _journal: &mut Journal,
        ) -> Result<Option<Light>, FsmError> {
            Ok(switch.then_some(self.next))
        }
    }

    fn machine() -> StateMachine<Lights> {
        let mut machine = StateMachine::<Lights>::new();
        for (key, next) in [(Light::Red, Light::Green), (Light::Green, Light::Red), (Light::Broken, Light::Red)] {
            machine
                .register(key, move |_| {
                    Ok(Box::new(Lamp { key, next, id: 0 }) as Box<dyn State<Lights>>)
                })
                .unwrap();
        }
        machine
    }

    //--- Registration -----------------------------------------------------

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut machine = machine();

        let result = machine.register(Light::Red, |_| {
            Ok(Box::new(Lamp { key: Light::Red, next: Light::Red, id: 99 }) as Box<dyn State<Lights>>)
        });

        assert_eq!(result, Err(FsmError::DuplicateState("Red".into())));
        assert!(machine.is_registered(Light::Red));
    }

    #[test]
    fn unknown_state_leaves_current_untouched() {
        let mut journal = Journal::default();
        let mut machine = StateMachine::<Lights>::new();
        machine
            .register(Light::Red, |_| {
                Ok(Box::new(Lamp { key: Light::Red, next: Light::Green, id: 0 }) as Box<dyn State<Lights>>)
            })
            .unwrap();
        machine.transition(Light::Red, (), &mut journal).unwrap();

        let result = machine.transition(Light::Green, (), &mut journal);

        assert_eq!(result, Err(FsmError::UnknownState("Green".into())));
        assert_eq!(machine.current_key(), Some(Light::Red));
        assert_eq!(journal.calls, vec!["enter Red from None"]);
    }

    //--- Transitions ------------------------------------------------------

    #[test]
    fn first_transition_enters_without_previous() {
        let mut journal = Journal::default();
        let mut machine = machine();

        assert!(machine.current().is_none());
        let outcome = machine.transition(Light::Red, (), &mut journal).unwrap();

        assert_eq!(outcome, TransitionOutcome::Entered);
        assert_eq!(machine.current_key(), Some(Light::Red));
        assert_eq!(journal.calls, vec!["enter Red from None"]);
    }

    #[test]
    fn exit_always_precedes_enter() {
        let mut journal = Journal::default();
        let mut machine = machine();

        machine.transition(Light::Red, (), &mut journal).unwrap();
        machine.transition(Light::Green, (), &mut journal).unwrap();
        machine.transition(Light::Red, (), &mut journal).unwrap();

        assert_eq!(
            journal.calls,
            vec![
                "enter Red from None",
                "exit Red#0",
                "enter Green from Some(Red)",
                "exit Green#0",
                "enter Red from Some(Green)",
            ]
        );
    }

    #[test]
    fn transition_to_current_is_noop() {
        let mut journal = Journal::default();
        let mut machine = StateMachine::<Lights>::new();
        let built = std::rc::Rc::new(std::cell::Cell::new(0usize));
        let counter = built.clone();
        machine
            .register(Light::Red, move |_| {
                counter.set(counter.get() + 1);
                Ok(Box::new(Lamp { key: Light::Red, next: Light::Green, id: counter.get() })
                    as Box<dyn State<Lights>>)
            })
            .unwrap();

        machine.transition(Light::Red, (), &mut journal).unwrap();
        let before = machine.current().map(|s| s as *const _ as *const ());
        let outcome = machine.transition(Light::Red, (), &mut journal).unwrap();
        let after = machine.current().map(|s| s as *const _ as *const ());

        assert_eq!(outcome, TransitionOutcome::Unchanged);
        assert_eq!(before, after, "current state identity must not change");
        assert_eq!(built.get(), 1, "factory must not run again");
        assert_eq!(journal.calls, vec!["enter Red from None"]);
    }

    #[test]
    fn failed_enter_aborts_transition() {
        let mut journal = Journal::default();
        let mut machine = machine();
        machine.transition(Light::Red, (), &mut journal).unwrap();

        let result = machine.transition(Light::Broken, (), &mut journal);

        assert!(matches!(result, Err(FsmError::EnterFailed { .. })));
        assert_eq!(machine.current_key(), None, "no partial state may stay current");
        assert_eq!(
            journal.calls,
            vec!["enter Red from None", "exit Red#0", "enter Broken from Some(Red)", "exit Broken#0"]
        );
    }

    //--- Update Loop ------------------------------------------------------

    #[test]
    fn update_applies_requested_transition() {
        let mut journal = Journal::default();
        let mut machine = machine();
        machine.transition(Light::Red, (), &mut journal).unwrap();

        machine.update(0.016, &false, &mut journal).unwrap();
        assert_eq!(machine.current_key(), Some(Light::Red));

        machine.update(0.016, &true, &mut journal).unwrap();
        assert_eq!(machine.current_key(), Some(Light::Green));
    }

    #[test]
    fn dispatch_reports_without_applying() {
        let mut journal = Journal::default();
        let mut machine = machine();
        machine.transition(Light::Red, (), &mut journal).unwrap();

        let requested = machine.dispatch(0.016, &true, &mut journal).unwrap();

        assert_eq!(requested, Some(Light::Green));
        assert_eq!(machine.current_key(), Some(Light::Red));
    }

    #[test]
    fn update_without_current_state_is_noop() {
        let mut journal = Journal::default();
        let mut machine = machine();

        machine.update(0.016, &true, &mut journal).unwrap();

        assert!(machine.current().is_none());
        assert!(journal.calls.is_empty());
    }

    //--- Teardown ---------------------------------------------------------

    #[test]
    fn shutdown_is_idempotent() {
        let mut journal = Journal::default();
        let mut machine = machine();
        machine.transition(Light::Green, (), &mut journal).unwrap();

        machine.shutdown(&mut journal);
        machine.shutdown(&mut journal);

        assert!(machine.current().is_none());
        assert_eq!(journal.calls, vec!["enter Green from None", "exit Green#0"]);
    }
}
