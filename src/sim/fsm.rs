//! Finite state machine shared by every actor
//!
//! A [`Machine`] names a closed vocabulary of state ids, the parameters passed
//! on entry, and the context type states operate on. [`StateMachine`] holds one
//! boxed [`State`] per id and exactly one current id.
//!
//! The context is borrowed per call rather than stored, so a state never keeps
//! a reference to its owner or to the room between frames.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::FsmError;

/// Type family describing one state machine
pub trait Machine: 'static {
    type Id: Copy + Eq + Hash + Debug;
    type Params;
    type Ctx<'a>;
}

/// A request to switch states, returned from [`State::update`]
pub struct Transition<M: Machine> {
    pub to: M::Id,
    pub params: M::Params,
}

impl<M: Machine> Transition<M> {
    pub fn new(to: M::Id, params: M::Params) -> Self {
        Self { to, params }
    }
}

impl<M: Machine> Transition<M>
where
    M::Params: Default,
{
    pub fn to(to: M::Id) -> Self {
        Self::new(to, M::Params::default())
    }
}

/// Behavior for one state. Every hook is optional.
pub trait State<M: Machine> {
    fn enter(&mut self, _ctx: &mut M::Ctx<'_>, _params: M::Params) {}

    fn update(&mut self, _ctx: &mut M::Ctx<'_>, _dt: f32) -> Option<Transition<M>> {
        None
    }

    fn exit(&mut self, _ctx: &mut M::Ctx<'_>) {}
}

pub struct StateMachine<M: Machine> {
    states: HashMap<M::Id, Box<dyn State<M>>>,
    current: Option<M::Id>,
}

impl<M: Machine> Default for StateMachine<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Machine> StateMachine<M> {
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            current: None,
        }
    }

    /// Register a state. Registering the same id twice is rejected.
    pub fn add(&mut self, id: M::Id, state: impl State<M> + 'static) -> Result<(), FsmError> {
        if self.states.contains_key(&id) {
            return Err(FsmError::DuplicateState(format!("{id:?}")));
        }
        self.states.insert(id, Box::new(state));
        Ok(())
    }

    pub fn current(&self) -> Option<M::Id> {
        self.current
    }

    pub fn is_in(&self, id: M::Id) -> bool {
        self.current == Some(id)
    }

    pub fn contains(&self, id: M::Id) -> bool {
        self.states.contains_key(&id)
    }

    /// Exit the current state, then enter `id` with `params`
    pub fn try_change(&mut self, ctx: &mut M::Ctx<'_>, id: M::Id, params: M::Params) -> Result<(), FsmError> {
        if !self.states.contains_key(&id) {
            return Err(FsmError::UnregisteredState(format!("{id:?}")));
        }

        if let Some(state) = self.current.and_then(|current| self.states.get_mut(&current)) {
            state.exit(ctx);
        }

        log::trace!("state change {:?} -> {:?}", self.current, id);
        self.current = Some(id);

        if let Some(state) = self.states.get_mut(&id) {
            state.enter(ctx, params);
        }
        Ok(())
    }

    /// Like [`try_change`](Self::try_change), but an unknown id is a
    /// programmer error and panics.
    pub fn change(&mut self, ctx: &mut M::Ctx<'_>, id: M::Id, params: M::Params) {
        if let Err(err) = self.try_change(ctx, id, params) {
            panic!("invalid state transition: {err}");
        }
    }

    /// Advance the current state only, applying any transition it requests
    pub fn update(&mut self, ctx: &mut M::Ctx<'_>, dt: f32) {
        let Some(current) = self.current else {
            return;
        };
        let transition = self
            .states
            .get_mut(&current)
            .and_then(|state| state.update(ctx, dt));
        if let Some(Transition { to, params }) = transition {
            self.change(ctx, to, params);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Light {
        Red,
        Green,
        Off,
    }

    struct TrafficMachine;

    impl Machine for TrafficMachine {
        type Id = Light;
        type Params = u32;
        type Ctx<'a> = Vec<String>;
    }

    struct Logged {
        name: &'static str,
        hold: f32,
        elapsed: f32,
        next: Light,
    }

    impl State<TrafficMachine> for Logged {
        fn enter(&mut self, log: &mut Vec<String>, params: u32) {
            self.elapsed = 0.0;
            log.push(format!("enter {} {}", self.name, params));
        }

        fn update(&mut self, _log: &mut Vec<String>, dt: f32) -> Option<Transition<TrafficMachine>> {
            self.elapsed += dt;
            (self.elapsed >= self.hold).then(|| Transition::new(self.next, 7))
        }

        fn exit(&mut self, log: &mut Vec<String>) {
            log.push(format!("exit {}", self.name));
        }
    }

    struct Silent;
    impl State<TrafficMachine> for Silent {}

    fn machine() -> StateMachine<TrafficMachine> {
        let mut fsm = StateMachine::new();
        fsm.add(
            Light::Red,
            Logged {
                name: "red",
                hold: 1.0,
                elapsed: 0.0,
                next: Light::Green,
            },
        )
        .unwrap();
        fsm.add(
            Light::Green,
            Logged {
                name: "green",
                hold: 0.5,
                elapsed: 0.0,
                next: Light::Red,
            },
        )
        .unwrap();
        fsm
    }

    #[test]
    fn test_change_runs_exit_then_enter() {
        let mut fsm = machine();
        let mut log = Vec::new();
        fsm.change(&mut log, Light::Red, 1);
        fsm.change(&mut log, Light::Green, 2);
        assert_eq!(log, vec!["enter red 1", "exit red", "enter green 2"]);
        assert!(fsm.is_in(Light::Green));
    }

    #[test]
    fn test_update_only_drives_current_state() {
        let mut fsm = machine();
        let mut log = Vec::new();
        fsm.change(&mut log, Light::Red, 0);
        fsm.update(&mut log, 0.6);
        assert_eq!(fsm.current(), Some(Light::Red));
        fsm.update(&mut log, 0.6);
        assert_eq!(fsm.current(), Some(Light::Green));
        assert_eq!(log.last().map(String::as_str), Some("enter green 7"));
    }

    #[test]
    fn test_duplicate_add_is_rejected() {
        let mut fsm = machine();
        let err = fsm.add(Light::Red, Silent).unwrap_err();
        assert_eq!(err, FsmError::DuplicateState("Red".to_string()));
    }

    #[test]
    fn test_try_change_to_unregistered_state() {
        let mut fsm = machine();
        let mut log = Vec::new();
        fsm.change(&mut log, Light::Red, 0);
        let err = fsm.try_change(&mut log, Light::Off, 0).unwrap_err();
        assert_eq!(err, FsmError::UnregisteredState("Off".to_string()));
        // Current state untouched, no exit hook ran
        assert!(fsm.is_in(Light::Red));
        assert_eq!(log, vec!["enter red 0"]);
    }

    #[test]
    #[should_panic(expected = "invalid state transition")]
    fn test_change_to_unregistered_state_panics() {
        let mut fsm = machine();
        fsm.change(&mut Vec::new(), Light::Off, 0);
    }

    #[test]
    fn test_update_without_current_is_noop() {
        let mut fsm = machine();
        let mut log = Vec::new();
        fsm.update(&mut log, 10.0);
        assert!(log.is_empty());
        assert_eq!(fsm.current(), None);
    }
}
