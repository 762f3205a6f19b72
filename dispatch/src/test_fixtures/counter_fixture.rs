// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The counter domain that the unit tests in this crate share.

use crate::Reducer;

crate::define_actions! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum CounterAction in counter_action {
        Increment,
        Decrement,
        AddValue(i32),
        /// Not handled by [`counter_reducer()`], falls through to the default branch.
        Noop,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CounterState {
    pub counter: i32,
}

impl CounterState {
    pub fn new(counter: i32) -> Self { Self { counter } }
}

pub fn counter_reducer(state: &CounterState, action: CounterAction) -> CounterState {
    match action {
        CounterAction::Increment => CounterState::new(state.counter + 1),
        CounterAction::Decrement => CounterState::new(state.counter - 1),
        CounterAction::AddValue(value) => CounterState::new(state.counter + value),
        #[allow(clippy::match_wildcard_for_single_variants)]
        _ => state.clone(),
    }
}

/// A named reducer (as opposed to a closure) that scales every change by `step`.
#[derive(Debug, Clone, Copy)]
pub struct SteppedCounterReducer {
    pub step: i32,
}

impl Reducer<CounterState, CounterAction> for SteppedCounterReducer {
    fn reduce(&self, state: &CounterState, action: CounterAction) -> CounterState {
        match action {
            CounterAction::Increment => CounterState::new(state.counter + self.step),
            CounterAction::Decrement => CounterState::new(state.counter - self.step),
            CounterAction::AddValue(value) => {
                CounterState::new(state.counter + value * self.step)
            }
            CounterAction::Noop => state.clone(),
        }
    }
}
