mod exp;
mod report;

pub use exp::Exp;
pub use report::Report;

/// Represents a Markov decision process, defining the dynamics of an environment
/// in which an agent can operate.
///
/// This base trait represents the common case of a discrete-time MDP with one agent
/// and a finite action space. The driver calls [`reset`](Environment::reset), then
/// alternates agent decisions with [`step`](Environment::step) until a transition
/// reports `done`.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State;

    /// A representation of an action that an agent can take to affect the environment
    type Action;

    /// Auxiliary diagnostics returned alongside each state
    type Info;

    /// Determine if the episode is in progress
    fn is_active(&self) -> bool;

    /// Reset the environment to a fresh initial state, reseeding its random source if a seed is given
    ///
    /// **Returns** `(state, info)`
    fn reset(&mut self, seed: Option<u64>) -> (Self::State, Self::Info);

    /// Update the environment in response to an action taken by an agent
    fn step(&mut self, action: Self::Action) -> Transition<Self::State, Self::Info>;

    /// Release any resources held by the environment
    fn close(&mut self) {}
}

/// Environments whose actions can be enumerated
pub trait DiscreteActionSpace: Environment {
    /// Get the available actions for the current state
    ///
    /// The returned vector should never be empty.
    fn actions(&self) -> Vec<Self::Action>;
}

/// The outcome of a single [`Environment::step`]
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<S, I> {
    /// The state after the action was applied
    pub next_state: S,
    /// The reward received for the action
    pub reward: f32,
    /// Whether the episode has ended, for any reason
    pub done: bool,
    /// Whether the episode ended because it ran out of time rather than reaching a terminal state
    pub truncated: bool,
    pub info: I,
}
