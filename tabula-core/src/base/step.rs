//! Environment step.
use super::Env;

/// Additional information to `State` and `Act`.
pub trait Info {}

impl Info for () {}

/// Represents an action, next state and reward tuple `(a_t, s_t+1, r_t)`
/// with some additional information.
///
/// An environment emits a [`Step`] object at every interaction step.
pub struct Step<E: Env> {
    /// Action.
    pub act: E::Act,

    /// State after the action.
    pub state: E::State,

    /// Reward.
    pub reward: f64,

    /// Flag denoting if the episode is terminated.
    pub is_terminated: bool,

    /// Information defined by user.
    pub info: E::Info,
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(
        state: E::State,
        act: E::Act,
        reward: f64,
        is_terminated: bool,
        info: E::Info,
    ) -> Self {
        Step {
            act,
            state,
            reward,
            is_terminated,
            info,
        }
    }

    #[inline]
    /// Terminated.
    pub fn is_done(&self) -> bool {
        self.is_terminated
    }
}
