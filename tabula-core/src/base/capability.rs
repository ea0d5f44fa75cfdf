//! Optional capabilities of environments.
use crate::error::TabulaError;
use anyhow::Result;
use std::fmt;

/// An optional feature of an environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// [`Env::is_terminal`](crate::Env::is_terminal) tells terminal states apart.
    TerminalDetection,

    /// [`Env::force_state`](crate::Env::force_state) moves the environment to any state.
    StateForcing,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TerminalDetection => write!(f, "terminal detection"),
            Self::StateForcing => write!(f, "state forcing"),
        }
    }
}

/// The set of optional capabilities an environment provides.
///
/// The default value declares none of them, matching the default
/// implementations of [`Env::is_terminal`](crate::Env::is_terminal) and
/// [`Env::force_state`](crate::Env::force_state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    terminal_detection: bool,
    state_forcing: bool,
}

impl Capabilities {
    /// Declares both capabilities.
    pub fn all() -> Self {
        Self {
            terminal_detection: true,
            state_forcing: true,
        }
    }

    /// Sets whether terminal states can be detected.
    pub fn terminal_detection(mut self, v: bool) -> Self {
        self.terminal_detection = v;
        self
    }

    /// Sets whether the environment can be forced into a state.
    pub fn state_forcing(mut self, v: bool) -> Self {
        self.state_forcing = v;
        self
    }

    /// Returns `true` if the capability is declared.
    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::TerminalDetection => self.terminal_detection,
            Capability::StateForcing => self.state_forcing,
        }
    }

    /// Fails with [`TabulaError::MissingCapability`] unless the capability is declared.
    ///
    /// `consumer` names the algorithm or routine that needs it.
    pub fn require(&self, capability: Capability, consumer: &str) -> Result<()> {
        if self.has(capability) {
            Ok(())
        } else {
            Err(TabulaError::MissingCapability(capability, consumer.to_string()).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        let caps = Capabilities::default().terminal_detection(true);
        assert!(caps.require(Capability::TerminalDetection, "test").is_ok());

        let err = caps
            .require(Capability::StateForcing, "PolicyIteration")
            .unwrap_err();
        match err.downcast_ref::<TabulaError>() {
            Some(TabulaError::MissingCapability(c, name)) => {
                assert_eq!(*c, Capability::StateForcing);
                assert_eq!(name, "PolicyIteration");
            }
            _ => panic!("unexpected error: {}", err),
        }
        assert!(Capabilities::all().has(Capability::StateForcing));
    }
}
