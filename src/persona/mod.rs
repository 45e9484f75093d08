// src/persona/mod.rs
// Persona overlay attached to every model handle as the system instruction.

pub mod portfolio;

pub use portfolio::PORTFOLIO_PERSONA_PROMPT;

/// Persona overlays the relay can answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersonaOverlay {
    /// No system instruction; the model answers as itself
    Plain,
    /// First-person portfolio owner
    #[default]
    Portfolio,
}

impl PersonaOverlay {
    /// System instruction for this overlay, if any.
    pub fn prompt(&self) -> Option<&'static str> {
        match self {
            PersonaOverlay::Plain => None,
            PersonaOverlay::Portfolio => Some(PORTFOLIO_PERSONA_PROMPT.trim()),
        }
    }
}

impl std::fmt::Display for PersonaOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PersonaOverlay::Plain => "plain",
                PersonaOverlay::Portfolio => "portfolio",
            }
        )
    }
}

impl std::str::FromStr for PersonaOverlay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plain" | "none" | "off" => Ok(PersonaOverlay::Plain),
            "portfolio" | "default" => Ok(PersonaOverlay::Portfolio),
            other => Err(format!("unknown persona '{other}' (expected 'plain' or 'portfolio')")),
        }
    }
}
