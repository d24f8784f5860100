//! Compound action token grammar: `action[:mode[:scope]]`.

use crate::directive::Action;
use crate::error::{CoreError, CoreResult};

/// Actions accepted as the first token segment, for usage messages.
pub const KNOWN_ACTIONS: &[&str] = &["up", "down", "reset", "create", "seed", "db:create", "db:drop"];

/// A parsed action token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionToken {
    /// Selected action
    pub action: Action,
    /// Second segment (seed source, or a qualifier forwarded to the executor)
    pub mode: Option<String>,
    /// Third segment
    pub scope: Option<String>,
}

impl ActionToken {
    /// Parse a compound token.
    ///
    /// For `db`, the second segment selects the action and is not kept as a
    /// mode.
    pub fn parse(token: &str) -> CoreResult<Self> {
        let segments: Vec<&str> = token.split(':').collect();
        if segments.len() > 3 {
            return Err(invalid(token, "expected at most three ':'-separated segments"));
        }

        let segment = |i: usize| {
            segments
                .get(i)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };
        let mode = segment(1);
        let scope = segment(2);

        let action = match segments[0].trim() {
            "up" => Action::Apply,
            "down" => Action::Revert,
            "reset" => Action::Reset,
            "create" => Action::Create,
            "seed" => Action::Seed,
            "db" => {
                return match mode.as_deref() {
                    Some("create") => Ok(Self {
                        action: Action::DatabaseCreate,
                        mode: None,
                        scope,
                    }),
                    Some("drop") => Ok(Self {
                        action: Action::DatabaseDrop,
                        mode: None,
                        scope,
                    }),
                    Some(other) => Err(invalid(
                        token,
                        &format!("unknown database command '{}' (expected create or drop)", other),
                    )),
                    None => Err(invalid(token, "'db' requires ':create' or ':drop'")),
                };
            }
            "" => return Err(invalid(token, "empty action")),
            other => {
                return Err(invalid(
                    token,
                    &format!(
                        "unknown action '{}'. Known actions: {}",
                        other,
                        KNOWN_ACTIONS.join(", ")
                    ),
                ))
            }
        };

        Ok(Self {
            action,
            mode,
            scope,
        })
    }
}

fn invalid(token: &str, reason: &str) -> CoreError {
    CoreError::InvalidAction {
        token: token.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
