//! Coding agents that skills are distributed to.

use std::{fmt, str::FromStr};

use crate::error::CliError;

/// A coding agent with its own skills directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Agent {
    Codex,
    Claude,
    Kiro,
    Gemini,
    Antigravity,
}

impl Agent {
    /// Every agent, in display order.
    pub const ALL: [Agent; 5] = [
        Agent::Codex,
        Agent::Claude,
        Agent::Kiro,
        Agent::Gemini,
        Agent::Antigravity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Agent::Codex => "codex",
            Agent::Claude => "claude",
            Agent::Kiro => "kiro",
            Agent::Gemini => "gemini",
            Agent::Antigravity => "antigravity",
        }
    }

    /// Whether the agent reads skills from the user's home rather than the
    /// project root.
    pub fn is_global(self) -> bool {
        matches!(self, Agent::Codex)
    }

    /// Default skills directory, relative to home (global agents) or to the
    /// project root.
    pub fn default_dir(self) -> &'static str {
        match self {
            Agent::Codex => ".codex/skills",
            Agent::Claude => ".claude/skills",
            Agent::Kiro => ".kiro/skills",
            Agent::Gemini => ".gemini/skills",
            Agent::Antigravity => ".agent/skills",
        }
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Agent {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Agent::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| CliError::BadParameter(format!("Unknown agent: {s}")))
    }
}

/// Parses `--agent` values.
///
/// Values may be comma separated and repeated. `all` (or no value at all)
/// selects every agent; duplicates are dropped keeping first-seen order.
///
/// # Errors
///
/// Fails with a usage error on an unknown agent name.
pub fn parse_agents<S: AsRef<str>>(values: &[S]) -> anyhow::Result<Vec<Agent>> {
    let mut parsed = Vec::new();
    for value in values {
        for token in value.as_ref().split(',') {
            let name = token.trim().to_lowercase();
            if name.is_empty() {
                continue;
            }
            if name == "all" {
                return Ok(Agent::ALL.to_vec());
            }
            let agent: Agent = name.parse()?;
            if !parsed.contains(&agent) {
                parsed.push(agent);
            }
        }
    }
    if parsed.is_empty() {
        return Ok(Agent::ALL.to_vec());
    }
    Ok(parsed)
}
