//! # skillreg
//!
//! A local registry for agent skills.
//!
//! `skillreg` keeps verified skill folders under `~/skills/skills` and copies
//! them into the directories coding agents read skills from.
//!
//! ## Features
//!
//! - **Registry**: scaffold, register (with a verification gate) and remove skills
//! - **Distribution**: install, sync and desync skills for codex, claude, kiro,
//!   gemini and antigravity
//! - **Verification**: spec and strict grading through [`skillcheck`]
//! - **Prompts**: seeds the builder and improve prompts used with LLM CLIs
//! - **Scanning**: Go anti-pattern scan of reference code
//!
//! ## Modules
//!
//! - [`agent`] - Supported agents and `--agent` parsing
//! - [`cli`] - The `skills` command line
//! - [`config`] - Optional `config.toml` settings
//! - [`ctx`] - Application context and path layout
//! - [`deploy`] - Copying skills to agent directories
//! - [`display`] - Report rendering
//! - [`registry`] - Registry operations
//! - [`utils`] - Common utilities and helper functions
//!
//! ## Example
//!
//! ```rust,no_run
//! use skillreg::{ctx::AppContext, registry};
//!
//! let home = AppContext::default_home().unwrap();
//! let ctx = AppContext::new(&home, None).unwrap();
//! registry::create(&ctx, "echo-web", false).unwrap();
//! println!("{:?}", ctx.list_registered().unwrap());
//! ```

/// Supported coding agents.
pub mod agent;

/// The `skills` command line.
pub mod cli;

/// Registry configuration loaded from `config.toml`.
pub mod config;

/// Application context and state management.
pub mod ctx;

/// Distribution of registered skills to agent directories.
pub mod deploy;

/// Terminal rendering of verification reports.
pub mod display;

/// Errors that map to process exit codes.
pub mod error;

/// Builder and improve prompts.
pub mod prompts;

/// Scaffolding, registration and removal of skills.
pub mod registry;

/// Common utilities and helper functions.
pub mod utils;

#[macro_use]
extern crate log;
