//! CLI subcommand modules.
//!
//! This module contains the implementations for all bilan CLI subcommands.

pub(crate) mod analyze;
pub(crate) mod cagr;
pub(crate) mod classify;
pub(crate) mod metrics;
pub(crate) mod score;
