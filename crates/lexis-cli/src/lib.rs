//! Command-line front end for lexis
//!
//! Parsing lives in [`cli`], config overrides in [`config`], one module per
//! subcommand in [`commands`] and stdout rendering in [`output`].

pub mod cli;
pub mod commands;
pub mod config;
pub mod output;
