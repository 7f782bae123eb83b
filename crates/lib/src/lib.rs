//! ninjagen-lib: build graph generation for the nonius benchmarking library
//!
//! This crate turns a project tree into a `build.ninja` file:
//! - `discover`: find sources by glob, in a stable order
//! - `paths`: naming conventions from sources to objects and binaries
//! - `graph`: rules, build nodes and the target graph
//! - `generate`: plan the graph for a project and write it out
//! - `ninja`: render a graph in Ninja syntax

pub mod config;
pub mod consts;
pub mod discover;
pub mod generate;
pub mod graph;
pub mod ninja;
pub mod paths;
pub mod placeholder;
pub mod util;
