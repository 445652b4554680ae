//! Shared runtime helpers for the ContestHub workspace.

pub mod config;
