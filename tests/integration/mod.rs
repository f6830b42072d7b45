//! Integration tests for kakapo-script.

pub mod common;
pub mod connection_test;
pub mod runner_test;
