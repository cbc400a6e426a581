#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session plumbing shared by the `platformer` binary and its tests.

pub mod config;
pub mod simulation;
