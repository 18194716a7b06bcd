//! Welcome to `simcore`!
//!
//! A tiny workbench for the classic textbook exercises of CPU scheduling
//! and contiguous memory allocation. The caller describes a *fixed* batch
//! of [`Process`]es up front; nothing arrives while the simulation runs and
//! all time is a simulated integer counter.
//!
//! There are two independent engines:
//!
//! 1. The [`Scheduler`] dispatches the batch under one [`Policy`] and
//!     writes start/completion times into every descriptor. It then
//!     derives [`Metrics`] from them.
//! 2. The [`MemoryAllocator`] satisfies one request per process against a
//!     list of free blocks, using either [`Fit::First`] or [`Fit::Best`].
//!
//! They share no state; in which order you drive them is up to you.

mod process;
mod policy;
pub mod scheduler;
pub mod memory;
pub mod error;
pub mod io;
pub mod workload;
pub mod config;
pub mod utils;

/// Imports, type aliases, traits ... in general
/// useful stuff that shall be needed in many places.
pub use crate::utils::*;
