pub use std::{
    collections::{HashSet, VecDeque},
    io::{BufRead, BufReader},
    path::PathBuf,
    str::FromStr,
    fmt,
};
pub use thiserror::Error;
pub use itertools::Itertools;
pub use indexmap::IndexMap;
pub use clap::{Parser, ValueEnum};

pub use crate::{
    process::Process,
    policy::{Policy, Fit, RoundRobinFlavor},
    scheduler::{Scheduler, Slice, Metrics},
    memory::{MemoryAllocator, Allocation},
    error::{SimError, AllocError, ProcessError},
    io::{ProcessGen, CsvParser, ListParser, parse_list},
    config::*,
};

/// The unit for measuring simulated time. Arrivals, bursts, quanta
/// and clock readings all share it.
pub type Ticks = u64;

/// Signed difference of two [`Ticks`]. Waiting and turnaround times are
/// reported with it, since the legacy round-robin flavor may complete a
/// process "before" it arrived.
pub type TickDelta = i64;

/// Memory is measured in abstract units; requests and block sizes
/// must simply agree on them.
pub type Units = u64;

/// Process identifiers start at 1, in input order.
pub type Pid = u32;
