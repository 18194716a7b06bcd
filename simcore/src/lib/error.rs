use crate::utils::*;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("unknown scheduling policy `{0}` (expected FCFS, SJF or RR)")]
    UnknownPolicy(String),
    #[error("unknown fit strategy `{0}` (expected first or best)")]
    UnknownFit(String),
    #[error("unknown round-robin flavor `{0}` (expected gated or legacy)")]
    UnknownFlavor(String),
    #[error("round robin needs a positive time quantum")]
    ZeroQuantum,
    #[error("descriptors were already scheduled with {0}; build fresh ones to run again")]
    AlreadySimulated(Policy),
    #[error("metrics requested before any simulation")]
    NotSimulated,
    #[error("the workload holds no processes")]
    EmptyWorkload,
    #[error("latest completion time is 0, utilization is undefined")]
    ZeroMakespan,
    #[error("process {0} would push the simulated clock past {max}", max = MAX_CLOCK)]
    ClockOverflow(Pid),
    #[error("{field}: expected {expected} values, found {found}")]
    LengthMismatch {
        field:      &'static str,
        expected:   usize,
        found:      usize,
    },
    #[error("could not parse `{0}` as a non-negative integer")]
    BadNumber(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Process(#[from] ProcessError),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AllocError {
    #[error("memory requests must be positive")]
    ZeroRequest,
    #[error("no free block can hold {0} units")]
    NoFit(Units),
}

#[derive(Error, Debug)]
#[error("{message}\n{:?}", culprit)]
/// Appears while validating the batch of processes
/// handed over by the user.
pub struct ProcessError {
    pub message: String,
    pub culprit: Process,
}
