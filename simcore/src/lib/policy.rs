use crate::utils::*;

/// The dispatch policies understood by the [`Scheduler`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum, Debug)]
pub enum Policy {
    /// First-come, first-served
    Fcfs,
    /// Shortest job first (static sort on arrival, then burst)
    Sjf,
    /// Round robin with a fixed time quantum
    Rr,
}

impl Policy {
    pub const ALL: [Policy; 3] = [Policy::Fcfs, Policy::Sjf, Policy::Rr];
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Policy::Fcfs    => { "FCFS" },
            Policy::Sjf     => { "SJF" },
            Policy::Rr      => { "RR" },
        };
        f.write_str(name)
    }
}

impl FromStr for Policy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FCFS"  => Ok(Policy::Fcfs),
            "SJF"   => Ok(Policy::Sjf),
            "RR"    => Ok(Policy::Rr),
            _       => Err(SimError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Block selection strategy of the [`MemoryAllocator`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum, Debug)]
pub enum Fit {
    /// First block large enough, in list order
    First,
    /// Block leaving the least leftover space
    Best,
}

impl fmt::Display for Fit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fit::First  => { f.write_str("First-Fit") },
            Fit::Best   => { f.write_str("Best-Fit") },
        }
    }
}

impl FromStr for Fit {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "first-fit"   => Ok(Fit::First),
            "best" | "best-fit"     => Ok(Fit::Best),
            _                       => Err(SimError::UnknownFit(s.to_string())),
        }
    }
}

/// Round robin comes in two flavors.
///
/// - [`Gated`](RoundRobinFlavor::Gated) admits a process to the ready queue
///   only once the clock has reached its arrival, idles the CPU when nobody
///   is ready, and records the time of the *first* dispatch as start time.
/// - [`Legacy`](RoundRobinFlavor::Legacy) treats every process as ready at
///   time 0 and overwrites the start time on *every* dispatch. It exists
///   so that results of earlier, ungated runs can be reproduced.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, ValueEnum, Debug)]
pub enum RoundRobinFlavor {
    #[default]
    Gated,
    Legacy,
}

impl FromStr for RoundRobinFlavor {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gated"     => Ok(RoundRobinFlavor::Gated),
            "legacy"    => Ok(RoundRobinFlavor::Legacy),
            _           => Err(SimError::UnknownFlavor(s.to_string())),
        }
    }
}
