use crate::utils::*;

/// Our fundamental unit of interest. A [`Process`] describes one job of
/// the batch:
///
/// 1. It becomes known to the system at [`arrival_time`](Process::arrival_time)
///     and needs [`burst_time`](Process::burst_time) units of CPU in total.
/// 2. It asks for [`memory_req`](Process::memory_req) units of contiguous
///     memory, once.
///
/// The remaining three fields are scheduling state. They are written by the
/// [`Scheduler`] and read by whoever reports on the run afterwards.
///
/// > ***ATTENTION:*** before any scheduling has happened, `start_time` and
/// > `completion_time` are both 0. That is a sentinel, not a result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Process {
    pub pid:                Pid,
    pub arrival_time:       Ticks,
    pub burst_time:         Ticks,
    pub memory_req:         Units,
    // Only round-robin consumes this.
    pub remaining_time:     Ticks,
    pub start_time:         Ticks,
    pub completion_time:    Ticks,
}

impl Process {
    pub fn new(
        pid:            Pid,
        arrival_time:   Ticks,
        burst_time:     Ticks,
        memory_req:     Units,
    ) -> Self {
        Self {
            pid,
            arrival_time,
            burst_time,
            memory_req,
            remaining_time:     burst_time,
            start_time:         0,
            completion_time:    0,
        }
    }

    /// Scheduled times never exceed [`MAX_CLOCK`], so the casts below
    /// cannot wrap.
    pub fn waiting_time(&self) -> TickDelta {
        self.start_time as TickDelta - self.arrival_time as TickDelta
    }

    pub fn turnaround_time(&self) -> TickDelta {
        self.completion_time as TickDelta - self.arrival_time as TickDelta
    }

    /// Returns `true` if no scheduler has touched the descriptor yet.
    pub fn is_fresh(&self) -> bool {
        self.remaining_time == self.burst_time
            && self.start_time == 0
            && self.completion_time == 0
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Process {} (Arrival: {}, Burst: {}, Memory: {})",
            self.pid, self.arrival_time, self.burst_time, self.memory_req
        )
    }
}
