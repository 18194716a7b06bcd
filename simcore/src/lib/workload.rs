use crate::utils::*;
use rand::prelude::*;

/// Validates a batch of processes before it is handed to the engines.
/// A successfully returned batch is guaranteed to be
/// compliant with all of `simcore`'s assumptions. These are:
/// - the batch is not empty
/// - every pid is positive and unique
/// - no process has zero burst time
/// - no process asks for zero memory
/// - no process has been scheduled already
/// - the clock cannot run past [`MAX_CLOCK`], whatever the policy
///
/// Input order is preserved; it matters to FCFS and round robin.
pub fn init(in_procs: Vec<Process>) -> Result<Vec<Process>, SimError> {
    if in_procs.is_empty() {
        return Err(SimError::EmptyWorkload);
    }
    let late = clock_overflow(&in_procs);
    let mut seen: HashSet<Pid> = HashSet::new();
    for (idx, p) in in_procs.iter().enumerate() {
        let message = if p.pid == 0 {
            "Process with pid 0 found!"
        } else if !seen.insert(p.pid) {
            "Two processes with the same pid found!"
        } else if p.burst_time == 0 {
            "Process with 0 burst time found!"
        } else if p.memory_req == 0 {
            "Process with 0 memory requirement found!"
        } else if !p.is_fresh() {
            "Process already scheduled found!"
        } else if late == Some(idx) {
            "Process overflowing the simulated clock found!"
        } else {
            continue;
        };

        return Err(ProcessError {
            message: String::from(message),
            culprit: p.clone(),
        }.into());
    }

    Ok(in_procs)
}

/// No policy ever idles past the latest arrival, so every start and
/// completion time is bounded by that arrival plus all bursts. Returns
/// the index of the first process that pushes this bound past [`MAX_CLOCK`].
pub fn clock_overflow(procs: &[Process]) -> Option<usize> {
    let mut latest_arrival: Ticks = 0;
    let mut total_burst: Ticks = 0;
    for (idx, p) in procs.iter().enumerate() {
        latest_arrival = latest_arrival.max(p.arrival_time);
        total_burst = match total_burst.checked_add(p.burst_time) {
            Some(t) => { t },
            None    => { return Some(idx); }
        };
        match total_burst.checked_add(latest_arrival) {
            Some(bound) if bound <= MAX_CLOCK   => {},
            _                                   => { return Some(idx); }
        }
    }

    None
}

/// Knobs of the [bernoulli] workload generator.
#[derive(Clone, Debug)]
pub struct BernoulliParams {
    /// How many ticks of arrivals to generate.
    pub ticks:          Ticks,
    /// Chance that a process arrives at any given tick.
    pub p_arrival:      f64,
    /// Chance that an arriving process is a short one.
    pub p_short:        f64,
    pub short_burst:    Ticks,
    pub long_burst:     Ticks,
    /// Memory requests are drawn uniformly from this inclusive range.
    pub min_memory:     Units,
    pub max_memory:     Units,
}

impl Default for BernoulliParams {
    fn default() -> Self {
        Self {
            ticks:          50,
            p_arrival:      0.3,
            p_short:        0.3,
            short_burst:    2,
            long_burst:     6,
            min_memory:     10,
            max_memory:     250,
        }
    }
}

/// Generates a reproducible batch: one arrival trial per tick, each
/// arrival being short or long at random. The batch may come out empty
/// for small `ticks`/`p_arrival`, so pass it through [init].
pub fn bernoulli(params: &BernoulliParams, seed: u64) -> Vec<Process> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut res = Vec::new();

    for t in 0..params.ticks {
        if rng.gen::<f64>() < params.p_arrival {
            let burst_time = if rng.gen::<f64>() < params.p_short {
                params.short_burst
            } else {
                params.long_burst
            };
            let memory_req = rng.gen_range(params.min_memory..=params.max_memory);

            res.push(Process::new(
                res.len() as Pid + 1,
                t,
                burst_time,
                memory_req,
            ));
        }
    }

    res
}
