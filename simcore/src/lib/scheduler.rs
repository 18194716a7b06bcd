use crate::utils::*;
use crate::workload;
use log::{debug, info};

/// One uninterrupted stretch of CPU time spent on process
/// [`pid`](Slice::pid), over `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slice {
    pub pid:    Pid,
    pub start:  Ticks,
    pub end:    Ticks,
}

impl Slice {
    pub fn duration(&self) -> Ticks {
        self.end - self.start
    }
}

/// Aggregate timing figures of a finished run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
    pub avg_waiting_time:       f64,
    pub avg_turnaround_time:    f64,
    /// Percentage of the makespan during which some process was running.
    pub cpu_utilization:        f64,
}

/// Owns a batch of [`Process`] descriptors and schedules them, exactly once,
/// under some [`Policy`].
///
/// Scheduling happens *in place*: the descriptors' timing fields are
/// overwritten, and under [`Policy::Sjf`] the sequence itself is reordered
/// for good. Whoever needs the original input order must keep a copy.
pub struct Scheduler {
    processes:  Vec<Process>,
    // Every dispatch appends one slice, in dispatch order.
    timeline:   Vec<Slice>,
    flavor:     RoundRobinFlavor,
    ran:        Option<Policy>,
}

impl Scheduler {
    pub fn new(processes: Vec<Process>) -> Self {
        Self {
            processes,
            timeline:   vec![],
            flavor:     RoundRobinFlavor::default(),
            ran:        None,
        }
    }

    pub fn with_flavor(mut self, flavor: RoundRobinFlavor) -> Self {
        self.flavor = flavor;
        self
    }

    /// Runs `policy` over the whole batch. `quantum` matters only to
    /// [`Policy::Rr`], where it must be positive.
    ///
    /// Round robin eats into each descriptor's `remaining_time`, so a
    /// second call would start from corrupted state. We refuse it instead.
    pub fn simulate(&mut self, policy: Policy, quantum: Ticks) -> Result<(), SimError> {
        if let Some(p) = self.ran {
            return Err(SimError::AlreadySimulated(p));
        }
        if let Some(idx) = workload::clock_overflow(&self.processes) {
            return Err(SimError::ClockOverflow(self.processes[idx].pid));
        }
        match policy {
            Policy::Fcfs    => { self.fcfs() },
            Policy::Sjf     => { self.sjf() },
            Policy::Rr      => {
                if quantum == 0 {
                    return Err(SimError::ZeroQuantum);
                }
                match self.flavor {
                    RoundRobinFlavor::Gated     => { self.rr_gated(quantum) },
                    RoundRobinFlavor::Legacy    => { self.rr_legacy(quantum) },
                }
            },
        }
        self.ran = Some(policy);
        info!(
            "{} scheduled {} processes in {} slices, makespan {}",
            policy,
            self.processes.len(),
            self.timeline.len(),
            self.makespan()
        );

        Ok(())
    }

    /// Same as [`simulate`](Scheduler::simulate), for callers holding the
    /// policy's name ("FCFS", "SJF" or "RR", any case).
    pub fn simulate_named(&mut self, name: &str, quantum: Ticks) -> Result<(), SimError> {
        let policy: Policy = name.parse()?;
        self.simulate(policy, quantum)
    }

    fn fcfs(&mut self) {
        let mut current_time: Ticks = 0;
        for p in self.processes.iter_mut() {
            // The CPU idles until the process shows up.
            p.start_time = current_time.max(p.arrival_time);
            p.completion_time = p.start_time + p.burst_time;
            current_time = p.completion_time;
            debug!("P{} runs {}..{}", p.pid, p.start_time, p.completion_time);
            self.timeline.push(Slice {
                pid:    p.pid,
                start:  p.start_time,
                end:    p.completion_time,
            });
        }
    }

    fn sjf(&mut self) {
        // Stable: equal (arrival, burst) pairs keep their input order.
        self.processes
            .sort_by_key(|p| (p.arrival_time, p.burst_time));
        self.fcfs();
    }

    fn rr_legacy(&mut self, quantum: Ticks) {
        // Everybody is considered ready at time 0.
        let mut ready_queue: VecDeque<usize> = (0..self.processes.len()).collect();
        let mut current_time: Ticks = 0;
        while let Some(idx) = ready_queue.pop_front() {
            let p = &mut self.processes[idx];
            // Overwritten on every dispatch: ends up holding the last one.
            p.start_time = current_time.max(p.arrival_time);
            let run = p.remaining_time.min(quantum);
            let slice = Slice {
                pid:    p.pid,
                start:  current_time,
                end:    current_time + run,
            };
            current_time += run;
            p.remaining_time -= run;
            if p.remaining_time > 0 {
                ready_queue.push_back(idx);
            } else {
                p.completion_time = current_time;
            }
            debug!("P{} runs {}..{}", slice.pid, slice.start, slice.end);
            self.timeline.push(slice);
        }
    }

    fn rr_gated(&mut self, quantum: Ticks) {
        // Indices in order of arrival; ties keep input order.
        let mut pending: VecDeque<usize> = (0..self.processes.len())
            .sorted_by_key(|&i| self.processes[i].arrival_time)
            .collect();
        let mut ready_queue: VecDeque<usize> = VecDeque::new();
        let mut dispatched = vec![false; self.processes.len()];
        let mut current_time: Ticks = 0;
        loop {
            admit(&self.processes, &mut pending, &mut ready_queue, current_time);
            let idx = match ready_queue.pop_front() {
                Some(i) => { i },
                None    => {
                    match pending.front() {
                        Some(&next) => {
                            // Nobody ready: the CPU idles until the next arrival.
                            current_time = self.processes[next].arrival_time;
                            continue;
                        },
                        None        => { break; }
                    }
                }
            };
            let p = &mut self.processes[idx];
            if !dispatched[idx] {
                p.start_time = current_time;
                dispatched[idx] = true;
            }
            let run = p.remaining_time.min(quantum);
            let slice = Slice {
                pid:    p.pid,
                start:  current_time,
                end:    current_time + run,
            };
            current_time += run;
            p.remaining_time -= run;
            let unfinished = p.remaining_time > 0;
            if !unfinished {
                p.completion_time = current_time;
            }
            debug!("P{} runs {}..{}", slice.pid, slice.start, slice.end);
            self.timeline.push(slice);
            // Whoever arrived during the slice queues up ahead of
            // the process that was just preempted.
            admit(&self.processes, &mut pending, &mut ready_queue, current_time);
            if unfinished {
                ready_queue.push_back(idx);
            }
        }
    }

    /// Derives the run's [`Metrics`]. Waiting time is measured up to the
    /// recorded start time, turnaround up to completion.
    pub fn calculate_metrics(&self) -> Result<Metrics, SimError> {
        if self.ran.is_none() {
            return Err(SimError::NotSimulated);
        }
        if self.processes.is_empty() {
            return Err(SimError::EmptyWorkload);
        }
        let total_completion_time = self.makespan();
        if total_completion_time == 0 {
            return Err(SimError::ZeroMakespan);
        }

        // Each term fits a TickDelta, their sum over the batch may not.
        let mut total_waiting_time: i128 = 0;
        let mut total_turnaround_time: i128 = 0;
        let mut total_burst_time: Ticks = 0;
        for p in &self.processes {
            total_waiting_time += p.waiting_time() as i128;
            total_turnaround_time += p.turnaround_time() as i128;
            total_burst_time += p.burst_time;
        }
        let n = self.processes.len() as f64;

        Ok(Metrics {
            avg_waiting_time:       total_waiting_time as f64 / n,
            avg_turnaround_time:    total_turnaround_time as f64 / n,
            cpu_utilization:        total_burst_time as f64 / total_completion_time as f64 * 100.0,
        })
    }

    /// Latest completion time over the batch (0 before scheduling).
    pub fn makespan(&self) -> Ticks {
        self.processes
            .iter()
            .map(|p| p.completion_time)
            .max()
            .unwrap_or(0)
    }

    /// How many times each process got the CPU, keyed by pid in order
    /// of first dispatch.
    pub fn dispatches(&self) -> IndexMap<Pid, usize> {
        let mut res = IndexMap::new();
        for s in &self.timeline {
            *res.entry(s.pid).or_insert(0) += 1;
        }

        res
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn into_processes(self) -> Vec<Process> {
        self.processes
    }

    pub fn timeline(&self) -> &[Slice] {
        &self.timeline
    }

    /// The policy that ran, if any.
    pub fn policy(&self) -> Option<Policy> {
        self.ran
    }

    pub fn flavor(&self) -> RoundRobinFlavor {
        self.flavor
    }
}

/// Moves every pending process that has arrived by `now` to the tail
/// of the ready queue. `pending` is sorted by arrival.
fn admit(
    processes:      &[Process],
    pending:        &mut VecDeque<usize>,
    ready_queue:    &mut VecDeque<usize>,
    now:            Ticks,
) {
    while let Some(&i) = pending.front() {
        if processes[i].arrival_time > now {
            break;
        }
        ready_queue.push_back(i);
        pending.pop_front();
    }
}
