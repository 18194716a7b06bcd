use simcore::*;

const EPS: f64 = 1e-9;

fn batch(specs: &[(Ticks, Ticks)]) -> Vec<Process> {
    specs.iter()
        .enumerate()
        .map(|(idx, &(arrival, burst))| Process::new(idx as Pid + 1, arrival, burst, 10))
        .collect()
}

fn times(s: &Scheduler) -> Vec<(Pid, Ticks, Ticks)> {
    s.processes()
        .iter()
        .map(|p| (p.pid, p.start_time, p.completion_time))
        .collect()
}

fn by_pid(s: &Scheduler, pid: Pid) -> &Process {
    s.processes()
        .iter()
        .find(|p| p.pid == pid)
        .unwrap()
}

#[test]
fn fcfs_textbook_batch() {
    let mut s = Scheduler::new(batch(&[(0, 10), (2, 5), (4, 8)]));
    s.simulate(Policy::Fcfs, DEFAULT_QUANTUM).unwrap();
    assert_eq!(times(&s), vec![(1, 0, 10), (2, 10, 15), (3, 15, 23)]);

    let m = s.calculate_metrics().unwrap();
    assert!((m.avg_waiting_time - 19.0 / 3.0).abs() < EPS);
    assert!((m.avg_turnaround_time - 14.0).abs() < EPS);
    assert!((m.cpu_utilization - 100.0).abs() < EPS);
}

#[test]
fn fcfs_idles_until_arrival() {
    let mut s = Scheduler::new(batch(&[(0, 2), (5, 1), (5, 3)]));
    s.simulate(Policy::Fcfs, DEFAULT_QUANTUM).unwrap();
    assert_eq!(times(&s), vec![(1, 0, 2), (2, 5, 6), (3, 6, 9)]);

    let m = s.calculate_metrics().unwrap();
    assert!((m.cpu_utilization - 6.0 / 9.0 * 100.0).abs() < EPS);
    assert!(m.cpu_utilization <= 100.0);
}

#[test]
fn fcfs_keeps_input_order() {
    // Out-of-order arrivals are *not* sorted by FCFS.
    let mut s = Scheduler::new(batch(&[(6, 2), (0, 3), (1, 1)]));
    s.simulate(Policy::Fcfs, DEFAULT_QUANTUM).unwrap();
    assert_eq!(times(&s), vec![(1, 6, 8), (2, 8, 11), (3, 11, 12)]);
    let completions = s.processes()
        .iter()
        .map(|p| p.completion_time)
        .collect::<Vec<_>>();
    assert!(completions.windows(2).all(|w| w[0] <= w[1]));
    assert!(s.processes().iter().all(|p| p.start_time >= p.arrival_time));
}

#[test]
fn sjf_matches_fcfs_on_sorted_input() {
    let mut s = Scheduler::new(batch(&[(0, 10), (2, 5), (4, 8)]));
    s.simulate(Policy::Sjf, DEFAULT_QUANTUM).unwrap();
    assert_eq!(times(&s), vec![(1, 0, 10), (2, 10, 15), (3, 15, 23)]);
    let m = s.calculate_metrics().unwrap();
    assert!((m.avg_waiting_time - 19.0 / 3.0).abs() < EPS);
}

#[test]
fn sjf_breaks_arrival_ties_by_burst() {
    let mut s = Scheduler::new(batch(&[(0, 8), (0, 3), (0, 5)]));
    s.simulate(Policy::Sjf, DEFAULT_QUANTUM).unwrap();
    // The sequence itself is reordered.
    assert_eq!(times(&s), vec![(2, 0, 3), (3, 3, 8), (1, 8, 16)]);
}

#[test]
fn sjf_sorts_on_arrival_first() {
    let mut s = Scheduler::new(batch(&[(1, 1), (0, 10)]));
    s.simulate(Policy::Sjf, DEFAULT_QUANTUM).unwrap();
    assert_eq!(times(&s), vec![(2, 0, 10), (1, 10, 11)]);
}

#[test]
fn sjf_is_stable_on_full_ties() {
    let mut s = Scheduler::new(batch(&[(1, 4), (1, 4), (0, 9)]));
    s.simulate(Policy::Sjf, DEFAULT_QUANTUM).unwrap();
    let order = s.processes()
        .iter()
        .map(|p| p.pid)
        .collect::<Vec<_>>();
    assert_eq!(order, vec![3, 1, 2]);
}

#[test]
fn rr_single_process_slices() {
    for flavor in [RoundRobinFlavor::Gated, RoundRobinFlavor::Legacy] {
        let mut s = Scheduler::new(batch(&[(0, 7)])).with_flavor(flavor);
        s.simulate(Policy::Rr, 3).unwrap();
        let ends = s.timeline()
            .iter()
            .map(|sl| sl.end)
            .collect::<Vec<_>>();
        assert_eq!(ends, vec![3, 6, 7]);
        assert_eq!(s.processes()[0].completion_time, 7);
        assert_eq!(s.processes()[0].remaining_time, 0);
    }
}

#[test]
fn rr_dispatch_count_is_ceil_of_burst_over_quantum() {
    for flavor in [RoundRobinFlavor::Gated, RoundRobinFlavor::Legacy] {
        for quantum in 1..=6 {
            for burst in 1..=20 {
                let mut s = Scheduler::new(batch(&[(0, burst), (1, 3)]))
                    .with_flavor(flavor);
                s.simulate(Policy::Rr, quantum).unwrap();
                let dispatches = s.dispatches();
                assert_eq!(dispatches[&1] as Ticks, burst.div_ceil(quantum));
                assert_eq!(dispatches[&2] as Ticks, (3 as Ticks).div_ceil(quantum));
                let served: Ticks = s.timeline()
                    .iter()
                    .filter(|sl| sl.pid == 1)
                    .map(|sl| sl.duration())
                    .sum();
                assert_eq!(served, burst);
                assert_eq!(s.makespan(), burst + 3);
            }
        }
    }
}

#[test]
fn rr_gated_rotation() {
    let mut s = Scheduler::new(batch(&[(0, 5), (1, 3), (2, 1)]));
    s.simulate(Policy::Rr, 2).unwrap();
    let slices = s.timeline()
        .iter()
        .map(|sl| (sl.pid, sl.start, sl.end))
        .collect::<Vec<_>>();
    assert_eq!(
        slices,
        vec![(1, 0, 2), (2, 2, 4), (3, 4, 5), (1, 5, 7), (2, 7, 8), (1, 8, 9)]
    );
    assert_eq!(times(&s), vec![(1, 0, 9), (2, 2, 8), (3, 4, 5)]);
    assert_eq!(s.dispatches().into_iter().collect::<Vec<_>>(), vec![(1, 3), (2, 2), (3, 1)]);

    let m = s.calculate_metrics().unwrap();
    assert!((m.avg_waiting_time - 1.0).abs() < EPS);
    assert!((m.avg_turnaround_time - 19.0 / 3.0).abs() < EPS);
    assert!((m.cpu_utilization - 100.0).abs() < EPS);
}

#[test]
fn rr_legacy_overwrites_start_time() {
    let mut s = Scheduler::new(batch(&[(0, 5), (1, 3), (2, 1)]))
        .with_flavor(RoundRobinFlavor::Legacy);
    s.simulate(Policy::Rr, 2).unwrap();
    // Same rotation as the gated flavor, but start holds the last dispatch.
    assert_eq!(times(&s), vec![(1, 8, 9), (2, 7, 8), (3, 4, 5)]);
}

#[test]
fn rr_gated_idles_and_respects_arrivals() {
    let mut s = Scheduler::new(batch(&[(5, 2), (0, 3)]));
    s.simulate(Policy::Rr, 2).unwrap();
    assert_eq!(by_pid(&s, 2).start_time, 0);
    assert_eq!(by_pid(&s, 2).completion_time, 3);
    assert_eq!(by_pid(&s, 1).start_time, 5);
    assert_eq!(by_pid(&s, 1).completion_time, 7);
    assert!(s.processes()
        .iter()
        .all(|p| p.completion_time >= p.start_time && p.start_time >= p.arrival_time));
}

#[test]
fn rr_legacy_ignores_arrivals() {
    let mut s = Scheduler::new(batch(&[(0, 2), (10, 3)]))
        .with_flavor(RoundRobinFlavor::Legacy);
    s.simulate(Policy::Rr, 4).unwrap();
    let late = by_pid(&s, 2);
    assert_eq!(late.start_time, 10);
    assert_eq!(late.completion_time, 5);
    assert_eq!(late.turnaround_time(), -5);

    let mut g = Scheduler::new(batch(&[(0, 2), (10, 3)]));
    g.simulate(Policy::Rr, 4).unwrap();
    assert_eq!(by_pid(&g, 2).completion_time, 13);
    let m = g.calculate_metrics().unwrap();
    assert!((m.cpu_utilization - 5.0 / 13.0 * 100.0).abs() < EPS);
}

#[test]
fn single_process_metrics() {
    let mut s = Scheduler::new(batch(&[(0, 5)]));
    s.simulate(Policy::Fcfs, DEFAULT_QUANTUM).unwrap();
    let m = s.calculate_metrics().unwrap();
    assert!(m.avg_waiting_time.abs() < EPS);
    assert!((m.avg_turnaround_time - 5.0).abs() < EPS);
    assert!((m.cpu_utilization - 100.0).abs() < EPS);
    assert_eq!(s.makespan(), 5);
}

#[test]
fn clock_overflow_is_refused() {
    for policy in Policy::ALL {
        let mut s = Scheduler::new(vec![Process::new(1, Ticks::MAX, 1, 10)]);
        assert!(matches!(s.simulate(policy, 2), Err(SimError::ClockOverflow(1))));
        assert_eq!(s.policy(), None);
        assert!(s.timeline().is_empty());

        let mut s = Scheduler::new(vec![Process::new(1, 0, 9_300_000_000_000_000_000, 10)]);
        assert!(matches!(s.simulate(policy, 2), Err(SimError::ClockOverflow(1))));
    }

    // Right at the edge, times stay exact and positive.
    let mut s = Scheduler::new(vec![Process::new(1, MAX_CLOCK - 1, 1, 10)]);
    s.simulate(Policy::Fcfs, DEFAULT_QUANTUM).unwrap();
    assert_eq!(s.processes()[0].completion_time, MAX_CLOCK);
    assert_eq!(s.processes()[0].turnaround_time(), 1);
    let m = s.calculate_metrics().unwrap();
    assert!((m.avg_turnaround_time - 1.0).abs() < EPS);
}

#[test]
fn unknown_policy_is_an_error() {
    let mut s = Scheduler::new(batch(&[(0, 5)]));
    assert!(matches!(
        s.simulate_named("PRIORITY", DEFAULT_QUANTUM),
        Err(SimError::UnknownPolicy(name)) if name == "PRIORITY"
    ));
    assert!(s.processes()[0].is_fresh());
    assert!(s.policy().is_none());
    s.simulate_named("rr", 2).unwrap();
    assert_eq!(s.policy(), Some(Policy::Rr));
}

#[test]
fn rr_rejects_zero_quantum() {
    let mut s = Scheduler::new(batch(&[(0, 5)]));
    assert!(matches!(s.simulate(Policy::Rr, 0), Err(SimError::ZeroQuantum)));
    // The quantum is irrelevant to the other policies.
    s.simulate(Policy::Fcfs, 0).unwrap();
}

#[test]
fn second_simulation_is_refused() {
    let mut s = Scheduler::new(batch(&[(0, 5), (1, 2)]));
    s.simulate(Policy::Rr, 2).unwrap();
    let before = times(&s);
    assert!(matches!(
        s.simulate(Policy::Fcfs, DEFAULT_QUANTUM),
        Err(SimError::AlreadySimulated(Policy::Rr))
    ));
    assert_eq!(times(&s), before);
}

#[test]
fn metrics_preconditions() {
    let s = Scheduler::new(batch(&[(0, 5)]));
    assert!(matches!(s.calculate_metrics(), Err(SimError::NotSimulated)));

    let mut empty = Scheduler::new(vec![]);
    empty.simulate(Policy::Fcfs, DEFAULT_QUANTUM).unwrap();
    assert!(matches!(empty.calculate_metrics(), Err(SimError::EmptyWorkload)));

    let mut idle = Scheduler::new(vec![Process::new(1, 0, 0, 10)]);
    idle.simulate(Policy::Sjf, DEFAULT_QUANTUM).unwrap();
    assert!(matches!(idle.calculate_metrics(), Err(SimError::ZeroMakespan)));
}

#[test]
fn policy_names() {
    assert_eq!("fcfs".parse::<Policy>().unwrap(), Policy::Fcfs);
    assert_eq!(" SJF ".parse::<Policy>().unwrap(), Policy::Sjf);
    assert_eq!(Policy::Rr.to_string(), "RR");
    assert!("lottery".parse::<Policy>().is_err());
    assert_eq!("legacy".parse::<RoundRobinFlavor>().unwrap(), RoundRobinFlavor::Legacy);
    assert_eq!(RoundRobinFlavor::default(), RoundRobinFlavor::Gated);
}

#[test]
fn descriptor_display() {
    let p = Process::new(1, 0, 10, 100);
    assert_eq!(p.to_string(), "Process 1 (Arrival: 0, Burst: 10, Memory: 100)");
    assert_eq!(p.remaining_time, 10);
    assert_eq!((p.start_time, p.completion_time), (0, 0));
}
