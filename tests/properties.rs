use std::collections::HashMap;

use frvcp_labels::{LabelArena, LabelQueue, LabelState, LabelingConfig, QueueError, SocFunction};
use proptest::prelude::*;

const TOLERANCE: f64 = 1e-9;

fn profile() -> impl Strategy<Value = SocFunction> {
    (0.0f64..10.0, 0.0f64..5.0, prop::collection::vec((0.1f64..5.0, 0.0f64..3.0), 1..6)).prop_map(
        |(t0, s0, steps)| {
            let mut times = vec![t0];
            let mut socs = vec![s0];
            for (dt, ds) in steps {
                times.push(times[times.len() - 1] + dt);
                socs.push(socs[socs.len() - 1] + ds);
            }
            SocFunction::from_points(times, socs).unwrap()
        },
    )
}

fn state(node: usize, soc: SocFunction) -> LabelState {
    LabelState {
        node,
        key_time: soc.first_time(),
        last_visited_cs: None,
        soc_arr_to_last_cs: 0.0,
        energy_consumed_since_last_cs: 0.0,
        soc,
        time_last_arc: 0.0,
        energy_last_arc: 0.0,
    }
}

#[derive(Debug, Clone)]
enum Op {
    Insert(u8, u8),
    Remove(u8),
    Pop,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..6, 0u8..10).prop_map(|(k, p)| Op::Insert(k, p)),
        1 => (0u8..6).prop_map(Op::Remove),
        2 => Just(Op::Pop),
    ]
}

proptest! {
    #[test]
    fn evaluate_is_monotone_and_saturates(f in profile(), probes in prop::collection::vec(0.0f64..1.0, 2..20)) {
        let span = f.last_time() - f.first_time();
        let mut times: Vec<f64> = probes.iter().map(|p| f.first_time() + p * span).collect();
        times.sort_by(f64::total_cmp);
        for pair in times.windows(2) {
            prop_assert!(f.evaluate(pair[0]) <= f.evaluate(pair[1]) + TOLERANCE);
        }
        prop_assert_eq!(f.evaluate(f.last_time()), f.last_soc());
        prop_assert_eq!(f.evaluate(f.last_time() + 100.0), f.last_soc());
        prop_assert_eq!(f.evaluate(f.first_time() - 0.01), f64::NEG_INFINITY);
    }

    #[test]
    fn explicit_intercepts_evaluate_identically(f in profile(), probes in prop::collection::vec(-1.0f64..30.0, 1..20)) {
        let intercepts: Vec<f64> = f
            .times()
            .iter()
            .zip(f.socs())
            .zip(f.slope())
            .map(|((t, s), m)| s - m * t)
            .collect();
        let explicit = SocFunction::with_intercepts(
            f.times().to_vec(),
            f.socs().to_vec(),
            f.slope().to_vec(),
            intercepts,
        )
        .unwrap();
        for t in probes {
            prop_assert_eq!(f.evaluate(t), explicit.evaluate(t));
        }
    }

    #[test]
    fn mutual_dominance_means_equal_profiles(a in profile(), b in profile(), same in any::<bool>()) {
        let arena = LabelArena::new(&LabelingConfig::default());
        let b = if same { a.clone() } else { b };
        let la = arena.alloc(state(3, a), None).unwrap();
        let lb = arena.alloc(state(3, b), None).unwrap();
        if la.dominates(lb).unwrap() && lb.dominates(la).unwrap() {
            prop_assert_eq!(la.trip_time(), lb.trip_time());
            let times = la.soc_function().times().iter().chain(lb.soc_function().times());
            for &t in times {
                prop_assert!((la.evaluate(t) - lb.evaluate(t)).abs() <= TOLERANCE);
            }
        }
        if same {
            prop_assert!(la.dominates(lb).unwrap());
        }
    }

    #[test]
    fn dominance_holds_pointwise(a in profile(), b in profile(), probes in prop::collection::vec(0.0f64..40.0, 1..20)) {
        let arena = LabelArena::new(&LabelingConfig::default());
        let la = arena.alloc(state(1, a), None).unwrap();
        let lb = arena.alloc(state(1, b), None).unwrap();
        if la.dominates(lb).unwrap() {
            for t in probes {
                prop_assert!(la.evaluate(t) >= lb.evaluate(t) - TOLERANCE);
            }
        }
    }

    #[test]
    fn queue_pops_smallest_tracked(ops in prop::collection::vec(op(), 1..60)) {
        let mut queue = LabelQueue::new();
        let mut model: HashMap<u8, (f64, u64)> = HashMap::new();
        let mut sequence = 0u64;

        for op in ops {
            match op {
                Op::Insert(key, priority) => {
                    let priority = f64::from(priority);
                    queue.insert_or_update(key, priority).unwrap();
                    model.insert(key, (priority, sequence));
                    sequence += 1;
                }
                Op::Remove(key) => {
                    let expected = match model.remove(&key) {
                        Some(_) => Ok(()),
                        None => Err(QueueError::NotFound),
                    };
                    prop_assert_eq!(queue.remove(&key), expected);
                }
                Op::Pop => {
                    let expected = model
                        .iter()
                        .min_by(|(_, a), (_, b)| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
                        .map(|(&key, _)| key);
                    match expected {
                        Some(key) => {
                            model.remove(&key);
                            prop_assert_eq!(queue.pop_min(), Ok(key));
                        }
                        None => prop_assert_eq!(queue.pop_min(), Err(QueueError::Empty)),
                    }
                }
            }
            prop_assert_eq!(queue.len(), model.len());
        }
    }
}
