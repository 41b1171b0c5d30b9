use gym::{BoxSpace, Env, EnvError, FlowRecord, SyntheticConfig, SyntheticEnv, FLOW_STRIDE};

fn env_with(num_flows: usize, max_steps: usize) -> SyntheticEnv {
    SyntheticEnv::new(SyntheticConfig {
        num_flows,
        max_steps,
        ..SyntheticConfig::default()
    })
    .unwrap()
}

#[test]
fn flow_records_follow_wire_order() {
    let obs = vec![1.0, 1.0, 1.0, 0.0, 5000.0, 7.0, 2.0, 3.0, 2.0, 40.0, 100.0, 15.0];
    let flows = FlowRecord::parse_all(&obs).unwrap();
    assert_eq!(flows.len(), 2);
    assert_eq!(flows[0].aoi, 5000.0);
    assert_eq!(flows[0].cqi, 7.0);
    assert_eq!(flows[1].rnti, 2.0);
    assert_eq!(flows[1].lc_id, 3.0);
    assert_eq!(flows[1].hol_delay, 40.0);
    assert_eq!(FlowRecord::flatten(&flows), obs);
}

#[test]
fn partial_flow_is_rejected() {
    let obs = vec![0.0; FLOW_STRIDE + 2];
    assert_eq!(
        FlowRecord::parse_all(&obs),
        Err(EnvError::MalformedObservation { len: 8, stride: FLOW_STRIDE })
    );
    assert_eq!(FlowRecord::count(&[]), Ok(0));
}

#[test]
fn box_space_samples_inside_bounds() {
    let space = BoxSpace::unit(5);
    let mut rng = fastrand::Rng::with_seed(7);
    for _ in 0..100 {
        let action = space.sample(&mut rng);
        assert_eq!(action.len(), 5);
        assert!(space.contains(&action));
    }
    assert!(!space.contains(&[0.5, 0.5]));
    assert!(!space.contains(&[0.0, 0.0, 0.0, 0.0, 1.5]));
}

#[test]
fn synthetic_env_reports_one_record_per_flow() {
    let mut env = env_with(4, 10);
    let obs = env.reset().unwrap();
    assert_eq!(obs.len(), 4 * FLOW_STRIDE);
    for flow in FlowRecord::parse_all(&obs).unwrap() {
        assert!((1.0..=15.0).contains(&flow.cqi));
        assert_eq!(flow.hol_delay, 0.0);
    }
}

#[test]
fn synthetic_env_terminates_after_budget() {
    let mut env = env_with(2, 3);
    env.reset().unwrap();
    let mut done = false;
    let mut steps = 0;
    while !done {
        let step = env.step(&[0.0, 1.0]).unwrap();
        assert!(step.reward.is_finite());
        assert!(step.reward < 0.0);
        done = step.done;
        steps += 1;
    }
    assert_eq!(steps, 3);
}

#[test]
fn served_flow_stays_fresh() {
    let mut env = env_with(2, 50);
    env.reset().unwrap();
    let mut last = Vec::new();
    for _ in 0..5 {
        last = env.step(&[1.0, 0.0]).unwrap().obs;
    }
    let flows = FlowRecord::parse_all(&last).unwrap();
    assert_eq!(flows[0].aoi, 100.0);
    assert_eq!(flows[1].aoi, 600.0);
}

#[test]
fn synthetic_env_rejects_bad_actions() {
    let mut env = env_with(2, 10);
    assert!(matches!(env.step(&[0.0, 0.0]), Err(EnvError::Invalid(_))));
    env.reset().unwrap();
    assert_eq!(
        env.step(&[0.5]),
        Err(EnvError::ActionShape { expected: 2, found: 1 })
    );
    assert!(matches!(
        env.step(&[0.5, 2.0]),
        Err(EnvError::ActionOutOfRange { flow: 1, .. })
    ));
}

#[test]
fn same_seed_same_trajectory() {
    let mut a = env_with(4, 10);
    let mut b = env_with(4, 10);
    assert_eq!(a.reset().unwrap(), b.reset().unwrap());
    let action = [0.2, 0.9, 0.4, 0.1];
    for _ in 0..5 {
        assert_eq!(a.step(&action).unwrap(), b.step(&action).unwrap());
    }
}
