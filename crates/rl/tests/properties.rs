use proptest::prelude::*;
use rl::{bin_index, AgentConfig, Discretizer, Policy, QAgent, RandomPolicy};

proptest! {
    #[test]
    fn aoi_bin_stays_in_range(
        bins in 1usize..64,
        max in 1.0f64..1e6,
        frac in 0.0f64..=1.0,
    ) {
        let bin = bin_index(frac * max, max, bins);
        prop_assert!(bin < bins);
    }

    #[test]
    fn any_reading_is_clamped(value in any::<f64>(), bins in 1usize..64) {
        prop_assert!(bin_index(value, 15.0, bins) < bins);
    }

    #[test]
    fn maximum_maps_to_last_bin(bins in 1usize..64, max in 1e-3f64..1e9) {
        prop_assert_eq!(bin_index(max, max, bins), bins - 1);
    }

    #[test]
    fn discretizer_respects_both_axes(aoi in -1e5f64..1e5, cqi in -30.0f64..30.0) {
        let config = AgentConfig::default();
        let state = Discretizer::new(&config).discretize(aoi, cqi);
        prop_assert!(state.aoi_bin < config.aoi_bins);
        prop_assert!(state.cqi_bin < config.cqi_bins);
    }

    #[test]
    fn actions_are_unit_weights(
        readings in prop::collection::vec((0.0f64..20_000.0, 0.0f64..20.0), 0..16),
        seed in any::<u64>(),
    ) {
        let obs: Vec<f64> = readings
            .iter()
            .flat_map(|&(aoi, cqi)| [0.0, 0.0, 0.0, 0.0, aoi, cqi])
            .collect();
        let config = AgentConfig { epsilon: 0.5, ..AgentConfig::default() };
        let mut agent = QAgent::with_seed(config, seed).unwrap();
        let mut random = RandomPolicy::new(seed);
        for actions in [Policy::act(&mut agent, &obs).unwrap(), random.act(&obs).unwrap()] {
            prop_assert_eq!(actions.len(), readings.len());
            prop_assert!(actions.iter().all(|w| (0.0..=1.0).contains(w)));
        }
    }
}

#[test]
fn random_policy_never_learns_and_rejects_partial_flows() {
    let mut policy = RandomPolicy::new(1);
    policy.learn(1.0);
    policy.clear_memory();
    assert!(policy.act(&[0.0; 7]).is_err());
}
