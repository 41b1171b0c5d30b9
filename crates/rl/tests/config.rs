use rl::{AgentConfig, ConfigError, QAgent};

#[test]
fn defaults_match_reference_agent() {
    let config = AgentConfig::default();
    assert_eq!(config.max_aoi, 10_000.0);
    assert_eq!(config.max_cqi, 15.0);
    assert_eq!(config.table_shape(), [10, 5, 11]);
    assert_eq!(config.epsilon, 0.1);
    assert_eq!(config.alpha, 0.5);
    assert_eq!(config.gamma, 0.99);
    assert!(!config.inference_mode);
    config.validate().unwrap();
}

#[test]
fn partial_json_falls_back_to_defaults() {
    let config = AgentConfig::from_path("tests/data/agent.json").unwrap();
    assert_eq!(config.max_aoi, 5000.0);
    assert_eq!(config.aoi_bins, 20);
    assert_eq!(config.num_weight_bins, 6);
    assert_eq!(config.epsilon, 0.05);
    assert_eq!(config.cqi_bins, 5);
    assert_eq!(config.gamma, 0.99);
}

#[test]
fn unknown_fields_are_rejected() {
    let err = AgentConfig::from_json(r#"{ "epsilom": 0.2 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn missing_file_reports_path() {
    let err = AgentConfig::from_path("tests/data/nope.json").unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn invalid_values_are_rejected() {
    let cases = [
        r#"{ "aoi_bins": 0 }"#,
        r#"{ "cqi_bins": 0 }"#,
        r#"{ "num_weight_bins": 1 }"#,
        r#"{ "max_aoi": 0.0 }"#,
        r#"{ "max_cqi": -15.0 }"#,
        r#"{ "epsilon": 1.5 }"#,
        r#"{ "alpha": -0.1 }"#,
        r#"{ "gamma": 2.0 }"#,
    ];
    for json in cases {
        assert!(AgentConfig::from_json(json).is_err(), "{json} should be rejected");
    }
}

#[test]
fn agent_refuses_invalid_config() {
    let config = AgentConfig {
        num_weight_bins: 1,
        ..AgentConfig::default()
    };
    assert!(matches!(
        QAgent::new(config),
        Err(ConfigError::TooFewBins {
            field: "num_weight_bins",
            ..
        })
    ));
}

#[test]
fn config_serializes_back_to_json() {
    let config = AgentConfig {
        inference_mode: true,
        ..AgentConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(AgentConfig::from_json(&json).unwrap(), config);
}
