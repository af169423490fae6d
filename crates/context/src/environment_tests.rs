use super::*;

#[test]
fn default_environment_is_permissive() {
    let env = Environment::default();
    assert_eq!(env.job_cache, JobCacheStrategy::ValueId);
    assert!(!env.allow_external);
    assert!(!env.lock_context);
    assert_eq!(env.runtime_profile, RuntimeProfile::Default);
    assert!(env.extra_pipeline_folders.is_empty());
    assert!(!env.keep_alias_reverse_pointers);
}

#[test]
fn parses_strict_runtime_profile_from_yaml() {
    let env = Environment::from_yaml(
        r#"
        job_cache: data_hash
        runtime_profile: strict
        keep_alias_reverse_pointers: true
        "#,
    )
    .unwrap();

    assert_eq!(env.job_cache, JobCacheStrategy::DataHash);
    assert_eq!(env.runtime_profile, RuntimeProfile::Strict);
    assert!(env.keep_alias_reverse_pointers);
}

#[test]
fn unknown_field_is_rejected() {
    let err = Environment::from_yaml("job_cache: no_cache\ntypo_field: true\n").unwrap_err();
    assert!(err.to_string().contains("typo_field") || err.to_string().contains("unknown field"));
}

#[test]
fn parses_extra_pipeline_folders_from_json() {
    let env = Environment::from_json(r#"{"extra_pipeline_folders": ["/etc/kiara/pipelines", "./pipelines"]}"#).unwrap();
    assert_eq!(env.extra_pipeline_folders.len(), 2);
    assert_eq!(env.extra_pipeline_folders[0], std::path::PathBuf::from("/etc/kiara/pipelines"));
}

#[test]
fn round_trips_through_yaml() {
    let env = Environment {
        job_cache: JobCacheStrategy::NoCache,
        allow_external: true,
        lock_context: true,
        runtime_profile: RuntimeProfile::Strict,
        extra_pipeline_folders: vec![std::path::PathBuf::from("a"), std::path::PathBuf::from("b")],
        keep_alias_reverse_pointers: true,
    };
    let yaml = serde_yaml::to_string(&env).unwrap();
    let round_tripped = Environment::from_yaml(&yaml).unwrap();
    assert_eq!(env, round_tripped);
}
