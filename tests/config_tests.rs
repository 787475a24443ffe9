use apim_cli::config::{expand_env_placeholders, AuthConfig, GlobalConfig, ProfileConfig};

#[test]
fn profile_yaml_uses_camel_case_keys() {
    let cfg = GlobalConfig {
        default_profile: Some("prod".into()),
        profiles: vec![ProfileConfig {
            name: "prod".into(),
            url: "https://apim.example.com".into(),
            auth: AuthConfig::Bearer {
                token_env: "APIM_TOKEN".into(),
            },
        }],
    };

    let yaml = serde_yaml::to_string(&cfg).unwrap();
    assert!(yaml.contains("defaultProfile: prod"));
    assert!(yaml.contains("tokenEnv: APIM_TOKEN"));

    let parsed: GlobalConfig = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed.profiles.len(), 1);
    assert_eq!(parsed.profiles[0].url, "https://apim.example.com");
}

#[test]
fn missing_auth_defaults_to_none() {
    let yaml = r#"
profiles:
  - name: local
    url: http://localhost:8080
"#;
    let parsed: GlobalConfig = serde_yaml::from_str(yaml).unwrap();
    assert!(matches!(parsed.profiles[0].auth, AuthConfig::None));
}

#[test]
fn resolve_profile_prefers_explicit_name() {
    let cfg = GlobalConfig {
        default_profile: Some("prod".into()),
        profiles: vec![
            ProfileConfig {
                name: "prod".into(),
                url: "https://prod.example.com".into(),
                auth: AuthConfig::None,
            },
            ProfileConfig {
                name: "staging".into(),
                url: "https://staging.example.com".into(),
                auth: AuthConfig::None,
            },
        ],
    };

    assert_eq!(
        cfg.resolve_profile(Some("staging")).unwrap().url,
        "https://staging.example.com"
    );
    assert_eq!(
        cfg.resolve_profile(None).unwrap().url,
        "https://prod.example.com"
    );
    assert!(cfg.resolve_profile(Some("nope")).is_err());
}

#[test]
fn resolve_profile_without_default_is_an_error() {
    let cfg = GlobalConfig::default();
    assert!(cfg.resolve_profile(None).is_err());
}

#[test]
fn env_placeholders_expand_with_defaults() {
    std::env::set_var("APIM_CONFIG_TEST_SET", "from-env");
    std::env::remove_var("APIM_CONFIG_TEST_UNSET");

    assert_eq!(
        expand_env_placeholders("url: ${APIM_CONFIG_TEST_SET}"),
        "url: from-env"
    );
    assert_eq!(
        expand_env_placeholders("url: ${APIM_CONFIG_TEST_UNSET:-fallback}"),
        "url: fallback"
    );
    assert_eq!(
        expand_env_placeholders("url: ${APIM_CONFIG_TEST_SET:-fallback}"),
        "url: from-env"
    );
}
