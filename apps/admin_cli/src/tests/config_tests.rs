use super::{load_settings_with, normalize_backend_url, Settings};

use std::{
    collections::HashMap,
    env, fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_config(contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("blog_admin_config_test_{suffix}.toml"));
    fs::write(&path, contents).expect("write config");
    path
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn missing_file_yields_defaults() {
    let path = env::temp_dir().join("blog_admin_config_test_does_not_exist.toml");
    let settings = load_settings_with(&path, env_from(&[])).expect("settings");
    assert_eq!(settings, Settings::default());
}

#[test]
fn file_values_are_overridden_by_environment() {
    let path = temp_config(
        r#"
backend_url = "https://blog.example.com/api/"
auth_token = "from-file"
page_size = 10
"#,
    );

    let settings = load_settings_with(
        &path,
        env_from(&[("APP__AUTH_TOKEN", "from-env"), ("APP__REQUEST_TIMEOUT_SECS", "5")]),
    )
    .expect("settings");

    assert_eq!(settings.backend_url, "https://blog.example.com/api");
    assert_eq!(settings.auth_token.as_deref(), Some("from-env"));
    assert_eq!(settings.page_size, 10);
    assert_eq!(settings.request_timeout_secs, 5);

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn malformed_file_and_bad_env_values_are_errors() {
    let path = temp_config("page_size = \"ten\"");
    let err = load_settings_with(&path, env_from(&[])).expect_err("malformed");
    assert!(err.to_string().contains("failed to parse config file"));
    fs::remove_file(path).expect("cleanup");

    let missing = env::temp_dir().join("blog_admin_config_test_absent.toml");
    assert!(load_settings_with(&missing, env_from(&[("APP__PAGE_SIZE", "0")])).is_err());
    assert!(load_settings_with(&missing, env_from(&[("APP__PAGE_SIZE", "-3")])).is_err());
}

#[test]
fn normalizes_backend_urls() {
    assert_eq!(
        normalize_backend_url(" http://localhost:8080/ ").expect("url"),
        "http://localhost:8080"
    );
    assert_eq!(
        normalize_backend_url("").expect("url"),
        Settings::default().backend_url
    );
    assert!(normalize_backend_url("ftp://files.example.com").is_err());
    assert!(normalize_backend_url("not a url").is_err());
}

#[test]
fn client_context_carries_token_and_timeout() {
    let settings = Settings {
        auth_token: Some("abc".to_string()),
        request_timeout_secs: 7,
        ..Settings::default()
    };
    let context = settings.client_context();
    assert_eq!(context.auth_token(), Some("abc"));
    assert_eq!(context.request_timeout().as_secs(), 7);
    assert_eq!(context.base_url(), "http://127.0.0.1:3000/api");
}
