//! Configuration loading: file discovery, env precedence and validation

use secrecy::ExposeSecret;
use std::collections::HashMap;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};
use utcp_discovery::config::{AuthDescriptor, Config, LogFormat};
use utcp_discovery::error::ErrorKind;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

const FILE_CONFIG: &str = r#"
server:
  port: "9000"
  environment: staging
  log_level: debug
  log_format: json
providers:
  - name: jira
    type: jira
    enabled: true
    base_url: https://file-jira.example.com
    auth:
      type: basic
      username: file-user
      password: file-pass
  - name: gitlab-internal
    type: gitlab
    enabled: true
    base_url: https://gitlab.internal.example.com
    auth:
      type: personal_token
      token: internal-token
      header: PRIVATE-TOKEN
"#;

#[test]
fn test_file_only_configuration() {
    let file = write_config(FILE_CONFIG);
    let resolution = Config::load_from(Some(file.path()), lookup(&[])).unwrap();

    assert_eq!(resolution.config_path.as_deref(), Some(file.path()));
    let server = &resolution.config.server;
    assert_eq!(server.port, "9000");
    assert_eq!(server.environment, "staging");
    assert_eq!(server.log_level, "debug");
    assert_eq!(server.log_format, LogFormat::Json);

    assert!(resolution.env_providers.is_empty());
    assert_eq!(resolution.file_providers, vec!["jira", "gitlab-internal"]);
    assert!(resolution.config.validate().is_ok());
}

#[test]
fn test_env_provider_shadows_file_entry_without_merging() {
    let file = write_config(FILE_CONFIG);
    let env = lookup(&[
        ("JIRA_BASE_URL", "https://env-jira.example.com"),
        ("JIRA_USERNAME", "env-user"),
        ("JIRA_PASSWORD", "env-pass"),
    ]);

    let resolution = Config::load_from(Some(file.path()), env).unwrap();
    let config = &resolution.config;

    let names: Vec<&str> = config.providers.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["jira", "gitlab-internal"]);

    let jira = config.get_provider("jira").unwrap();
    assert_eq!(jira.base_url, "https://env-jira.example.com");
    match &jira.auth {
        AuthDescriptor::Basic { username, password } => {
            assert_eq!(username, "env-user");
            assert_eq!(password.expose_secret(), "env-pass");
        }
        other => panic!("unexpected auth {:?}", other),
    }

    assert_eq!(resolution.env_providers, vec!["jira"]);
    assert_eq!(resolution.shadowed_file_providers, vec!["jira"]);
    assert_eq!(resolution.file_providers, vec!["gitlab-internal"]);
}

#[test]
fn test_env_entry_is_used_whole_even_when_incomplete() {
    let file = write_config(FILE_CONFIG);
    // Env declares jira without credentials; the complete file entry is not consulted
    let env = lookup(&[("JIRA_BASE_URL", "https://env-jira.example.com")]);

    let resolution = Config::load_from(Some(file.path()), env).unwrap();
    let err = resolution.config.validate().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("provider jira"));
    assert!(err.to_string().contains("username and password"));
}

#[test]
fn test_port_env_wins_over_file_and_server_port_env() {
    let file = write_config(FILE_CONFIG);
    let env = lookup(&[("PORT", "7000"), ("UTCP_SERVER_PORT", "7500")]);

    let resolution = Config::load_from(Some(file.path()), env).unwrap();
    assert_eq!(resolution.config.server.port, "7000");
    assert_eq!(resolution.config.server.bind_address().unwrap().port(), 7000);
}

#[test]
fn test_missing_file_is_not_an_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("absent.yaml");

    let resolution = Config::load_from(Some(missing.as_path()), lookup(&[])).unwrap();
    assert!(resolution.config_path.is_none());
    assert!(resolution.config.providers.is_empty());
    assert_eq!(resolution.config.server.port, "8080");
    assert_eq!(resolution.config.server.host, "0.0.0.0");
    assert!(resolution.config.validate().is_ok());
}

#[test]
fn test_config_path_from_environment() {
    let file = write_config(FILE_CONFIG);
    let path = file.path().to_string_lossy().to_string();
    let env = lookup(&[("UTCP_CONFIG_PATH", path.as_str())]);

    let resolution = Config::load_from(None, env).unwrap();
    assert_eq!(resolution.config_path.as_deref(), Some(file.path()));
    assert_eq!(resolution.file_providers.len(), 2);
}

#[test]
fn test_unparseable_file_is_a_configuration_error() {
    let file = write_config("server: [not, a, map\nproviders: {");
    let err = Config::load_from(Some(file.path()), lookup(&[])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_unknown_auth_type_is_a_configuration_error() {
    let file = write_config(
        r#"
providers:
  - name: jira
    type: jira
    enabled: true
    base_url: https://jira.example.com
    auth:
      type: kerberos
"#,
    );
    let err = Config::load_from(Some(file.path()), lookup(&[])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_empty_file_yields_defaults() {
    let file = write_config("");
    let resolution = Config::load_from(Some(file.path()), lookup(&[])).unwrap();
    assert_eq!(resolution.config.server.environment, "development");
    assert!(resolution.config.providers.is_empty());
}

#[test]
fn test_oauth2_provider_from_file() {
    let file = write_config(
        r#"
providers:
  - name: tracker
    type: jira
    enabled: true
    base_url: https://tracker.example.com
    auth:
      type: oauth2
      client_id: id
      client_secret: ""
      token_url: https://idp.example.com/token
"#,
    );
    let resolution = Config::load_from(Some(file.path()), lookup(&[])).unwrap();
    let err = resolution.config.validate().unwrap_err();
    assert!(err
        .to_string()
        .contains("client_id, client_secret, and token_url required for oauth2 auth"));
}
