use anyhow::Result;

use super::Config;
use super::ConfigKey;
use crate::application::cli;

#[test]
fn it_serializes_to_valid_toml() {
    let res = Config::serialize_default(cli::build());
    let toml_res = res.parse::<toml_edit::Document>();
    assert!(toml_res.is_ok());

    insta::assert_snapshot!(res, @r###"
    # MediSense-AI backend API URL.
    api-url = "http://localhost:8000"

    # Email to prefill in the login form.
    # email = ""

    # Time to wait in milliseconds before timing out when checking the backend is reachable.
    health-check-timeout = 1000
    "###);
}

#[test]
fn it_uses_local_backend_by_default() {
    assert_eq!(Config::default(ConfigKey::ApiURL), "http://localhost:8000");
    assert_eq!(Config::default(ConfigKey::HealthCheckTimeout), "1000");
    assert!(Config::default(ConfigKey::ConfigFile).ends_with("config.toml"));
}

// Loads share the global config store, so they run sequentially in one test.
#[tokio::test]
async fn it_loads_and_validates_config_files() -> Result<()> {
    let matches = cli::build().try_get_matches_from(vec![
        "medisense",
        "chat",
        "-c",
        "./config.example.toml",
    ])?;
    let chat_matches = matches.subcommand_matches("chat").unwrap();
    Config::load(vec![&matches, chat_matches]).await?;
    assert_eq!(Config::get(ConfigKey::ApiURL), "http://127.0.0.1:9000");
    assert_eq!(Config::get(ConfigKey::Email), "clinician@example.org");
    assert_eq!(Config::get(ConfigKey::HealthCheckTimeout), "250");

    let matches = cli::build().try_get_matches_from(vec![
        "medisense",
        "-c",
        "./config.example.toml",
        "--api-url",
        "http://override:8000",
    ])?;
    Config::load(vec![&matches]).await?;
    assert_eq!(Config::get(ConfigKey::ApiURL), "http://override:8000");

    let matches =
        cli::build().try_get_matches_from(vec!["medisense", "-c", "./test/bad-config.toml"])?;
    assert!(Config::load(vec![&matches]).await.is_err());

    let matches = cli::build().try_get_matches_from(vec![
        "medisense",
        "-c",
        "./test/unknown-key-config.toml",
    ])?;
    let err = Config::load(vec![&matches]).await.unwrap_err();
    assert!(err.to_string().contains("unsupported key 'backend'"));

    return Ok(());
}

#[test]
fn it_parses_register_arguments() -> Result<()> {
    let matches = cli::build().try_get_matches_from(vec![
        "medisense",
        "register",
        "-e",
        "pat@clinic.org",
        "--full-name",
        "Pat Doe",
    ])?;
    let register_matches = matches.subcommand_matches("register").unwrap();
    assert_eq!(
        register_matches.get_one::<String>("full-name").unwrap(),
        "Pat Doe"
    );
    assert_eq!(register_matches.get_one::<String>("role").unwrap(), "patient");
    assert_eq!(
        register_matches.get_one::<String>(&ConfigKey::Email.to_string()).unwrap(),
        "pat@clinic.org"
    );

    let res = cli::build().try_get_matches_from(vec!["medisense", "register", "--role", "wizard"]);
    assert!(res.is_err());

    return Ok(());
}
