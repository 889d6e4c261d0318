//! Environment variable layering, sandboxed with `figment::Jail`.

use figment::Jail;
use pretty_assertions::assert_eq;
use tcm_config::TcmConfig;

#[test]
fn env_overrides_nested_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("TCM_SERVER__PORT", "9090");
        jail.set_env("TCM_SERVER__HOST", "0.0.0.0");
        jail.set_env("TCM_DATABASE__URL", ":memory:");
        jail.set_env("TCM_AUTH__LOG_FAILED_LOGINS", "false");

        let config = TcmConfig::load().expect("config loads");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.url, ":memory:");
        assert!(!config.auth.log_failed_logins);
        Ok(())
    });
}

#[test]
fn env_defines_users() {
    Jail::expect_with(|jail| {
        jail.set_env("TCM_AUTH__USERS__ADMIN", "admin123");

        let config = TcmConfig::load().expect("config loads");
        assert_eq!(
            config.auth.users.get("admin").map(String::as_str),
            Some("admin123")
        );
        Ok(())
    });
}

#[test]
fn env_usernames_are_lowercased_toml_keeps_case() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "tcm.toml",
            r#"
[auth.users]
QA_Lead = "toml-secret"
"#,
        )?;
        jail.set_env("TCM_AUTH__USERS__Admin", "env-secret");

        let config = TcmConfig::load().expect("config loads");
        let names: Vec<&str> = config.auth.users.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["QA_Lead", "admin"]);
        Ok(())
    });
}

#[test]
fn env_beats_local_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "tcm.toml",
            r#"
[server]
port = 7000
"#,
        )?;
        jail.set_env("TCM_SERVER__PORT", "7001");

        let config = TcmConfig::load().expect("config loads");
        assert_eq!(config.server.port, 7001);
        Ok(())
    });
}

#[test]
fn invalid_env_value_fails_validation() {
    Jail::expect_with(|jail| {
        jail.set_env("TCM_AUTH__SESSION_TIMEOUT", "0");
        assert!(TcmConfig::load().is_err());
        Ok(())
    });
}
