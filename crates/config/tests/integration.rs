//! Integration tests for config

#[cfg(test)]
mod tests {
    use mosdeps_config::*;
    use mosdeps_types::Platform;
    use std::io::Write;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_VARS: [&str; 5] = [
        "MOSDEPS_INSTALL_ROOT",
        "MOSDEPS_MANIFEST",
        "MOSDEPS_PLATFORM",
        "MOSDEPS_MAX_REDIRECTS",
        "MOSDEPS_FIRMWARE_CLI",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[general]
platform = "esp32"

[paths]
install_root = "/opt/mosdeps"

[network]
max_redirects = 3

[toolchain]
cli = "/usr/local/bin/mos"
login_shell = false
extra_includes = ["/opt/sdk/include"]
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.platform().unwrap(), Some(Platform::Esp32));
        assert_eq!(config.network.max_redirects, 3);
        assert_eq!(config.network.connect_timeout_secs, None);
        assert_eq!(config.toolchain.cli, "/usr/local/bin/mos");
        assert!(!config.toolchain.login_shell);
        assert_eq!(config.toolchain.compiler, "gcc");
        assert_eq!(config.toolchain.extra_includes, ["/opt/sdk/include"]);
        assert_eq!(
            config.install_root().unwrap().path(),
            Path::new("/opt/mosdeps")
        );
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.network.max_redirects, 10);
        assert_eq!(config.toolchain.cli, "mos");
        assert!(config.toolchain.login_shell);
        assert_eq!(config.toolchain.intellisense_mode, "clang-x64");
        assert_eq!(config.platform().unwrap(), None);
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("MOSDEPS_INSTALL_ROOT", "/tmp/mosdeps-root");
        std::env::set_var("MOSDEPS_PLATFORM", "esp8266");
        std::env::set_var("MOSDEPS_MAX_REDIRECTS", "2");
        std::env::set_var("MOSDEPS_FIRMWARE_CLI", "mos-dev");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(
            config.paths.install_root.as_deref(),
            Some(Path::new("/tmp/mosdeps-root"))
        );
        assert_eq!(config.platform().unwrap(), Some(Platform::Esp8266));
        assert_eq!(config.network.max_redirects, 2);
        assert_eq!(config.toolchain.cli, "mos-dev");

        clear_env();
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var("MOSDEPS_MAX_REDIRECTS", "many");
        let mut config = Config::default();
        assert!(config.merge_env().is_err());

        clear_env();
        std::env::set_var("MOSDEPS_PLATFORM", "cc3200");
        let mut config = Config::default();
        assert!(config.merge_env().is_err());

        clear_env();
    }

    #[tokio::test]
    async fn test_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[network\nmax_redirects = ").unwrap();
        assert!(Config::load_from_file(temp_file.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let result = Config::load_from_file(Path::new("/nonexistent/mosdeps.toml")).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_platform_in_file() {
        let mut config = Config::default();
        config.general.platform = Some("avr".to_string());
        assert!(config.platform().is_err());
    }
}
