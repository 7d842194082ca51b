use handctl::integration::AppConfig;
use handctl::HandCtlError;
use std::fs;
use std::path::PathBuf;

fn write_config(name: &str, text: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("handctl-{}-{}.toml", name, std::process::id()));
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_load_partial_file_keeps_defaults() {
    let path = write_config(
        "partial",
        r#"
[volume]
max_dist = 150.0

[remote]
bind = "127.0.0.1:6000"

[motion]
server = "10.0.0.2:6000"
"#,
    );

    let config = AppConfig::load(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(config.volume.max_dist, 150.0);
    assert_eq!(config.volume.min_dist, 30.0);
    assert_eq!(config.volume.smoothing, 0.8);
    assert_eq!(config.scroll.dead_zone, 40);
    assert_eq!(config.remote.bind, "127.0.0.1:6000");
    assert!(config.remote.enabled);
    assert_eq!(config.motion.server, "10.0.0.2:6000");
    assert_eq!(config.motion.window_size, 10);
}

#[test]
fn test_load_rejects_inverted_range() {
    let path = write_config("inverted", "[volume]\nmin_dist = 250.0\n");

    let err = AppConfig::load(&path).unwrap_err();
    fs::remove_file(&path).ok();

    assert!(matches!(err, HandCtlError::ConfigError(_)));
    assert!(!err.is_recoverable());
}

#[test]
fn test_load_rejects_malformed_toml() {
    let path = write_config("malformed", "[scroll\ndead_zone = 40\n");

    let err = AppConfig::load(&path).unwrap_err();
    fs::remove_file(&path).ok();

    assert!(matches!(err, HandCtlError::ConfigError(_)));
}

#[test]
fn test_missing_file_is_config_error() {
    let path = std::env::temp_dir().join("handctl-does-not-exist.toml");
    assert!(matches!(
        AppConfig::load(&path),
        Err(HandCtlError::ConfigError(_))
    ));
}

#[test]
fn test_disabled_remote_skips_bind_check() {
    let path = write_config(
        "disabled",
        "[remote]\nenabled = false\nbind = \"not an address\"\n",
    );

    let config = AppConfig::load(&path);
    fs::remove_file(&path).ok();

    assert!(config.is_ok());
}
