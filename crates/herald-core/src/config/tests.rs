use super::*;

#[test]
fn test_defaults() {
    let cfg = Config::default();
    assert_eq!(cfg.herald.log_level, "info");
    assert_eq!(cfg.sms.default_compliance_line, "Text STOP to opt out");
    assert_eq!(cfg.otp.default_code_length, 6);
    assert_eq!(cfg.otp.default_expiry_minutes, 5);
    assert_eq!(cfg.otp.default_channel, ChannelOption::Auto);
    assert_eq!(cfg.schedule.default_timezone, "UTC");
    assert_eq!(cfg.schedule.default_rate_limit_per_min, 1000);
    assert_eq!(cfg.schedule.default_cadence, vec![SchedulerCadence::Every24Hours]);
    assert_eq!(cfg.media.max_size_bytes, 5 * 1024 * 1024);
    assert_eq!(cfg.media.allowed_mime.len(), 6);
}

#[test]
fn test_partial_toml_fills_defaults() {
    let toml_str = r#"
        [otp]
        brand = "Acme"
        default_channel = "SMS"

        [schedule]
        default_cadence = ["MON", "FRI"]
    "#;
    let cfg: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(cfg.otp.brand, "Acme");
    assert_eq!(cfg.otp.default_channel, ChannelOption::Sms);
    assert_eq!(cfg.otp.default_code_length, 6);
    assert_eq!(
        cfg.schedule.default_cadence,
        vec![SchedulerCadence::Mon, SchedulerCadence::Fri]
    );
    assert_eq!(cfg.schedule.campaign_lead_minutes, 60);
    assert_eq!(cfg.herald.name, "Herald");
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let cfg = load("/nonexistent/__herald_config__.toml").unwrap();
    assert_eq!(cfg.herald.log_level, "info");
    assert!(cfg.herald.catalog_path.is_empty());
}

#[test]
fn test_load_rejects_malformed_toml() {
    let tmp = std::env::temp_dir().join("__herald_test_bad_config__.toml");
    std::fs::write(&tmp, "[otp\nbrand = ").unwrap();
    let err = load(tmp.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, HeraldError::Config(_)));
    let _ = std::fs::remove_file(&tmp);
}

#[test]
fn test_catalog_defaults_to_demo() {
    let cfg = Config::default();
    let catalog = cfg.catalog().unwrap();
    assert!(catalog.template("tpl_otp_lite").is_some());
}

#[test]
fn test_shellexpand_leaves_plain_paths() {
    assert_eq!(shellexpand("/tmp/x"), "/tmp/x");
    assert_eq!(shellexpand("relative/x"), "relative/x");
}
