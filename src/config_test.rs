#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn default_matches_constants() {
    let c = ResizeConfig::default();
    assert_eq!(c.min_size, 50.0);
    assert_eq!(c.max_size, 1200.0);
    assert_eq!(c.handle_size, 16.0);
    assert_eq!(c.fallback_size(), Size::new(300.0, 200.0));
    assert_eq!(c.lock_modifier, LockModifier::Shift);
    assert_eq!(c.container_selector, ".ProseMirror");
}

#[test]
fn default_validates() {
    assert!(ResizeConfig::default().validate().is_ok());
}

#[test]
fn empty_json_is_default() {
    let c = ResizeConfig::from_json("{}").unwrap();
    assert_eq!(c, ResizeConfig::default());
}

#[test]
fn partial_json_overrides_fields() {
    let c = ResizeConfig::from_json(r#"{ "max_size": 800, "lock_modifier": "alt" }"#).unwrap();
    assert_eq!(c.max_size, 800.0);
    assert_eq!(c.min_size, 50.0);
    assert_eq!(c.lock_modifier, LockModifier::Alt);
    assert_eq!(c.bounds(), Bounds::new(50.0, 800.0));
}

#[test]
fn unknown_field_is_rejected() {
    let err = ResizeConfig::from_json(r#"{ "maxSize": 800 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn malformed_json_is_rejected() {
    let err = ResizeConfig::from_json("{ not json").unwrap_err();
    assert!(err.to_string().starts_with("invalid resize config"));
}

#[test]
fn non_positive_size_is_rejected() {
    let err = ResizeConfig::from_json(r#"{ "handle_size": 0 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::NotPositive { field: "handle_size", .. }));
}

#[test]
fn inverted_bounds_are_rejected() {
    let err = ResizeConfig::from_json(r#"{ "min_size": 500, "max_size": 100 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::InvertedBounds { .. }));
    assert_eq!(err.to_string(), "min_size 500 exceeds max_size 100");
}

#[test]
fn min_size_below_limit_is_rejected() {
    let err = ResizeConfig::from_json(r#"{ "min_size": 10 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::OutsideLimits { field: "min_size", .. }));
    assert_eq!(err.to_string(), "min_size 10 is outside the supported range [50, 1200]");
}

#[test]
fn max_size_above_limit_is_rejected() {
    let err = ResizeConfig::from_json(r#"{ "max_size": 5000 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::OutsideLimits { field: "max_size", .. }));
}

#[test]
fn narrowed_bounds_are_accepted() {
    let c = ResizeConfig::from_json(r#"{ "min_size": 100, "max_size": 600 }"#).unwrap();
    assert_eq!(c.bounds(), Bounds::new(100.0, 600.0));
}
