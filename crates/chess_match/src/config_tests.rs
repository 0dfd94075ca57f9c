use super::*;

#[test]
fn test_defaults() {
    let config = MatchConfig::default();
    assert_eq!(config.default_promotion, PieceKind::Queen);
    assert!(!config.filter_self_check);
    assert_eq!(MatchConfig::from_toml_str("").unwrap(), config);
}

#[test]
fn test_parse_toml() {
    let config = MatchConfig::from_toml_str(
        r#"
        default_promotion = "knight"
        filter_self_check = true
        "#,
    )
    .unwrap();
    assert_eq!(config.default_promotion, PieceKind::Knight);
    assert!(config.filter_self_check);
}

#[test]
fn test_rejects_non_promotion_piece() {
    let err = MatchConfig::from_toml_str(r#"default_promotion = "king""#).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidPromotion(PieceKind::King)));
}

#[test]
fn test_rejects_unknown_piece_name() {
    let err = MatchConfig::from_toml_str(r#"default_promotion = "wizard""#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_load_missing_file() {
    let err = MatchConfig::load(Path::new("/nonexistent/chess_match.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join(format!("chess_match_config_{}.toml", std::process::id()));
    std::fs::write(&path, "default_promotion = \"rook\"\n").unwrap();
    let config = MatchConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(config.default_promotion, PieceKind::Rook);
}
