// tests/unit_endpoint_test.rs

use cacheflush::core::endpoint::ServerEndpoint;
use cacheflush::core::errors::FlushError;

#[test]
fn test_parse_bare_host_gets_default_port() {
    let ep = ServerEndpoint::parse("cache1", false).unwrap();
    assert_eq!(ep.host, "cache1");
    assert_eq!(ep.port, 80);
    assert!(!ep.use_tls);
}

#[test]
fn test_parse_bare_host_with_tls_gets_443() {
    let ep = ServerEndpoint::parse("cache1", true).unwrap();
    assert_eq!(ep.port, 443);
    assert!(ep.use_tls);
}

#[test]
fn test_parse_host_with_explicit_port() {
    let ep = ServerEndpoint::parse("cache2:8080", false).unwrap();
    assert_eq!(ep.host, "cache2");
    assert_eq!(ep.port, 8080);
}

#[test]
fn test_parse_trims_surrounding_whitespace() {
    let ep = ServerEndpoint::parse("  cache1:81 ", false).unwrap();
    assert_eq!(ep.authority(), "cache1:81");
}

#[test]
fn test_base_url_reflects_scheme() {
    let plain = ServerEndpoint::parse("cache1", false).unwrap();
    assert_eq!(plain.base_url(), "http://cache1:80");

    let tls = ServerEndpoint::parse("cache1", true).unwrap();
    assert_eq!(tls.base_url(), "https://cache1:443");
}

#[test]
fn test_display_is_authority() {
    let ep = ServerEndpoint::parse("cache1:8080", false).unwrap();
    assert_eq!(ep.to_string(), "cache1:8080");
}

#[test]
fn test_parse_rejects_empty_spec() {
    let err = ServerEndpoint::parse("   ", false).unwrap_err();
    assert!(matches!(err, FlushError::Configuration(_)));
}

#[test]
fn test_parse_rejects_missing_host() {
    let err = ServerEndpoint::parse(":80", false).unwrap_err();
    assert!(matches!(err, FlushError::Configuration(_)));
}

#[test]
fn test_parse_rejects_non_numeric_port() {
    let err = ServerEndpoint::parse("cache1:http", false).unwrap_err();
    assert!(matches!(err, FlushError::Configuration(_)));
}

#[test]
fn test_parse_rejects_port_out_of_range() {
    let err = ServerEndpoint::parse("cache1:99999", false).unwrap_err();
    assert!(matches!(err, FlushError::Configuration(_)));
}

#[test]
fn test_parse_rejects_port_zero() {
    let err = ServerEndpoint::parse("cache1:0", false).unwrap_err();
    assert!(matches!(err, FlushError::Configuration(_)));
}

#[test]
fn test_parse_rejects_trailing_colon() {
    let err = ServerEndpoint::parse("cache1:", false).unwrap_err();
    assert!(matches!(err, FlushError::Configuration(_)));
}
