//! Tests for the CLI module

use super::*;
use crate::auth::{ApiVersion, LEGACY_TOKEN_HEADER};
use crate::error::Error;
use crate::report::OutputFormat;
use clap::Parser;
use std::io::Write as _;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_file(server: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "server: {server}\nusername: admin\npassword: hunter2\ntarget_org: Tenant\n"
    )
    .unwrap();
    file
}

#[test]
fn test_parse_networks() {
    let cli = Cli::try_parse_from([
        "vcd-netquery",
        "--server",
        "https://vcd.example.com",
        "--api-version",
        "31.0",
        "--insecure",
        "-vv",
        "networks",
        "--target-org",
        "Tenant",
        "--page-size",
        "50",
        "--continue-on-error",
        "--format",
        "json",
        "--dump",
    ])
    .unwrap();

    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.api_version, Some(ApiVersion::new(31, 0)));
    match &cli.command {
        Commands::Networks { format, dump, .. } => {
            assert_eq!(*format, OutputFormat::Json);
            assert!(*dump);
        }
        other => panic!("Expected networks, got {other:?}"),
    }

    let overrides = cli.overrides();
    assert_eq!(overrides.server.as_deref(), Some("https://vcd.example.com"));
    assert_eq!(overrides.target_org.as_deref(), Some("Tenant"));
    assert_eq!(overrides.page_size, Some(50));
    assert_eq!(overrides.fail_fast, Some(false));
    assert_eq!(overrides.accept_invalid_certs, Some(true));
}

#[test]
fn test_parse_defaults_leave_settings_unset() {
    let cli = Cli::try_parse_from(["vcd-netquery", "networks"]).unwrap();

    match &cli.command {
        Commands::Networks { format, dump, .. } => {
            assert_eq!(*format, OutputFormat::Pretty);
            assert!(!*dump);
        }
        other => panic!("Expected networks, got {other:?}"),
    }

    let overrides = cli.overrides();
    assert_eq!(overrides.fail_fast, None);
    assert_eq!(overrides.accept_invalid_certs, None);
    assert_eq!(overrides.page_size, None);
}

#[test]
fn test_parse_rejects_bad_api_version() {
    assert!(Cli::try_parse_from(["vcd-netquery", "--api-version", "latest", "check"]).is_err());
}

#[tokio::test]
async fn test_config_command_masks_password() {
    let file = settings_file("https://vcd.example.com");
    let cli = Cli::try_parse_from([
        "vcd-netquery",
        "--config",
        file.path().to_str().unwrap(),
        "--org",
        "Provider",
        "config",
    ])
    .unwrap();

    let mut out = Vec::new();
    Runner::new(cli).run_with_output(&mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("server: https://vcd.example.com"));
    assert!(text.contains("org: Provider"));
    assert!(text.contains("********"));
    assert!(!text.contains("hunter2"));
}

#[tokio::test]
async fn test_networks_command_writes_report() {
    let server = MockServer::start().await;
    let uri = server.uri();

    Mock::given(method("POST"))
        .and(path("/api/sessions"))
        .respond_with(ResponseTemplate::new(200).insert_header(LEGACY_TOKEN_HEADER, "tok"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<QueryResultRecords total="1" pageSize="128" page="1"><AdminOrgNetworkRecord name="web" href="{uri}/api/network/n1"/></QueryResultRecords>"#
        )))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/session"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let file = settings_file(&uri);
    let cli = Cli::try_parse_from([
        "vcd-netquery",
        "-c",
        file.path().to_str().unwrap(),
        "networks",
    ])
    .unwrap();

    let mut out = Vec::new();
    Runner::new(cli).run_with_output(&mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("Networks: adminOrgNetwork (orgName==Tenant)\n"));
    assert!(text.contains("urn:vcloud:network:n1"));
    assert!(text.contains("Unique:         1\n"));
}

#[tokio::test]
async fn test_check_command() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/sessions"))
        .respond_with(ResponseTemplate::new(200).insert_header(LEGACY_TOKEN_HEADER, "tok"))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/session"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let file = settings_file(&server.uri());
    let cli = Cli::try_parse_from(["vcd-netquery", "-c", file.path().to_str().unwrap(), "check"])
        .unwrap();

    let mut out = Vec::new();
    Runner::new(cli).run_with_output(&mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("Session OK: admin@System"));
    assert!(text.contains("API 29.0"));
}

#[test]
fn test_run_blocking_names_failed_command() {
    let cli = Cli::try_parse_from([
        "vcd-netquery",
        "--config",
        "/nonexistent/vcd.yaml",
        "config",
    ])
    .unwrap();

    let err = Runner::new(cli).run_blocking().unwrap_err();

    assert_eq!(
        format!("{err:#}"),
        "config failed: File not found: /nonexistent/vcd.yaml"
    );
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::FileNotFound { .. })
    ));
}

#[test]
fn test_command_names() {
    let name = |args: &[&str]| Cli::try_parse_from(args).unwrap().command.name();
    assert_eq!(name(&["vcd-netquery", "networks"]), "networks");
    assert_eq!(name(&["vcd-netquery", "check"]), "check");
    assert_eq!(name(&["vcd-netquery", "config"]), "config");
}
