use assert_cmd::Command as AssertCommand;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

const CONFIG: &str = r#"{
    "Organization": {"OrgId": "test-org-id", "OrgRootId": "test-org-root-id", "OrgAccountId": "123456789012"},
    "Account": {"AccountId": "111111111111", "Region": "us-east-1"},
    "DelegationSet": {"CallerReference": "test-ref"},
    "Zones": [
        {"Name": "acme.com", "ShareWith": ["org1"], "UpdateNameservers": true},
        {"Name": "example.com", "ShareWith": ["org1"]}
    ],
    "Roles": [
        {"OrganizationalUnits": ["org1"], "Domains": ["*.dev.acme.com"]},
        {"OrganizationalUnits": ["org1"], "Domains": ["dev.acme.com", "*dev.example.com"]}
    ]
}"#;

const HOSTED_ZONES: &str = r#"{
    "HostedZones": [
        {"Id": "/hostedzone/Z111", "Name": "acme.com.", "Config": {"Comment": "Managed by route-master", "PrivateZone": false}},
        {"Id": "/hostedzone/Z222", "Name": "example.com.", "Config": {"Comment": "Managed by route-master", "PrivateZone": false}}
    ]
}"#;

fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("failed to write temp file");
    file
}

fn route_master() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_route-master"));
    command
        .env_remove("ROUTE_MASTER_CONFIG")
        .env_remove("ROUTE_MASTER_HOSTED_ZONES");
    command
}

#[test]
fn help_lists_subcommands() {
    let out = route_master()
        .arg("--help")
        .output()
        .expect("failed to run --help");
    let s = String::from_utf8_lossy(&out.stdout);
    for subcommand in ["plan", "apply", "classify", "client-arns"] {
        assert!(s.contains(subcommand), "help should list {}: {}", subcommand, s);
    }
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn test_plan_prints_roles_and_deferred_lookups() {
    let config = temp_file(CONFIG);
    let output = route_master()
        .args(["plan", "--config"])
        .arg(config.path())
        .output()
        .expect("failed to run plan");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr was: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let plan: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("plan output should be JSON");
    let resources = plan["Resources"].as_array().expect("Resources array");

    let roles: Vec<&str> = resources
        .iter()
        .filter(|r| r["Type"] == "Role")
        .filter_map(|r| r["Role"]["RoleName"].as_str())
        .collect();
    assert_eq!(roles, vec!["R53-dev.acme.com", "R53-dev.acme.com-MtplZn"]);
    assert_eq!(
        resources.iter().filter(|r| r["Type"] == "ZoneLookup").count(),
        2
    );
}

#[test]
fn test_plan_with_hosted_zones_resolves_zone_arns() {
    let config = temp_file(CONFIG);
    let zones = temp_file(HOSTED_ZONES);
    let output = route_master()
        .args(["plan", "--config"])
        .arg(config.path())
        .arg("--hosted-zones")
        .arg(zones.path())
        .output()
        .expect("failed to run plan with hosted zones");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("arn:aws:route53:::hostedzone/Z111"), "stdout was: {}", stdout);
    assert!(!stdout.contains("ZoneLookup"), "stdout was: {}", stdout);
}

#[test]
fn test_plan_reads_config_from_env() {
    let config = temp_file(CONFIG);
    AssertCommand::cargo_bin("route-master")
        .expect("binary should build")
        .arg("plan")
        .env("ROUTE_MASTER_CONFIG", config.path())
        .env_remove("ROUTE_MASTER_HOSTED_ZONES")
        .assert()
        .success()
        .stdout(predicate::str::contains("R53Policy-dev.acme.com-MtplZn"));
}

#[test]
fn test_plan_missing_config_fails() {
    let output = route_master()
        .args(["plan", "--config", "/nonexistent/route-master.json"])
        .output()
        .expect("failed to run plan");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load"), "stderr was: {}", stderr);
}

#[test]
fn test_plan_role_for_unshared_zone_fails() {
    let config = temp_file(&CONFIG.replace(
        r#"{"Name": "example.com", "ShareWith": ["org1"]}"#,
        r#"{"Name": "example.com"}"#,
    ));
    let output = route_master()
        .args(["plan", "--config"])
        .arg(config.path())
        .output()
        .expect("failed to run plan");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("must be shared with RAM"),
        "stderr was: {}",
        stderr
    );
}

#[test]
fn test_classify_reports_match_sets() {
    let output = route_master()
        .args(["classify", "*.dev.acme.com", "dev*.acme.com", "dev.acme.com"])
        .output()
        .expect("failed to run classify");

    assert_eq!(output.status.code(), Some(0));
    let reports: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("classify output should be JSON");

    assert_eq!(reports[0]["Class"], "WildcardSubdomain");
    assert_eq!(reports[0]["Namespace"], "dev.acme.com");
    assert_eq!(reports[0]["Normalized"], "\\052.dev.acme.com");
    assert_eq!(reports[0]["StringLike"][0], "*.dev.acme.com");

    assert_eq!(reports[1]["Class"], "PatternDomain");
    assert_eq!(reports[1]["StringEquals"].as_array().map(Vec::len), Some(0));

    assert_eq!(reports[2]["Class"], "PlainSubdomain");
    assert_eq!(reports[2]["StringEquals"][0], "\\052.dev.acme.com");
    assert_eq!(reports[2]["StringEquals"][1], "dev.acme.com");
    assert_eq!(reports[2]["StringLike"][0], "*.dev.acme.com");
}

#[test]
fn test_classify_invalid_domain_exits_with_error() {
    let output = route_master()
        .args(["classify", "dev.acme.com", "localhost"])
        .output()
        .expect("failed to run classify");

    assert_eq!(output.status.code(), Some(1));
    let reports: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("classify output should be JSON");
    assert_eq!(reports[1]["Class"], "Invalid");
    assert!(reports[1].get("StringEquals").is_none());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("1 of 2 domain(s) are invalid"), "stderr was: {}", stderr);
}

#[test]
fn test_classify_requires_a_domain() {
    let output = route_master()
        .arg("classify")
        .output()
        .expect("failed to run classify");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_client_arns() {
    AssertCommand::cargo_bin("route-master")
        .expect("binary should build")
        .args([
            "client-arns",
            "--account-id",
            "123456789012",
            "--region",
            "us-east-1",
            "--domain",
            "dev.acme.com",
            "--multi-zone",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "arn:aws:ssm:us-east-1:123456789012:parameter/shared/acme.com/zone-id",
        ))
        .stdout(predicate::str::contains(
            "arn:aws:iam::123456789012:role/R53-dev.acme.com-MtplZn",
        ));
}

#[test]
fn test_apply_without_yes_refuses_without_tty() {
    let config = temp_file(CONFIG);
    let output = route_master()
        .args(["apply", "--config"])
        .arg(config.path())
        .output()
        .expect("failed to run apply");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("R53-dev.acme.com"), "stderr was: {}", stderr);
    assert!(
        stderr.contains("run interactively in a TTY"),
        "stderr was: {}",
        stderr
    );
}

#[test]
fn test_apply_without_roles_has_nothing_to_do() {
    let mut config: serde_json::Value = serde_json::from_str(CONFIG).expect("valid config");
    config["Roles"] = serde_json::json!([]);
    let config = temp_file(&config.to_string());
    let output = route_master()
        .args(["apply", "--yes", "--config"])
        .arg(config.path())
        .output()
        .expect("failed to run apply");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no roles to apply"), "stderr was: {}", stderr);
}
