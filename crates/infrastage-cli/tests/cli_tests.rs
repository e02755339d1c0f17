//! Integration tests for the infrastage binary.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const INVENTORY: &str = r#"
aws:
  regions:
    us-east-1:
      kubernetes_versions: ["1.29", "1.30"]
      instances: [m5.xlarge, m5.2xlarge]
      zones: [us-east-1a, us-east-1b, us-east-1c]
      kms_keys:
        mac-1:
          arn: arn:aws:kms:us-east-1:111122223333:key/mac-1
          key_manager: CUSTOMER
          key_spec: HMAC_256
          key_usage: GENERATE_VERIFY_MAC
"#;

const AWS_DOCUMENT: &str = r#"
project_name: demo
provider: aws
amazon_web_services:
  region: us-east-1
"#;

/// Temp directory holding the documents plus an empty config file, so the
/// host's own config never leaks into a run.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Self {
            dir: TempDir::new().unwrap(),
        };
        fixture.write("config.toml", "");
        fixture
    }

    fn write(&self, name: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    fn cmd(&self) -> Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("infrastage");
        cmd.current_dir(self.dir.path())
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .arg("--config")
            .arg(self.dir.path().join("config.toml"));
        cmd
    }
}

#[test]
fn help_lists_commands() {
    Fixture::new()
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("outputs"))
        .stdout(predicate::str::contains("defaults"));
}

#[test]
fn version_flag() {
    Fixture::new()
        .cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn validate_aws_prints_compiled_variables() {
    let fx = Fixture::new();
    let doc = fx.write("cluster.yaml", AWS_DOCUMENT);
    let inventory = fx.write("inventory.yaml", INVENTORY);

    let assert = fx
        .cmd()
        .arg("validate")
        .arg(&doc)
        .arg("--inventory")
        .arg(&inventory)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let vars: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(vars["kubernetes_version"], "1.30");
    assert_eq!(
        vars["availability_zones"],
        serde_json::json!(["us-east-1a", "us-east-1b"])
    );
    assert_eq!(vars["node_groups"][0]["name"], "general");
}

#[test]
fn validate_yaml_format() {
    let fx = Fixture::new();
    let doc = fx.write("cluster.yaml", AWS_DOCUMENT);
    let inventory = fx.write("inventory.yaml", INVENTORY);

    fx.cmd()
        .args(["validate", "--format", "yaml", "-i"])
        .arg(&inventory)
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("kubernetes_version:"))
        .stdout(predicate::str::contains("1.30"))
        .stdout(predicate::str::starts_with("{").not());
}

#[test]
fn inventory_path_from_environment() {
    let fx = Fixture::new();
    let doc = fx.write("cluster.yaml", AWS_DOCUMENT);
    let inventory = fx.write("inventory.yaml", INVENTORY);

    fx.cmd()
        .env("INFRASTAGE_INVENTORY__PATH", &inventory)
        .arg("validate")
        .arg(&doc)
        .assert()
        .success();
}

#[test]
fn multiple_providers_exit_two() {
    let fx = Fixture::new();
    let doc = fx.write(
        "cluster.yaml",
        "project_name: demo\namazon_web_services: {region: us-east-1}\ngoogle_cloud_platform: {region: us-central1}\n",
    );

    fx.cmd()
        .arg("validate")
        .arg(&doc)
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "Multiple providers set: [amazon_web_services, google_cloud_platform]",
        ));
}

#[test]
fn mac_key_exit_two_with_reason() {
    let fx = Fixture::new();
    let doc = fx.write(
        "cluster.yaml",
        "project_name: demo\namazon_web_services:\n  region: us-east-1\n  eks_kms_arn: arn:aws:kms:us-east-1:111122223333:key/mac-1\n",
    );
    let inventory = fx.write("inventory.yaml", INVENTORY);

    fx.cmd()
        .arg("validate")
        .arg(&doc)
        .arg("--inventory")
        .arg(&inventory)
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "does not have KeyUsage set to 'Encrypt and decrypt' data",
        ));
}

#[test]
fn cloud_without_inventory_exit_four() {
    let fx = Fixture::new();
    let doc = fx.write("cluster.yaml", AWS_DOCUMENT);

    fx.cmd()
        .arg("validate")
        .arg(&doc)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("No inventory fixture configured"));
}

#[test]
fn missing_document_exit_three() {
    let fx = Fixture::new();
    fx.cmd()
        .args(["validate", "does-not-exist.yaml"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Cannot read"));
}

#[test]
fn missing_config_file_exit_four() {
    let fx = Fixture::new();
    let doc = fx.write("cluster.yaml", "project_name: demo\n");
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("infrastage");
    cmd.current_dir(fx.dir.path())
        .args(["--config", "nowhere.toml", "validate"])
        .arg(&doc)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Configuration error"))
        .stderr(predicate::str::contains("infrastage config path"));
}

#[test]
fn inventory_flag_is_global() {
    let fx = Fixture::new();
    let doc = fx.write("cluster.yaml", AWS_DOCUMENT);
    let inventory = fx.write("inventory.yaml", INVENTORY);

    fx.cmd()
        .arg("--inventory")
        .arg(&inventory)
        .arg("validate")
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kubernetes_version\": \"1.30\""));
}

#[test]
fn usage_error_exit_two() {
    Fixture::new()
        .cmd()
        .args(["validate", "--format", "toml", "cluster.yaml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn local_needs_no_inventory_and_warns_on_extra_blocks() {
    let fx = Fixture::new();
    let doc = fx.write(
        "cluster.yaml",
        "project_name: demo\nprovider: local\nazure:\n  region: eastus\n",
    );

    fx.cmd()
        .arg("validate")
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("kubeconfig_filename"))
        .stderr(predicate::str::contains(
            "Provider is set to local, but configuration defined for other providers: [azure]",
        ));
}

#[test]
fn quiet_keeps_data_and_drops_status() {
    let fx = Fixture::new();
    let doc = fx.write("cluster.yaml", "project_name: demo\n");

    fx.cmd()
        .args(["-q", "validate"])
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("kubeconfig_filename"))
        .stderr(predicate::str::contains("configuration is valid").not());
}

#[test]
fn outputs_for_aws_use_nodegroup_selectors() {
    let fx = Fixture::new();
    let doc = fx.write("cluster.yaml", AWS_DOCUMENT);
    let creds = fx.write(
        "creds.json",
        r#"{"host": "https://eks.example", "cluster_ca_certificate": "CA", "token": "t"}"#,
    );

    let assert = fx
        .cmd()
        .arg("outputs")
        .arg(&doc)
        .arg("--credentials")
        .arg(&creds)
        .args(["--kubeconfig", "/tmp/demo-kubeconfig", "--nfs-endpoint", "fs-1.efs"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let record: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    for pool in ["general", "user", "worker"] {
        assert_eq!(
            record["node_selectors"][pool]["key"],
            "eks.amazonaws.com/nodegroup"
        );
    }
    assert_eq!(record["kubeconfig_filename"], "/tmp/demo-kubeconfig");
    assert_eq!(record["nfs_endpoint"], "fs-1.efs");
    assert_eq!(record["kubernetes_credentials"]["token"], "t");
}

#[test]
fn defaults_show_tainted_pools() {
    Fixture::new()
        .cmd()
        .args(["defaults", "gcp", "--format", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("e2-standard-8"))
        .stdout(predicate::str::contains("dedicated"));
}

#[test]
fn config_get_reads_environment() {
    Fixture::new()
        .cmd()
        .env("INFRASTAGE_CLUSTER__NAMESPACE", "prod")
        .args(["config", "get", "cluster.namespace"])
        .assert()
        .success()
        .stdout("prod\n");
}

#[test]
fn config_unknown_key_exit_four() {
    Fixture::new()
        .cmd()
        .args(["config", "get", "nope"])
        .assert()
        .code(4);
}

#[test]
fn completions_mention_binary() {
    Fixture::new()
        .cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("infrastage"));
}
