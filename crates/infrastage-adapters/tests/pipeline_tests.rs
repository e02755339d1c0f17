//! End-to-end runs: document file + inventory fixture through the core services.

use std::io::Write;
use std::path::PathBuf;

use infrastage_adapters::{
    ContextDefaults, InventoryFixture, cluster_context, load_document,
};
use infrastage_core::{
    application::{ApplicationError, ClusterService},
    domain::{CompiledVariables, DomainError, KmsKeyRejection, KubernetesCredentials, ProviderKind},
    error::InfraError,
};
use tempfile::TempDir;

const INVENTORY: &str = r#"
aws:
  regions:
    us-east-1:
      kubernetes_versions: ["1.28", "1.29", "1.30"]
      instances: [m5.xlarge, m5.2xlarge, g4dn.xlarge]
      zones: [us-east-1a, us-east-1b, us-east-1c]
      kms_keys:
        mrk-1:
          arn: arn:aws:kms:us-east-1:111122223333:key/mrk-1
          key_manager: CUSTOMER
          key_spec: SYMMETRIC_DEFAULT
          key_usage: ENCRYPT_DECRYPT
        mac-1:
          arn: arn:aws:kms:us-east-1:111122223333:key/mac-1
          key_manager: CUSTOMER
          key_spec: HMAC_256
          key_usage: GENERATE_VERIFY_MAC
azure:
  regions:
    eastus:
      kubernetes_versions: ["1.29.2", "1.30.0"]
      instances: [Standard_D4_v3, Standard_D8_v3]
  forbidden_tag_keys: [microsoft]
gcp:
  credentials_valid: false
"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn write(&self, name: &str, body: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    fn service(&self) -> ClusterService {
        let fixture = InventoryFixture::load(&self.write("inventory.yaml", INVENTORY)).unwrap();
        ClusterService::new(fixture.into_inventories())
    }
}

fn defaults() -> ContextDefaults {
    ContextDefaults {
        project_name: Some("demo".into()),
        ..Default::default()
    }
}

#[test]
fn aws_document_compiles_with_resolved_defaults() {
    let ws = Workspace::new();
    let path = ws.write(
        "cluster.yaml",
        r#"
project_name: my-proj
namespace: prod
provider: aws
storage:
  type: efs
amazon_web_services:
  region: us-east-1
  eks_kms_arn: arn:aws:kms:us-east-1:111122223333:key/mrk-1
"#,
    );

    let document = load_document(&path).unwrap();
    let context = cluster_context(&document, &defaults()).unwrap();
    let compiled = ws.service().validate_and_compile(&document, &context).unwrap();

    let CompiledVariables::Aws(vars) = compiled.variables else {
        panic!("expected aws variables");
    };
    assert_eq!(vars.name, "my-proj");
    assert_eq!(vars.environment, "prod");
    assert_eq!(vars.kubernetes_version, "1.30");
    assert_eq!(vars.availability_zones, vec!["us-east-1a", "us-east-1b"]);
    assert!(vars.efs_enabled);

    let names: Vec<_> = vars.node_groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["general", "user", "worker"]);
    assert!(vars.node_groups[0].node_taints.is_empty());
    assert_eq!(vars.node_groups[1].node_taints[0].key, "dedicated");
    assert_eq!(vars.node_groups[1].node_taints[0].effect, "NO_SCHEDULE");
}

#[test]
fn mac_key_is_rejected_with_specific_reason() {
    let ws = Workspace::new();
    let path = ws.write(
        "cluster.json",
        r#"{
            "project_name": "demo",
            "amazon_web_services": {
                "region": "us-east-1",
                "eks_kms_arn": "arn:aws:kms:us-east-1:111122223333:key/mac-1"
            }
        }"#,
    );
    let document = load_document(&path).unwrap();
    let context = cluster_context(&document, &defaults()).unwrap();

    let err = ws
        .service()
        .validate_and_compile(&document, &context)
        .unwrap_err();
    assert!(matches!(
        err,
        InfraError::Domain(DomainError::InvalidKmsKey {
            reason: KmsKeyRejection::MacUsage { .. },
            ..
        })
    ));
}

#[test]
fn undeclared_instance_is_unsupported() {
    let ws = Workspace::new();
    let path = ws.write(
        "cluster.yaml",
        r#"
provider: azure
azure:
  region: eastus
  storage_account_postfix: abc123
  node_groups:
    user:
      instance: Standard_NC6
      max_nodes: 2
"#,
    );
    let document = load_document(&path).unwrap();
    let context = cluster_context(&document, &defaults()).unwrap();

    let err = ws
        .service()
        .validate_and_compile(&document, &context)
        .unwrap_err();
    assert!(matches!(
        err,
        InfraError::Domain(DomainError::UnsupportedInstance { .. })
    ));
}

#[test]
fn azure_reserved_tag_is_rejected() {
    let ws = Workspace::new();
    let path = ws.write(
        "cluster.yaml",
        r#"
azure:
  region: eastus
  storage_account_postfix: abc123
  tags:
    microsoft: "yes"
"#,
    );
    let document = load_document(&path).unwrap();
    let context = cluster_context(&document, &defaults()).unwrap();

    let err = ws
        .service()
        .validate_and_compile(&document, &context)
        .unwrap_err();
    assert!(matches!(err, InfraError::Domain(DomainError::Tag { .. })));
}

#[test]
fn azure_compiles_resource_group_names() {
    let ws = Workspace::new();
    let path = ws.write(
        "cluster.yaml",
        r#"
project_name: my-proj
azure:
  region: eastus
  storage_account_postfix: abc123
  kubernetes_version: "1.29"
"#,
    );
    let document = load_document(&path).unwrap();
    let context = cluster_context(&document, &defaults()).unwrap();
    let compiled = ws.service().validate_and_compile(&document, &context).unwrap();

    let CompiledVariables::Azure(vars) = compiled.variables else {
        panic!("expected azure variables");
    };
    assert_eq!(vars.name, "myproj");
    assert_eq!(vars.kubernetes_version, "1.29");
    assert_eq!(vars.resource_group_name, "my-proj-dev");
    assert_eq!(vars.node_resource_group_name, "my-proj-dev-node-resource-group");
    assert_eq!(vars.node_groups["user"].node_taints, vec!["dedicated=nebari:NoSchedule"]);
}

#[test]
fn rejected_credentials_stop_gcp() {
    let ws = Workspace::new();
    let path = ws.write(
        "cluster.yaml",
        "google_cloud_platform:\n  region: us-central1\n  project: acme\n",
    );
    let document = load_document(&path).unwrap();
    let context = cluster_context(&document, &defaults()).unwrap();

    let err = ws
        .service()
        .validate_and_compile(&document, &context)
        .unwrap_err();
    assert!(matches!(
        err,
        InfraError::Domain(DomainError::Auth {
            provider: ProviderKind::Gcp,
            ..
        })
    ));
}

#[test]
fn missing_inventory_is_reported() {
    let ws = Workspace::new();
    let path = ws.write(
        "cluster.yaml",
        "amazon_web_services:\n  region: us-east-1\n",
    );
    let document = load_document(&path).unwrap();
    let context = cluster_context(&document, &defaults()).unwrap();

    let service = ClusterService::new(InventoryFixture::default().into_inventories());
    let err = service.validate_and_compile(&document, &context).unwrap_err();
    assert!(matches!(
        err,
        InfraError::Application(ApplicationError::InventoryNotConfigured {
            provider: ProviderKind::Aws,
            ..
        })
    ));
}

#[test]
fn local_outputs_need_no_inventory() {
    let ws = Workspace::new();
    let path = ws.write("cluster.yaml", "provider: local\n");
    let document = load_document(&path).unwrap();

    let service = ClusterService::new(InventoryFixture::default().into_inventories());
    let parsed = service.parse_structure(&document).unwrap();
    let record = service.compute_outputs(
        &parsed.config,
        KubernetesCredentials {
            host: "https://127.0.0.1:6443".into(),
            cluster_ca_certificate: "CA".into(),
            config_context: Some("kind-demo".into()),
            ..Default::default()
        },
        "/tmp/kubeconfig",
        None,
    );

    assert_eq!(record.kubeconfig_filename, "/tmp/kubeconfig");
    assert_eq!(record.node_selectors["general"].key, "kubernetes.io/os");
    assert_eq!(
        record.kubernetes_credentials.config_context.as_deref(),
        Some("kind-demo")
    );
}
