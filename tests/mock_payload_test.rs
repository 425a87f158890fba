use protomock::adapters::catalog::SchemaCatalog;
use protomock::adapters::mock_synth::MockSynthesizer;
use protomock::adapters::schema_loader::{load_schema_files, DescriptorFileSource};
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const USERS: &str = r#"
{
  "nested": {
    "acme": {
      "nested": {
        "users": {
          "nested": {
            "User": {
              "fields": {
                "id": { "type": "string", "id": 1 },
                "name": { "type": "string", "id": 2 },
                "age": { "type": "uint32", "id": 3 },
                "avatar": { "type": "bytes", "id": 4 },
                "tags": { "rule": "repeated", "type": "string", "id": 5 },
                "labels": { "keyType": "string", "type": "string", "id": 6 },
                "address": { "type": "Address", "id": 7 },
                "manager": { "type": "User", "id": 8 },
                "role": { "type": "acme.common.Role", "id": 9 },
                "billing": { "type": "acme.billing.Account", "id": 10 },
                "prefs": { "type": "Preferences", "id": 11 }
              },
              "nested": {
                "Preferences": {
                  "fields": { "darkMode": { "type": "bool", "id": 1 } }
                }
              }
            },
            "Address": {
              "fields": {
                "street": { "type": "string", "id": 1 },
                "zip": { "type": "sfixed32", "id": 2 }
              }
            }
          }
        },
        "common": {
          "nested": {
            "Role": { "values": { "ADMIN": 0, "MEMBER": 1 } }
          }
        }
      }
    }
  }
}
"#;

const BILLING: &str = r#"
nested:
  acme:
    nested:
      billing:
        nested:
          Account:
            fields:
              balance:
                type: double
                id: 1
"#;

async fn load(dir: &TempDir) -> (SchemaCatalog, PathBuf) {
    let users = dir.path().join("users.json");
    fs::write(&users, USERS).unwrap();
    let billing = dir.path().join("billing.yaml");
    fs::write(&billing, BILLING).unwrap();

    let mut catalog = SchemaCatalog::new();
    let report = load_schema_files(
        &mut catalog,
        &DescriptorFileSource,
        &[users.clone(), billing],
    )
    .await;
    assert!(report.is_success(), "load failed: {:?}", report.failed);
    (catalog, users)
}

#[tokio::test]
async fn test_user_payload() {
    let dir = TempDir::new().unwrap();
    let (catalog, users) = load(&dir).await;
    let users_path = users.to_string_lossy().into_owned();

    let record = MockSynthesizer::new(&catalog)
        .synthesize_selected(Some(&users_path), "acme.users", "User")
        .unwrap();
    let mut payload = serde_json::to_value(&record).unwrap();

    let id = payload["id"].as_str().unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&id).is_ok());
    payload["id"] = Value::Null;

    assert_eq!(
        payload,
        json!({
            "id": null,
            "name": "Hello",
            "age": 100,
            "avatar": "SGVsbG8=",
            "tags": ["Hello"],
            "labels": { "Hello": "Hello" },
            "address": { "street": "Hello", "zip": 1600 },
            "manager": {},
            "role": {},
            // Defined in billing.yaml, not in users.json
            "billing": 0,
            "prefs": { "darkMode": true }
        })
    );
}

#[tokio::test]
async fn test_field_order_survives_loading() {
    let dir = TempDir::new().unwrap();
    let (catalog, _) = load(&dir).await;

    let record = MockSynthesizer::new(&catalog)
        .synthesize_selected(None, "acme.users", "User")
        .unwrap();
    let names: Vec<&str> = record.field_names().collect();
    assert_eq!(
        names,
        vec![
            "id", "name", "age", "avatar", "tags", "labels", "address", "manager", "role",
            "billing", "prefs"
        ]
    );
}

#[tokio::test]
async fn test_message_from_second_file() {
    let dir = TempDir::new().unwrap();
    let (catalog, _) = load(&dir).await;

    let record = MockSynthesizer::new(&catalog)
        .synthesize_selected(None, "acme.billing", "Account")
        .unwrap();
    assert_eq!(record.to_json(), json!({ "balance": 1.4 }));
}

#[tokio::test]
async fn test_unknown_message() {
    let dir = TempDir::new().unwrap();
    let (catalog, _) = load(&dir).await;

    let err = MockSynthesizer::new(&catalog)
        .synthesize_selected(None, "acme.users", "Ghost")
        .unwrap_err();
    assert_eq!(err.to_string(), "Message not found: acme.users.Ghost");
}

#[tokio::test]
async fn test_clear_then_reload() {
    let dir = TempDir::new().unwrap();
    let (mut catalog, users) = load(&dir).await;
    assert_eq!(catalog.len(), 2);

    catalog.clear();
    assert!(catalog.is_empty());

    load_schema_files(&mut catalog, &DescriptorFileSource, &[users]).await;
    assert_eq!(catalog.len(), 1);
    assert!(catalog.entries().iter().any(|e| e.qualified_name() == "acme.users.User"));
}
