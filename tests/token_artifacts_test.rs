//! Integration tests for the OAuth artifact ordering invariants.
//!
//! The consent flow itself needs a human and a browser; these tests cover
//! the filesystem contract around it: the client-secret precondition and
//! overwrite-on-regenerate semantics.

use chrono::{Duration, Utc};
use prospectd::models::{CredentialKind, WorkspaceConfig};
use prospectd::oauth::{ClientSecrets, StoredToken, TokenStore};
use prospectd::SetupError;
use tempfile::TempDir;

fn oauth_paths(root: &std::path::Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let config = WorkspaceConfig::default();
    let server = config.oauth_server().unwrap();
    let CredentialKind::Oauth {
        client_secrets,
        token_file,
        ..
    } = &server.credentials
    else {
        panic!("expected oauth credentials");
    };
    let dir = server.dir_in(root);
    (dir.join(client_secrets), dir.join(token_file))
}

fn sample_token(access: &str) -> StoredToken {
    StoredToken {
        token: access.to_string(),
        refresh_token: Some("refresh-1".to_string()),
        token_uri: "https://oauth2.googleapis.com/token".to_string(),
        client_id: "client-1".to_string(),
        client_secret: "secret-1".to_string(),
        scopes: vec!["https://www.googleapis.com/auth/spreadsheets".to_string()],
        expiry: Some(Utc::now() + Duration::hours(1)),
    }
}

#[test]
fn test_token_generation_requires_client_secrets_first() {
    let temp_dir = TempDir::new().unwrap();
    let (secrets_path, token_path) = oauth_paths(temp_dir.path());

    // No client_secrets.json on disk: loading must fail with the dedicated
    // error before any flow state is touched.
    let err = ClientSecrets::load(&secrets_path).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SetupError>(),
        Some(SetupError::MissingClientSecret { .. })
    ));
    assert!(!token_path.exists());
}

#[test]
fn test_client_secrets_present_unblocks_the_flow() {
    let temp_dir = TempDir::new().unwrap();
    let (secrets_path, _) = oauth_paths(temp_dir.path());

    std::fs::create_dir_all(secrets_path.parent().unwrap()).unwrap();
    std::fs::write(
        &secrets_path,
        r#"{"installed": {"client_id": "id", "client_secret": "sec",
            "auth_uri": "https://accounts.google.com/o/oauth2/auth",
            "token_uri": "https://oauth2.googleapis.com/token"}}"#,
    )
    .unwrap();

    let secrets = ClientSecrets::load(&secrets_path).unwrap();
    assert_eq!(secrets.installed.client_id, "id");
}

#[test]
fn test_regenerated_token_replaces_the_artifact() {
    let temp_dir = TempDir::new().unwrap();
    let (_, token_path) = oauth_paths(temp_dir.path());
    let store = TokenStore::new(token_path.clone());

    store.save(&sample_token("access-1")).unwrap();
    store.save(&sample_token("access-2")).unwrap();

    // Overwritten in full, not appended: the file stays one JSON document
    // in the shape the spreadsheet server consumes.
    let content = std::fs::read_to_string(&token_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed["token"].as_str(), Some("access-2"));
    assert_eq!(parsed["client_id"].as_str(), Some("client-1"));
    assert!(parsed["scopes"].as_array().unwrap().len() == 1);
    assert!(!content.contains("access-1"));
}

#[test]
fn test_stored_token_round_trips_authorized_user_shape() {
    let temp_dir = TempDir::new().unwrap();
    let (_, token_path) = oauth_paths(temp_dir.path());
    let store = TokenStore::new(token_path);

    store.save(&sample_token("access")).unwrap();
    let loaded = store.load().unwrap();

    assert_eq!(loaded.token, "access");
    assert_eq!(loaded.refresh_token.as_deref(), Some("refresh-1"));
    assert!(loaded.token_uri.contains("googleapis.com"));
    assert!(loaded.is_valid());
}
