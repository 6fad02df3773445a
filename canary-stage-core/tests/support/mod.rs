#![allow(dead_code)]

use canary_stage_core::contract::{CanarytokenDetails, CreatedToken};
use canary_stage_core::{FactoryAuthToken, ManifestRow};

pub fn row(file_name: &str, in_scope: Option<&str>) -> ManifestRow {
    ManifestRow {
        canary_domain: "acme".to_string(),
        flock_id: "flock:default".to_string(),
        factory_auth_token: FactoryAuthToken::new("factory-secret-0001"),
        bucket_name: "corp-backups".to_string(),
        file_path: "finance".to_string(),
        file_name: file_name.to_string(),
        note: "decoy".to_string(),
        aws_account_id: "123456789012".to_string(),
        aws_profile_name: "prod-writer".to_string(),
        token_type: "doc-msword".to_string(),
        in_scope: in_scope.map(str::to_string),
    }
}

pub fn success(token_id: &str) -> CreatedToken {
    CreatedToken {
        result: "success".to_string(),
        canarytoken: Some(CanarytokenDetails {
            canarytoken: token_id.to_string(),
        }),
        message: None,
    }
}

pub fn failure() -> CreatedToken {
    CreatedToken {
        result: "error".to_string(),
        canarytoken: None,
        message: Some("Invalid kind".to_string()),
    }
}
