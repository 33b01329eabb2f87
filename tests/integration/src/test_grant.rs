//! Access-grant tests: credentials, policy statements, idempotence.

#[cfg(test)]
mod tests {
    use crate::{
        bucket_policy, create_test_bucket, grant_test_access, test_parameters_with_parent,
        test_service,
    };
    use provstack_core::client::IdentityAdminClient;
    use provstack_model::error::ErrorKind;
    use provstack_model::ops::GrantAccessRequest;
    use provstack_model::types::PROVIDER_S3;

    #[tokio::test]
    async fn test_should_grant_access_and_issue_credentials() {
        let (backend, svc) = test_service();
        let bucket = create_test_bucket(&svc, "grant").await;

        let resp = grant_test_access(&svc, &bucket, "alice").await;
        assert_eq!(resp.account_id, "alice");

        let cred = resp.credentials.get(PROVIDER_S3).expect("s3 credentials");
        assert_eq!(cred.endpoint, "http://rgw.local:7480");
        assert_eq!(cred.region, "us-east-1");
        assert!(!cred.access_key_id.is_empty());
        assert!(!cred.access_secret_key.is_empty());

        let policy = bucket_policy(&backend, &bucket).await;
        assert_eq!(policy.statement.len(), 1);
        assert_eq!(policy.statement[0].sid, "alice");
    }

    #[tokio::test]
    async fn test_should_keep_single_statement_on_repeated_grant() {
        let (backend, svc) = test_service();
        let bucket = create_test_bucket(&svc, "regrant").await;

        let first = grant_test_access(&svc, &bucket, "alice").await;
        let second = grant_test_access(&svc, &bucket, "alice").await;
        assert_eq!(first, second, "retry returns the identical response");

        let policy = bucket_policy(&backend, &bucket).await;
        assert_eq!(policy.statement.len(), 1, "no duplicate for alice");
    }

    #[tokio::test]
    async fn test_should_accumulate_statements_for_distinct_accounts() {
        let (backend, svc) = test_service();
        let bucket = create_test_bucket(&svc, "multi").await;

        grant_test_access(&svc, &bucket, "alice").await;
        grant_test_access(&svc, &bucket, "bob").await;

        let policy = bucket_policy(&backend, &bucket).await;
        assert_eq!(policy.statement.len(), 2);
        assert!(policy.find_statement("alice").is_some());
        assert!(policy.find_statement("bob").is_some());
    }

    #[tokio::test]
    async fn test_should_grant_through_parent_identity() {
        let (backend, svc) = test_service();
        let bucket = create_test_bucket(&svc, "scoped").await;
        backend.create_user("alice").await.expect("parent user");

        let resp = svc
            .grant_access(GrantAccessRequest {
                bucket_id: bucket.clone(),
                account_name: "bob".to_owned(),
                parameters: test_parameters_with_parent("alice"),
            })
            .await
            .expect("scoped grant");

        assert_eq!(resp.account_id, "alice:bob");

        // The statement is keyed by the sub-identity but grants to the
        // parent account, where access control is evaluated.
        let policy = bucket_policy(&backend, &bucket).await;
        assert_eq!(policy.statement[0].sid, "alice:bob");
        assert_eq!(policy.statement[0].principal.aws, vec!["alice".to_owned()]);
    }

    #[tokio::test]
    async fn test_should_fail_grant_on_missing_bucket() {
        let (_, svc) = test_service();
        let err = svc
            .grant_access(GrantAccessRequest {
                bucket_id: "no-such-bucket".to_owned(),
                account_name: "alice".to_owned(),
                parameters: crate::test_parameters(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
