//! Revoke tests: identity removal, idempotence, and the pinned
//! stale-statement behavior.

#[cfg(test)]
mod tests {
    use crate::{
        bucket_policy, create_test_bucket, grant_test_access, test_parameters,
        test_parameters_with_parent, test_service,
    };
    use provstack_core::client::IdentityAdminClient;
    use provstack_model::ops::{GrantAccessRequest, RevokeAccessRequest};

    #[tokio::test]
    async fn test_should_revoke_granted_identity() {
        let (backend, svc) = test_service();
        let bucket = create_test_bucket(&svc, "revoke").await;
        grant_test_access(&svc, &bucket, "alice").await;

        svc.revoke_access(RevokeAccessRequest {
            bucket_id: bucket,
            account_id: "alice".to_owned(),
            parameters: test_parameters(),
        })
        .await
        .expect("revoke_access");

        assert!(
            backend.get_user("alice").await.is_err(),
            "identity removed from backend"
        );
    }

    #[tokio::test]
    async fn test_should_succeed_revoking_already_removed_identity() {
        let (_, svc) = test_service();
        let bucket = create_test_bucket(&svc, "rerevoke").await;
        grant_test_access(&svc, &bucket, "alice").await;

        for _ in 0..2 {
            svc.revoke_access(RevokeAccessRequest {
                bucket_id: bucket.clone(),
                account_id: "alice".to_owned(),
                parameters: test_parameters(),
            })
            .await
            .expect("revoke is idempotent");
        }
    }

    #[tokio::test]
    async fn test_should_leave_policy_statement_in_place_after_revoke() {
        // Pinned behavior: revoke removes the identity only; the allow
        // statement stays in the bucket policy until cleaned up externally.
        let (backend, svc) = test_service();
        let bucket = create_test_bucket(&svc, "stale").await;
        grant_test_access(&svc, &bucket, "alice").await;

        svc.revoke_access(RevokeAccessRequest {
            bucket_id: bucket.clone(),
            account_id: "alice".to_owned(),
            parameters: test_parameters(),
        })
        .await
        .expect("revoke_access");

        let policy = bucket_policy(&backend, &bucket).await;
        assert!(policy.find_statement("alice").is_some());
    }

    #[tokio::test]
    async fn test_should_revoke_sub_identity_without_touching_parent() {
        let (backend, svc) = test_service();
        let bucket = create_test_bucket(&svc, "subrevoke").await;
        backend.create_user("alice").await.expect("parent user");

        svc.grant_access(GrantAccessRequest {
            bucket_id: bucket.clone(),
            account_name: "bob".to_owned(),
            parameters: test_parameters_with_parent("alice"),
        })
        .await
        .expect("scoped grant");

        svc.revoke_access(RevokeAccessRequest {
            bucket_id: bucket,
            account_id: "alice:bob".to_owned(),
            parameters: test_parameters(),
        })
        .await
        .expect("revoke sub-identity");

        let parent = backend.get_user("alice").await.expect("parent survives");
        assert!(parent.keys.iter().all(|k| k.user != "alice:bob"));
    }
}
