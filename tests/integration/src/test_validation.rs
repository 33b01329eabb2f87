//! Request validation tests: malformed requests never reach a backend.

#[cfg(test)]
mod tests {
    use crate::{test_parameters, test_service};
    use provstack_model::error::ErrorKind;
    use provstack_model::ops::{
        CreateBucketRequest, GrantAccessRequest, RawParameters, RevokeAccessRequest,
    };

    #[tokio::test]
    async fn test_should_reject_empty_bucket_name() {
        let (_, svc) = test_service();
        let err = svc
            .create_bucket(CreateBucketRequest {
                name: String::new(),
                parameters: test_parameters(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_should_reject_grant_with_empty_names() {
        let (_, svc) = test_service();

        let err = svc
            .grant_access(GrantAccessRequest {
                bucket_id: String::new(),
                account_name: "alice".to_owned(),
                parameters: test_parameters(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = svc
            .grant_access(GrantAccessRequest {
                bucket_id: "b1".to_owned(),
                account_name: String::new(),
                parameters: test_parameters(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_should_reject_incomplete_parameters() {
        let (_, svc) = test_service();
        let mut params = test_parameters();
        params.remove("accessSecretKey");

        let err = svc
            .create_bucket(CreateBucketRequest {
                name: "b1".to_owned(),
                parameters: params,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_should_reject_revoke_with_empty_account() {
        let (_, svc) = test_service();
        let err = svc
            .revoke_access(RevokeAccessRequest {
                bucket_id: "b1".to_owned(),
                account_id: String::new(),
                parameters: test_parameters(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_should_reject_parameterless_request_without_metadata() {
        let (_, svc) = test_service();
        let err = svc
            .create_bucket(CreateBucketRequest {
                name: "b1".to_owned(),
                parameters: RawParameters::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
