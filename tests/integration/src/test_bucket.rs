//! Bucket lifecycle tests.

#[cfg(test)]
mod tests {
    use crate::{create_test_bucket, test_parameters, test_service};
    use provstack_model::error::ErrorKind;
    use provstack_model::ops::{CreateBucketRequest, DeleteBucketRequest};

    #[tokio::test]
    async fn test_should_create_and_delete_bucket() {
        let (_, svc) = test_service();
        let bucket = create_test_bucket(&svc, "lifecycle").await;

        svc.delete_bucket(DeleteBucketRequest {
            bucket_id: bucket.clone(),
            parameters: test_parameters(),
        })
        .await
        .expect("delete_bucket");

        // Deleting again reports the bucket as gone.
        let err = svc
            .delete_bucket(DeleteBucketRequest {
                bucket_id: bucket,
                parameters: test_parameters(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_should_report_already_exists_on_duplicate_create() {
        let (_, svc) = test_service();
        let bucket = create_test_bucket(&svc, "dup").await;

        let err = svc
            .create_bucket(CreateBucketRequest {
                name: bucket,
                parameters: test_parameters(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert!(!err.is_retryable(), "AlreadyExists is terminal");
    }

    #[tokio::test]
    async fn test_should_refuse_deleting_non_empty_bucket() {
        let (backend, svc) = test_service();
        let bucket = create_test_bucket(&svc, "nonempty").await;
        backend.put_object(&bucket, "object-1");

        let err = svc
            .delete_bucket(DeleteBucketRequest {
                bucket_id: bucket,
                parameters: test_parameters(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FailedPrecondition);
    }
}
