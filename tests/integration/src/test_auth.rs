//! Authentication scenarios.

#[cfg(test)]
mod tests {
    use std::io::Write;

    use s3lite_auth::authorization_header;
    use s3lite_core::{S3ErrorCode, S3LiteConfig};

    use crate::{BASE_HOST, DATE, TestService, alice, anonymous, bob, request, signed};

    fn service_with_object() -> TestService {
        let mut service = TestService::new();
        service
            .create_bucket(&signed(&alice(), "PUT", "/docs"))
            .expect("create bucket");
        service
            .put_object(&signed(&alice(), "PUT", "/docs/readme.txt"), b"hello world")
            .expect("put object");
        service
    }

    #[test]
    fn test_should_serve_owner_with_signed_request() {
        let service = service_with_object();
        let resp = service
            .get_object(&signed(&alice(), "GET", "/docs/readme.txt"))
            .expect("get object");
        assert_eq!(resp.body, b"hello world");
    }

    #[test]
    fn test_should_accept_virtual_hosted_signed_request() {
        let service = service_with_object();
        let mut parts = request(
            "GET",
            "/readme.txt",
            &[("host", "docs.s3.example.com"), ("date", DATE)],
        );
        alice().sign(&mut parts);
        let resp = service.get_object(&parts).expect("get object");
        assert_eq!(resp.body, b"hello world");
    }

    #[test]
    fn test_should_reject_wrong_secret() {
        let service = service_with_object();
        let mut impostor = alice();
        impostor.secret = "not-alice-secret";
        let err = service
            .get_object(&signed(&impostor, "GET", "/docs/readme.txt"))
            .unwrap_err();
        assert_eq!(err.code, S3ErrorCode::SignatureDoesNotMatch);
        assert_eq!(err.status_code, http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_should_reject_unknown_access_key_without_echoing_it() {
        let service = service_with_object();
        let mut stranger = bob();
        stranger.access_key_id = "AKIASTRANGER";
        let err = service
            .get_object(&signed(&stranger, "GET", "/docs/readme.txt"))
            .unwrap_err();
        assert_eq!(err.code, S3ErrorCode::InvalidAccessKeyId);
        assert!(!err.message.contains("AKIASTRANGER"));
    }

    #[test]
    fn test_should_reject_malformed_authorization() {
        let service = service_with_object();
        let parts = request(
            "GET",
            "/docs/readme.txt",
            &[
                ("host", BASE_HOST),
                ("date", DATE),
                ("authorization", "AWS4-HMAC-SHA256 Credential=x"),
            ],
        );
        let err = service.get_object(&parts).unwrap_err();
        assert_eq!(err.code, S3ErrorCode::InvalidSecurity);
        assert_eq!(err.status_code, http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_should_reject_replayed_signature_on_other_key() {
        let mut service = service_with_object();
        service
            .put_object(&signed(&alice(), "PUT", "/docs/secret.txt"), b"classified")
            .expect("put object");

        let original = signed(&alice(), "GET", "/docs/readme.txt");
        let authorization = original.headers[http::header::AUTHORIZATION]
            .to_str()
            .unwrap()
            .to_owned();
        let replay = request(
            "GET",
            "/docs/secret.txt",
            &[
                ("host", BASE_HOST),
                ("date", DATE),
                ("authorization", authorization.as_str()),
            ],
        );
        let err = service.get_object(&replay).unwrap_err();
        assert_eq!(err.code, S3ErrorCode::SignatureDoesNotMatch);
    }

    #[test]
    fn test_should_treat_unsigned_request_as_anonymous() {
        let service = service_with_object();
        let err = service
            .get_object(&anonymous("GET", "/docs/readme.txt"))
            .unwrap_err();
        assert_eq!(err.code, S3ErrorCode::AccessDenied);
    }

    #[test]
    fn test_should_reject_stale_request_when_time_check_enabled() {
        let config = S3LiteConfig::builder()
            .base_host(BASE_HOST.to_owned())
            .check_request_time(true)
            .build();
        let mut service = TestService::with_config(&config);
        let err = service
            .create_bucket(&signed(&alice(), "PUT", "/docs"))
            .unwrap_err();
        assert_eq!(err.code, S3ErrorCode::RequestTimeTooSkewed);
        assert_eq!(err.status_code, http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_should_authenticate_users_loaded_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"AKIABOB,bob-secret,bob-id,bob\n")
            .expect("write user file");
        let config = S3LiteConfig::builder()
            .base_host(BASE_HOST.to_owned())
            .user_file(file.path().display().to_string())
            .build();

        let mut service = TestService::with_config(&config);
        service
            .create_bucket(&signed(&bob(), "PUT", "/bobs-bucket"))
            .expect("create bucket");
        let acl = service
            .get_acl(&signed(&bob(), "GET", "/bobs-bucket?acl"))
            .expect("get acl");
        assert!(acl.contains("<ID>bob-id</ID>"));

        let err = service
            .create_bucket(&signed(&alice(), "PUT", "/alices-bucket"))
            .unwrap_err();
        assert_eq!(err.code, S3ErrorCode::InvalidAccessKeyId);
    }

    #[test]
    fn test_should_accept_hand_built_authorization_header() {
        let service = service_with_object();
        let string_to_sign = "GET\n\n\nTue, 27 Mar 2007 19:36:42 +0000\n/docs/readme.txt";
        let signature = s3lite_auth::sign(alice().secret, string_to_sign).expect("sign");
        let header = authorization_header(alice().access_key_id, &signature);
        let parts = request(
            "GET",
            "/docs/readme.txt",
            &[("host", BASE_HOST), ("date", DATE), ("authorization", header.as_str())],
        );
        assert!(service.get_object(&parts).is_ok());
    }
}
