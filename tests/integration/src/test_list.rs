//! Bucket listing scenarios.

#[cfg(test)]
mod tests {
    use s3lite_acl::Grantee;
    use s3lite_core::{S3ErrorCode, S3LiteConfig};
    use s3lite_list::ListingResult;

    use crate::{BASE_HOST, TestService, alice, anonymous, signed};

    const KEYS: &[&str] = &[
        "photos/2006/jan.jpg",
        "photos/2006/feb.jpg",
        "photos/2007/jan.jpg",
        "photos/2007/feb/a.jpg",
        "sample.txt",
        "videos/a b.mp4",
    ];

    fn populate(service: &mut TestService) {
        service
            .create_bucket(&signed(&alice(), "PUT", "/media"))
            .expect("create bucket");
        for key in KEYS {
            let uri = format!("/media/{}", key.replace(' ', "%20"));
            service
                .put_object(&signed(&alice(), "PUT", &uri), key.as_bytes())
                .unwrap_or_else(|e| panic!("put {key}: {e}"));
        }
    }

    fn service() -> TestService {
        let mut service = TestService::new();
        populate(&mut service);
        service
    }

    fn list(service: &TestService, query: &str) -> ListingResult {
        let uri = if query.is_empty() {
            "/media".to_owned()
        } else {
            format!("/media?{query}")
        };
        service
            .list_objects(&signed(&alice(), "GET", &uri))
            .unwrap_or_else(|e| panic!("list {query}: {e}"))
    }

    fn keys(result: &ListingResult) -> Vec<&str> {
        result.entries.iter().map(|e| e.key.as_str()).collect()
    }

    #[test]
    fn test_should_roll_up_common_prefixes() {
        let result = list(&service(), "prefix=photos/&delimiter=/");
        assert!(result.entries.is_empty());
        assert_eq!(result.common_prefixes, ["photos/2006/", "photos/2007/"]);
        assert!(!result.is_truncated);
    }

    #[test]
    fn test_should_list_all_keys_with_metadata() {
        let result = list(&service(), "");
        assert_eq!(result.entries.len(), KEYS.len());
        let sample = result
            .entries
            .iter()
            .find(|e| e.key == "sample.txt")
            .expect("sample.txt listed");
        assert_eq!(sample.size, "sample.txt".len() as u64);
        assert_eq!(sample.owner, alice().user);
        assert!(sample.etag.starts_with('"'));
    }

    #[test]
    fn test_should_decode_query_parameters() {
        let result = list(&service(), "prefix=videos%2Fa%20");
        assert_eq!(keys(&result), ["videos/a b.mp4"]);
    }

    #[test]
    fn test_should_page_through_bucket() {
        let service = service();
        let mut seen = Vec::new();
        let mut marker: Option<String> = None;
        loop {
            let query = match &marker {
                Some(m) => format!("max-keys=2&marker={}", m.replace(' ', "%20")),
                None => "max-keys=2".to_owned(),
            };
            let page = list(&service, &query);
            assert!(page.len() <= 2);
            seen.extend(page.entries.iter().map(|e| e.key.clone()));
            if !page.is_truncated {
                break;
            }
            marker = page.resume_marker().map(str::to_owned);
        }

        let mut expected: Vec<String> = KEYS.iter().map(|k| (*k).to_owned()).collect();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_should_page_delimiter_listing_with_next_marker() {
        let service = service();
        let first = list(&service, "delimiter=/&max-keys=1");
        assert_eq!(first.common_prefixes, ["photos/"]);
        assert!(first.is_truncated);
        let marker = first.next_marker.clone().expect("next marker");
        assert!(marker.starts_with("photos/"));

        let second = list(&service, &format!("delimiter=/&max-keys=1&marker={marker}"));
        assert!(second.common_prefixes.is_empty());
        assert_eq!(keys(&second), ["sample.txt"]);
        assert!(second.is_truncated);
    }

    #[test]
    fn test_should_return_empty_page_for_zero_max_keys() {
        let result = list(&service(), "max-keys=0");
        assert!(result.is_empty());
        assert!(!result.is_truncated);
    }

    #[test]
    fn test_should_reject_non_numeric_max_keys() {
        let err = service()
            .list_objects(&signed(&alice(), "GET", "/media?max-keys=lots"))
            .unwrap_err();
        assert_eq!(err.code, S3ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_should_apply_configured_ceiling() {
        let config = S3LiteConfig::builder()
            .base_host(BASE_HOST.to_owned())
            .max_keys_ceiling(3)
            .build();
        let mut service = TestService::with_config(&config);
        populate(&mut service);

        let result = list(&service, "max-keys=500");
        assert_eq!(result.max_keys, 3);
        assert_eq!(result.entries.len(), 3);
        assert!(result.is_truncated);
    }

    #[test]
    fn test_should_require_read_on_bucket() {
        let mut service = service();
        let err = service
            .list_objects(&anonymous("GET", "/media"))
            .unwrap_err();
        assert_eq!(err.code, S3ErrorCode::AccessDenied);

        let mut acp = s3lite_acl::AccessControlPolicy::for_owner(alice().user);
        acp.grant(Grantee::ALL_USERS, "READ").expect("grant");
        let doc = s3lite_acl::xml::encode(&acp).expect("encode");
        service
            .put_acl(&signed(&alice(), "PUT", "/media?acl"), doc.as_bytes())
            .expect("put acl");

        let result = service
            .list_objects(&anonymous("GET", "/media?prefix=photos/2006/"))
            .expect("anonymous list");
        assert_eq!(keys(&result), ["photos/2006/feb.jpg", "photos/2006/jan.jpg"]);
    }
}
