//! Integration tests for the API client using wiremock
//!
//! These tests drive the real client against mocked endpoints, covering
//! pagination, fetch response layouts, request bodies, error passthrough
//! and the OAuth2 token flow.

use scm_client::models::{
    Address, AddressCreate, AddressFilter, AddressType, AddressUpdate, Rulebase, SecurityRuleFilter,
    Tag,
};
use scm_client::{Credentials, FetchPolicy, ListQuery, Location, ScmClient, ScmError};
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{
    any, bearer_token, body_json, body_string_contains, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ADDRESSES: &str = "/config/objects/v1/addresses";

fn client(server: &MockServer) -> ScmClient {
    ScmClient::new(&server.uri(), Credentials::Bearer("test-token".to_string()))
        .expect("Client should build")
}

fn address_json(name: &str, folder: &str) -> Value {
    json!({
        "id": Uuid::new_v4(),
        "name": name,
        "ip_netmask": "10.0.0.0/24",
        "folder": folder
    })
}

fn addresses(count: usize, folder: &str) -> Vec<Value> {
    (0..count)
        .map(|i| address_json(&format!("addr-{}", i), folder))
        .collect()
}

/// Mount one page of `records` answering `offset`
async fn mount_page(server: &MockServer, offset: usize, limit: u32, records: &[Value]) {
    Mock::given(method("GET"))
        .and(path(ADDRESSES))
        .and(query_param("folder", "Texas"))
        .and(query_param("limit", limit.to_string()))
        .and(query_param("offset", offset.to_string()))
        .and(bearer_token("test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": records,
            "limit": limit,
            "offset": offset,
            "total": records.len()
        })))
        .expect(1)
        .mount(server)
        .await;
}

mod pagination_tests {
    use super::*;

    /// 5100 records at the default limit take three requests
    #[tokio::test]
    async fn test_list_aggregates_all_pages() {
        let server = MockServer::start().await;
        let records = addresses(5100, "Texas");

        mount_page(&server, 0, 2500, &records[..2500]).await;
        mount_page(&server, 2500, 2500, &records[2500..5000]).await;
        mount_page(&server, 5000, 2500, &records[5000..]).await;

        let result = client(&server)
            .addresses()
            .unwrap()
            .list(&ListQuery::folder("Texas"))
            .await
            .expect("List should succeed");

        assert_eq!(result.len(), 5100);
        assert_eq!(result[0].name, "addr-0");
        assert_eq!(result[5099].name, "addr-5099");
    }

    /// An exact multiple of the limit needs one extra, empty page
    #[tokio::test]
    async fn test_exact_multiple_requests_trailing_empty_page() {
        let server = MockServer::start().await;
        let records = addresses(4, "Texas");

        mount_page(&server, 0, 2, &records[..2]).await;
        mount_page(&server, 2, 2, &records[2..]).await;
        mount_page(&server, 4, 2, &[]).await;

        let result = client(&server)
            .with_max_limit(Some(2))
            .addresses()
            .unwrap()
            .list(&ListQuery::folder("Texas"))
            .await
            .expect("List should succeed");

        assert_eq!(result.len(), 4);
    }

    /// An empty container costs a single request
    #[tokio::test]
    async fn test_empty_container_single_request() {
        let server = MockServer::start().await;
        mount_page(&server, 0, 2500, &[]).await;

        let result = client(&server)
            .addresses()
            .unwrap()
            .list(&ListQuery::folder("Texas"))
            .await
            .unwrap();

        assert!(result.is_empty());
    }

    /// A list response without `data` is a shape error
    #[tokio::test]
    async fn test_missing_data_is_invalid_shape() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(ADDRESSES))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&server)
            .await;

        let err = client(&server)
            .addresses()
            .unwrap()
            .list(&ListQuery::folder("Texas"))
            .await
            .unwrap_err();

        assert!(matches!(err, ScmError::InvalidResponseShape(_)));
        assert_eq!(err.code(), "E003");
        assert_eq!(err.status(), 500);
    }
}

mod filter_tests {
    use super::*;

    async fn mount_mixed_containers(server: &MockServer) {
        let records = vec![
            address_json("local", "Texas"),
            address_json("inherited", "All"),
            address_json("shared", "Shared"),
        ];
        mount_page(server, 0, 2500, &records).await;
    }

    #[tokio::test]
    async fn test_exclude_folders_drops_inherited_records() {
        let server = MockServer::start().await;
        mount_mixed_containers(&server).await;

        let result = client(&server)
            .addresses()
            .unwrap()
            .list(&ListQuery::folder("Texas").exclude_folders(["All"]))
            .await
            .unwrap();

        let names: Vec<_> = result.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["local", "shared"]);
    }

    #[tokio::test]
    async fn test_exact_match_keeps_queried_container_only() {
        let server = MockServer::start().await;
        mount_mixed_containers(&server).await;

        let result = client(&server)
            .addresses()
            .unwrap()
            .list(&ListQuery::folder("Texas").exact_match())
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "local");
    }

    #[tokio::test]
    async fn test_dynamic_filters_applied_after_aggregation() {
        let server = MockServer::start().await;
        let mut tagged = address_json("tagged", "Texas");
        tagged["tag"] = json!(["web"]);
        let mut fqdn = address_json("fqdn", "Texas");
        fqdn["fqdn"] = json!("example.com");
        fqdn.as_object_mut().unwrap().remove("ip_netmask");
        Mock::given(method("GET"))
            .and(path(ADDRESSES))
            .and(query_param("folder", "Texas"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [tagged, fqdn]})))
            .expect(2)
            .mount(&server)
            .await;

        let svc = client(&server).addresses().unwrap();

        let by_tag = svc
            .list_with_filters(ListQuery::folder("Texas"), &json!({"tags": ["web"]}))
            .await
            .unwrap();
        assert_eq!(by_tag.len(), 1);
        assert_eq!(by_tag[0].name, "tagged");

        let by_type = svc
            .list(&ListQuery::folder("Texas").filter(AddressFilter {
                types: Some(vec![AddressType::Fqdn]),
                ..AddressFilter::default()
            }))
            .await
            .unwrap();
        assert_eq!(by_type.len(), 1);
        assert_eq!(by_type[0].name, "fqdn");
    }
}

mod fetch_tests {
    use super::*;

    async fn mount_fetch(server: &MockServer, name: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(ADDRESSES))
            .and(query_param("folder", "Texas"))
            .and(query_param("name", name))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_single_object_layout() {
        let server = MockServer::start().await;
        mount_fetch(&server, "web", address_json("web", "Texas")).await;

        let address = client(&server)
            .addresses()
            .unwrap()
            .fetch("web", &Location::folder("Texas"))
            .await
            .unwrap();
        assert_eq!(address.name, "web");
    }

    #[tokio::test]
    async fn test_fetch_wrapped_layout_takes_first() {
        let server = MockServer::start().await;
        let first = address_json("vlan.100", "Texas");
        let expected_id = first["id"].as_str().unwrap().to_string();
        mount_fetch(
            &server,
            "vlan.100",
            json!({"data": [first, address_json("vlan.100", "Texas")]}),
        )
        .await;

        let address = client(&server)
            .addresses()
            .unwrap()
            .fetch("vlan.100", &Location::folder("Texas"))
            .await
            .unwrap();
        assert_eq!(address.id.to_string(), expected_id);
    }

    #[tokio::test]
    async fn test_fetch_strict_policy_rejects_duplicates() {
        let server = MockServer::start().await;
        mount_fetch(
            &server,
            "dup",
            json!([address_json("dup", "Texas"), address_json("dup", "Texas")]),
        )
        .await;

        let err = client(&server)
            .with_fetch_policy(FetchPolicy::Strict)
            .addresses()
            .unwrap()
            .fetch("dup", &Location::folder("Texas"))
            .await
            .unwrap_err();

        assert!(matches!(err, ScmError::Ambiguous { count: 2, .. }));
        assert_eq!(err.code(), "E006");
    }

    #[tokio::test]
    async fn test_fetch_empty_data_is_not_found() {
        let server = MockServer::start().await;
        mount_fetch(&server, "ghost", json!({"data": []})).await;

        let err = client(&server)
            .addresses()
            .unwrap()
            .fetch("ghost", &Location::folder("Texas"))
            .await
            .unwrap_err();

        assert!(matches!(err, ScmError::NotFound { ref name, .. } if name == "ghost"));
        assert_eq!(err.status(), 404);
    }

    #[tokio::test]
    async fn test_fetch_item_without_id_is_invalid_shape() {
        let server = MockServer::start().await;
        mount_fetch(&server, "web", json!({"data": [{"name": "web"}]})).await;

        let err = client(&server)
            .addresses()
            .unwrap()
            .fetch("web", &Location::folder("Texas"))
            .await
            .unwrap_err();

        assert!(matches!(err, ScmError::InvalidResponseShape(_)));
    }
}

mod crud_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_posts_only_set_fields() {
        let server = MockServer::start().await;
        let created = address_json("web", "Texas");

        Mock::given(method("POST"))
            .and(path(ADDRESSES))
            .and(body_json(json!({
                "name": "web",
                "ip_netmask": "10.0.0.0/24",
                "folder": "Texas"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(&created))
            .expect(1)
            .mount(&server)
            .await;

        let create = AddressCreate {
            name: "web".to_string(),
            ip_netmask: Some("10.0.0.0/24".to_string()),
            location: Location::folder("Texas"),
            ..AddressCreate::default()
        };
        let address = client(&server).addresses().unwrap().create(&create).await.unwrap();

        assert_eq!(address.id.to_string(), created["id"].as_str().unwrap());
    }

    #[tokio::test]
    async fn test_update_sends_empty_body_for_untouched_record() {
        let server = MockServer::start().await;
        let record: Address = serde_json::from_value(address_json("web", "Texas")).unwrap();

        Mock::given(method("PUT"))
            .and(path(format!("{}/{}", ADDRESSES, record.id)))
            .and(body_json(json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(&record))
            .expect(1)
            .mount(&server)
            .await;

        let updated = client(&server)
            .addresses()
            .unwrap()
            .update(&record.to_update())
            .await
            .unwrap();
        assert_eq!(updated, record);
    }

    #[tokio::test]
    async fn test_update_sends_only_changed_fields() {
        let server = MockServer::start().await;
        let record: Address = serde_json::from_value(address_json("web", "Texas")).unwrap();

        Mock::given(method("PUT"))
            .and(path(format!("{}/{}", ADDRESSES, record.id)))
            .and(body_json(json!({"description": "front end"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(&record))
            .expect(1)
            .mount(&server)
            .await;

        let mut update = record.to_update();
        update.description = Some("front end".to_string());
        client(&server).addresses().unwrap().update(&update).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_and_delete_by_id() {
        let server = MockServer::start().await;
        let tag = json!({"id": Uuid::new_v4(), "name": "prod", "color": "Red", "folder": "Texas"});
        let id = tag["id"].as_str().unwrap().to_string();
        let item_path = format!("/config/objects/v1/tags/{}", id);

        Mock::given(method("GET"))
            .and(path(item_path.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(&tag))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(item_path.as_str()))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let svc = client(&server).tags().unwrap();
        let fetched: Tag = svc.get(id.parse().unwrap()).await.unwrap();
        assert_eq!(fetched.name, "prod");
        svc.delete(fetched.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_security_rules_carry_rulebase_position() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/config/security/v1/security-rules"))
            .and(query_param("folder", "Texas"))
            .and(query_param("position", "post"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "id": Uuid::new_v4(),
                    "name": "allow-web",
                    "action": "allow",
                    "from": ["trust"],
                    "to": ["untrust"],
                    "folder": "Texas"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let rules = client(&server)
            .security_rules()
            .unwrap()
            .with_rulebase(Rulebase::Post)
            .list(&ListQuery::<SecurityRuleFilter>::folder("Texas"))
            .await
            .unwrap();

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].from_zones, vec!["trust".to_string()]);
    }
}

mod error_tests {
    use super::*;

    /// Server error bodies are passed through with code and request id
    #[tokio::test]
    async fn test_api_error_passthrough() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(ADDRESSES))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "_errors": [{
                    "code": "E006",
                    "message": "Name Not Unique",
                    "details": {"errorType": "Object Already Exists"}
                }],
                "_request_id": "req-123"
            })))
            .mount(&server)
            .await;

        let create = AddressCreate {
            name: "web".to_string(),
            fqdn: Some("example.com".to_string()),
            location: Location::folder("Texas"),
            ..AddressCreate::default()
        };
        let err = client(&server).addresses().unwrap().create(&create).await.unwrap_err();

        match &err {
            ScmError::Api(api) => {
                assert_eq!(api.status, 409);
                assert_eq!(api.request_id.as_deref(), Some("req-123"));
                assert_eq!(api.details["errorType"], "Object Already Exists");
            },
            other => panic!("expected API error, got {:?}", other),
        }
        assert_eq!(err.code(), "E006");
        assert!(!err.is_local());
    }

    /// A non-JSON error body still surfaces the status
    #[tokio::test]
    async fn test_plain_text_error_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let err = client(&server)
            .tags()
            .unwrap()
            .get(Uuid::new_v4())
            .await
            .unwrap_err();

        assert_eq!(err.status(), 502);
        assert_eq!(err.code(), "HTTP_502");
    }

    /// Local validation failures never reach the server
    #[tokio::test]
    async fn test_validation_happens_before_network() {
        let server = MockServer::start().await;

        Mock::given(any())
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(0)
            .mount(&server)
            .await;

        let svc = client(&server).addresses().unwrap();

        let err = svc.list(&ListQuery::new(Location::default())).await.unwrap_err();
        assert!(matches!(err, ScmError::InvalidScope { .. }));

        let both = Location {
            folder: Some("Texas".to_string()),
            snippet: Some("baseline".to_string()),
            device: None,
        };
        let err = svc.list(&ListQuery::new(both)).await.unwrap_err();
        assert!(matches!(err, ScmError::InvalidScope { ref provided } if provided.len() == 2));

        let err = svc.list(&ListQuery::folder("")).await.unwrap_err();
        assert!(matches!(err, ScmError::MissingParameter { field: "folder" }));

        let err = svc
            .list_with_filters(ListQuery::folder("Texas"), &json!({"types": "fqdn"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ScmError::InvalidFilterType { .. }));

        let err = svc.fetch("", &Location::folder("Texas")).await.unwrap_err();
        assert!(matches!(err, ScmError::MissingParameter { field: "name" }));

        let err = svc
            .create(&AddressCreate {
                name: "web".to_string(),
                location: Location::folder("Texas"),
                ..AddressCreate::default()
            })
            .await
            .unwrap_err();
        assert!(err.is_local());
    }

    /// An update body that never carried an id is rejected, not sent to `<endpoint>/<nil>`
    #[tokio::test]
    async fn test_update_without_id_not_sent() {
        let server = MockServer::start().await;

        Mock::given(any())
            .respond_with(ResponseTemplate::new(200).set_body_json(address_json("web", "Texas")))
            .expect(0)
            .mount(&server)
            .await;

        let update: AddressUpdate = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        let err = client(&server).addresses().unwrap().update(&update).await.unwrap_err();

        assert!(matches!(err, ScmError::MissingParameter { field: "id" }));
        assert!(err.is_local());
    }
}

mod auth_tests {
    use super::*;

    fn oauth_client(server: &MockServer) -> ScmClient {
        ScmClient::new(
            &server.uri(),
            Credentials::ClientCredentials {
                client_id: "svc@1234.iam".to_string(),
                client_secret: "secret".to_string(),
                tsg_id: "1234".to_string(),
                token_url: format!("{}/oauth2/access_token", server.uri()),
            },
        )
        .unwrap()
    }

    /// The token is requested once and reused for later calls
    #[tokio::test]
    async fn test_client_credentials_token_cached() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth2/access_token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("scope=tsg_id%3A1234"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "issued-token",
                "token_type": "Bearer",
                "expires_in": 899
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(ADDRESSES))
            .and(bearer_token("issued-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(2)
            .mount(&server)
            .await;

        let svc = oauth_client(&server).addresses().unwrap();
        svc.list(&ListQuery::folder("Texas")).await.unwrap();
        svc.list(&ListQuery::folder("Texas")).await.unwrap();
    }

    #[tokio::test]
    async fn test_token_endpoint_rejection_is_auth_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth2/access_token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "invalid_client"})))
            .mount(&server)
            .await;

        let err = oauth_client(&server).get_token().await.unwrap_err();
        assert!(matches!(err, ScmError::Auth(_)));
        assert_eq!(err.code(), "E016");
        assert_eq!(err.status(), 401);
    }
}
