//! Integration tests for the GraphQL transport and API façade against a mock server.

use katunog_core::{
    ApiError, GraphqlClient, KatunogApi, Pagination, QueryRequest, ServiceConfig, Transport,
    instrument_rows,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::socket_guard::{socket_skip_return, start_mock_server_or_skip};

macro_rules! require_mock_server {
    () => {{
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return socket_skip_return();
        };
        mock_server
    }};
}

fn config_for(server: &MockServer) -> ServiceConfig {
    ServiceConfig::new(&server.uri()).unwrap()
}

/// Expects exactly one POST to `/api/` carrying `request` as its query.
async fn mount_query(server: &MockServer, request: &QueryRequest, response: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api/"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "query": request.to_graphql() })))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_each_request_kind_posts_its_document() {
    let server = require_mock_server!();
    let requests = [
        QueryRequest::list_instruments(Pagination::new(2, 3)),
        QueryRequest::ListLocations(Pagination::new(1, 10)),
        QueryRequest::ListDescriptions(Pagination::new(4, 1)),
        QueryRequest::ListMediaFiles(Pagination::new(1, 25)),
        QueryRequest::instrument_by_id("SW5zdHJ1bWVudDo0Mg=="),
        QueryRequest::ListRegions,
        QueryRequest::ListProvinces,
    ];
    for (index, request) in requests.iter().enumerate() {
        mount_query(&server, request, json!({ "data": { "index": index } })).await;
    }

    let api = KatunogApi::connect(&config_for(&server)).unwrap();
    for (index, request) in requests.iter().enumerate() {
        let response = api.fetch(request).await.unwrap();
        assert_eq!(response, json!({ "data": { "index": index } }), "{request:?}");
    }
}

#[tokio::test]
async fn test_default_listing_parameters() {
    let server = require_mock_server!();
    let request = QueryRequest::list_instruments(Pagination::default());
    let response = json!({
        "data": {
            "instruments": {
                "page": 1, "pages": 1, "hasNext": false, "hasPrev": false,
                "objects": [{
                    "localName": "Kulintang",
                    "ethnolinguistic": { "name": "Maguindanao" },
                    "city": { "name": "Cotabato City" },
                    "province": { "name": "Maguindanao" },
                    "englishName": "Gong chime",
                    "english": { "materialAndMake": "Bronze" },
                    "hornbostel": { "name": "Idiophone" }
                }]
            }
        }
    });
    mount_query(&server, &request, response).await;

    let api = KatunogApi::connect(&config_for(&server)).unwrap();
    let listing = api
        .instruments(Pagination::default(), katunog_core::DEFAULT_FILTER)
        .await
        .unwrap();

    let rows = instrument_rows(&listing);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].instrument, "Kulintang");
    assert_eq!(rows[0].location, "Cotabato City, Maguindanao");
    assert_eq!(rows[0].materials_and_make, "Bronze");
}

#[tokio::test]
async fn test_server_error_with_text_body_is_http_status() {
    let server = require_mock_server!();
    Mock::given(method("POST"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let api = KatunogApi::connect(&config_for(&server)).unwrap();
    let result = api.provinces().await;

    assert!(
        matches!(result, Err(ApiError::HttpStatus { status: 500, .. })),
        "got {result:?}"
    );
}

#[tokio::test]
async fn test_success_with_non_json_body_is_decode_error() {
    let server = require_mock_server!();
    Mock::given(method("POST"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = GraphqlClient::new(&config_for(&server)).unwrap();
    let result = client.execute("{ provinces { id, name } }").await;

    assert!(matches!(result, Err(ApiError::Decode { .. })), "got {result:?}");
}

#[tokio::test]
async fn test_graphql_error_body_is_returned_verbatim() {
    let server = require_mock_server!();
    let errors = json!({ "errors": [{ "message": "Cannot query field \"bogus\"" }] });
    Mock::given(method("POST"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(errors.clone()))
        .mount(&server)
        .await;

    let client = GraphqlClient::new(&config_for(&server)).unwrap();
    let response = client.execute("{ bogus }").await.unwrap();

    assert_eq!(response, errors);
}

#[tokio::test]
async fn test_endpoint_is_base_url_plus_api() {
    let server = require_mock_server!();
    let client = GraphqlClient::new(&config_for(&server)).unwrap();
    assert_eq!(client.endpoint(), format!("{}/api/", server.uri()));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let config = ServiceConfig::new(&format!("http://{address}")).unwrap();
    let api = KatunogApi::connect(&config).unwrap();
    let result = api.regions().await;

    assert!(matches!(result, Err(ApiError::Transport { .. })), "got {result:?}");
    assert!(result.unwrap_err().is_transport());
}
