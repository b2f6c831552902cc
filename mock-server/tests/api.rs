use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Address, BankResult, EmailResult, MobileResult, TEST_API_KEY};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn path(rest: &str) -> String {
    format!("/pcw/{TEST_API_KEY}/{rest}")
}

// --- auth ---

#[tokio::test]
async fn unknown_key_returns_403() {
    let resp = app()
        .oneshot(get("/pcw/wrong-key/email/test@example.com"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(&body_bytes(resp).await[..], b"Invalid API key");
}

#[tokio::test]
async fn unknown_endpoint_returns_404() {
    let resp = app().oneshot(get(&path("postcode/nr1"))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- address ---

#[tokio::test]
async fn lookup_address_first_page_carries_paging_hints() {
    let resp = app()
        .oneshot(get(&path(
            "address/uk/nr1%201ne?lines=5&include=posttown%2Cpostcode&exclude=country&page=0&identifier=t",
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let addresses: Vec<Address> = body_json(resp).await;
    assert_eq!(addresses.len(), 2);
    assert!(addresses[0].nextpage.is_none());
    assert_eq!(addresses[1].morevalues.as_deref(), Some("true"));
    assert_eq!(addresses[1].nextpage.as_deref(), Some("1"));
    assert_eq!(addresses[1].totalresults.as_deref(), Some("3"));
}

#[tokio::test]
async fn lookup_address_last_page_has_no_hints() {
    let resp = app()
        .oneshot(get(&path("address/uk/NR11NE?page=1")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let addresses: Vec<Address> = body_json(resp).await;
    assert_eq!(addresses.len(), 1);
    assert!(addresses[0].nextpage.is_none());
}

#[tokio::test]
async fn lookup_address_unknown_postcode_is_empty() {
    let resp = app()
        .oneshot(get(&path("address/uk/sw1a%201aa")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let addresses: Vec<Address> = body_json(resp).await;
    assert!(addresses.is_empty());
}

#[tokio::test]
async fn lookup_address_bad_country_returns_400() {
    let resp = app()
        .oneshot(get(&path("address/zz/nr1%201ne")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(&body_bytes(resp).await[..], b"Country code not supported");
}

// --- bank ---

#[tokio::test]
async fn validate_bank_account_known_sort_code() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            &path("bank?identifier=t"),
            r#"{"sortcode":"10-00-00","accountnumber":"31510604"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let result: BankResult = body_json(resp).await;
    assert!(result.valid);
    assert_eq!(result.sortcode, "100000");
    assert_eq!(result.bankname.as_deref(), Some("Bank of England"));
}

#[tokio::test]
async fn validate_bank_account_missing_field_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", &path("bank"), r#"{"sortcode":"100000"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn validate_bank_account_with_get_returns_405() {
    let resp = app().oneshot(get(&path("bank"))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// --- email ---

#[tokio::test]
async fn validate_email_address_reserved_domain_warns() {
    let resp = app()
        .oneshot(get(&path("email/test@example.com?identifier=t&timeout=1000")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let result: EmailResult = body_json(resp).await;
    assert!(result.valid);
    assert_eq!(result.warning.as_deref(), Some("Reserved domain"));
}

#[tokio::test]
async fn validate_email_address_without_domain_is_invalid() {
    let resp = app()
        .oneshot(get(&path("email/not-an-email")))
        .await
        .unwrap();

    let result: EmailResult = body_json(resp).await;
    assert!(!result.valid);
    assert_eq!(result.state, "Invalid");
}

#[tokio::test]
async fn validate_email_address_non_numeric_timeout_returns_400() {
    let resp = app()
        .oneshot(get(&path("email/test@example.com?timeout=soon")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- mobile ---

#[tokio::test]
async fn validate_mobile_phone_number_uk_number() {
    let resp = app()
        .oneshot(get(&path("mobile/07500123456?identifier=t")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let result: MobileResult = body_json(resp).await;
    assert!(result.valid);
    assert_eq!(result.number, "447500123456");
    assert_eq!(result.number_type.as_deref(), Some("Mobile"));
}

#[tokio::test]
async fn validate_mobile_phone_number_other_country_is_invalid() {
    let resp = app()
        .oneshot(get(&path("mobile/07500123456?identifier=t&country=FR")))
        .await
        .unwrap();

    let result: MobileResult = body_json(resp).await;
    assert!(!result.valid);
    assert_eq!(result.number, "07500123456");
}
