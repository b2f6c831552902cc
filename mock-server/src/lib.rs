use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// The key the mock accepts unless told otherwise.
pub const TEST_API_KEY: &str = "PCW45-12345-12345-1234X";

/// Addresses returned per page of a lookup.
pub const PAGE_SIZE: usize = 2;

#[derive(Clone)]
struct AppState {
    api_key: Arc<str>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub summaryline: String,
    pub addressline1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addressline2: Option<String>,
    pub posttown: String,
    pub postcode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub morevalues: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nextpage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totalresults: Option<String>,
}

#[derive(Deserialize)]
pub struct AddressQuery {
    pub lines: Option<u8>,
    #[serde(default)]
    pub page: usize,
    pub identifier: Option<String>,
}

#[derive(Deserialize)]
pub struct BankRequest {
    pub sortcode: Option<String>,
    pub accountnumber: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BankResult {
    pub valid: bool,
    pub sortcode: String,
    pub accountnumber: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chaps: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bacs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bankname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branchname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posttown: Option<String>,
}

#[derive(Deserialize)]
pub struct EmailQuery {
    pub identifier: Option<String>,
    pub timeout: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmailResult {
    pub valid: bool,
    pub state: String,
    pub score: String,
    pub processtime: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Deserialize)]
pub struct MobileQuery {
    pub identifier: Option<String>,
    pub country: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MobileResult {
    pub valid: bool,
    pub state: String,
    pub number: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub number_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub networkname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countrycode: Option<String>,
}

pub fn app() -> Router {
    app_with_key(TEST_API_KEY)
}

pub fn app_with_key(api_key: &str) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
    };
    Router::new()
        .route("/pcw/{key}/address/{country}/{query}", get(lookup_address))
        .route("/pcw/{key}/bank", post(validate_bank_account))
        .route("/pcw/{key}/email/{email}", get(validate_email_address))
        .route("/pcw/{key}/mobile/{number}", get(validate_mobile_phone_number))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn authorize(state: &AppState, key: &str) -> Result<(), Response> {
    if key == &*state.api_key {
        return Ok(());
    }
    tracing::info!("rejected request with unknown API key");
    Err((StatusCode::FORBIDDEN, "Invalid API key").into_response())
}

fn bad_request(reason: &'static str) -> Response {
    (StatusCode::BAD_REQUEST, reason).into_response()
}

fn digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn fixture_addresses(query: &str) -> Vec<Address> {
    let normalised: String = query
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();
    if normalised != "NR11NE" {
        return Vec::new();
    }
    let street = |line1: &str, line2: Option<&str>| {
        let summary = match line2 {
            Some(line2) => format!("{line1}, {line2}, Norwich, NR1 1NE"),
            None => format!("{line1}, Norwich, NR1 1NE"),
        };
        Address {
            summaryline: summary,
            addressline1: line1.to_string(),
            addressline2: line2.map(str::to_string),
            posttown: "Norwich".to_string(),
            postcode: "NR1 1NE".to_string(),
            ..Address::default()
        }
    };
    vec![
        street("1 Exchange Street", None),
        street("Flat 2", Some("3 Exchange Street")),
        street("5 Exchange Street", None),
    ]
}

async fn lookup_address(
    State(state): State<AppState>,
    Path((key, country, query)): Path<(String, String, String)>,
    Query(params): Query<AddressQuery>,
) -> Response {
    if let Err(rejection) = authorize(&state, &key) {
        return rejection;
    }
    if !matches!(country.to_ascii_lowercase().as_str(), "uk" | "gb") {
        return bad_request("Country code not supported");
    }
    tracing::debug!(identifier = ?params.identifier, lines = ?params.lines, "address lookup");

    let all = fixture_addresses(&query);
    let start = params.page.saturating_mul(PAGE_SIZE).min(all.len());
    let end = (start + PAGE_SIZE).min(all.len());
    let mut page = all[start..end].to_vec();
    if end < all.len() {
        if let Some(last) = page.last_mut() {
            last.morevalues = Some("true".to_string());
            last.nextpage = Some((params.page + 1).to_string());
            last.totalresults = Some(all.len().to_string());
        }
    }
    Json(page).into_response()
}

async fn validate_bank_account(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(input): Json<BankRequest>,
) -> Response {
    if let Err(rejection) = authorize(&state, &key) {
        return rejection;
    }
    let (Some(sortcode), Some(accountnumber)) = (input.sortcode, input.accountnumber) else {
        return bad_request("sortcode and accountnumber are required");
    };
    let sortcode = digits(&sortcode);
    let accountnumber = digits(&accountnumber);

    let mut result = BankResult {
        valid: false,
        sortcode: sortcode.clone(),
        accountnumber: accountnumber.clone(),
        ..BankResult::default()
    };
    if sortcode == "100000" && accountnumber.len() == 8 {
        result.valid = true;
        result.chaps = Some(true);
        result.bacs = Some(true);
        result.bankname = Some("Bank of England".to_string());
        result.branchname = Some("Head Office".to_string());
        result.posttown = Some("London".to_string());
    }
    Json(result).into_response()
}

async fn validate_email_address(
    State(state): State<AppState>,
    Path((key, email)): Path<(String, String)>,
    Query(params): Query<EmailQuery>,
) -> Response {
    if let Err(rejection) = authorize(&state, &key) {
        return rejection;
    }
    tracing::debug!(identifier = ?params.identifier, "email validation");

    let domain = match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Some(domain),
        _ => None,
    };
    let result = EmailResult {
        valid: domain.is_some(),
        state: if domain.is_some() { "Valid" } else { "Invalid" }.to_string(),
        score: if domain.is_some() { "100" } else { "0" }.to_string(),
        processtime: params.timeout.unwrap_or(1000).min(12).to_string(),
        warning: domain
            .filter(|d| d.eq_ignore_ascii_case("example.com"))
            .map(|_| "Reserved domain".to_string()),
    };
    Json(result).into_response()
}

async fn validate_mobile_phone_number(
    State(state): State<AppState>,
    Path((key, number)): Path<(String, String)>,
    Query(params): Query<MobileQuery>,
) -> Response {
    if let Err(rejection) = authorize(&state, &key) {
        return rejection;
    }
    tracing::debug!(identifier = ?params.identifier, country = ?params.country, "mobile validation");

    let raw = digits(&number);
    let international = if raw.starts_with('0') {
        format!("44{}", &raw[1..])
    } else {
        raw
    };
    let country_ok = params
        .country
        .as_deref()
        .map_or(true, |c| matches!(c.to_ascii_uppercase().as_str(), "GB" | "UK"));
    let valid = country_ok && international.starts_with("447") && international.len() == 12;

    let result = if valid {
        MobileResult {
            valid: true,
            state: "Live".to_string(),
            number: international,
            number_type: Some("Mobile".to_string()),
            networkname: Some("EE".to_string()),
            countrycode: Some("GB".to_string()),
        }
    } else {
        MobileResult {
            valid: false,
            state: "Invalid".to_string(),
            number,
            ..MobileResult::default()
        }
    };
    Json(result).into_response()
}
