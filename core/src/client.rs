//! Stateless HTTP request builder and response parser for the Postcoder API.
//!
//! # Design
//! `PostcoderClient` holds only the API key and the service root, and
//! carries no mutable state between calls. Each operation is split into a
//! `build_*` method that validates its arguments and produces an
//! `HttpRequest`, and a `parse_*` method that classifies an `HttpResponse`
//! and decodes its body. Executing the round-trip is someone else's job, so
//! this half stays deterministic and free of I/O.

use percent_encoding::{utf8_percent_encode, AsciiSet, PercentEncode, CONTROLS};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use url::{form_urlencoded, Position, Url};

use crate::config::{Config, DEFAULT_BASE_URL};
use crate::error::{PostcoderError, JSON_NOT_FOUND, JSON_SHAPE_MISMATCH, UNKNOWN_REASON};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{
    require_non_blank, AddressLookup, BankValidation, EmailValidation, MobileValidation,
};
use crate::types::{Address, BankValidationResult, EmailValidationResult, MobileValidationResult};

/// Characters escaped in a path segment of an http(s) URL.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%')
    .add(b'\\');

/// Segments made only of dots are escaped whole, or they would be read as
/// `.` / `..` and rewrite the path.
const DOT_SEGMENT: &AsciiSet = &SEGMENT.add(b'.');

/// Synchronous, stateless client for the Postcoder API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct PostcoderClient {
    api_key: String,
    base_url: Url,
}

impl PostcoderClient {
    /// Client for the hosted service. Fails if `api_key` is blank.
    pub fn new(api_key: &str) -> Result<Self, PostcoderError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, PostcoderError> {
        require_non_blank("api_key", api_key)?;
        let base_url = Url::parse(base_url)
            .map_err(|e| PostcoderError::local(format!("Invalid base_url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(PostcoderError::local(format!(
                "Invalid base_url: {base_url} cannot carry a path"
            )));
        }
        Ok(Self {
            api_key: api_key.to_string(),
            base_url,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, PostcoderError> {
        Self::with_base_url(&config.api_key, &config.base_url)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn build_lookup_address(
        &self,
        request: &AddressLookup,
    ) -> Result<HttpRequest, PostcoderError> {
        request.validate()?;
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("lines", "5")
            .append_pair("include", "posttown,postcode")
            .append_pair("exclude", "country")
            .append_pair("page", &request.page.to_string())
            .append_pair("identifier", &request.label)
            .finish();
        let url = self.endpoint(
            &["address", request.country_code.as_str(), request.query.as_str()],
            &query,
        );
        Ok(self.request("lookup_address", HttpMethod::Get, url, None))
    }

    pub fn build_validate_bank_account(
        &self,
        request: &BankValidation,
    ) -> Result<HttpRequest, PostcoderError> {
        request.validate()?;
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("identifier", &request.label)
            .finish();
        let url = self.endpoint(&["bank"], &query);
        let body = json!({
            "sortcode": request.sort_code,
            "accountnumber": request.account_number,
        });
        Ok(self.request(
            "validate_bank_account",
            HttpMethod::Post,
            url,
            Some(body.to_string()),
        ))
    }

    pub fn build_validate_email_address(
        &self,
        request: &EmailValidation,
    ) -> Result<HttpRequest, PostcoderError> {
        request.validate()?;
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("identifier", &request.label)
            .append_pair("timeout", &request.timeout.to_string())
            .finish();
        let url = self.endpoint(&["email", request.email_address.as_str()], &query);
        Ok(self.request("validate_email_address", HttpMethod::Get, url, None))
    }

    pub fn build_validate_mobile_phone_number(
        &self,
        request: &MobileValidation,
    ) -> Result<HttpRequest, PostcoderError> {
        request.validate()?;
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("identifier", &request.label);
        if let Some(country) = request.effective_country() {
            query.append_pair("country", country);
        }
        let url = self.endpoint(&["mobile", request.mobile_number.as_str()], &query.finish());
        Ok(self.request("validate_mobile_phone_number", HttpMethod::Get, url, None))
    }

    /// Every address in the response, in the order the service sent them.
    pub fn parse_lookup_address(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<Address>, PostcoderError> {
        decode(&response)
    }

    pub fn parse_validate_bank_account(
        &self,
        response: HttpResponse,
    ) -> Result<BankValidationResult, PostcoderError> {
        decode(&response)
    }

    pub fn parse_validate_email_address(
        &self,
        response: HttpResponse,
    ) -> Result<EmailValidationResult, PostcoderError> {
        decode(&response)
    }

    pub fn parse_validate_mobile_phone_number(
        &self,
        response: HttpResponse,
    ) -> Result<MobileValidationResult, PostcoderError> {
        decode(&response)
    }

    /// `{base}/{api_key}/{segments...}?{query}`, each segment path-escaped.
    ///
    /// Assembled as text: `Url` collapses `.`, `..` and `%2E` segments both
    /// on push and on parse.
    fn endpoint(&self, segments: &[&str], query: &str) -> String {
        let mut url = self.base_url[..Position::BeforePath].to_string();
        url.push_str(self.base_url.path().trim_end_matches('/'));
        for segment in std::iter::once(self.api_key.as_str()).chain(segments.iter().copied()) {
            url.push('/');
            url.extend(encode_segment(segment));
        }
        if !query.is_empty() {
            url.push('?');
            url.push_str(query);
        }
        url
    }

    fn request(
        &self,
        operation: &'static str,
        method: HttpMethod,
        url: String,
        body: Option<String>,
    ) -> HttpRequest {
        tracing::debug!(operation, %method, has_body = body.is_some(), "built postcoder request");
        HttpRequest {
            method,
            url,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body,
        }
    }
}

fn encode_segment(segment: &str) -> PercentEncode<'_> {
    let set = if !segment.is_empty() && segment.bytes().all(|b| b == b'.') {
        DOT_SEGMENT
    } else {
        SEGMENT
    };
    utf8_percent_encode(segment, set)
}

/// Classify the status, then decode the body into `T`.
fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, PostcoderError> {
    check_status(response)?;
    let value: Value = serde_json::from_str(&response.body).map_err(|source| {
        PostcoderError::Json {
            context: JSON_NOT_FOUND,
            source,
        }
    })?;
    serde_json::from_value(value).map_err(|source| PostcoderError::Json {
        context: JSON_SHAPE_MISMATCH,
        source,
    })
}

/// Map the classified status codes to their `PostcoderError` variant.
///
/// Any other status falls through to decoding, which usually fails with
/// `PostcoderError::Json` when the body is not a success payload.
fn check_status(response: &HttpResponse) -> Result<(), PostcoderError> {
    let url = response.url.clone();
    let err = match response.status {
        400 => PostcoderError::Parameter {
            message: reason(&response.body),
            url: Some(url),
        },
        403 => PostcoderError::Account {
            message: reason(&response.body),
            url,
        },
        404 => PostcoderError::EndpointNotFound { url },
        405 => PostcoderError::MethodNotAllowed { url },
        500 => PostcoderError::Server { url },
        status => {
            if !response.is_success() {
                tracing::warn!(status, "unexpected postcoder status, decoding body anyway");
            }
            return Ok(());
        }
    };
    tracing::warn!(status = response.status, kind = ?err.kind(), "postcoder request rejected");
    Err(err)
}

fn reason(body: &str) -> String {
    if body.is_empty() {
        UNKNOWN_REASON.to_string()
    } else {
        body.to_string()
    }
}
