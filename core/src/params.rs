//! Operation requests: the arguments for one call, and their validation.
//!
//! # Design
//! Each operation gets a plain struct with a typed constructor for required
//! arguments and setters for optional ones. `validate` applies the rules in
//! a fixed order and stops at the first failure; `PostcoderClient` calls it
//! before building anything, so invalid input never reaches a transport.
//!
//! `from_params` accepts a loosely typed JSON object instead, for callers
//! whose input is not already typed. That is where absent and wrong-type
//! arguments become observable.

use serde_json::{Map, Value};

use crate::error::PostcoderError;

pub const DEFAULT_PAGE: i64 = 0;
pub const DEFAULT_EMAIL_TIMEOUT: i64 = 1000;

/// Search for addresses matching a free-text query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressLookup {
    pub query: String,
    pub country_code: String,
    pub label: String,
    pub page: i64,
}

impl AddressLookup {
    pub fn new(
        query: impl Into<String>,
        country_code: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            country_code: country_code.into(),
            label: label.into(),
            page: DEFAULT_PAGE,
        }
    }

    pub fn page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    pub fn validate(&self) -> Result<(), PostcoderError> {
        require_non_blank("query", &self.query)?;
        require_non_blank("country_code", &self.country_code)?;
        require_non_blank("label", &self.label)
    }

    pub fn from_params(params: &Value) -> Result<Self, PostcoderError> {
        let params = as_object(params)?;
        let request = Self {
            query: required_string(params, "query")?,
            country_code: required_string(params, "country_code")?,
            label: required_string(params, "label")?,
            page: optional_integer(params, "page", DEFAULT_PAGE)?,
        };
        request.validate()?;
        Ok(request)
    }
}

/// Check a UK bank account number against its sort code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankValidation {
    pub account_number: String,
    pub sort_code: String,
    pub label: String,
}

impl BankValidation {
    pub fn new(
        account_number: impl Into<String>,
        sort_code: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            account_number: account_number.into(),
            sort_code: sort_code.into(),
            label: label.into(),
        }
    }

    pub fn validate(&self) -> Result<(), PostcoderError> {
        require_non_blank("account_number", &self.account_number)?;
        require_non_blank("sort_code", &self.sort_code)?;
        require_non_blank("label", &self.label)
    }

    pub fn from_params(params: &Value) -> Result<Self, PostcoderError> {
        let params = as_object(params)?;
        let request = Self {
            account_number: required_string(params, "account_number")?,
            sort_code: required_string(params, "sort_code")?,
            label: required_string(params, "label")?,
        };
        request.validate()?;
        Ok(request)
    }
}

/// Check that an email address exists and accepts mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailValidation {
    pub email_address: String,
    pub label: String,
    /// Milliseconds the service may spend checking. Forwarded as-is, never
    /// enforced locally.
    pub timeout: i64,
}

impl EmailValidation {
    pub fn new(email_address: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            email_address: email_address.into(),
            label: label.into(),
            timeout: DEFAULT_EMAIL_TIMEOUT,
        }
    }

    pub fn timeout(mut self, timeout: i64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), PostcoderError> {
        require_non_blank("email_address", &self.email_address)?;
        require_non_blank("label", &self.label)
    }

    pub fn from_params(params: &Value) -> Result<Self, PostcoderError> {
        let params = as_object(params)?;
        let request = Self {
            email_address: required_string(params, "email_address")?,
            label: required_string(params, "label")?,
            timeout: optional_integer(params, "timeout", DEFAULT_EMAIL_TIMEOUT)?,
        };
        request.validate()?;
        Ok(request)
    }
}

/// Check that a mobile number is live and find its network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MobileValidation {
    pub mobile_number: String,
    pub label: String,
    /// `None` and `Some("")` both mean "let the service decide".
    pub country: Option<String>,
}

impl MobileValidation {
    pub fn new(mobile_number: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            mobile_number: mobile_number.into(),
            label: label.into(),
            country: None,
        }
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn validate(&self) -> Result<(), PostcoderError> {
        require_non_blank("mobile_phone_number", &self.mobile_number)?;
        require_non_blank("label", &self.label)?;
        if let Some(country) = &self.country {
            if !country.is_empty() && is_blank(country) {
                return Err(PostcoderError::local(
                    "Optional parameter contained whitespace only: country",
                ));
            }
        }
        Ok(())
    }

    /// The country to send, if any.
    pub(crate) fn effective_country(&self) -> Option<&str> {
        self.country.as_deref().filter(|c| !c.is_empty())
    }

    pub fn from_params(params: &Value) -> Result<Self, PostcoderError> {
        let params = as_object(params)?;
        let request = Self {
            mobile_number: required_string(params, "mobile_phone_number")?,
            label: required_string(params, "label")?,
            country: optional_string(params, "country")?,
        };
        request.validate()?;
        Ok(request)
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub(crate) fn require_non_blank(name: &str, value: &str) -> Result<(), PostcoderError> {
    if is_blank(value) {
        return Err(PostcoderError::missing(name));
    }
    Ok(())
}

fn as_object(params: &Value) -> Result<&Map<String, Value>, PostcoderError> {
    params
        .as_object()
        .ok_or_else(|| PostcoderError::local("Parameters must be a JSON object"))
}

fn required_string(params: &Map<String, Value>, name: &str) -> Result<String, PostcoderError> {
    match params.get(name) {
        None | Some(Value::Null) => Err(PostcoderError::missing(name)),
        Some(Value::String(s)) => {
            require_non_blank(name, s)?;
            Ok(s.clone())
        }
        Some(_) => Err(PostcoderError::not_a_string(name)),
    }
}

fn optional_string(
    params: &Map<String, Value>,
    name: &str,
) -> Result<Option<String>, PostcoderError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(PostcoderError::not_a_string(name)),
    }
}

// An explicit null is a wrong type, not a request for the default.
fn optional_integer(
    params: &Map<String, Value>,
    name: &str,
    default: i64,
) -> Result<i64, PostcoderError> {
    match params.get(name) {
        None => Ok(default),
        Some(value) => value
            .as_i64()
            .ok_or_else(|| PostcoderError::not_an_integer(name)),
    }
}
