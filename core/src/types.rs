//! Result shapes, one per operation.
//!
//! # Design
//! The service omits fields depending on match quality, so nearly every
//! field is an `Option`: absent stays `None` and is never replaced by `false`
//! or `0`. Only the email result has required fields. Decoding is derived;
//! a field of the wrong JSON type fails the whole decode.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// One address returned by an address lookup.
///
/// The last entry of a page may also carry the paging hints `morevalues`,
/// `nextpage` and `totalresults`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub summaryline: Option<String>,
    pub organisation: Option<String>,
    pub premise: Option<String>,
    pub street: Option<String>,
    pub addressline1: Option<String>,
    pub addressline2: Option<String>,
    pub addressline3: Option<String>,
    pub addressline4: Option<String>,
    pub addressline5: Option<String>,
    pub posttown: Option<String>,
    pub county: Option<String>,
    pub postcode: Option<String>,
    #[serde(default, deserialize_with = "string_or_scalar")]
    pub morevalues: Option<String>,
    #[serde(default, deserialize_with = "string_or_scalar")]
    pub nextpage: Option<String>,
    #[serde(default, deserialize_with = "string_or_scalar")]
    pub totalresults: Option<String>,
}

impl Address {
    /// Non-empty address lines in order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        [
            &self.addressline1,
            &self.addressline2,
            &self.addressline3,
            &self.addressline4,
            &self.addressline5,
        ]
        .into_iter()
        .filter_map(|line| line.as_deref())
        .filter(|line| !line.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankValidationResult {
    pub valid: Option<bool>,
    pub stateid: Option<i64>,
    pub sortcode: Option<String>,
    pub accountnumber: Option<String>,
    pub directdebits: Option<bool>,
    pub fasterpayments: Option<bool>,
    pub chaps: Option<bool>,
    pub bacs: Option<bool>,
    pub bankbic: Option<String>,
    pub branchbic: Option<String>,
    pub bankname: Option<String>,
    pub branchname: Option<String>,
    pub addressline1: Option<String>,
    pub addressline2: Option<String>,
    pub addressline3: Option<String>,
    pub addressline4: Option<String>,
    pub posttown: Option<String>,
    pub postcode: Option<String>,
    pub phone1: Option<String>,
    pub phone2: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailValidationResult {
    pub valid: bool,
    pub state: String,
    pub score: String,
    pub processtime: String,
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobileValidationResult {
    pub stateid: Option<i64>,
    pub state: Option<String>,
    pub on: Option<bool>,
    pub valid: Option<bool>,
    pub number: Option<String>,
    /// Line type reported by the network, e.g. "Mobile".
    #[serde(rename = "type")]
    pub number_type: Option<String>,
    pub networkname: Option<String>,
    pub networkcode: Option<String>,
    pub countrycode: Option<String>,
    pub countryname: Option<String>,
}

macro_rules! field_key {
    ($field:ident) => {
        stringify!($field)
    };
    ($field:ident, $key:literal) => {
        $key
    };
}

// Renders only the fields that are present, as `key=value, key=value`.
macro_rules! display_present_fields {
    ($ty:ty { $($field:ident $(= $key:literal)?),* $(,)? }) => {
        impl fmt::Display for $ty {
            #[allow(unused_assignments)]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut sep = "";
                $(
                    if let Some(value) = &self.$field {
                        write!(f, "{sep}{}={value}", field_key!($field $(, $key)?))?;
                        sep = ", ";
                    }
                )*
                Ok(())
            }
        }
    };
}

display_present_fields!(Address {
    summaryline,
    organisation,
    premise,
    street,
    addressline1,
    addressline2,
    addressline3,
    addressline4,
    addressline5,
    posttown,
    county,
    postcode,
    morevalues,
    nextpage,
    totalresults,
});

display_present_fields!(BankValidationResult {
    valid,
    stateid,
    sortcode,
    accountnumber,
    directdebits,
    fasterpayments,
    chaps,
    bacs,
    bankbic,
    branchbic,
    bankname,
    branchname,
    addressline1,
    addressline2,
    addressline3,
    addressline4,
    posttown,
    postcode,
    phone1,
    phone2,
});

display_present_fields!(MobileValidationResult {
    stateid,
    state,
    on,
    valid,
    number,
    number_type = "type",
    networkname,
    networkcode,
    countrycode,
    countryname,
});

impl fmt::Display for EmailValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(warning) = &self.warning {
            write!(f, "warning={warning}, ")?;
        }
        write!(
            f,
            "state={}, valid={}, score={}, processtime={}",
            self.state, self.valid, self.score, self.processtime
        )
    }
}

/// Paging hints arrive as strings from some endpoints and as scalars from
/// others.
fn string_or_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(StringOrScalarVisitor)
}

struct StringOrScalarVisitor;

impl<'de> Visitor<'de> for StringOrScalarVisitor {
    type Value = Option<String>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string, number, boolean or null")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(Some(value.to_owned()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(Some(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_fields_absent_stay_none() {
        let address: Address =
            serde_json::from_str(r#"{"summaryline":"1 High Street, Norwich","postcode":"NR1 1NE"}"#)
                .unwrap();
        assert_eq!(address.summaryline.as_deref(), Some("1 High Street, Norwich"));
        assert_eq!(address.postcode.as_deref(), Some("NR1 1NE"));
        assert!(address.addressline1.is_none());
        assert!(address.nextpage.is_none());
    }

    #[test]
    fn paging_hints_accept_strings_and_numbers() {
        let address: Address =
            serde_json::from_str(r#"{"morevalues":true,"nextpage":1,"totalresults":"42"}"#).unwrap();
        assert_eq!(address.morevalues.as_deref(), Some("true"));
        assert_eq!(address.nextpage.as_deref(), Some("1"));
        assert_eq!(address.totalresults.as_deref(), Some("42"));

        let address: Address = serde_json::from_str(r#"{"nextpage":null}"#).unwrap();
        assert!(address.nextpage.is_none());
    }

    #[test]
    fn paging_hints_reject_objects() {
        assert!(serde_json::from_str::<Address>(r#"{"nextpage":{"n":1}}"#).is_err());
    }

    #[test]
    fn address_lines_skip_missing_and_empty() {
        let address = Address {
            addressline1: Some("Foo Ltd".to_string()),
            addressline2: Some(String::new()),
            addressline3: Some("1 High Street".to_string()),
            ..Address::default()
        };
        assert_eq!(address.lines().collect::<Vec<_>>(), ["Foo Ltd", "1 High Street"]);
    }

    #[test]
    fn bank_result_keeps_false_distinct_from_absent() {
        let result: BankValidationResult =
            serde_json::from_str(r#"{"valid":false,"chaps":false}"#).unwrap();
        assert_eq!(result.valid, Some(false));
        assert_eq!(result.chaps, Some(false));
        assert_eq!(result.bacs, None);
        assert_eq!(result.stateid, None);
    }

    #[test]
    fn bank_result_rejects_wrong_types() {
        assert!(serde_json::from_str::<BankValidationResult>(r#"{"valid":"yes"}"#).is_err());
    }

    #[test]
    fn email_result_requires_core_fields() {
        let err = serde_json::from_str::<EmailValidationResult>(
            r#"{"valid":true,"state":"ok","score":"5"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("processtime"));
    }

    #[test]
    fn mobile_type_is_renamed() {
        let result: MobileValidationResult =
            serde_json::from_str(r#"{"number":"447500123456","type":"Mobile"}"#).unwrap();
        assert_eq!(result.number_type.as_deref(), Some("Mobile"));
        assert_eq!(result.to_string(), "number=447500123456, type=Mobile");
    }

    #[test]
    fn display_lists_present_fields_only() {
        let result = BankValidationResult {
            valid: Some(true),
            sortcode: Some("100000".to_string()),
            bankname: Some("Bank of England".to_string()),
            ..BankValidationResult::default()
        };
        assert_eq!(
            result.to_string(),
            "valid=true, sortcode=100000, bankname=Bank of England"
        );
        assert_eq!(BankValidationResult::default().to_string(), "");
    }

    #[test]
    fn email_display_leads_with_warning() {
        let result = EmailValidationResult {
            valid: true,
            state: "Valid".to_string(),
            score: "100".to_string(),
            processtime: "12".to_string(),
            warning: Some("Catch-all domain".to_string()),
        };
        assert_eq!(
            result.to_string(),
            "warning=Catch-all domain, state=Valid, valid=true, score=100, processtime=12"
        );
    }
}
