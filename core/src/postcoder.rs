//! One call, one round-trip: build, execute, parse.

use crate::client::PostcoderClient;
use crate::config::Config;
use crate::error::PostcoderError;
use crate::params::{AddressLookup, BankValidation, EmailValidation, MobileValidation};
use crate::transport::Transport;
use crate::types::{Address, BankValidationResult, EmailValidationResult, MobileValidationResult};

#[cfg(feature = "ureq")]
use crate::transport::UreqTransport;

/// Postcoder client bound to a transport.
///
/// Each method validates its request, performs exactly one `execute` on the
/// transport and parses the answer. Invalid input fails before the
/// transport is touched. Holds no per-call state, so a shared reference can
/// be used from several threads when the transport allows it.
#[derive(Debug, Clone)]
pub struct Postcoder<T> {
    client: PostcoderClient,
    transport: T,
}

#[cfg(feature = "ureq")]
impl Postcoder<UreqTransport> {
    pub fn new(api_key: &str) -> Result<Self, PostcoderError> {
        Ok(Self::with_transport(
            PostcoderClient::new(api_key)?,
            UreqTransport::new(),
        ))
    }

    /// Configured from `POSTCODER_API_KEY` / `POSTCODER_BASE_URL`.
    pub fn from_env() -> Result<Self, PostcoderError> {
        let config = Config::from_env()?;
        Ok(Self::with_transport(
            PostcoderClient::from_config(&config)?,
            UreqTransport::new(),
        ))
    }
}

impl<T: Transport> Postcoder<T> {
    pub fn with_transport(client: PostcoderClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn from_config(config: &Config, transport: T) -> Result<Self, PostcoderError> {
        Ok(Self::with_transport(
            PostcoderClient::from_config(config)?,
            transport,
        ))
    }

    pub fn client(&self) -> &PostcoderClient {
        &self.client
    }

    pub fn lookup_address(&self, request: &AddressLookup) -> Result<Vec<Address>, PostcoderError> {
        let req = self.client.build_lookup_address(request)?;
        let response = self.transport.execute(&req)?;
        self.client.parse_lookup_address(response)
    }

    pub fn validate_bank_account(
        &self,
        request: &BankValidation,
    ) -> Result<BankValidationResult, PostcoderError> {
        let req = self.client.build_validate_bank_account(request)?;
        let response = self.transport.execute(&req)?;
        self.client.parse_validate_bank_account(response)
    }

    pub fn validate_email_address(
        &self,
        request: &EmailValidation,
    ) -> Result<EmailValidationResult, PostcoderError> {
        let req = self.client.build_validate_email_address(request)?;
        let response = self.transport.execute(&req)?;
        self.client.parse_validate_email_address(response)
    }

    pub fn validate_mobile_phone_number(
        &self,
        request: &MobileValidation,
    ) -> Result<MobileValidationResult, PostcoderError> {
        let req = self.client.build_validate_mobile_phone_number(request)?;
        let response = self.transport.execute(&req)?;
        self.client.parse_validate_mobile_phone_number(response)
    }
}
