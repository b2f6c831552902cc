//! Synchronous client core for the Postcoder address lookup and data
//! validation service.
//!
//! # Overview
//! Four operations: address lookup, bank account validation, email
//! validation and mobile number validation. Each validates its arguments,
//! builds a single HTTP request, and turns the response into either a typed
//! result or a classified `PostcoderError`.
//!
//! # Design
//! - `PostcoderClient` is stateless: it holds only the API key and base URL.
//! - Each operation is split into `build_*` (produces an `HttpRequest`) and
//!   `parse_*` (consumes an `HttpResponse`), so the I/O boundary is explicit.
//! - `Postcoder` glues the two halves to a `Transport` for callers that just
//!   want a blocking call. `UreqTransport` is the default transport.
//!
//! ```no_run
//! use postcoder_core::{AddressLookup, Postcoder};
//!
//! # fn main() -> Result<(), postcoder_core::PostcoderError> {
//! let postcoder = Postcoder::from_env()?;
//! for address in postcoder.lookup_address(&AddressLookup::new("nr1 1ne", "uk", "docs"))? {
//!     let lines: Vec<&str> = address.lines().collect();
//!     println!("{}", lines.join(", "));
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod params;
pub mod postcoder;
pub mod transport;
pub mod types;

pub use client::PostcoderClient;
pub use config::Config;
pub use error::{ErrorKind, PostcoderError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::{AddressLookup, BankValidation, EmailValidation, MobileValidation};
pub use postcoder::Postcoder;
pub use transport::{Transport, TransportError};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{Address, BankValidationResult, EmailValidationResult, MobileValidationResult};
