//! Test utilities for cardkit.
//!
//! This module provides testing infrastructure including:
//! - JSON fixtures for payment products and accounts on file
//! - An in-memory [`ClientTransport`](crate::client::ClientTransport) that records requests
//! - A test key pair that can open encrypted customer input
//! - Assertion helpers for validation results
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cardkit_lib::test_utils::{fixtures, MockTransport, TestKeyPair};
//!
//! let keys = TestKeyPair::generate("key-1");
//! let transport = MockTransport::new()
//!     .on_get("products/1", fixtures::visa_product_json())
//!     .on_get("crypto/publickey", serde_json::to_value(keys.public_key())?);
//! let session = Session::new(config, transport);
//! ```

mod assertions;
pub mod fixtures;
mod keys;
mod mock_transport;

pub use assertions::{assert_field_errors, assert_valid, assert_validation_failed};
pub use keys::TestKeyPair;
pub use mock_transport::{MockTransport, RecordedRequest};
