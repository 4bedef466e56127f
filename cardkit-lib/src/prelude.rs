//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits for
//! quick setup. Import everything with:
//!
//! ```rust,ignore
//! use cardkit_lib::prelude::*;
//! ```
//!
//! ## What's Included
//!
//! - Core types: `PaymentProductId`, `PaymentContext`
//! - Error types: `CardkitError`, `CardkitErrorCode`, `Result`
//! - Products and accounts: `PaymentProduct`, `BasicPaymentProducts`, `AccountOnFile`
//! - Input handling: `PaymentRequest`, `Mask`, `ValidationError`
//! - Client session: `Session`, `SessionConfig`, `ClientTransport`

// Core types
pub use crate::context::{AmountOfMoney, PaymentContext};
pub use crate::PaymentProductId;

// Error handling
pub use crate::errors::{CardkitError, CardkitErrorCode};
pub use crate::Result;

// Products and accounts on file
pub use crate::account_on_file::{AccountOnFile, AccountsOnFile, AttributeStatus};
pub use crate::product::{BasicPaymentProduct, BasicPaymentProducts, PaymentProduct, PaymentProductField};
pub use crate::reconcile::{reconcile, FieldAccess, ReconciledField};

// Input handling
pub use crate::formatter::{apply_mask, obfuscate, remove_mask, Mask};
pub use crate::request::PaymentRequest;
pub use crate::validation::{ValidationError, ValidationRule};

// Encryption and preparation
pub use crate::encryption::PublicKeyResponse;
pub use crate::meta::ClientMetaInfo;
pub use crate::prepare::{PaymentRequestPreparer, PreparedPaymentRequest};

// Client session
pub use crate::client::{ClientTransport, HttpTransport, Session};
pub use crate::config::SessionConfig;
pub use crate::iin::{IinDetailsResponse, IinStatus};
