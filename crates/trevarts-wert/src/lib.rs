//! Wert widget sessions for the TrevArts NFT drop.
//!
//! Prepares everything the Wert fiat-on-ramp widget needs to execute a
//! `UsdtBuyNft` smart-contract call on the buyer's behalf: the USDT amount,
//! the ABI-encoded call data, and the partner's ed25519 signature over the
//! whole request.
//!
//! # Collaborators
//!
//! - **Encoder** ([`CallEncoder`]) — turns the purchase into contract call data
//! - **Signer** ([`SessionSigner`]) — signs the request with the partner key
//! - **Sessions** ([`SessionService`]) — validates input and assembles the
//!   [`SessionDescriptor`] returned to the frontend
//!
//! # Quick example
//!
//! ```no_run
//! use wert::{Ed25519SessionSigner, PurchaseRequest, SessionService, SolCallEncoder, WidgetProfile};
//!
//! let signer = Ed25519SessionSigner::from_hex("0xYOUR_WERT_KEY").unwrap();
//! let service = SessionService::new(
//!     WidgetProfile::default(),
//!     "partner-id",
//!     "0x0000000000000000000000000000000000000001".parse().unwrap(),
//!     SolCallEncoder,
//!     signer,
//! );
//!
//! let session = service.create_session(&PurchaseRequest::new(3)).unwrap();
//! assert_eq!(session.fiat_amount, 3);
//! ```

pub mod constants;
pub mod encoder;
pub mod error;
pub mod session;
pub mod signer;

use alloy::sol;

// NFT sale contract entry point the widget calls after collecting payment.
sol! {
    #[derive(Debug, PartialEq, Eq)]
    function UsdtBuyNft(address to, uint256 nftQuantity);
}

// Re-exports
pub use constants::*;
pub use encoder::{CallEncoder, SolCallEncoder};
pub use error::WertError;
pub use session::{PurchaseRequest, SessionDescriptor, SessionService};
pub use signer::{Ed25519SessionSigner, SessionSigner, SigningRequest};
