//! Session assembly: validate the purchase, price it, encode the contract
//! call, sign, and describe the result for the frontend.

use std::sync::Arc;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::WidgetProfile;
use crate::encoder::{call_data_hex, CallEncoder};
use crate::signer::{SessionSigner, SigningRequest};
use crate::WertError;

/// Body of `POST /api/wert/session`.
///
/// `quantity` is kept as raw JSON so a missing, null, fractional, or
/// negative value is reported as an invalid quantity instead of a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PurchaseRequest {
    #[serde(default)]
    pub quantity: Option<serde_json::Value>,
}

impl PurchaseRequest {
    pub fn new(quantity: u64) -> Self {
        Self {
            quantity: Some(serde_json::Value::from(quantity)),
        }
    }

    /// Parse a request body. Only a JSON object carries a quantity; arrays
    /// such as `[3]` and bare scalars are invalid.
    pub fn from_json(body: &[u8]) -> Result<Self, WertError> {
        let mut object: serde_json::Map<String, serde_json::Value> =
            serde_json::from_slice(body).map_err(|e| {
                WertError::InvalidQuantity(format!("body is not a JSON object: {e}"))
            })?;
        Ok(Self {
            quantity: object.remove("quantity"),
        })
    }

    /// The requested NFT count, a whole number of at least one.
    pub fn validated_quantity(&self) -> Result<u64, WertError> {
        let value = match &self.quantity {
            None | Some(serde_json::Value::Null) => {
                return Err(WertError::InvalidQuantity(
                    "quantity is required".to_string(),
                ))
            }
            Some(v) => v,
        };
        match value.as_u64() {
            Some(0) => Err(WertError::InvalidQuantity(
                "quantity must be at least 1".to_string(),
            )),
            Some(q) => Ok(q),
            None if value.is_number() => Err(WertError::InvalidQuantity(format!(
                "quantity must be a positive whole number, got {value}"
            ))),
            None => Err(WertError::InvalidQuantity(format!(
                "quantity must be a number, got {value}"
            ))),
        }
    }
}

/// Everything the frontend hands to the Wert widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    pub session_id: String,
    pub partner_id: String,
    pub origin: String,
    pub network: String,
    pub commodity: String,
    pub fiat_amount: u64,
    pub commodity_amount: u64,
    pub sc_address: String,
    pub sc_input_data: String,
    pub signature: String,
    pub pk_id: String,
}

/// Builds signed sessions. Holds only read-only configuration, so one
/// instance is shared by every request.
#[derive(Clone)]
pub struct SessionService {
    profile: WidgetProfile,
    partner_id: String,
    contract: Address,
    encoder: Arc<dyn CallEncoder>,
    signer: Arc<dyn SessionSigner>,
}

impl SessionService {
    pub fn new(
        profile: WidgetProfile,
        partner_id: impl Into<String>,
        contract: Address,
        encoder: impl CallEncoder + 'static,
        signer: impl SessionSigner + 'static,
    ) -> Self {
        Self {
            profile,
            partner_id: partner_id.into(),
            contract,
            encoder: Arc::new(encoder),
            signer: Arc::new(signer),
        }
    }

    pub fn profile(&self) -> &WidgetProfile {
        &self.profile
    }

    pub fn partner_id(&self) -> &str {
        &self.partner_id
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    /// USDT (and USD) owed for `quantity` NFTs.
    pub fn total_amount(&self, quantity: u64) -> Result<u64, WertError> {
        quantity
            .checked_mul(self.profile.unit_price_usd)
            .ok_or_else(|| {
                WertError::InvalidQuantity(format!("quantity {quantity} overflows the total"))
            })
    }

    /// Validate, price, encode, and sign a purchase.
    ///
    /// Nothing reaches the encoder or signer unless the quantity is valid.
    pub fn create_session(
        &self,
        request: &PurchaseRequest,
    ) -> Result<SessionDescriptor, WertError> {
        let quantity = request.validated_quantity()?;
        let total_amount = self.total_amount(quantity)?;

        let call_data = self
            .encoder
            .encode_purchase(self.profile.treasury, quantity)?;
        if call_data.is_empty() {
            return Err(WertError::Encoding(
                "encoder returned empty call data".to_string(),
            ));
        }
        let sc_input_data = call_data_hex(&call_data);

        let signing_request = SigningRequest {
            address: self.profile.treasury,
            commodity: self.profile.commodity.clone(),
            commodity_amount: total_amount,
            network: self.profile.network.clone(),
            sc_address: self.contract,
            sc_input_data,
        };

        let signature = self.signer.sign(&signing_request)?;
        if signature.is_empty() {
            return Err(WertError::Signing(
                "signer returned an empty signature".to_string(),
            ));
        }

        let session_id = Uuid::new_v4().to_string();
        tracing::info!(
            session_id = %session_id,
            quantity,
            amount = total_amount,
            commodity = %self.profile.commodity,
            "wert session signed"
        );

        Ok(SessionDescriptor {
            session_id,
            partner_id: self.partner_id.clone(),
            origin: self.profile.origin.clone(),
            network: signing_request.network,
            commodity: signing_request.commodity,
            fiat_amount: total_amount,
            commodity_amount: total_amount,
            sc_address: self.contract.to_checksum(None),
            sc_input_data: signing_request.sc_input_data,
            signature,
            pk_id: self.profile.key_id.clone(),
        })
    }
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("profile", &self.profile)
            .field("partner_id", &self.partner_id)
            .field("contract", &self.contract)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::SolCallEncoder;
    use crate::signer::Ed25519SessionSigner;
    use alloy::primitives::{address, Bytes};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const CONTRACT: Address = address!("0000000000000000000000000000000000000abc");

    fn signer() -> Ed25519SessionSigner {
        Ed25519SessionSigner::from_seed(&[7u8; 32])
    }

    fn service() -> SessionService {
        SessionService::new(
            WidgetProfile::default(),
            "01ABCDEF",
            CONTRACT,
            SolCallEncoder,
            signer(),
        )
    }

    fn request(value: serde_json::Value) -> PurchaseRequest {
        PurchaseRequest {
            quantity: Some(value),
        }
    }

    #[derive(Clone, Default)]
    struct CountingEncoder(Arc<AtomicUsize>);

    impl CallEncoder for CountingEncoder {
        fn encode_purchase(&self, to: Address, quantity: u64) -> Result<Bytes, WertError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            SolCallEncoder.encode_purchase(to, quantity)
        }
    }

    struct FailingSigner;

    impl SessionSigner for FailingSigner {
        fn sign(&self, _request: &SigningRequest) -> Result<String, WertError> {
            Err(WertError::Signing("hsm unavailable".to_string()))
        }
    }

    #[test]
    fn quantity_three_produces_full_descriptor() {
        let session = service().create_session(&PurchaseRequest::new(3)).unwrap();
        assert_eq!(session.fiat_amount, 3);
        assert_eq!(session.commodity_amount, 3);
        assert_eq!(session.network, "ethereum");
        assert_eq!(session.commodity, "USDT");
        assert_eq!(session.pk_id, "key1");
        assert_eq!(session.partner_id, "01ABCDEF");
        assert_eq!(session.origin, "https://widget.wert.io");
        assert_eq!(session.sc_address, CONTRACT.to_checksum(None));
        assert!(!session.session_id.is_empty());
        assert!(session.sc_input_data.starts_with("0xce013e76"));
        assert_eq!(session.signature.len(), 128);
    }

    #[test]
    fn amounts_scale_with_unit_price() {
        let profile = WidgetProfile {
            unit_price_usd: 25,
            ..WidgetProfile::default()
        };
        let service = SessionService::new(profile, "p", CONTRACT, SolCallEncoder, signer());
        let session = service.create_session(&PurchaseRequest::new(4)).unwrap();
        assert_eq!(session.fiat_amount, 100);
        assert_eq!(session.commodity_amount, 100);
    }

    #[test]
    fn session_ids_are_unique_but_payload_is_stable() {
        let service = service();
        let a = service.create_session(&PurchaseRequest::new(5)).unwrap();
        let b = service.create_session(&PurchaseRequest::new(5)).unwrap();
        assert_ne!(a.session_id, b.session_id);
        assert_eq!(a.fiat_amount, b.fiat_amount);
        assert_eq!(a.sc_input_data, b.sc_input_data);
        assert_eq!(a.signature, b.signature);
    }

    #[test]
    fn invalid_quantities_never_reach_the_encoder() {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = SessionService::new(
            WidgetProfile::default(),
            "p",
            CONTRACT,
            CountingEncoder(calls.clone()),
            signer(),
        );

        let cases = [
            PurchaseRequest::default(),
            request(serde_json::Value::Null),
            request(serde_json::json!(0)),
            request(serde_json::json!(-2)),
            request(serde_json::json!(1.5)),
            request(serde_json::json!("3")),
        ];
        for case in &cases {
            let err = service.create_session(case).unwrap_err();
            assert!(err.is_client_error(), "{case:?} should be a client error");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        service.create_session(&PurchaseRequest::new(1)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn whole_number_floats_are_not_integers() {
        // serde_json keeps 2.0 as a float; it is rejected like any fraction
        assert!(request(serde_json::json!(2.0)).validated_quantity().is_err());
    }

    #[test]
    fn overflowing_total_is_a_client_error() {
        let profile = WidgetProfile {
            unit_price_usd: 2,
            ..WidgetProfile::default()
        };
        let service = SessionService::new(profile, "p", CONTRACT, SolCallEncoder, signer());
        let err = service
            .create_session(&PurchaseRequest::new(u64::MAX))
            .unwrap_err();
        assert!(matches!(err, WertError::InvalidQuantity(_)));
    }

    #[test]
    fn signer_failure_surfaces_as_signing_error() {
        let service = SessionService::new(
            WidgetProfile::default(),
            "p",
            CONTRACT,
            SolCallEncoder,
            FailingSigner,
        );
        let err = service.create_session(&PurchaseRequest::new(2)).unwrap_err();
        assert!(matches!(err, WertError::Signing(_)));
        assert!(!err.is_client_error());
    }

    #[test]
    fn descriptor_serializes_with_snake_case_keys() {
        let session = service().create_session(&PurchaseRequest::new(3)).unwrap();
        let json = serde_json::to_value(&session).unwrap();
        for key in [
            "session_id",
            "partner_id",
            "origin",
            "network",
            "commodity",
            "fiat_amount",
            "commodity_amount",
            "sc_address",
            "sc_input_data",
            "signature",
            "pk_id",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["fiat_amount"], 3);
    }

    #[test]
    fn purchase_request_parses_from_json() {
        let req: PurchaseRequest = serde_json::from_str(r#"{"quantity": 7}"#).unwrap();
        assert_eq!(req.validated_quantity().unwrap(), 7);

        let empty: PurchaseRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.validated_quantity().is_err());
    }

    #[test]
    fn from_json_accepts_only_objects() {
        let req = PurchaseRequest::from_json(br#"{"quantity": 4, "extra": true}"#).unwrap();
        assert_eq!(req.validated_quantity().unwrap(), 4);

        let bodies: [&[u8]; 6] = [b"[3]", b"3", b"\"3\"", b"null", b"", b"{"];
        for body in bodies {
            let err = PurchaseRequest::from_json(body).unwrap_err();
            assert!(err.is_client_error(), "{:?}", String::from_utf8_lossy(body));
        }
    }

    #[test]
    fn quantity_beyond_u64_is_rejected() {
        let req = PurchaseRequest::from_json(br#"{"quantity": 18446744073709551616}"#).unwrap();
        assert!(matches!(
            req.validated_quantity(),
            Err(WertError::InvalidQuantity(_))
        ));
    }
}
