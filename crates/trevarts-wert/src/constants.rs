use alloy::primitives::{address, Address};

/// Treasury wallet that receives the purchased NFTs.
pub const TREASURY_ADDRESS: Address = address!("7866F7cb1aa889A808eE9d225b60fce3d4BE7F3e");

/// Price of one NFT in USD. USDT is pegged 1:1, so this is also the USDT amount.
pub const NFT_PRICE_USD: u64 = 1;

/// Origin of the Wert widget, echoed to the frontend.
pub const WERT_ORIGIN: &str = "https://widget.wert.io";

/// Wert network name for Ethereum mainnet.
pub const NETWORK: &str = "ethereum";

/// Commodity the widget collects from the buyer.
pub const COMMODITY: &str = "USDT";

/// Label Wert uses to look up the partner's public key.
pub const KEY_ID: &str = "key1";

/// Contract function invoked by the widget.
pub const BUY_FUNCTION: &str = "UsdtBuyNft";

/// Per-deployment widget settings. Decouples session building from the
/// compile-time constants so tests can price or route purchases differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetProfile {
    pub treasury: Address,
    pub unit_price_usd: u64,
    pub origin: String,
    pub network: String,
    pub commodity: String,
    pub key_id: String,
}

impl Default for WidgetProfile {
    /// Production USDT-on-Ethereum profile.
    fn default() -> Self {
        Self {
            treasury: TREASURY_ADDRESS,
            unit_price_usd: NFT_PRICE_USD,
            origin: WERT_ORIGIN.to_string(),
            network: NETWORK.to_string(),
            commodity: COMMODITY.to_string(),
            key_id: KEY_ID.to_string(),
        }
    }
}
