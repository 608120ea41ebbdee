use serde::{Deserialize, Serialize};

/// RTP header extension capability.
///
/// Defines an RFC 8285 RTP header extension supported by the engine.
///
/// ## Specifications
///
/// * [W3C](https://w3c.github.io/webrtc-pc/#dom-rtcrtpcapabilities-headerextensions)
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTCRtpHeaderExtensionCapability {
    /// URI identifying the header extension
    pub uri: String,
}

impl RTCRtpHeaderExtensionCapability {
    pub fn new(uri: &str) -> Self {
        RTCRtpHeaderExtensionCapability {
            uri: uri.to_owned(),
        }
    }
}

/// Negotiated RTP header extension parameters.
///
/// ## Specifications
///
/// * [W3C](https://w3c.github.io/webrtc-pc/#dictionary-rtcrtpheaderextensionparameters-members)
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct RTCRtpHeaderExtensionParameters {
    /// URI identifying the header extension
    pub uri: String,
    /// Identifier for this extension (1-14 for one-byte, 1-255 for two-byte)
    pub id: u16,
}
