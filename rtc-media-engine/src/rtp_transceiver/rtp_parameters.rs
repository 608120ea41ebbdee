use crate::rtp_transceiver::rtp_codec::RTCRtpCodecParameters;
use crate::rtp_transceiver::rtp_header_extension::RTCRtpHeaderExtensionParameters;

/// RTP parameters containing codecs and header extensions for one media kind.
///
/// ## Specifications
///
/// * [W3C](https://w3c.github.io/webrtc-pc/#dictionary-rtcrtpparameters-members)
#[derive(Default, Debug, Clone)]
pub struct RTCRtpParameters {
    /// RTP header extensions, ordered by id
    pub header_extensions: Vec<RTCRtpHeaderExtensionParameters>,
    /// Codecs in preference order
    pub codecs: Vec<RTCRtpCodecParameters>,
}
