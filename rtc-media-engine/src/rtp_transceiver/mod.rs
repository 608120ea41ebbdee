pub mod direction;
pub mod fmtp;
pub mod rtcp_feedback;
pub mod rtp_codec;
pub mod rtp_header_extension;
pub mod rtp_parameters;

pub use direction::RTCRtpTransceiverDirection;
pub use rtcp_feedback::{
    RTCPFeedback, TYPE_RTCP_FB_ACK, TYPE_RTCP_FB_CCM, TYPE_RTCP_FB_GOOG_REMB, TYPE_RTCP_FB_NACK,
    TYPE_RTCP_FB_TRANSPORT_CC,
};
pub use rtp_codec::{RTCRtpCodec, RTCRtpCodecParameters, RtpCodecKind};
pub use rtp_header_extension::{RTCRtpHeaderExtensionCapability, RTCRtpHeaderExtensionParameters};
pub use rtp_parameters::RTCRtpParameters;

/// PayloadType identifies the format of the RTP payload and determines
/// its interpretation by the application. Each codec in a RTP Session
/// will have a different payload_type
/// <https://tools.ietf.org/html/rfc3550#section-3>
pub type PayloadType = u8;
