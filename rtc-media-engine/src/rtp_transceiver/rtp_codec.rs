use crate::configuration::UNSPECIFIED_STR;
use crate::rtp_transceiver::PayloadType;
use crate::rtp_transceiver::fmtp::{FMTP_APT, Fmtp};
use crate::rtp_transceiver::rtcp_feedback::RTCPFeedback;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use unicase::UniCase;

/// Codec kind identifying the media type.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RtpCodecKind {
    /// Unspecified or unknown codec type
    #[default]
    Unspecified = 0,

    /// Audio codec
    Audio = 1,

    /// Video codec
    Video = 2,
}

impl From<&str> for RtpCodecKind {
    fn from(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("audio") {
            RtpCodecKind::Audio
        } else if raw.eq_ignore_ascii_case("video") {
            RtpCodecKind::Video
        } else {
            RtpCodecKind::Unspecified
        }
    }
}

impl fmt::Display for RtpCodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RtpCodecKind::Audio => "audio",
            RtpCodecKind::Video => "video",
            RtpCodecKind::Unspecified => UNSPECIFIED_STR,
        };
        write!(f, "{s}")
    }
}

/// RTP codec capability providing information about supported codecs.
///
/// ## Specifications
///
/// * [W3C](https://w3c.github.io/webrtc-pc/#dictionary-rtcrtpcodeccapability-members)
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTCRtpCodec {
    /// MIME type of the codec (e.g., "video/VP8", "audio/opus").
    /// Letter case is preserved but ignored when matching.
    pub mime_type: String,
    /// Codec clock rate in Hz
    pub clock_rate: u32,
    /// Number of audio channels, 0 when not applicable
    #[serde(default)]
    pub channels: u16,
    /// Format-specific parameters as SDP fmtp line
    #[serde(default)]
    pub sdp_fmtp_line: String,
    /// RTCP feedback mechanisms supported by this codec
    #[serde(default)]
    pub rtcp_feedback: Vec<RTCPFeedback>,
}

impl RTCRtpCodec {
    /// Returns the subtype part of the mime type, e.g. `VP8` for `video/VP8`.
    pub fn subtype(&self) -> &str {
        self.mime_type
            .split_once('/')
            .map(|(_, subtype)| subtype)
            .unwrap_or(self.mime_type.as_str())
    }
}

/// RTPCodecParameters is a sequence containing the media codecs that an RtpSender
/// will choose from, as well as entries for RTX, RED and FEC mechanisms. This also
/// includes the PayloadType that has been negotiated
///
/// ## Specifications
///
/// * [W3C](https://w3c.github.io/webrtc-pc/#rtcrtpcodecparameters)
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTCRtpCodecParameters {
    #[serde(flatten)]
    pub rtp_codec: RTCRtpCodec,
    pub payload_type: PayloadType,
}

/// Classification of a codec, resolved once when the codec enters the
/// registry or is read from a remote media section.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum CodecClass {
    /// An ordinary media codec.
    Media,
    /// A retransmission codec repairing the codec with payload type `apt`.
    /// `None` if the association is missing or malformed; such a codec never
    /// negotiates.
    Retransmission { apt: Option<PayloadType> },
}

/// Retransmission codec subtype.
const RTX_SUBTYPE: &str = "rtx";

impl CodecClass {
    pub(crate) fn classify(codec: &RTCRtpCodec) -> Self {
        if UniCase::new(codec.subtype()) != UniCase::new(RTX_SUBTYPE) {
            return CodecClass::Media;
        }

        let fmtp = Fmtp::parse(&codec.sdp_fmtp_line);
        let apt = match fmtp.parameter(FMTP_APT) {
            Some(apt) => match apt.parse::<PayloadType>() {
                Ok(apt) => Some(apt),
                Err(err) => {
                    warn!(
                        "ignoring malformed apt '{}' of {}: {}",
                        apt, codec.mime_type, err
                    );
                    None
                }
            },
            None => None,
        };

        CodecClass::Retransmission { apt }
    }

    pub(crate) fn is_retransmission(&self) -> bool {
        matches!(self, CodecClass::Retransmission { .. })
    }
}

/// A codec together with its resolved classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ClassifiedCodec {
    pub(crate) parameters: RTCRtpCodecParameters,
    pub(crate) class: CodecClass,
}

impl From<RTCRtpCodecParameters> for ClassifiedCodec {
    fn from(parameters: RTCRtpCodecParameters) -> Self {
        let class = CodecClass::classify(&parameters.rtp_codec);
        ClassifiedCodec { parameters, class }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn codec(mime_type: &str, sdp_fmtp_line: &str) -> RTCRtpCodec {
        RTCRtpCodec {
            mime_type: mime_type.to_owned(),
            clock_rate: 90000,
            sdp_fmtp_line: sdp_fmtp_line.to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn test_rtp_codec_kind() {
        assert_eq!(RtpCodecKind::from("audio"), RtpCodecKind::Audio);
        assert_eq!(RtpCodecKind::from("VIDEO"), RtpCodecKind::Video);
        assert_eq!(RtpCodecKind::from("application"), RtpCodecKind::Unspecified);
        assert_eq!(RtpCodecKind::Video.to_string(), "video");
    }

    #[test]
    fn test_codec_class() {
        let tests = vec![
            (codec("video/VP8", ""), CodecClass::Media),
            (codec("video/VP9", "apt=96"), CodecClass::Media),
            (
                codec("video/rtx", "apt=96"),
                CodecClass::Retransmission { apt: Some(96) },
            ),
            (
                codec("video/RTX", "rtx-time=3000; apt=100"),
                CodecClass::Retransmission { apt: Some(100) },
            ),
            (
                codec("video/rtx", ""),
                CodecClass::Retransmission { apt: None },
            ),
            (
                codec("video/rtx", "apt=vp8"),
                CodecClass::Retransmission { apt: None },
            ),
        ];

        for (codec, expected) in tests {
            assert_eq!(CodecClass::classify(&codec), expected, "{codec:?}");
        }
    }

    #[test]
    fn test_codec_parameters_json() {
        let parameters: RTCRtpCodecParameters = serde_json::from_str(
            r#"{"mime_type":"audio/opus","clock_rate":48000,"channels":2,"payload_type":111}"#,
        )
        .expect("valid codec json");

        assert_eq!(parameters.payload_type, 111);
        assert_eq!(parameters.rtp_codec.channels, 2);
        assert!(parameters.rtp_codec.sdp_fmtp_line.is_empty());
        assert!(parameters.rtp_codec.rtcp_feedback.is_empty());
    }
}
