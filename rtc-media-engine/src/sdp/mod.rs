//! Parsed view of a remote session description.
//!
//! Parsing the session-description text is left to the signaling layer; the
//! engine consumes the already parsed media sections described here. A media
//! section is built up the same way its attribute lines read:
//!
//! ```
//! use rtc_media_engine::sdp::RemoteMediaDescription;
//!
//! // m=video 9 UDP/TLS/RTP/SAVPF 96 97
//! // a=rtpmap:96 VP8/90000
//! // a=rtpmap:97 rtx/90000
//! // a=fmtp:97 apt=96
//! // a=rtcp-fb:96 nack pli
//! // a=extmap:4 urn:ietf:params:rtp-hdrext:sdes:mid
//! let video = RemoteMediaDescription::new("video")
//!     .with_codec(96, "VP8", 90000, 0)
//!     .with_codec(97, "rtx", 90000, 0)
//!     .with_fmtp(97, "apt=96")
//!     .with_rtcp_feedback(96, "nack", "pli")
//!     .with_extmap(4, "urn:ietf:params:rtp-hdrext:sdes:mid", None);
//! ```

use crate::rtp_transceiver::rtp_codec::ClassifiedCodec;
use crate::rtp_transceiver::{
    PayloadType, RTCPFeedback, RTCRtpCodec, RTCRtpCodecParameters, RTCRtpTransceiverDirection,
    RtpCodecKind,
};
use log::trace;
use serde::{Deserialize, Serialize};

/// One payload type of a remote media section, assembled from its `a=rtpmap`,
/// `a=fmtp` and `a=rtcp-fb` lines.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCodec {
    pub payload_type: PayloadType,
    /// Encoding name as written by the remote, e.g. `OPUS` or `H264`.
    pub encoding_name: String,
    pub clock_rate: u32,
    #[serde(default)]
    pub channels: u16,
    #[serde(default)]
    pub sdp_fmtp_line: String,
    #[serde(default)]
    pub rtcp_feedback: Vec<RTCPFeedback>,
}

/// An `a=extmap` line.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteExtmap {
    pub id: u16,
    pub uri: String,
    /// Optional `/direction` suffix of the line.
    #[serde(default)]
    pub direction: Option<RTCRtpTransceiverDirection>,
}

/// One `m=` section of a remote session description.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMediaDescription {
    /// Media type of the `m=` line, e.g. `audio`, `video` or `application`.
    pub media: String,
    /// Payload types in `m=` line order.
    #[serde(default)]
    pub codecs: Vec<RemoteCodec>,
    #[serde(default)]
    pub extmaps: Vec<RemoteExtmap>,
}

impl RemoteMediaDescription {
    pub fn new(media: &str) -> Self {
        RemoteMediaDescription {
            media: media.to_owned(),
            ..Default::default()
        }
    }

    /// Adds a payload type as declared by `a=rtpmap:<pt> <name>/<clock>[/<channels>]`.
    pub fn with_codec(
        mut self,
        payload_type: PayloadType,
        encoding_name: &str,
        clock_rate: u32,
        channels: u16,
    ) -> Self {
        self.codecs.push(RemoteCodec {
            payload_type,
            encoding_name: encoding_name.to_owned(),
            clock_rate,
            channels,
            ..Default::default()
        });
        self
    }

    /// Sets the `a=fmtp` line of an already declared payload type.
    pub fn with_fmtp(mut self, payload_type: PayloadType, sdp_fmtp_line: &str) -> Self {
        match self.codec_mut(payload_type) {
            Some(codec) => codec.sdp_fmtp_line = sdp_fmtp_line.to_owned(),
            None => trace!("dropping fmtp for undeclared payload type {payload_type}"),
        }
        self
    }

    /// Adds an `a=rtcp-fb` line to an already declared payload type.
    pub fn with_rtcp_feedback(mut self, payload_type: PayloadType, typ: &str, parameter: &str) -> Self {
        match self.codec_mut(payload_type) {
            Some(codec) => codec.rtcp_feedback.push(RTCPFeedback::new(typ, parameter)),
            None => trace!("dropping rtcp-fb for undeclared payload type {payload_type}"),
        }
        self
    }

    /// Adds an `a=extmap:<id>[/<direction>] <uri>` line.
    pub fn with_extmap(
        mut self,
        id: u16,
        uri: &str,
        direction: Option<RTCRtpTransceiverDirection>,
    ) -> Self {
        self.extmaps.push(RemoteExtmap {
            id,
            uri: uri.to_owned(),
            direction,
        });
        self
    }

    fn codec_mut(&mut self, payload_type: PayloadType) -> Option<&mut RemoteCodec> {
        self.codecs
            .iter_mut()
            .find(|codec| codec.payload_type == payload_type)
    }

    /// Media kind of this section, `Unspecified` for anything but audio and video.
    pub fn kind(&self) -> RtpCodecKind {
        RtpCodecKind::from(self.media.as_str())
    }

    /// Codecs of this section in `m=` line order, with mime types built from the
    /// media type and the remote's encoding name.
    pub(crate) fn classified_codecs(&self) -> Vec<ClassifiedCodec> {
        self.codecs
            .iter()
            .map(|codec| {
                ClassifiedCodec::from(RTCRtpCodecParameters {
                    rtp_codec: RTCRtpCodec {
                        mime_type: format!("{}/{}", self.media, codec.encoding_name),
                        clock_rate: codec.clock_rate,
                        channels: codec.channels,
                        sdp_fmtp_line: codec.sdp_fmtp_line.clone(),
                        rtcp_feedback: codec.rtcp_feedback.clone(),
                    },
                    payload_type: codec.payload_type,
                })
            })
            .collect()
    }
}

/// The media sections of a remote session description, in order.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSessionDescription {
    #[serde(default)]
    pub media_descriptions: Vec<RemoteMediaDescription>,
}

impl RemoteSessionDescription {
    pub fn new(media_descriptions: Vec<RemoteMediaDescription>) -> Self {
        RemoteSessionDescription { media_descriptions }
    }
}
