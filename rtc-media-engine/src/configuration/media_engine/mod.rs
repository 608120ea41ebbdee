//! Capability registry for codecs and RTP header extensions.
//!
//! The [`MediaEngine`] holds the locally supported audio/video codecs and header
//! extensions in registration order. It is built once at configuration time and
//! then used as a template: every connection negotiates against its own copy (see
//! [`API`](crate::api::API)), so the template itself never holds negotiated state.
//!
//! # Examples
//!
//! ## Using Default Codecs
//!
//! ```
//! use rtc_media_engine::configuration::media_engine::MediaEngine;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut media_engine = MediaEngine::default();
//!
//! // Now supports: Opus, G722, PCMU, PCMA, VP8, VP9, H264, AV1, H265
//! media_engine.register_default_codecs()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Registering Custom Codec
//!
//! ```
//! use rtc_media_engine::configuration::media_engine::{MediaEngine, MIME_TYPE_OPUS};
//! use rtc_media_engine::rtp_transceiver::{RTCRtpCodec, RTCRtpCodecParameters, RtpCodecKind};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut media_engine = MediaEngine::default();
//!
//! media_engine.register_codec(
//!     RTCRtpCodecParameters {
//!         rtp_codec: RTCRtpCodec {
//!             mime_type: MIME_TYPE_OPUS.to_owned(),
//!             clock_rate: 48000,
//!             channels: 2,
//!             sdp_fmtp_line: "minptime=10;useinbandfec=1;stereo=1".to_owned(),
//!             rtcp_feedback: vec![],
//!         },
//!         payload_type: 111,
//!     },
//!     RtpCodecKind::Audio,
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Registering Header Extensions
//!
//! ```
//! use rtc_media_engine::configuration::media_engine::MediaEngine;
//! use rtc_media_engine::rtp_transceiver::{
//!     RTCRtpHeaderExtensionCapability, RTCRtpTransceiverDirection, RtpCodecKind,
//! };
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut media_engine = MediaEngine::default();
//!
//! media_engine.register_header_extension(
//!     RTCRtpHeaderExtensionCapability::new("urn:ietf:params:rtp-hdrext:ssrc-audio-level"),
//!     RtpCodecKind::Audio,
//!     None,
//! )?;
//!
//! // Only offered/accepted on transceivers that receive
//! media_engine.register_header_extension(
//!     RTCRtpHeaderExtensionCapability::new(
//!         "http://www.webrtc.org/experiments/rtp-hdrext/playout-delay",
//!     ),
//!     RtpCodecKind::Video,
//!     Some(RTCRtpTransceiverDirection::Recvonly),
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub(crate) mod header_extension;

use crate::negotiation::state::NegotiatedState;
use crate::rtp_transceiver::rtp_codec::ClassifiedCodec;
use crate::rtp_transceiver::{
    PayloadType, RTCPFeedback, RTCRtpCodec, RTCRtpCodecParameters,
    RTCRtpHeaderExtensionCapability, RTCRtpParameters, RTCRtpTransceiverDirection, RtpCodecKind,
    TYPE_RTCP_FB_CCM, TYPE_RTCP_FB_GOOG_REMB, TYPE_RTCP_FB_NACK, TYPE_RTCP_FB_TRANSPORT_CC,
};
use header_extension::{MAX_HEADER_EXTENSION_ID, MediaEngineHeaderExtension};
use log::debug;
use shared::error::{Error, Result};

// Mime types are matched case-insensitively everywhere in this crate.

pub const MIME_TYPE_H264: &str = "video/H264";
/// H.265/HEVC
pub const MIME_TYPE_HEVC: &str = "video/H265";
pub const MIME_TYPE_OPUS: &str = "audio/opus";
pub const MIME_TYPE_VP8: &str = "video/VP8";
pub const MIME_TYPE_VP9: &str = "video/VP9";
pub const MIME_TYPE_AV1: &str = "video/AV1";
pub const MIME_TYPE_G722: &str = "audio/G722";
/// G.711 mu-law
pub const MIME_TYPE_PCMU: &str = "audio/PCMU";
/// G.711 A-law
pub const MIME_TYPE_PCMA: &str = "audio/PCMA";
/// Retransmission payload format (RFC 4588), paired with a media codec by `apt`.
pub const MIME_TYPE_RTX: &str = "video/rtx";
pub const MIME_TYPE_FLEX_FEC: &str = "video/flexfec";
pub const MIME_TYPE_ULP_FEC: &str = "video/ulpfec";
/// DTMF tones
pub const MIME_TYPE_TELEPHONE_EVENT: &str = "audio/telephone-event";

/// Capability registry of the locally supported codecs and RTP header extensions.
///
/// Codecs are kept per kind in registration order, which is the local preference
/// order. The registry never changes during negotiation; negotiated state lives
/// in a [`MediaEngineInstance`](crate::instance::MediaEngineInstance).
///
/// # Examples
///
/// ```
/// use rtc_media_engine::configuration::media_engine::{MediaEngine, MIME_TYPE_VP8};
/// use rtc_media_engine::rtp_transceiver::{RTCRtpCodec, RTCRtpCodecParameters, RtpCodecKind};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut media_engine = MediaEngine::default();
///
/// media_engine.register_codec(
///     RTCRtpCodecParameters {
///         rtp_codec: RTCRtpCodec {
///             mime_type: MIME_TYPE_VP8.to_owned(),
///             clock_rate: 90000,
///             ..Default::default()
///         },
///         payload_type: 96,
///     },
///     RtpCodecKind::Video,
/// )?;
///
/// let (codec, kind) = media_engine.get_codec_by_payload(96)?;
/// assert_eq!(codec.rtp_codec.mime_type, MIME_TYPE_VP8);
/// assert_eq!(kind, RtpCodecKind::Video);
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug, Clone)]
pub struct MediaEngine {
    pub(crate) video_codecs: Vec<ClassifiedCodec>,
    pub(crate) audio_codecs: Vec<ClassifiedCodec>,
    pub(crate) header_extensions: Vec<MediaEngineHeaderExtension>,
}

impl MediaEngine {
    /// Registers standard WebRTC codecs for audio and video.
    ///
    /// **Audio Codecs:** Opus (with in-band FEC), G.722, PCMU, PCMA
    ///
    /// **Video Codecs:** VP8, VP9 (profiles 0 and 1), H.264 (several
    /// profiles/packetization modes), AV1 and H.265, each with RTCP feedback, RTX
    /// retransmission for all but H.265, and ULP FEC.
    pub fn register_default_codecs(&mut self) -> Result<()> {
        for (mime_type, clock_rate, channels, sdp_fmtp_line, payload_type) in [
            (MIME_TYPE_OPUS, 48000, 2, "minptime=10;useinbandfec=1", 111),
            (MIME_TYPE_G722, 8000, 0, "", 9),
            (MIME_TYPE_PCMU, 8000, 0, "", 0),
            (MIME_TYPE_PCMA, 8000, 0, "", 8),
        ] {
            self.register_codec(
                RTCRtpCodecParameters {
                    rtp_codec: RTCRtpCodec {
                        mime_type: mime_type.to_owned(),
                        clock_rate,
                        channels,
                        sdp_fmtp_line: sdp_fmtp_line.to_owned(),
                        rtcp_feedback: vec![],
                    },
                    payload_type,
                },
                RtpCodecKind::Audio,
            )?;
        }

        let video_rtcp_feedback = vec![
            RTCPFeedback::new(TYPE_RTCP_FB_GOOG_REMB, ""),
            RTCPFeedback::new(TYPE_RTCP_FB_TRANSPORT_CC, ""),
            RTCPFeedback::new(TYPE_RTCP_FB_CCM, "fir"),
            RTCPFeedback::new(TYPE_RTCP_FB_NACK, ""),
            RTCPFeedback::new(TYPE_RTCP_FB_NACK, "pli"),
        ];

        // (mime type, fmtp, payload type, rtx payload type)
        for (mime_type, sdp_fmtp_line, payload_type, rtx_payload_type) in [
            (MIME_TYPE_VP8, "", 96, Some(97)),
            (MIME_TYPE_VP9, "profile-id=0", 98, Some(99)),
            (MIME_TYPE_VP9, "profile-id=1", 100, Some(101)),
            (
                MIME_TYPE_H264,
                "level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=42001f",
                102,
                Some(103),
            ),
            (
                MIME_TYPE_H264,
                "level-asymmetry-allowed=1;packetization-mode=0;profile-level-id=42001f",
                127,
                Some(125),
            ),
            (
                MIME_TYPE_H264,
                "level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=42e01f",
                104,
                Some(105),
            ),
            (
                MIME_TYPE_H264,
                "level-asymmetry-allowed=1;packetization-mode=0;profile-level-id=42e01f",
                108,
                Some(109),
            ),
            (
                MIME_TYPE_H264,
                "level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=640032",
                112,
                Some(113),
            ),
            (MIME_TYPE_AV1, "profile-id=0", 41, Some(42)),
            (MIME_TYPE_HEVC, "", 126, None),
        ] {
            self.register_codec(
                RTCRtpCodecParameters {
                    rtp_codec: RTCRtpCodec {
                        mime_type: mime_type.to_owned(),
                        clock_rate: 90000,
                        channels: 0,
                        sdp_fmtp_line: sdp_fmtp_line.to_owned(),
                        rtcp_feedback: video_rtcp_feedback.clone(),
                    },
                    payload_type,
                },
                RtpCodecKind::Video,
            )?;

            if let Some(rtx_payload_type) = rtx_payload_type {
                self.register_codec(
                    RTCRtpCodecParameters {
                        rtp_codec: RTCRtpCodec {
                            mime_type: MIME_TYPE_RTX.to_owned(),
                            clock_rate: 90000,
                            channels: 0,
                            sdp_fmtp_line: format!("apt={payload_type}"),
                            rtcp_feedback: vec![],
                        },
                        payload_type: rtx_payload_type,
                    },
                    RtpCodecKind::Video,
                )?;
            }
        }

        self.register_codec(
            RTCRtpCodecParameters {
                rtp_codec: RTCRtpCodec {
                    mime_type: MIME_TYPE_ULP_FEC.to_owned(),
                    clock_rate: 90000,
                    channels: 0,
                    sdp_fmtp_line: "".to_owned(),
                    rtcp_feedback: vec![],
                },
                payload_type: 116,
            },
            RtpCodecKind::Video,
        )
    }

    /// add_codec will append codec if an identical one does not exist yet
    fn add_codec(codecs: &mut Vec<ClassifiedCodec>, codec: RTCRtpCodecParameters) -> bool {
        if codecs.iter().any(|c| c.parameters == codec) {
            return false;
        }
        codecs.push(ClassifiedCodec::from(codec));
        true
    }

    /// Registers a codec for use in negotiation.
    ///
    /// Registering an identical codec and payload type twice is a no-op. Payload
    /// types are chosen by the caller and only advisory: after negotiation a codec
    /// is known by the payload type the remote peer used for it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ErrUnknownType`] if `typ` is neither audio nor video.
    pub fn register_codec(&mut self, codec: RTCRtpCodecParameters, typ: RtpCodecKind) -> Result<()> {
        let codecs = match typ {
            RtpCodecKind::Audio => &mut self.audio_codecs,
            RtpCodecKind::Video => &mut self.video_codecs,
            RtpCodecKind::Unspecified => return Err(Error::ErrUnknownType),
        };

        let mime_type = codec.rtp_codec.mime_type.clone();
        let payload_type = codec.payload_type;
        if MediaEngine::add_codec(codecs, codec) {
            debug!("registered {typ} codec {mime_type} with payload type {payload_type}");
        }

        Ok(())
    }

    /// Adds a header extension to the MediaEngine.
    /// To determine the negotiated value use
    /// [`MediaEngineInstance::get_header_extension_id`](crate::instance::MediaEngineInstance::get_header_extension_id)
    /// after signaling is complete.
    ///
    /// `allowed_direction` restricts the extension to transceivers that send
    /// (`Sendonly`) or receive (`Recvonly`); `None` matches all directions.
    /// Registering an already known URI for another kind extends it to that kind.
    ///
    /// # Errors
    ///
    /// * [`Error::ErrRegisterHeaderExtensionInvalidDirection`] if the restriction is
    ///   `Sendrecv`, `Inactive` or `Unspecified`.
    /// * [`Error::ErrRegisterHeaderExtensionNoFreeID`] if all one-byte extension IDs
    ///   are taken.
    /// * [`Error::ErrUnknownType`] if `typ` is neither audio nor video.
    pub fn register_header_extension(
        &mut self,
        extension: RTCRtpHeaderExtensionCapability,
        typ: RtpCodecKind,
        allowed_direction: Option<RTCRtpTransceiverDirection>,
    ) -> Result<()> {
        if let Some(direction) = allowed_direction
            && !direction.is_restriction()
        {
            return Err(Error::ErrRegisterHeaderExtensionInvalidDirection);
        }
        if typ == RtpCodecKind::Unspecified {
            return Err(Error::ErrUnknownType);
        }

        let index = match self
            .header_extensions
            .iter()
            .position(|ext| ext.uri == extension.uri)
        {
            Some(index) => index,
            None => {
                if self.header_extensions.len() >= MAX_HEADER_EXTENSION_ID as usize {
                    return Err(Error::ErrRegisterHeaderExtensionNoFreeID);
                }
                self.header_extensions.push(MediaEngineHeaderExtension {
                    uri: extension.uri,
                    ..Default::default()
                });
                self.header_extensions.len() - 1
            }
        };

        let ext = &mut self.header_extensions[index];
        if !ext.is_kind(typ) || ext.allowed_direction != allowed_direction {
            debug!(
                "registered {typ} header extension {} restricted to {:?}",
                ext.uri, allowed_direction
            );
        }
        ext.set_kind(typ, true);
        ext.allowed_direction = allowed_direction;

        Ok(())
    }

    /// register_feedback adds feedback mechanism to already registered codecs.
    /// Codecs that already advertise `feedback` are left untouched.
    pub fn register_feedback(&mut self, feedback: RTCPFeedback, typ: RtpCodecKind) {
        let codecs = match typ {
            RtpCodecKind::Audio => &mut self.audio_codecs,
            RtpCodecKind::Video => &mut self.video_codecs,
            RtpCodecKind::Unspecified => return,
        };

        for codec in codecs {
            let rtcp_feedback = &mut codec.parameters.rtp_codec.rtcp_feedback;
            if !rtcp_feedback.contains(&feedback) {
                rtcp_feedback.push(feedback.clone());
            }
        }
    }

    /// Returns the registered codecs of kind `typ` in preference order.
    pub fn codecs(&self, typ: RtpCodecKind) -> Vec<RTCRtpCodecParameters> {
        self.classified_codecs(typ)
            .iter()
            .map(|c| c.parameters.clone())
            .collect()
    }

    pub(crate) fn classified_codecs(&self, typ: RtpCodecKind) -> &[ClassifiedCodec] {
        match typ {
            RtpCodecKind::Audio => &self.audio_codecs,
            RtpCodecKind::Video => &self.video_codecs,
            RtpCodecKind::Unspecified => &[],
        }
    }

    /// Looks up a registered codec by the payload type it was registered under.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ErrCodecNotFound`] if no codec uses `payload_type`.
    pub fn get_codec_by_payload(
        &self,
        payload_type: PayloadType,
    ) -> Result<(RTCRtpCodecParameters, RtpCodecKind)> {
        NegotiatedState::default().get_codec_by_payload(self, payload_type)
    }

    /// Returns the registered codecs and header extensions of kind `typ`.
    ///
    /// Header extensions are assigned local IDs in registration order and only
    /// those whose direction restriction overlaps `directions` are returned.
    pub fn get_rtp_parameters_by_kind(
        &self,
        typ: RtpCodecKind,
        directions: &[RTCRtpTransceiverDirection],
    ) -> RTCRtpParameters {
        NegotiatedState::default().get_rtp_parameters_by_kind(self, typ, directions)
    }
}
