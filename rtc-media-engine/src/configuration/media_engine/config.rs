//! Serializable capability template.
//!
//! A [`MediaEngineConfig`] describes the codecs and header extensions of a
//! [`MediaEngine`] as plain data, so a template can be kept in a configuration
//! file instead of being built in code. Converting it into a `MediaEngine`
//! replays the registration API, so every registration rule applies.

use super::MediaEngine;
use crate::rtp_transceiver::{
    RTCRtpCodecParameters, RTCRtpHeaderExtensionCapability, RTCRtpTransceiverDirection,
    RtpCodecKind,
};
use serde::{Deserialize, Serialize};
use shared::error::{Error, Result};

/// Header extension entry of a [`MediaEngineConfig`].
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderExtensionConfig {
    pub uri: String,
    /// Media kinds the extension applies to; must not be empty.
    pub kinds: Vec<RtpCodecKind>,
    #[serde(default)]
    pub allowed_direction: Option<RTCRtpTransceiverDirection>,
}

/// Plain-data description of a [`MediaEngine`].
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEngineConfig {
    #[serde(default)]
    pub audio_codecs: Vec<RTCRtpCodecParameters>,
    #[serde(default)]
    pub video_codecs: Vec<RTCRtpCodecParameters>,
    #[serde(default)]
    pub header_extensions: Vec<HeaderExtensionConfig>,
}

impl TryFrom<MediaEngineConfig> for MediaEngine {
    type Error = Error;

    fn try_from(config: MediaEngineConfig) -> Result<Self> {
        let mut media_engine = MediaEngine::default();

        for codec in config.audio_codecs {
            media_engine.register_codec(codec, RtpCodecKind::Audio)?;
        }
        for codec in config.video_codecs {
            media_engine.register_codec(codec, RtpCodecKind::Video)?;
        }

        for extension in config.header_extensions {
            if extension.kinds.is_empty() {
                return Err(Error::ErrInvalidMediaEngineConfig(format!(
                    "header extension {} has no media kind",
                    extension.uri
                )));
            }
            for kind in extension.kinds {
                media_engine.register_header_extension(
                    RTCRtpHeaderExtensionCapability::new(&extension.uri),
                    kind,
                    extension.allowed_direction,
                )?;
            }
        }

        Ok(media_engine)
    }
}

impl From<&MediaEngine> for MediaEngineConfig {
    fn from(media_engine: &MediaEngine) -> Self {
        MediaEngineConfig {
            audio_codecs: media_engine.codecs(RtpCodecKind::Audio),
            video_codecs: media_engine.codecs(RtpCodecKind::Video),
            header_extensions: media_engine
                .header_extensions
                .iter()
                .map(|ext| HeaderExtensionConfig {
                    uri: ext.uri.clone(),
                    kinds: [RtpCodecKind::Audio, RtpCodecKind::Video]
                        .into_iter()
                        .filter(|kind| ext.is_kind(*kind))
                        .collect(),
                    allowed_direction: ext.allowed_direction,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::configuration::media_engine::MIME_TYPE_OPUS;

    const CONFIG_JSON: &str = r#"{
        "audio_codecs": [
            {
                "mime_type": "audio/opus",
                "clock_rate": 48000,
                "channels": 2,
                "sdp_fmtp_line": "minptime=10;useinbandfec=1",
                "payload_type": 111
            },
            {
                "mime_type": "audio/opus",
                "clock_rate": 48000,
                "channels": 2,
                "sdp_fmtp_line": "minptime=10;useinbandfec=1",
                "payload_type": 111
            }
        ],
        "video_codecs": [
            {
                "mime_type": "video/VP8",
                "clock_rate": 90000,
                "rtcp_feedback": [{"typ": "nack", "parameter": "pli"}],
                "payload_type": 96
            }
        ],
        "header_extensions": [
            {"uri": "urn:ietf:params:rtp-hdrext:sdes:mid", "kinds": ["audio", "video"]},
            {
                "uri": "http://www.webrtc.org/experiments/rtp-hdrext/playout-delay",
                "kinds": ["video"],
                "allowed_direction": "recvonly"
            }
        ]
    }"#;

    #[test]
    fn test_media_engine_from_config() -> Result<()> {
        let config: MediaEngineConfig =
            serde_json::from_str(CONFIG_JSON).expect("valid config json");
        let media_engine = MediaEngine::try_from(config)?;

        let audio_codecs = media_engine.codecs(RtpCodecKind::Audio);
        assert_eq!(audio_codecs.len(), 1);
        assert_eq!(audio_codecs[0].rtp_codec.mime_type, MIME_TYPE_OPUS);
        assert_eq!(media_engine.codecs(RtpCodecKind::Video).len(), 1);

        assert_eq!(media_engine.header_extensions.len(), 2);
        assert!(media_engine.header_extensions[0].is_audio);
        assert!(media_engine.header_extensions[0].is_video);
        assert_eq!(
            media_engine.header_extensions[1].allowed_direction,
            Some(RTCRtpTransceiverDirection::Recvonly)
        );

        Ok(())
    }

    #[test]
    fn test_media_engine_config_export() -> Result<()> {
        let config: MediaEngineConfig =
            serde_json::from_str(CONFIG_JSON).expect("valid config json");
        let media_engine = MediaEngine::try_from(config)?;

        let exported = MediaEngineConfig::from(&media_engine);
        assert_eq!(exported.audio_codecs.len(), 1);
        assert_eq!(
            exported.header_extensions[0].kinds,
            vec![RtpCodecKind::Audio, RtpCodecKind::Video]
        );
        assert_eq!(
            MediaEngine::try_from(exported.clone()).map(|m| MediaEngineConfig::from(&m))?,
            exported
        );

        Ok(())
    }

    #[test]
    fn test_media_engine_config_rejects_invalid() {
        let no_kind = MediaEngineConfig {
            header_extensions: vec![HeaderExtensionConfig {
                uri: "urn:ietf:params:rtp-hdrext:sdes:mid".to_owned(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(matches!(
            MediaEngine::try_from(no_kind),
            Err(Error::ErrInvalidMediaEngineConfig(_))
        ));

        let bad_direction = MediaEngineConfig {
            header_extensions: vec![HeaderExtensionConfig {
                uri: "urn:ietf:params:rtp-hdrext:sdes:mid".to_owned(),
                kinds: vec![RtpCodecKind::Audio],
                allowed_direction: Some(RTCRtpTransceiverDirection::Sendrecv),
            }],
            ..Default::default()
        };
        assert_eq!(
            MediaEngine::try_from(bad_direction).err(),
            Some(Error::ErrRegisterHeaderExtensionInvalidDirection)
        );
    }
}
