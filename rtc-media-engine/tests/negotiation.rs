//! End-to-end negotiation tests through the public API.
//!
//! A template is built once, instances are handed out by the `API`, and remote
//! descriptions are negotiated the way a signaling layer would after parsing an
//! offer or answer.

use anyhow::Result;
use std::sync::Arc;

use rtc_media_engine::api::APIBuilder;
use rtc_media_engine::configuration::media_engine::config::MediaEngineConfig;
use rtc_media_engine::configuration::media_engine::{MIME_TYPE_H264, MIME_TYPE_VP8, MediaEngine};
use rtc_media_engine::configuration::setting_engine::SettingEngine;
use rtc_media_engine::rtp_transceiver::{
    RTCPFeedback, RTCRtpCodec, RTCRtpCodecParameters, RTCRtpHeaderExtensionCapability,
    RTCRtpTransceiverDirection, RtpCodecKind, TYPE_RTCP_FB_CCM, TYPE_RTCP_FB_NACK,
    TYPE_RTCP_FB_TRANSPORT_CC,
};
use rtc_media_engine::sdp::{RemoteMediaDescription, RemoteSessionDescription};
use shared::error::Error;

const H264_42E01F: &str = "level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=42e01f";
const TRANSPORT_CC_URI: &str =
    "http://www.ietf.org/id/draft-holmer-rmcat-transport-wide-cc-extensions-01";
const SENDRECV: [RTCRtpTransceiverDirection; 1] = [RTCRtpTransceiverDirection::Sendrecv];

fn init_logger() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init()
        .ok();
}

fn feedback() -> Vec<RTCPFeedback> {
    vec![
        RTCPFeedback::new(TYPE_RTCP_FB_TRANSPORT_CC, ""),
        RTCPFeedback::new(TYPE_RTCP_FB_CCM, "fir"),
        RTCPFeedback::new(TYPE_RTCP_FB_NACK, ""),
        RTCPFeedback::new(TYPE_RTCP_FB_NACK, "pli"),
    ]
}

fn vp8() -> RTCRtpCodecParameters {
    RTCRtpCodecParameters {
        rtp_codec: RTCRtpCodec {
            mime_type: MIME_TYPE_VP8.to_owned(),
            clock_rate: 90000,
            channels: 0,
            sdp_fmtp_line: "".to_owned(),
            rtcp_feedback: feedback(),
        },
        payload_type: 96,
    }
}

fn h264() -> RTCRtpCodecParameters {
    RTCRtpCodecParameters {
        rtp_codec: RTCRtpCodec {
            mime_type: MIME_TYPE_H264.to_owned(),
            clock_rate: 90000,
            channels: 0,
            sdp_fmtp_line: H264_42E01F.to_owned(),
            rtcp_feedback: feedback(),
        },
        payload_type: 108,
    }
}

fn vp8_and_h264_template() -> Result<MediaEngine> {
    let mut m = MediaEngine::default();
    m.register_codec(vp8(), RtpCodecKind::Video)?;
    m.register_codec(h264(), RtpCodecKind::Video)?;
    m.register_header_extension(
        RTCRtpHeaderExtensionCapability::new(TRANSPORT_CC_URI),
        RtpCodecKind::Video,
        None,
    )?;
    Ok(m)
}

fn h264_section(sdp_fmtp_line: &str) -> RemoteMediaDescription {
    RemoteMediaDescription::new("video")
        .with_codec(108, "H264", 90000, 0)
        .with_fmtp(108, sdp_fmtp_line)
        .with_rtcp_feedback(108, "nack", "pli")
        .with_extmap(3, TRANSPORT_CC_URI, None)
}

#[test]
fn test_vp8_and_h264_negotiate() -> Result<()> {
    init_logger();

    let api = APIBuilder::new()
        .with_media_engine(vp8_and_h264_template()?)
        .build();
    let instance = api.new_media_engine_instance();

    let remote = RemoteSessionDescription::new(vec![
        RemoteMediaDescription::new("video")
            .with_codec(96, "VP8", 90000, 0)
            .with_rtcp_feedback(96, "nack", "")
            .with_codec(108, "H264", 90000, 0)
            .with_fmtp(
                108,
                "profile-level-id=42e01f;packetization-mode=1;level-asymmetry-allowed=1",
            )
            .with_extmap(3, TRANSPORT_CC_URI, None),
    ]);
    instance.negotiate(&remote, &SENDRECV)?;

    assert!(instance.is_negotiated(RtpCodecKind::Video));
    assert!(!instance.is_negotiated(RtpCodecKind::Audio));

    let (codec, kind) = instance.get_codec_by_payload(96)?;
    assert_eq!(kind, RtpCodecKind::Video);
    assert_eq!(codec.rtp_codec.mime_type, MIME_TYPE_VP8);
    assert_eq!(
        codec.rtp_codec.rtcp_feedback,
        vec![RTCPFeedback::new(TYPE_RTCP_FB_NACK, "")]
    );

    let (codec, _) = instance.get_codec_by_payload(108)?;
    assert_eq!(codec.rtp_codec.sdp_fmtp_line, H264_42E01F);

    assert_eq!(
        instance.get_header_extension_id(&RTCRtpHeaderExtensionCapability::new(TRANSPORT_CC_URI)),
        (3, false, true)
    );

    Ok(())
}

#[test]
fn test_conflicting_h264_profile_fails() -> Result<()> {
    init_logger();

    let api = APIBuilder::new()
        .with_media_engine(vp8_and_h264_template()?)
        .build();
    let instance = api.new_media_engine_instance();

    let remote = RemoteSessionDescription::new(vec![h264_section(
        "level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=640c1f",
    )]);

    assert!(matches!(
        instance.negotiate(&remote, &SENDRECV),
        Err(Error::ErrNoCommonCodec(_))
    ));
    assert!(!instance.is_negotiated(RtpCodecKind::Video));
    assert_eq!(
        instance.get_header_extension_id(&RTCRtpHeaderExtensionCapability::new(TRANSPORT_CC_URI)),
        (0, false, false)
    );

    Ok(())
}

#[test]
fn test_shared_engine_across_signaling_rounds() -> Result<()> {
    init_logger();

    let mut setting_engine = SettingEngine::default();
    setting_engine.disable_media_engine_copy(true);
    setting_engine.set_media_engine_compatibility_mode(true);

    let api = APIBuilder::new()
        .with_setting_engine(Arc::new(setting_engine))
        .build();
    let offerer = api.new_media_engine_instance();

    // first round: only H264 is registered and offered
    offerer.register_codec(h264(), RtpCodecKind::Video)?;
    offerer.negotiate(
        &RemoteSessionDescription::new(vec![h264_section(H264_42E01F)]),
        &[RTCRtpTransceiverDirection::Sendonly],
    )?;

    // second round on another handle of the same engine: VP8 joins
    let second = api.new_media_engine_instance();
    assert!(second.ptr_eq(&offerer));
    second.register_codec(vp8(), RtpCodecKind::Video)?;
    second.negotiate(
        &RemoteSessionDescription::new(vec![
            h264_section(H264_42E01F),
            RemoteMediaDescription::new("video").with_codec(96, "VP8", 90000, 0),
        ]),
        &[RTCRtpTransceiverDirection::Sendonly],
    )?;

    let payload_types: Vec<u8> = offerer
        .get_codecs_by_kind(RtpCodecKind::Video)
        .iter()
        .map(|c| c.payload_type)
        .collect();
    assert_eq!(payload_types, vec![108, 96]);

    Ok(())
}

#[test]
fn test_template_from_json_config() -> Result<()> {
    init_logger();

    let config: MediaEngineConfig = serde_json::from_str(
        r#"{
            "audio_codecs": [
                {"mime_type": "audio/opus", "clock_rate": 48000, "channels": 2, "payload_type": 111}
            ],
            "header_extensions": [
                {
                    "uri": "urn:ietf:params:rtp-hdrext:ssrc-audio-level",
                    "kinds": ["audio"],
                    "allowed_direction": "recvonly"
                }
            ]
        }"#,
    )?;
    let template = MediaEngine::try_from(config)?;

    let instance = APIBuilder::new()
        .with_media_engine(template)
        .build()
        .new_media_engine_instance();

    let remote = RemoteSessionDescription::new(vec![
        RemoteMediaDescription::new("audio")
            .with_codec(111, "opus", 48000, 2)
            .with_extmap(1, "urn:ietf:params:rtp-hdrext:ssrc-audio-level", None),
    ]);
    instance.negotiate(&remote, &[RTCRtpTransceiverDirection::Sendonly])?;

    // restricted to receiving, so not negotiated on a sending transceiver
    let params = instance
        .get_rtp_parameters_by_kind(RtpCodecKind::Audio, &[RTCRtpTransceiverDirection::Sendonly]);
    assert!(params.header_extensions.is_empty());
    assert_eq!(params.codecs.len(), 1);

    Ok(())
}
