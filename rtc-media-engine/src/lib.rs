//! # RTC Media Engine - Codec and Header Extension Negotiation
//!
//! This crate decides which codecs, payload types and RTP header extensions are
//! usable on a WebRTC connection. Given the locally supported capabilities and a
//! remote session description, it produces the negotiated view the RTP/RTCP layer
//! and the description generator work from.
//!
//! It does no I/O and parses no session-description text: the signaling layer
//! hands in already parsed media sections ([`sdp::RemoteSessionDescription`]) and
//! queries the result.
//!
//! ## Overview
//!
//! - [`MediaEngine`](configuration::media_engine::MediaEngine): capability
//!   registry of codecs and header extensions, used as a template.
//! - [`SettingEngine`](configuration::setting_engine::SettingEngine): whether
//!   connections get their own copy of the template, and compatibility mode.
//! - [`API`](api::API): hands out one
//!   [`MediaEngineInstance`](instance::MediaEngineInstance) per connection.
//! - [`MediaEngineInstance`](instance::MediaEngineInstance): registry plus
//!   negotiated state behind a reader/writer lock.
//!
//! ## Quick Start
//!
//! ```
//! use rtc_media_engine::api::APIBuilder;
//! use rtc_media_engine::configuration::media_engine::{MediaEngine, MIME_TYPE_OPUS};
//! use rtc_media_engine::rtp_transceiver::{RTCRtpTransceiverDirection, RtpCodecKind};
//! use rtc_media_engine::sdp::{RemoteMediaDescription, RemoteSessionDescription};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut media_engine = MediaEngine::default();
//! media_engine.register_default_codecs()?;
//!
//! let api = APIBuilder::new().with_media_engine(media_engine).build();
//! let instance = api.new_media_engine_instance();
//!
//! // m=audio 9 UDP/TLS/RTP/SAVPF 109
//! // a=rtpmap:109 opus/48000/2
//! // a=fmtp:109 minptime=10;useinbandfec=1
//! let remote = RemoteSessionDescription::new(vec![
//!     RemoteMediaDescription::new("audio")
//!         .with_codec(109, "opus", 48000, 2)
//!         .with_fmtp(109, "minptime=10;useinbandfec=1"),
//! ]);
//! instance.negotiate(&remote, &[RTCRtpTransceiverDirection::Sendrecv])?;
//!
//! // The codec is now known by the remote payload type
//! let (codec, kind) = instance.get_codec_by_payload(109)?;
//! assert_eq!(codec.rtp_codec.mime_type, MIME_TYPE_OPUS);
//! assert_eq!(kind, RtpCodecKind::Audio);
//! assert!(instance.get_codec_by_payload(111).is_err());
//! # Ok(())
//! # }
//! ```

#![warn(rust_2018_idioms)]
#![allow(dead_code)]

pub use shared;

pub mod api;
pub mod configuration;
pub mod instance;
pub(crate) mod negotiation;
pub mod rtp_transceiver;
pub mod sdp;
