//! Per-connection media engine instances.
//!
//! A [`MediaEngineInstance`] pairs a capability registry with the negotiated state
//! of one connection behind a single reader/writer lock. Registration calls and
//! negotiation passes take the lock exclusively for their whole duration; lookups
//! share it. A lookup therefore observes the state either before or after a
//! negotiation pass, never in between.
//!
//! Instances are normally created from a template with
//! [`MediaEngineInstance::from_template`], which deep-copies the registry. An
//! instance can also be aliased with [`MediaEngineInstance::share`]; all aliases
//! see and mutate the same state, and negotiation passes issued through
//! different aliases serialize on the shared lock.


use crate::configuration::media_engine::MediaEngine;
use crate::negotiation::Negotiator;
use crate::negotiation::state::NegotiatedState;
use crate::rtp_transceiver::{
    PayloadType, RTCPFeedback, RTCRtpCodecParameters, RTCRtpHeaderExtensionCapability,
    RTCRtpParameters, RTCRtpTransceiverDirection, RtpCodecKind,
};
use crate::sdp::RemoteSessionDescription;
use log::debug;
use parking_lot::RwLock;
use shared::error::Result;
use std::sync::Arc;

#[derive(Debug)]
struct MediaEngineInstanceInner {
    media_engine: MediaEngine,
    negotiated: NegotiatedState,
    compatibility_mode: bool,
}

/// A capability registry plus the negotiated state of one connection.
///
/// Cloning a `MediaEngineInstance` yields another handle to the same instance,
/// exactly like [`share`](MediaEngineInstance::share).
#[derive(Debug, Clone)]
pub struct MediaEngineInstance {
    inner: Arc<RwLock<MediaEngineInstanceInner>>,
}

impl MediaEngineInstance {
    /// Creates an instance owning `media_engine` with empty negotiated state.
    pub fn new(media_engine: MediaEngine, compatibility_mode: bool) -> Self {
        MediaEngineInstance {
            inner: Arc::new(RwLock::new(MediaEngineInstanceInner {
                media_engine,
                negotiated: NegotiatedState::default(),
                compatibility_mode,
            })),
        }
    }

    /// Deep-copies `template` into a new, isolated instance.
    pub fn from_template(template: &MediaEngine) -> Self {
        MediaEngineInstance::new(template.clone(), false)
    }

    /// Returns a handle to this same instance.
    ///
    /// Negotiation through any handle mutates the state seen by all of them.
    pub fn share(&self) -> Self {
        MediaEngineInstance {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Deep-copies this instance's registry into a new, isolated instance with
    /// empty negotiated state and the same compatibility mode.
    pub fn copy(&self) -> Self {
        let inner = self.inner.read();
        MediaEngineInstance::new(inner.media_engine.clone(), inner.compatibility_mode)
    }

    /// Returns true if both handles refer to the same instance.
    pub fn ptr_eq(&self, other: &MediaEngineInstance) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn set_compatibility_mode(&self, is_enabled: bool) {
        self.inner.write().compatibility_mode = is_enabled;
    }

    /// Returns a copy of the capability registry.
    pub fn media_engine(&self) -> MediaEngine {
        self.inner.read().media_engine.clone()
    }

    /// See [`MediaEngine::register_codec`].
    pub fn register_codec(&self, codec: RTCRtpCodecParameters, typ: RtpCodecKind) -> Result<()> {
        self.inner.write().media_engine.register_codec(codec, typ)
    }

    /// See [`MediaEngine::register_header_extension`].
    pub fn register_header_extension(
        &self,
        extension: RTCRtpHeaderExtensionCapability,
        typ: RtpCodecKind,
        allowed_direction: Option<RTCRtpTransceiverDirection>,
    ) -> Result<()> {
        self.inner
            .write()
            .media_engine
            .register_header_extension(extension, typ, allowed_direction)
    }

    /// See [`MediaEngine::register_feedback`].
    pub fn register_feedback(&self, feedback: RTCPFeedback, typ: RtpCodecKind) {
        self.inner
            .write()
            .media_engine
            .register_feedback(feedback, typ)
    }

    /// Negotiates a remote description into this instance.
    ///
    /// `directions` are the transceiver directions currently acceptable; header
    /// extensions restricted to other directions are skipped. The pass is atomic:
    /// on error the negotiated state is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ErrNoCommonCodec`](shared::error::Error::ErrNoCommonCodec)
    /// if an audio or video section shares no codec with the registry.
    pub fn negotiate(
        &self,
        remote: &RemoteSessionDescription,
        directions: &[RTCRtpTransceiverDirection],
    ) -> Result<()> {
        let mut inner = self.inner.write();
        let negotiated = Negotiator::new(&inner.media_engine, inner.compatibility_mode).negotiate(
            &inner.negotiated,
            remote,
            directions,
        )?;
        inner.negotiated = negotiated;
        debug!(
            "negotiated audio: {}, video: {}",
            inner.negotiated.negotiated_audio, inner.negotiated.negotiated_video
        );
        Ok(())
    }

    /// Binds header extension `uri` to `id` for kind `typ` outside a full
    /// negotiation pass. Direction restrictions are not checked.
    pub fn update_header_extension(&self, id: u16, uri: &str, typ: RtpCodecKind) -> Result<()> {
        let mut inner = self.inner.write();
        let MediaEngineInstanceInner {
            media_engine,
            negotiated,
            ..
        } = &mut *inner;
        negotiated.update_header_extension(media_engine, id, uri, typ)
    }

    /// Returns true once a codec of kind `typ` has been negotiated.
    pub fn is_negotiated(&self, typ: RtpCodecKind) -> bool {
        self.inner.read().negotiated.is_negotiated(typ)
    }

    /// Looks up a codec by payload type, negotiated codecs first and registered
    /// codecs for kinds not negotiated yet.
    pub fn get_codec_by_payload(
        &self,
        payload_type: PayloadType,
    ) -> Result<(RTCRtpCodecParameters, RtpCodecKind)> {
        let inner = self.inner.read();
        inner
            .negotiated
            .get_codec_by_payload(&inner.media_engine, payload_type)
    }

    /// Returns the negotiated ID of an extension and whether it was negotiated
    /// for audio and for video. The ID is 0 if it was not negotiated.
    pub fn get_header_extension_id(
        &self,
        extension: &RTCRtpHeaderExtensionCapability,
    ) -> (u16, bool, bool) {
        self.inner
            .read()
            .negotiated
            .get_header_extension_id(&extension.uri)
    }

    /// Returns the negotiated ID of an extension for one media kind.
    pub fn get_header_extension_id_for_kind(
        &self,
        extension: &RTCRtpHeaderExtensionCapability,
        typ: RtpCodecKind,
    ) -> Option<u16> {
        self.inner
            .read()
            .negotiated
            .get_header_extension_id_for_kind(&extension.uri, typ)
    }

    /// Codecs and header extensions usable for kind `typ` on a transceiver
    /// allowing `directions`, as used when generating a local description.
    pub fn get_rtp_parameters_by_kind(
        &self,
        typ: RtpCodecKind,
        directions: &[RTCRtpTransceiverDirection],
    ) -> RTCRtpParameters {
        let inner = self.inner.read();
        inner
            .negotiated
            .get_rtp_parameters_by_kind(&inner.media_engine, typ, directions)
    }

    pub fn get_rtp_parameters_by_payload_type(
        &self,
        payload_type: PayloadType,
    ) -> Result<RTCRtpParameters> {
        let inner = self.inner.read();
        inner
            .negotiated
            .get_rtp_parameters_by_payload_type(&inner.media_engine, payload_type)
    }

    pub fn get_codecs_by_kind(&self, typ: RtpCodecKind) -> Vec<RTCRtpCodecParameters> {
        let inner = self.inner.read();
        inner.negotiated.get_codecs_by_kind(&inner.media_engine, typ)
    }

    pub fn is_rtx_enabled(
        &self,
        typ: RtpCodecKind,
        directions: &[RTCRtpTransceiverDirection],
    ) -> bool {
        let inner = self.inner.read();
        inner
            .negotiated
            .is_rtx_enabled(&inner.media_engine, typ, directions)
    }

    pub fn is_fec_enabled(
        &self,
        typ: RtpCodecKind,
        directions: &[RTCRtpTransceiverDirection],
    ) -> bool {
        let inner = self.inner.read();
        inner
            .negotiated
            .is_fec_enabled(&inner.media_engine, typ, directions)
    }
}
