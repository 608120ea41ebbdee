use crate::configuration::media_engine::header_extension::{
    MAX_HEADER_EXTENSION_ID, MediaEngineHeaderExtension,
};
use crate::configuration::media_engine::{MIME_TYPE_RTX, MediaEngine};
use crate::rtp_transceiver::rtp_codec::ClassifiedCodec;
use crate::rtp_transceiver::{
    PayloadType, RTCRtpCodecParameters, RTCRtpHeaderExtensionParameters, RTCRtpParameters,
    RTCRtpTransceiverDirection, RtpCodecKind,
};
use super::MAX_EXTMAP_ID;
use log::{trace, warn};
use shared::error::{Error, Result};
use unicase::UniCase;

/// A header extension bound to an ID for one or both media kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NegotiatedHeaderExtension {
    pub(crate) id: u16,
    pub(crate) extension: MediaEngineHeaderExtension,
}

/// Per-connection record of what was agreed with the remote peer.
///
/// Every remote payload type maps to at most one codec across both kinds, and a
/// header extension URI is bound to at most one ID per kind.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub(crate) struct NegotiatedState {
    pub(crate) negotiated_audio: bool,
    pub(crate) negotiated_video: bool,
    pub(crate) negotiated_audio_codecs: Vec<ClassifiedCodec>,
    pub(crate) negotiated_video_codecs: Vec<ClassifiedCodec>,
    /// Ordered by id
    pub(crate) negotiated_header_extensions: Vec<NegotiatedHeaderExtension>,
}

impl NegotiatedState {
    pub(crate) fn is_negotiated(&self, typ: RtpCodecKind) -> bool {
        match typ {
            RtpCodecKind::Audio => self.negotiated_audio,
            RtpCodecKind::Video => self.negotiated_video,
            RtpCodecKind::Unspecified => false,
        }
    }

    pub(crate) fn set_negotiated(&mut self, typ: RtpCodecKind) {
        match typ {
            RtpCodecKind::Audio => self.negotiated_audio = true,
            RtpCodecKind::Video => self.negotiated_video = true,
            RtpCodecKind::Unspecified => {}
        }
    }

    fn negotiated_codecs(&self, typ: RtpCodecKind) -> &[ClassifiedCodec] {
        match typ {
            RtpCodecKind::Audio => &self.negotiated_audio_codecs,
            RtpCodecKind::Video => &self.negotiated_video_codecs,
            RtpCodecKind::Unspecified => &[],
        }
    }

    /// Appends negotiated codecs of kind `typ` and returns how many were added.
    /// A payload type that is already negotiated, for either kind, keeps its
    /// first codec.
    pub(crate) fn push_codecs(
        &mut self,
        codecs: Vec<ClassifiedCodec>,
        typ: RtpCodecKind,
    ) -> usize {
        let mut inserted = 0;
        for codec in codecs {
            let payload_type = codec.parameters.payload_type;
            if self
                .negotiated_audio_codecs
                .iter()
                .chain(self.negotiated_video_codecs.iter())
                .any(|c| c.parameters.payload_type == payload_type)
            {
                trace!("payload type {payload_type} already negotiated, keeping first codec");
                continue;
            }

            match typ {
                RtpCodecKind::Audio => self.negotiated_audio_codecs.push(codec),
                RtpCodecKind::Video => self.negotiated_video_codecs.push(codec),
                RtpCodecKind::Unspecified => continue,
            }
            inserted += 1;
        }
        inserted
    }

    /// Binds the locally registered extension `uri` to `id` for kind `typ`.
    ///
    /// Extensions not registered for `typ`, and IDs outside 1..=255, are ignored.
    /// A previous binding of `uri` to another ID, or of another URI to `id`, is
    /// released for `typ`.
    pub(crate) fn update_header_extension(
        &mut self,
        media_engine: &MediaEngine,
        id: u16,
        uri: &str,
        typ: RtpCodecKind,
    ) -> Result<()> {
        if typ == RtpCodecKind::Unspecified {
            return Err(Error::ErrUnknownType);
        }
        if id == 0 || id > MAX_EXTMAP_ID {
            warn!("ignoring header extension {uri} with invalid id {id}");
            return Ok(());
        }

        let Some(local) = media_engine
            .header_extensions
            .iter()
            .find(|ext| ext.uri == uri && ext.is_kind(typ))
        else {
            trace!("ignoring header extension {uri} not registered for {typ}");
            return Ok(());
        };

        for negotiated in self.negotiated_header_extensions.iter_mut() {
            if (negotiated.id == id) != (negotiated.extension.uri == uri) {
                negotiated.extension.set_kind(typ, false);
            }
        }
        self.negotiated_header_extensions
            .retain(|n| n.extension.is_audio || n.extension.is_video);

        match self
            .negotiated_header_extensions
            .iter_mut()
            .find(|n| n.id == id && n.extension.uri == uri)
        {
            Some(negotiated) => negotiated.extension.set_kind(typ, true),
            None => {
                let mut extension = MediaEngineHeaderExtension {
                    uri: uri.to_owned(),
                    allowed_direction: local.allowed_direction,
                    ..Default::default()
                };
                extension.set_kind(typ, true);

                let index = self
                    .negotiated_header_extensions
                    .partition_point(|n| n.id < id);
                self.negotiated_header_extensions
                    .insert(index, NegotiatedHeaderExtension { id, extension });
            }
        }

        Ok(())
    }

    /// Looks up a codec by payload type, negotiated codecs first. The registry is
    /// only consulted for kinds that have not been negotiated.
    pub(crate) fn get_codec_by_payload(
        &self,
        media_engine: &MediaEngine,
        payload_type: PayloadType,
    ) -> Result<(RTCRtpCodecParameters, RtpCodecKind)> {
        for typ in [RtpCodecKind::Video, RtpCodecKind::Audio] {
            if self.is_negotiated(typ)
                && let Some(codec) = self
                    .negotiated_codecs(typ)
                    .iter()
                    .find(|c| c.parameters.payload_type == payload_type)
            {
                return Ok((codec.parameters.clone(), typ));
            }
        }

        for typ in [RtpCodecKind::Video, RtpCodecKind::Audio] {
            if !self.is_negotiated(typ)
                && let Some(codec) = media_engine
                    .classified_codecs(typ)
                    .iter()
                    .find(|c| c.parameters.payload_type == payload_type)
            {
                return Ok((codec.parameters.clone(), typ));
            }
        }

        Err(Error::ErrCodecNotFound)
    }

    /// Returns the negotiated ID of `uri` and whether it is negotiated for audio
    /// and video. The ID is 0 if the extension was not negotiated.
    pub(crate) fn get_header_extension_id(&self, uri: &str) -> (u16, bool, bool) {
        let mut result = (0, false, false);
        for negotiated in self
            .negotiated_header_extensions
            .iter()
            .filter(|n| n.extension.uri == uri)
        {
            if result.0 == 0 {
                result.0 = negotiated.id;
            }
            result.1 |= negotiated.extension.is_audio;
            result.2 |= negotiated.extension.is_video;
        }
        result
    }

    pub(crate) fn get_header_extension_id_for_kind(
        &self,
        uri: &str,
        typ: RtpCodecKind,
    ) -> Option<u16> {
        self.negotiated_header_extensions
            .iter()
            .find(|n| n.extension.uri == uri && n.extension.is_kind(typ))
            .map(|n| n.id)
    }

    /// Negotiated codecs if `typ` was negotiated, registered codecs otherwise.
    pub(crate) fn get_codecs_by_kind(
        &self,
        media_engine: &MediaEngine,
        typ: RtpCodecKind,
    ) -> Vec<RTCRtpCodecParameters> {
        let codecs = if self.is_negotiated(typ) {
            self.negotiated_codecs(typ)
        } else {
            media_engine.classified_codecs(typ)
        };
        codecs.iter().map(|c| c.parameters.clone()).collect()
    }

    /// Codecs and header extensions usable for kind `typ` on a transceiver
    /// allowing `directions`.
    ///
    /// Once `typ` is negotiated only negotiated extensions are listed. Before that
    /// every registered extension of `typ` is listed under its negotiated ID if it
    /// has one, otherwise under the lowest ID no other extension uses.
    pub(crate) fn get_rtp_parameters_by_kind(
        &self,
        media_engine: &MediaEngine,
        typ: RtpCodecKind,
        directions: &[RTCRtpTransceiverDirection],
    ) -> RTCRtpParameters {
        let mut header_extensions = vec![];

        if self.is_negotiated(typ) {
            for negotiated in &self.negotiated_header_extensions {
                if negotiated.extension.is_kind(typ)
                    && negotiated.extension.is_matching_direction(directions)
                {
                    header_extensions.push(RTCRtpHeaderExtensionParameters {
                        uri: negotiated.extension.uri.clone(),
                        id: negotiated.id,
                    });
                }
            }
        } else {
            let mut assigned: Vec<(u16, &MediaEngineHeaderExtension)> = vec![];
            for ext in &media_engine.header_extensions {
                let negotiated_id = self
                    .get_header_extension_id_for_kind(&ext.uri, typ)
                    .or_else(|| match self.get_header_extension_id(&ext.uri) {
                        (0, _, _) => None,
                        (id, _, _) => Some(id),
                    });

                let id = negotiated_id.or_else(|| {
                    (1..=MAX_HEADER_EXTENSION_ID).find(|id| {
                        !assigned.iter().any(|(assigned_id, _)| assigned_id == id)
                            && !self
                                .negotiated_header_extensions
                                .iter()
                                .any(|n| n.id == *id)
                    })
                });

                match id {
                    Some(id) => assigned.push((id, ext)),
                    None => trace!("no free header extension ID for {}", ext.uri),
                }
            }
            assigned.sort_by_key(|(id, _)| *id);

            for (id, ext) in assigned {
                if ext.is_kind(typ) && ext.is_matching_direction(directions) {
                    header_extensions.push(RTCRtpHeaderExtensionParameters {
                        uri: ext.uri.clone(),
                        id,
                    });
                }
            }
        }

        RTCRtpParameters {
            header_extensions,
            codecs: self.get_codecs_by_kind(media_engine, typ),
        }
    }

    /// The codec of `payload_type` together with the negotiated header
    /// extensions of its kind.
    pub(crate) fn get_rtp_parameters_by_payload_type(
        &self,
        media_engine: &MediaEngine,
        payload_type: PayloadType,
    ) -> Result<RTCRtpParameters> {
        let (codec, typ) = self.get_codec_by_payload(media_engine, payload_type)?;

        let header_extensions = self
            .negotiated_header_extensions
            .iter()
            .filter(|n| n.extension.is_kind(typ))
            .map(|n| RTCRtpHeaderExtensionParameters {
                uri: n.extension.uri.clone(),
                id: n.id,
            })
            .collect();

        Ok(RTCRtpParameters {
            header_extensions,
            codecs: vec![codec],
        })
    }

    pub(crate) fn is_rtx_enabled(
        &self,
        media_engine: &MediaEngine,
        typ: RtpCodecKind,
        directions: &[RTCRtpTransceiverDirection],
    ) -> bool {
        self.get_rtp_parameters_by_kind(media_engine, typ, directions)
            .codecs
            .iter()
            .any(|codec| {
                UniCase::new(codec.rtp_codec.mime_type.as_str()) == UniCase::new(MIME_TYPE_RTX)
            })
    }

    pub(crate) fn is_fec_enabled(
        &self,
        media_engine: &MediaEngine,
        typ: RtpCodecKind,
        directions: &[RTCRtpTransceiverDirection],
    ) -> bool {
        self.get_rtp_parameters_by_kind(media_engine, typ, directions)
            .codecs
            .iter()
            .any(|codec| codec.rtp_codec.mime_type.to_ascii_lowercase().contains("fec"))
    }
}
