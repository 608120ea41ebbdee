//! Matching of remote media sections against the capability registry.
//!
//! For every audio/video section the remote payload types are matched against the
//! registered codecs of the same kind:
//!
//! 1. Media codecs are compared on mime type, clock rate and channels, then
//!    ranked by [`FmtpMatch`]. An exact match beats a compatible one; an
//!    incompatible candidate is never selected.
//! 2. A compatible match is dropped when another remote payload type of the same
//!    section matched the same local codec exactly.
//! 3. A retransmission codec is negotiated only if its associated payload type
//!    matched exactly, and only against a local retransmission codec associated
//!    with that same local codec.
//! 4. A section that negotiates nothing fails the whole pass with
//!    [`Error::ErrNoCommonCodec`].
//!
//! Header extensions of a section are bound to the remote extmap IDs when they
//! are registered for the section's kind and allowed on the caller's directions.

pub(crate) mod state;


use crate::configuration::media_engine::MediaEngine;
use crate::rtp_transceiver::fmtp::{
    FMTP_APT, Fmtp, FmtpMatch, codec_tuple_matches, fmtp_equivalence, with_apt,
};
use crate::rtp_transceiver::rtcp_feedback::rtcp_feedback_intersection;
use crate::rtp_transceiver::rtp_codec::{ClassifiedCodec, CodecClass};
use crate::rtp_transceiver::{RTCRtpTransceiverDirection, RtpCodecKind};
use crate::sdp::{RemoteMediaDescription, RemoteSessionDescription};
use log::{debug, trace, warn};
use shared::error::{Error, Result};
use state::NegotiatedState;

/// Largest ID usable by a two-byte RTP header extension.
const MAX_EXTMAP_ID: u16 = 255;

/// Best local candidate found for one remote media codec.
#[derive(Debug, Copy, Clone)]
struct CodecMatch {
    remote: usize,
    local: usize,
    quality: FmtpMatch,
}

/// Reconciles remote descriptions with one capability registry.
pub(crate) struct Negotiator<'a> {
    media_engine: &'a MediaEngine,
    compatibility_mode: bool,
}

impl<'a> Negotiator<'a> {
    pub(crate) fn new(media_engine: &'a MediaEngine, compatibility_mode: bool) -> Self {
        Negotiator {
            media_engine,
            compatibility_mode,
        }
    }

    /// Negotiates `remote` on top of `current` and returns the resulting state.
    /// `current` is left untouched, so a failed pass has no effect.
    pub(crate) fn negotiate(
        &self,
        current: &NegotiatedState,
        remote: &RemoteSessionDescription,
        directions: &[RTCRtpTransceiverDirection],
    ) -> Result<NegotiatedState> {
        let mut next = current.clone();

        for media in &remote.media_descriptions {
            let typ = media.kind();
            if typ == RtpCodecKind::Unspecified {
                trace!("skipping {} media section", media.media);
                continue;
            }

            if current.is_negotiated(typ) && !self.compatibility_mode {
                trace!("{typ} already negotiated, refreshing header extensions only");
            } else {
                let codecs = self.match_codecs(media, typ);
                if codecs.is_empty() {
                    debug!("no common codec for {typ} media section");
                    return Err(Error::ErrNoCommonCodec(typ.to_string()));
                }

                debug!(
                    "negotiated {typ} payload types {:?}",
                    codecs
                        .iter()
                        .map(|c| c.parameters.payload_type)
                        .collect::<Vec<_>>()
                );
                if next.push_codecs(codecs, typ) > 0 {
                    next.set_negotiated(typ);
                } else if !next.is_negotiated(typ) {
                    debug!("every {typ} payload type is already taken by another kind");
                    return Err(Error::ErrNoCommonCodec(typ.to_string()));
                }
            }

            self.update_header_extensions(&mut next, media, typ, directions)?;
        }

        Ok(next)
    }

    /// Matches the codecs of one media section, returning negotiated entries in
    /// remote order.
    fn match_codecs(&self, media: &RemoteMediaDescription, typ: RtpCodecKind) -> Vec<ClassifiedCodec> {
        let local_codecs = self.media_engine.classified_codecs(typ);
        let remote_codecs = media.classified_codecs();

        let mut matches: Vec<CodecMatch> = remote_codecs
            .iter()
            .enumerate()
            .filter(|(_, remote)| !remote.class.is_retransmission())
            .filter_map(|(remote_index, remote)| {
                let best = Self::best_media_match(remote, local_codecs);
                if best.is_none() {
                    trace!(
                        "remote {} payload type {} has no matching codec",
                        remote.parameters.rtp_codec.mime_type, remote.parameters.payload_type
                    );
                }
                best.map(|(local, quality)| CodecMatch {
                    remote: remote_index,
                    local,
                    quality,
                })
            })
            .collect();

        // exact matches win over compatible ones for the same local codec
        let exact_locals: Vec<usize> = matches
            .iter()
            .filter(|m| m.quality == FmtpMatch::Exact)
            .map(|m| m.local)
            .collect();
        matches.retain(|m| {
            let keep = m.quality == FmtpMatch::Exact || !exact_locals.contains(&m.local);
            if !keep {
                trace!(
                    "dropping payload type {} in favor of an exact match",
                    remote_codecs[m.remote].parameters.payload_type
                );
            }
            keep
        });

        let mut negotiated = Vec::with_capacity(remote_codecs.len());
        for (remote_index, remote) in remote_codecs.iter().enumerate() {
            match remote.class {
                CodecClass::Media => {
                    if let Some(m) = matches.iter().find(|m| m.remote == remote_index) {
                        negotiated.push(Self::negotiated_codec(&local_codecs[m.local], remote));
                    }
                }
                CodecClass::Retransmission { apt } => {
                    if let Some(codec) = Self::match_retransmission(
                        remote,
                        apt,
                        &remote_codecs,
                        &matches,
                        local_codecs,
                    ) {
                        negotiated.push(codec);
                    }
                }
            }
        }

        negotiated
    }

    /// Returns the first local media codec with the best format-parameter match.
    fn best_media_match(
        remote: &ClassifiedCodec,
        local_codecs: &[ClassifiedCodec],
    ) -> Option<(usize, FmtpMatch)> {
        let mut best: Option<(usize, FmtpMatch)> = None;

        for (index, local) in local_codecs.iter().enumerate() {
            if local.class.is_retransmission()
                || !codec_tuple_matches(&local.parameters.rtp_codec, &remote.parameters.rtp_codec)
            {
                continue;
            }

            let quality = fmtp_equivalence(
                &local.parameters.rtp_codec.mime_type,
                &local.parameters.rtp_codec.sdp_fmtp_line,
                &remote.parameters.rtp_codec.sdp_fmtp_line,
            );
            trace!(
                "remote payload type {} vs local {}: {:?}",
                remote.parameters.payload_type, local.parameters.payload_type, quality
            );

            match (quality, best) {
                (FmtpMatch::Incompatible, _) => {}
                (_, Some((_, best_quality))) if best_quality >= quality => {}
                _ => best = Some((index, quality)),
            }
            if quality == FmtpMatch::Exact {
                break;
            }
        }

        best
    }

    fn match_retransmission(
        remote: &ClassifiedCodec,
        apt: Option<u8>,
        remote_codecs: &[ClassifiedCodec],
        matches: &[CodecMatch],
        local_codecs: &[ClassifiedCodec],
    ) -> Option<ClassifiedCodec> {
        let payload_type = remote.parameters.payload_type;
        let Some(apt) = apt else {
            warn!("ignoring retransmission payload type {payload_type} without apt");
            return None;
        };

        let Some(target) = matches
            .iter()
            .find(|m| remote_codecs[m.remote].parameters.payload_type == apt)
        else {
            trace!("retransmission payload type {payload_type} repairs unmatched {apt}");
            return None;
        };
        if target.quality != FmtpMatch::Exact {
            trace!("retransmission payload type {payload_type} repairs fuzzy match {apt}");
            return None;
        }

        let target_local_payload_type = local_codecs[target.local].parameters.payload_type;
        let remote_fmtp = Fmtp::parse(&remote.parameters.rtp_codec.sdp_fmtp_line).without(FMTP_APT);

        let local = local_codecs.iter().find(|local| {
            local.class
                == CodecClass::Retransmission {
                    apt: Some(target_local_payload_type),
                }
                && codec_tuple_matches(&local.parameters.rtp_codec, &remote.parameters.rtp_codec)
                && Fmtp::parse(&local.parameters.rtp_codec.sdp_fmtp_line)
                    .without(FMTP_APT)
                    .equivalence(&remote_fmtp)
                    != FmtpMatch::Incompatible
        });

        match local {
            Some(local) => {
                let mut codec = Self::negotiated_codec(local, remote);
                codec.parameters.rtp_codec.sdp_fmtp_line =
                    with_apt(&local.parameters.rtp_codec.sdp_fmtp_line, apt);
                codec.class = CodecClass::Retransmission { apt: Some(apt) };
                Some(codec)
            }
            None => {
                trace!(
                    "no local retransmission codec for payload type {target_local_payload_type}"
                );
                None
            }
        }
    }

    /// The local codec as seen on this connection: the remote payload type and
    /// mime casing, with the feedback both sides support.
    fn negotiated_codec(local: &ClassifiedCodec, remote: &ClassifiedCodec) -> ClassifiedCodec {
        let mut codec = local.clone();
        codec.parameters.payload_type = remote.parameters.payload_type;
        codec.parameters.rtp_codec.mime_type = remote.parameters.rtp_codec.mime_type.clone();
        codec.parameters.rtp_codec.rtcp_feedback = rtcp_feedback_intersection(
            &local.parameters.rtp_codec.rtcp_feedback,
            &remote.parameters.rtp_codec.rtcp_feedback,
        );
        codec
    }

    fn update_header_extensions(
        &self,
        state: &mut NegotiatedState,
        media: &RemoteMediaDescription,
        typ: RtpCodecKind,
        directions: &[RTCRtpTransceiverDirection],
    ) -> Result<()> {
        for extmap in &media.extmaps {
            if extmap.direction == Some(RTCRtpTransceiverDirection::Inactive) {
                trace!("skipping inactive header extension {}", extmap.uri);
                continue;
            }
            if extmap.id == 0 || extmap.id > MAX_EXTMAP_ID {
                warn!("ignoring header extension {} with invalid id {}", extmap.uri, extmap.id);
                continue;
            }

            let allowed = self.media_engine.header_extensions.iter().any(|ext| {
                ext.uri == extmap.uri && ext.is_kind(typ) && ext.is_matching_direction(directions)
            });
            if allowed {
                state.update_header_extension(self.media_engine, extmap.id, &extmap.uri, typ)?;
            } else {
                trace!("skipping header extension {} for {typ}", extmap.uri);
            }
        }

        Ok(())
    }
}
