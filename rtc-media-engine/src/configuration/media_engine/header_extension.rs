use crate::rtp_transceiver::RTCRtpTransceiverDirection;
use crate::rtp_transceiver::rtp_codec::RtpCodecKind;

/// Largest ID usable by a one-byte RTP header extension.
pub(crate) const MAX_HEADER_EXTENSION_ID: u16 = 14;

/// A header extension known to the engine, either registered locally or
/// negotiated with a remote peer.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub(crate) struct MediaEngineHeaderExtension {
    pub(crate) uri: String,
    pub(crate) is_audio: bool,
    pub(crate) is_video: bool,
    /// If set only transceivers overlapping this direction may use the extension.
    pub(crate) allowed_direction: Option<RTCRtpTransceiverDirection>,
}

impl MediaEngineHeaderExtension {
    pub(crate) fn is_kind(&self, typ: RtpCodecKind) -> bool {
        match typ {
            RtpCodecKind::Audio => self.is_audio,
            RtpCodecKind::Video => self.is_video,
            RtpCodecKind::Unspecified => false,
        }
    }

    pub(crate) fn set_kind(&mut self, typ: RtpCodecKind, enabled: bool) {
        match typ {
            RtpCodecKind::Audio => self.is_audio = enabled,
            RtpCodecKind::Video => self.is_video = enabled,
            RtpCodecKind::Unspecified => {}
        }
    }

    /// Returns true if any of `allowed` may use this extension.
    /// An unrestricted extension matches every direction set.
    pub(crate) fn is_matching_direction(&self, allowed: &[RTCRtpTransceiverDirection]) -> bool {
        match self.allowed_direction {
            Some(direction) => direction.intersects(allowed),
            None => true,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_header_extension_matching_direction() {
        use RTCRtpTransceiverDirection::*;

        let unrestricted = MediaEngineHeaderExtension {
            uri: "urn:ietf:params:rtp-hdrext:sdes:mid".to_owned(),
            is_audio: true,
            ..Default::default()
        };
        let recv_only = MediaEngineHeaderExtension {
            allowed_direction: Some(Recvonly),
            ..unrestricted.clone()
        };

        assert!(unrestricted.is_matching_direction(&[Recvonly]));
        assert!(unrestricted.is_matching_direction(&[]));
        assert!(recv_only.is_matching_direction(&[Recvonly]));
        assert!(recv_only.is_matching_direction(&[Sendrecv]));
        assert!(!recv_only.is_matching_direction(&[Sendonly]));
        assert!(!recv_only.is_matching_direction(&[Inactive]));
    }

    #[test]
    fn test_header_extension_kind() {
        let mut ext = MediaEngineHeaderExtension::default();
        ext.set_kind(RtpCodecKind::Video, true);

        assert!(ext.is_kind(RtpCodecKind::Video));
        assert!(!ext.is_kind(RtpCodecKind::Audio));
        assert!(!ext.is_kind(RtpCodecKind::Unspecified));

        ext.set_kind(RtpCodecKind::Video, false);
        assert!(!ext.is_kind(RtpCodecKind::Video));
    }
}
