use crate::configuration::UNSPECIFIED_STR;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of media flow for an RTP transceiver.
///
/// Besides describing a transceiver, a direction is used to restrict a registered
/// header extension to one side of the media flow, and as the set of directions a
/// negotiation call currently accepts.
///
/// # Specification
///
/// See [RTCRtpTransceiverDirection](https://www.w3.org/TR/webrtc/#dom-rtcrtptransceiverdirection)
/// in the W3C WebRTC specification.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RTCRtpTransceiverDirection {
    /// Direction is not specified (internal use only).
    #[default]
    Unspecified,

    /// Transceiver will both send and receive RTP media.
    Sendrecv,

    /// Transceiver will only send RTP media.
    Sendonly,

    /// Transceiver will only receive RTP media.
    Recvonly,

    /// Transceiver will neither send nor receive RTP media.
    Inactive,
}

/// Parses the direction token of an `a=sendrecv`-style attribute or of an
/// `a=extmap` line. Unknown tokens map to `Unspecified`.
impl From<&str> for RTCRtpTransceiverDirection {
    fn from(raw: &str) -> Self {
        [Self::Sendrecv, Self::Sendonly, Self::Recvonly, Self::Inactive]
            .into_iter()
            .find(|dir| dir.as_str().eq_ignore_ascii_case(raw.trim()))
            .unwrap_or_default()
    }
}

impl fmt::Display for RTCRtpTransceiverDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RTCRtpTransceiverDirection {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Sendrecv => "sendrecv",
            Self::Sendonly => "sendonly",
            Self::Recvonly => "recvonly",
            Self::Inactive => "inactive",
            Self::Unspecified => UNSPECIFIED_STR,
        }
    }

    /// Returns true if this direction includes sending media.
    pub fn has_send(&self) -> bool {
        matches!(self, Self::Sendrecv | Self::Sendonly)
    }

    /// Returns true if this direction includes receiving media.
    pub fn has_recv(&self) -> bool {
        matches!(self, Self::Sendrecv | Self::Recvonly)
    }

    /// Returns true if the direction may be used to restrict a header extension.
    ///
    /// Only a single-sided direction is a restriction; sendrecv, inactive and
    /// unspecified are not.
    pub fn is_restriction(&self) -> bool {
        matches!(self, Self::Sendonly | Self::Recvonly)
    }

    /// Returns true if `self`, used as a restriction, overlaps with any of `allowed`.
    pub(crate) fn intersects(&self, allowed: &[RTCRtpTransceiverDirection]) -> bool {
        allowed
            .iter()
            .any(|dir| self.has_send() && dir.has_send() || self.has_recv() && dir.has_recv())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_direction_attribute_token() {
        use RTCRtpTransceiverDirection::*;

        for dir in [Sendrecv, Sendonly, Recvonly, Inactive] {
            assert_eq!(RTCRtpTransceiverDirection::from(dir.to_string().as_str()), dir);
        }
        assert_eq!(RTCRtpTransceiverDirection::from(" RecvOnly"), Recvonly);
        assert_eq!(RTCRtpTransceiverDirection::from("sendrecv/2"), Unspecified);
        assert_eq!(Unspecified.to_string(), "Unspecified");
    }

    #[test]
    fn test_rtp_transceiver_direction_is_restriction() {
        use RTCRtpTransceiverDirection::*;

        assert!(Sendonly.is_restriction());
        assert!(Recvonly.is_restriction());
        assert!(!Sendrecv.is_restriction());
        assert!(!Inactive.is_restriction());
        assert!(!Unspecified.is_restriction());
    }

    #[test]
    fn test_rtp_transceiver_direction_intersects() {
        use RTCRtpTransceiverDirection::*;

        let tests = vec![
            (Recvonly, vec![Recvonly], true),
            (Recvonly, vec![Sendonly], false),
            (Recvonly, vec![Sendrecv], true),
            (Sendonly, vec![Recvonly, Sendonly], true),
            (Sendonly, vec![Inactive], false),
            (Sendonly, vec![], false),
        ];

        for (restriction, allowed, expected) in tests {
            assert_eq!(
                restriction.intersects(&allowed),
                expected,
                "{restriction} against {allowed:?}"
            );
        }
    }
}
