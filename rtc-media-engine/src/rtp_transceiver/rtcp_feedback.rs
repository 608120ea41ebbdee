use serde::{Deserialize, Serialize};

/// Transport-wide congestion control feedback type
pub const TYPE_RTCP_FB_TRANSPORT_CC: &str = "transport-cc";

/// Google REMB (Receiver Estimated Maximum Bitrate) feedback type
pub const TYPE_RTCP_FB_GOOG_REMB: &str = "goog-remb";

/// Acknowledgment feedback type
pub const TYPE_RTCP_FB_ACK: &str = "ack";

/// Codec Control Message feedback type
pub const TYPE_RTCP_FB_CCM: &str = "ccm";

/// Negative Acknowledgment feedback type
pub const TYPE_RTCP_FB_NACK: &str = "nack";

/// RTCP feedback mechanism advertised by a codec.
///
/// Only recorded, never interpreted: feedback does not take part in codec
/// matching. For example `typ="nack" parameter="pli"` advertises Picture Loss
/// Indication support.
///
/// ## Specifications
///
/// * [ORTC](https://draft.ortc.org/#dom-rtcrtcpfeedback)
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RTCPFeedback {
    /// The type of feedback mechanism.
    ///
    /// Valid values: `ack`, `ccm`, `nack`, `goog-remb`, `transport-cc`
    pub typ: String,

    /// Additional parameter specific to the feedback type, empty if none.
    #[serde(default)]
    pub parameter: String,
}

impl RTCPFeedback {
    pub fn new(typ: &str, parameter: &str) -> Self {
        RTCPFeedback {
            typ: typ.to_owned(),
            parameter: parameter.to_owned(),
        }
    }
}

/// Computes the intersection of two RTCP feedback lists.
///
/// Keeps the entries of `a`, in order, that also appear in `b` with the same
/// type and parameter.
pub(crate) fn rtcp_feedback_intersection(
    a: &[RTCPFeedback],
    b: &[RTCPFeedback],
) -> Vec<RTCPFeedback> {
    a.iter()
        .filter(|a_feedback| {
            b.iter().any(|b_feedback| {
                a_feedback.typ == b_feedback.typ && a_feedback.parameter == b_feedback.parameter
            })
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rtcp_feedback_intersection() {
        let local = vec![
            RTCPFeedback::new(TYPE_RTCP_FB_GOOG_REMB, ""),
            RTCPFeedback::new(TYPE_RTCP_FB_NACK, ""),
            RTCPFeedback::new(TYPE_RTCP_FB_NACK, "pli"),
        ];
        let remote = vec![
            RTCPFeedback::new(TYPE_RTCP_FB_NACK, "pli"),
            RTCPFeedback::new(TYPE_RTCP_FB_TRANSPORT_CC, ""),
            RTCPFeedback::new(TYPE_RTCP_FB_NACK, ""),
        ];

        assert_eq!(
            rtcp_feedback_intersection(&local, &remote),
            vec![
                RTCPFeedback::new(TYPE_RTCP_FB_NACK, ""),
                RTCPFeedback::new(TYPE_RTCP_FB_NACK, "pli"),
            ]
        );
        assert!(rtcp_feedback_intersection(&local, &[]).is_empty());
    }
}
