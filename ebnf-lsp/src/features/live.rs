//! Live sample tester protocol
//!
//! The client keeps a sample text next to each grammar document and sends it with
//! `ebnf/didChangeSample`. The server answers through `ebnf/matchHighlights`, once per phase:
//! matched segments right away, unmatched ones after the debounce interval. Segment offsets are
//! UTF-8 byte offsets into the sample text.

use ebnf_analysis::{HighlightSink, MatchSegment, Phase};
use lsp_types::notification::Notification;
use lsp_types::Url;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

pub const DID_CHANGE_SAMPLE: &str = "ebnf/didChangeSample";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DidChangeSampleParams {
    pub uri: Url,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchHighlightsParams {
    pub uri: Url,
    pub phase: Phase,
    pub segments: Vec<MatchSegment>,
}

#[derive(Debug)]
pub enum MatchHighlights {}

impl Notification for MatchHighlights {
    type Params = MatchHighlightsParams;
    const METHOD: &'static str = "ebnf/matchHighlights";
}

/// Queues highlight updates for the task that forwards them to the client.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: UnboundedSender<MatchHighlightsParams>,
}

impl ChannelSink {
    pub fn new(sender: UnboundedSender<MatchHighlightsParams>) -> Self {
        Self { sender }
    }
}

impl HighlightSink<Url> for ChannelSink {
    fn show(&self, key: &Url, phase: Phase, segments: &[MatchSegment]) {
        let params = MatchHighlightsParams {
            uri: key.clone(),
            phase,
            segments: segments.to_vec(),
        };
        if self.sender.send(params).is_err() {
            log::debug!("highlight forwarder is gone, dropping update for {key}");
        }
    }
}
