// Copyright 2022, The Android Open Source Project
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Mocked implementation of CallsManager for use in test

use tokio::sync::mpsc::{self, unbounded_channel, UnboundedReceiver};

use crate::call::{CallArena, CallId};
use crate::calls_manager::{CallsManager, VideoState};

/// Serves queries from an owned CallArena and routes every operation into a channel of
/// MockCallsManagerEvents. Operations do not change the calls.
pub struct MockCallsManager {
    calls: CallArena,
    tx: mpsc::UnboundedSender<MockCallsManagerEvents>,
}

impl MockCallsManager {
    /// Constructor. Returns self and the RX side of the associated channel.
    pub fn new() -> (Self, UnboundedReceiver<MockCallsManagerEvents>) {
        let (tx, rx) = unbounded_channel();
        (Self { calls: CallArena::new(), tx }, rx)
    }

    /// Gives tests write access to the calls served by the mock.
    pub fn calls_mut(&mut self) -> &mut CallArena {
        &mut self.calls
    }

    fn send(&self, event: MockCallsManagerEvents) {
        // The receiver may be gone when a test only inspects queries.
        let _ = self.tx.send(event);
    }
}

/// Events representing calls to CallsManager operations
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockCallsManagerEvents {
    /// CallsManager#answer_call invoked
    AnswerCall(CallId, VideoState),
    /// CallsManager#reject_call invoked
    RejectCall(CallId, bool, Option<String>),
    /// CallsManager#disconnect_call invoked
    DisconnectCall(CallId),
    /// CallsManager#hold_call invoked
    HoldCall(CallId),
    /// CallsManager#unhold_call invoked
    UnholdCall(CallId),
    /// CallsManager#conference invoked
    Conference(CallId, CallId),
    /// CallsManager#merge_conference invoked
    MergeConference(CallId),
    /// CallsManager#swap_conference invoked
    SwapConference(CallId),
    /// CallsManager#play_dtmf_tone invoked
    PlayDtmfTone(CallId, char),
    /// CallsManager#stop_dtmf_tone invoked
    StopDtmfTone(CallId),
}

impl CallsManager for MockCallsManager {
    fn calls(&self) -> &CallArena {
        &self.calls
    }

    fn answer_call(&mut self, call: CallId, video_state: VideoState) {
        self.send(MockCallsManagerEvents::AnswerCall(call, video_state));
    }

    fn reject_call(&mut self, call: CallId, reject_with_message: bool, message: Option<String>) {
        self.send(MockCallsManagerEvents::RejectCall(call, reject_with_message, message));
    }

    fn disconnect_call(&mut self, call: CallId) {
        self.send(MockCallsManagerEvents::DisconnectCall(call));
    }

    fn hold_call(&mut self, call: CallId) {
        self.send(MockCallsManagerEvents::HoldCall(call));
    }

    fn unhold_call(&mut self, call: CallId) {
        self.send(MockCallsManagerEvents::UnholdCall(call));
    }

    fn conference(&mut self, call: CallId, other: CallId) {
        self.send(MockCallsManagerEvents::Conference(call, other));
    }

    fn merge_conference(&mut self, call: CallId) {
        self.send(MockCallsManagerEvents::MergeConference(call));
    }

    fn swap_conference(&mut self, call: CallId) {
        self.send(MockCallsManagerEvents::SwapConference(call));
    }

    fn play_dtmf_tone(&mut self, call: CallId, digit: char) {
        self.send(MockCallsManagerEvents::PlayDtmfTone(call, digit));
    }

    fn stop_dtmf_tone(&mut self, call: CallId) {
        self.send(MockCallsManagerEvents::StopDtmfTone(call));
    }
}
