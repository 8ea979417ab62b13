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

//! The call manager seam.
//!
//! The telephony framework owns the calls and performs every operation on them. Queries have
//! default implementations resolved against the call manager's [`CallArena`], following the usual
//! rule that only top-level calls (calls without a conference parent) are candidates.

use serde::Deserialize;

use crate::call::{CallArena, CallId, CallState};

/// Video state requested when answering a call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoState {
    #[default]
    AudioOnly,
    TxEnabled,
    RxEnabled,
    Bidirectional,
}

/// Interface to the call manager.
pub trait CallsManager {
    /// All calls currently known, in the call manager's order.
    fn calls(&self) -> &CallArena;

    fn get_calls(&self) -> Vec<CallId> {
        self.calls().iter().map(|c| c.id).collect()
    }

    fn get_active_call(&self) -> Option<CallId> {
        self.calls().first_top_level_with_state(&[CallState::Active])
    }

    fn get_ringing_call(&self) -> Option<CallId> {
        self.calls().first_top_level_with_state(&[CallState::Ringing])
    }

    fn get_held_call(&self) -> Option<CallId> {
        self.calls().first_top_level_with_state(&[CallState::OnHold])
    }

    fn get_outgoing_call(&self) -> Option<CallId> {
        self.calls().iter().find(|c| c.parent.is_none() && c.state.is_outgoing()).map(|c| c.id)
    }

    /// The target of single-call commands: active, then held, then ringing, then outgoing.
    fn get_foreground_call(&self) -> Option<CallId> {
        self.get_active_call()
            .or_else(|| self.get_held_call())
            .or_else(|| self.get_ringing_call())
            .or_else(|| self.get_outgoing_call())
    }

    fn get_num_held_calls(&self) -> usize {
        self.calls().count_top_level_with_state(CallState::OnHold)
    }

    fn answer_call(&mut self, call: CallId, video_state: VideoState);

    fn reject_call(&mut self, call: CallId, reject_with_message: bool, message: Option<String>);

    fn disconnect_call(&mut self, call: CallId);

    fn hold_call(&mut self, call: CallId);

    fn unhold_call(&mut self, call: CallId);

    /// Conferences two individual calls together.
    fn conference(&mut self, call: CallId, other: CallId);

    /// Merges the calls of a conference-capable call (CDMA three-way).
    fn merge_conference(&mut self, call: CallId);

    /// Swaps the foreground leg of a conference-capable call (CDMA three-way).
    fn swap_conference(&mut self, call: CallId);

    fn play_dtmf_tone(&mut self, call: CallId, digit: char);

    fn stop_dtmf_tone(&mut self, call: CallId);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::Call;
    use crate::mocks::mock_calls_manager::MockCallsManager;

    #[test]
    fn test_foreground_priority() {
        let (mut manager, _rx) = MockCallsManager::new();
        manager.calls_mut().insert(Call::new(CallId(1), CallState::Dialing));
        assert_eq!(manager.get_foreground_call(), Some(CallId(1)));

        manager.calls_mut().insert(Call::new(CallId(2), CallState::Ringing));
        assert_eq!(manager.get_foreground_call(), Some(CallId(2)));

        manager.calls_mut().insert(Call::new(CallId(3), CallState::OnHold));
        assert_eq!(manager.get_foreground_call(), Some(CallId(3)));

        manager.calls_mut().insert(Call::new(CallId(4), CallState::Active));
        assert_eq!(manager.get_foreground_call(), Some(CallId(4)));
    }

    #[test]
    fn test_outgoing_states() {
        let (mut manager, _rx) = MockCallsManager::new();
        manager.calls_mut().insert(Call::new(CallId(1), CallState::SelectPhoneAccount));
        assert_eq!(manager.get_outgoing_call(), Some(CallId(1)));

        manager.calls_mut().insert(Call::new(CallId(1), CallState::Disconnected));
        assert_eq!(manager.get_outgoing_call(), None);
    }

    #[test]
    fn test_held_children_not_counted() {
        let (mut manager, _rx) = MockCallsManager::new();
        manager.calls_mut().insert(Call::new(CallId(1), CallState::Active));
        manager.calls_mut().insert(Call::new(CallId(2), CallState::OnHold));
        manager.calls_mut().insert(Call::new(CallId(3), CallState::OnHold));
        manager.calls_mut().link_child(CallId(1), CallId(2));

        assert_eq!(manager.get_held_call(), Some(CallId(3)));
        assert_eq!(manager.get_num_held_calls(), 1);
    }
}
