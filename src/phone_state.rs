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

//! Computes the aggregate phone state and decides when the headset needs to hear about it.

use log::debug;

use crate::call::{CallCapability, CallId, CallState};
use crate::calls_manager::CallsManager;
use crate::hfp::{toa_from_number, BtCallState, PhoneStateSnapshot, PHONE_STATE_NO_NUMBER_TYPE};

/// Computes the phone state from the current calls.
///
/// Only INCOMING, DIALING, ALERTING and IDLE are ever reported here; ACTIVE, HELD and WAITING
/// exist for CLCC only and confuse headsets when sent as a phone state.
pub fn compute_snapshot<M: CallsManager + ?Sized>(manager: &M) -> PhoneStateSnapshot {
    let calls = manager.calls();
    let active = manager.get_active_call().and_then(|id| calls.get(id));
    let ringing = manager.get_ringing_call().and_then(|id| calls.get(id));
    let outgoing = manager.get_outgoing_call().and_then(|id| calls.get(id));

    let state = match (ringing, outgoing) {
        (Some(_), _) => BtCallState::Incoming,
        (None, Some(call)) if call.state == CallState::Dialing => BtCallState::Alerting,
        (None, Some(_)) => BtCallState::Dialing,
        (None, None) => BtCallState::Idle,
    };

    let (number, number_type) = match ringing.and_then(|call| call.handle_number()) {
        Some(number) => {
            let number_type = toa_from_number(&number);
            (number, number_type)
        }
        None => (String::new(), PHONE_STATE_NO_NUMBER_TYPE),
    };

    // Headsets only track whether a call is active; a conference counts once however many legs.
    let num_active = if active.is_some() { 1 } else { 0 };
    let mut num_held = manager.get_num_held_calls() as u32;

    // A CDMA conference keeps its second leg "inside" the active call. Report it as held so the
    // headset offers swap and merge.
    if let Some(conference) = active.filter(|call| call.has_conference_children()) {
        if conference.can(CallCapability::SWAP_CONFERENCE) {
            num_held = if conference.was_conference_previously_merged { 0 } else { 1 };
        } else if conference.can(CallCapability::MERGE_CONFERENCE) {
            num_held = 1;
        }
    }

    PhoneStateSnapshot { num_active, num_held, state, number, number_type }
}

/// Whether the conference links are settled enough to report a phone state.
pub fn is_topology_settled<M: CallsManager + ?Sized>(manager: &M) -> bool {
    manager.calls().is_topology_consistent()
}

/// Remembers what was last sent to the headset and filters out updates it has already seen.
#[derive(Debug, Default)]
pub struct PhoneStateTracker {
    last: Option<PhoneStateSnapshot>,
    last_held_call: Option<CallId>,
}

impl PhoneStateTracker {
    pub fn new() -> Self {
        PhoneStateTracker { last: None, last_held_call: None }
    }

    /// The last phone state handed out for broadcast.
    pub fn last_broadcast(&self) -> Option<&PhoneStateSnapshot> {
        self.last.as_ref()
    }

    /// Forgets everything sent so far, e.g. after the headset went away.
    pub fn reset(&mut self) {
        self.last = None;
        self.last_held_call = None;
    }

    /// Recomputes the phone state and returns it when it should be broadcast.
    ///
    /// A forced update is always returned. Otherwise nothing is returned while two calls are held
    /// (a swap is in flight), while conference links are half formed, or when neither the state
    /// nor the held call changed since the last broadcast.
    pub fn update<M: CallsManager + ?Sized>(
        &mut self,
        manager: &M,
        force: bool,
    ) -> Option<PhoneStateSnapshot> {
        let snapshot = compute_snapshot(manager);
        let held_call = manager.get_held_call();

        if !force {
            if manager.get_num_held_calls() == 2 {
                debug!("Two calls held, waiting for the swap to finish");
                return None;
            }
            if !is_topology_settled(manager) {
                debug!("Conference links not settled, skipping phone state update");
                return None;
            }
            let held_call_changed =
                held_call != self.last_held_call && !self.held_call_absorbed(manager);
            if self.last.as_ref() == Some(&snapshot) && !held_call_changed {
                return None;
            }
        }

        self.last = Some(snapshot.clone());
        self.last_held_call = held_call;
        Some(snapshot)
    }

    // The previously held call became a leg of the active conference. That is a merge, not a
    // change the headset needs to see.
    fn held_call_absorbed<M: CallsManager + ?Sized>(&self, manager: &M) -> bool {
        let old_held = match self.last_held_call {
            Some(id) => id,
            None => return false,
        };
        let calls = manager.calls();
        manager
            .get_active_call()
            .and_then(|id| calls.get(id))
            .filter(|active| active.has_conference_children())
            .map_or(false, |active| active.children.contains(&old_held))
    }
}
