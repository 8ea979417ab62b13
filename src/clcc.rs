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

//! Builds the CLCC (list current calls) response from the call manager's calls.
//!
//! Conference parents are never listed themselves; their children are, each carrying the
//! multiparty flag. The exception is a conference without children (IMS conference without an
//! event package), which is listed once with no number. Indexes are handed out in listing order
//! and only mean something within one response.

use crate::call::{Call, CallArena, CallCapability, CallId, CallState};
use crate::calls_manager::CallsManager;
use crate::hfp::{
    toa_from_number, BtCallState, ClccEntry, CLCC_MODE_VOICE, CLCC_NO_NUMBER_TYPE,
};

/// Maps a call manager state to the state reported in CLCC.
pub fn convert_call_state(state: CallState, is_foreground: bool) -> BtCallState {
    match state {
        CallState::New | CallState::Aborted | CallState::Disconnected => BtCallState::Idle,
        CallState::Active => BtCallState::Active,
        // "Dialing" for the headset means the request has not reached the network yet. Once the
        // call manager knows about the call it is already being set up, i.e. alerting.
        CallState::Connecting | CallState::SelectPhoneAccount | CallState::Dialing => {
            BtCallState::Alerting
        }
        CallState::OnHold => BtCallState::Held,
        CallState::Ringing => {
            if is_foreground {
                BtCallState::Incoming
            } else {
                BtCallState::Waiting
            }
        }
        CallState::Disconnecting => BtCallState::Idle,
    }
}

/// Returns the CLCC listing for the current calls, terminated by [`ClccEntry::end_marker`].
pub fn list_current_calls<M: CallsManager + ?Sized>(manager: &M) -> Vec<ClccEntry> {
    let calls = manager.calls();
    let foreground = manager.get_foreground_call();
    let mut entries = vec![];

    for call in calls.iter() {
        if call.has_conference_children() {
            continue;
        }
        let index = entries.len() as u32 + 1;
        if let Some(entry) = clcc_entry_for_call(calls, call, foreground, index) {
            entries.push(entry);
        }
    }

    entries.push(ClccEntry::end_marker());
    entries
}

fn clcc_entry_for_call(
    calls: &CallArena,
    call: &Call,
    foreground: Option<CallId>,
    index: u32,
) -> Option<ClccEntry> {
    let mut state = convert_call_state(call.state, foreground == Some(call.id));
    if state == BtCallState::Idle {
        return None;
    }

    let mut multiparty = false;
    let mut number = call.display_number();
    if let Some(conference) = call.parent.and_then(|parent| calls.get(parent)) {
        multiparty = true;

        // A conference that can still merge or swap (CDMA) has to expose its legs as distinct
        // ACTIVE and HELD calls, otherwise the headset never offers those actions.
        if let (BtCallState::Active, Some(active_child)) =
            (state, conference.conference_level_active_call)
        {
            let can_merge_or_swap = conference.can(CallCapability::MERGE_CONFERENCE)
                || (conference.can(CallCapability::SWAP_CONFERENCE)
                    && !conference.was_conference_previously_merged);
            if can_merge_or_swap {
                multiparty = false;
                state =
                    if call.id == active_child { BtCallState::Active } else { BtCallState::Held };
            }
        }
    } else if call.is_conference && call.can(CallCapability::CONFERENCE_HAS_NO_CHILDREN) {
        // The conference handle is not a party the headset could address.
        multiparty = true;
        number = None;
    }

    let number_type = number.as_deref().map_or(CLCC_NO_NUMBER_TYPE, toa_from_number);

    Some(ClccEntry {
        index,
        direction: call.direction,
        state,
        mode: CLCC_MODE_VOICE,
        multiparty,
        number,
        number_type,
    })
}
