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

//! Resolves AT+CHLD commands into call manager operations.
//!
//! Resolution is split from execution: [`resolve_chld`] only looks at the calls and returns the
//! operations to perform, [`apply`] performs them. An empty resolution means the command does not
//! apply to the current calls. Whenever a ringing call is a candidate it wins over a held call,
//! which in turn wins over acting on the active call.

use log::debug;

use crate::call::{Call, CallArena, CallCapability, CallId};
use crate::calls_manager::{CallsManager, VideoState};
use crate::hfp::CallHoldCommand;

/// A single operation requested from the call manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallOperation {
    Answer(CallId),
    Reject(CallId),
    Disconnect(CallId),
    Hold(CallId),
    Unhold(CallId),
    MergeConference(CallId),
    SwapConference(CallId),
    Conference(CallId, CallId),
}

/// Decides which operations `command` translates to for the current calls.
pub fn resolve_chld<M: CallsManager + ?Sized>(
    manager: &M,
    command: CallHoldCommand,
) -> Vec<CallOperation> {
    let calls = manager.calls();
    let active = manager.get_active_call();
    let ringing = manager.get_ringing_call();
    let held = manager.get_held_call();

    match command {
        CallHoldCommand::ReleaseHeld => match (ringing, held) {
            (Some(ringing), _) => vec![CallOperation::Reject(ringing)],
            (None, Some(held)) => vec![CallOperation::Disconnect(held)],
            (None, None) => vec![],
        },
        CallHoldCommand::ReleaseActiveAcceptHeld => {
            let mut operations = vec![];
            if let Some(active) = active {
                operations.push(CallOperation::Disconnect(active));
            }
            if let Some(ringing) = ringing {
                operations.push(CallOperation::Answer(ringing));
            } else if let Some(held) = held {
                operations.push(CallOperation::Unhold(held));
            }
            operations
        }
        CallHoldCommand::HoldActiveAcceptHeld => {
            if let Some(ringing) = ringing {
                return vec![CallOperation::Answer(ringing)];
            }
            // Unholding a call implicitly holds whatever is active.
            if let Some(held) = held {
                return vec![CallOperation::Unhold(held)];
            }
            let active = match active.and_then(|id| calls.get(id)) {
                Some(call) => call,
                None => return vec![],
            };
            if let Some(conference) = swappable_conference(calls, active) {
                vec![CallOperation::SwapConference(conference)]
            } else if active.can(CallCapability::HOLD) {
                vec![CallOperation::Hold(active.id)]
            } else {
                vec![]
            }
        }
        CallHoldCommand::AddHeldToConf => {
            let active = match active.and_then(|id| calls.get(id)) {
                Some(call) => call,
                None => return vec![],
            };
            if active.can(CallCapability::MERGE_CONFERENCE) {
                vec![CallOperation::MergeConference(active.id)]
            } else if let Some(other) = active.conferenceable_calls.first() {
                vec![CallOperation::Conference(active.id, *other)]
            } else {
                vec![]
            }
        }
    }
}

// The conference of `active` (the call itself, or its parent) when it is a CDMA three-way call
// whose legs can be swapped.
fn swappable_conference(calls: &CallArena, active: &Call) -> Option<CallId> {
    let conference = if active.is_conference { Some(active) } else { calls.parent_of(active.id) }?;
    let swappable = conference.can(CallCapability::SWAP_CONFERENCE)
        && !conference.was_conference_previously_merged
        && !conference.can(CallCapability::CONFERENCE_HAS_NO_CHILDREN);
    if swappable {
        Some(conference.id)
    } else {
        None
    }
}

/// Performs `operations` in order on the call manager.
pub fn apply<M: CallsManager + ?Sized>(
    manager: &mut M,
    operations: &[CallOperation],
    video_state: VideoState,
) {
    for operation in operations {
        debug!("Applying {:?}", operation);
        match *operation {
            CallOperation::Answer(call) => manager.answer_call(call, video_state),
            CallOperation::Reject(call) => manager.reject_call(call, false, None),
            CallOperation::Disconnect(call) => manager.disconnect_call(call),
            CallOperation::Hold(call) => manager.hold_call(call),
            CallOperation::Unhold(call) => manager.unhold_call(call),
            CallOperation::MergeConference(call) => manager.merge_conference(call),
            CallOperation::SwapConference(call) => manager.swap_conference(call),
            CallOperation::Conference(call, other) => manager.conference(call, other),
        }
    }
}
