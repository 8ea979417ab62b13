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

//! Turns call manager lifecycle events into phone state broadcasts.

use log::debug;

use crate::call::{CallId, CallState};
use crate::calls_manager::CallsManager;
use crate::hfp::PhoneStateSnapshot;
use crate::phone_state::{compute_snapshot, PhoneStateTracker};

/// Lifecycle events delivered by the call manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallEvent {
    Added(CallId),
    Removed(CallId),
    StateChanged { call: CallId, old: CallState, new: CallState },
    /// The call joined or left a conference, or its set of children changed.
    ConferenceChanged(CallId),
}

/// Whether `event` can change what the headset should see.
pub fn should_update_headset<M: CallsManager + ?Sized>(event: &CallEvent, manager: &M) -> bool {
    match *event {
        CallEvent::Added(_) | CallEvent::Removed(_) => true,
        CallEvent::StateChanged { old, new, .. } => {
            // An active call is put on hold because a new call is connecting. Wait for the new
            // call to reach DIALING so numHeld=1 and the dialing state go out together.
            if old == CallState::Active && new == CallState::OnHold {
                let connecting =
                    manager.calls().iter().any(|call| call.state == CallState::Connecting);
                if connecting {
                    debug!("Ignoring hold while another call is connecting");
                    return false;
                }
            }
            // An active and a dialing call at once is not a valid headset state. The active call
            // is about to be held, which produces the next update.
            if manager.get_active_call().is_some()
                && old == CallState::Connecting
                && new == CallState::Dialing
            {
                debug!("Ignoring dialing while a call is still active");
                return false;
            }
            true
        }
        CallEvent::ConferenceChanged(id) => {
            // Conferencing is not atomic: children get their parent one at a time. Only the
            // parent's notification counts, and only once it has at least two children.
            let call = match manager.calls().get(id) {
                Some(call) => call,
                None => return true,
            };
            if call.parent.is_some() {
                debug!("Ignoring conference change from child call {:?}", id);
                return false;
            }
            if call.children.len() == 1 {
                debug!("Ignoring conference change from parent {:?} with one child", id);
                return false;
            }
            true
        }
    }
}

/// Consumes lifecycle events and yields the phone states to broadcast.
#[derive(Debug, Default)]
pub struct LifecycleListener {
    tracker: PhoneStateTracker,
}

impl LifecycleListener {
    pub fn new() -> Self {
        LifecycleListener { tracker: PhoneStateTracker::new() }
    }

    /// Handles one event; returns the phone state to broadcast, if any.
    pub fn on_call_event<M: CallsManager + ?Sized>(
        &mut self,
        event: &CallEvent,
        manager: &M,
    ) -> Option<PhoneStateSnapshot> {
        if !should_update_headset(event, manager) {
            return None;
        }
        self.tracker.update(manager, false)
    }

    /// Recomputes the phone state and returns it regardless of what was sent before.
    pub fn force_update<M: CallsManager + ?Sized>(&mut self, manager: &M) -> PhoneStateSnapshot {
        self.tracker.update(manager, true).unwrap_or_else(|| compute_snapshot(manager))
    }

    pub fn reset(&mut self) {
        self.tracker.reset();
    }
}
