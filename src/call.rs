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

//! Read-only view of the calls owned by the call manager.
//!
//! Calls live in a [`CallArena`] and refer to each other by [`CallId`]. A conference knows its
//! children and every child knows its parent; keeping both sides in step is the call manager's
//! job, this module only reports whether they currently agree.

use bitflags::bitflags;
use num_derive::{FromPrimitive, ToPrimitive};

use crate::phone_account::PhoneAccountHandle;

/// Stable identifier of a call for as long as the call manager tracks it.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct CallId(pub u32);

/// Lifecycle state of a call as the call manager sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum CallState {
    New = 0,
    Connecting,
    SelectPhoneAccount,
    Dialing,
    Ringing,
    Active,
    OnHold,
    Disconnecting,
    Disconnected,
    Aborted,
}

impl CallState {
    /// Outgoing call that has not been answered yet.
    pub fn is_outgoing(&self) -> bool {
        matches!(self, CallState::Connecting | CallState::SelectPhoneAccount | CallState::Dialing)
    }
}

/// Direction of a call, encoded the way CLCC reports it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
#[repr(i32)]
pub enum CallDirection {
    Outgoing = 0,
    Incoming = 1,
}

bitflags! {
    /// Operations a call (or conference) currently supports.
    #[derive(Default)]
    pub struct CallCapability: u32 {
        const HOLD = 0x0000_0001;
        const MERGE_CONFERENCE = 0x0000_0004;
        const SWAP_CONFERENCE = 0x0000_0008;
        /// Conference whose participants are not exposed as separate calls (IMS).
        const CONFERENCE_HAS_NO_CHILDREN = 0x0020_0000;
    }
}

/// Snapshot of a single call record.
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub id: CallId,
    pub state: CallState,
    pub direction: CallDirection,
    pub capabilities: CallCapability,
    /// Address URI of the remote party, e.g. `tel:555-0100`.
    pub handle: Option<String>,
    /// Number originally dialed when the call was routed through a gateway.
    pub gateway_original_address: Option<String>,
    pub target_phone_account: Option<PhoneAccountHandle>,
    pub is_conference: bool,
    pub parent: Option<CallId>,
    pub children: Vec<CallId>,
    /// The child a CDMA conference currently treats as the foreground leg.
    pub conference_level_active_call: Option<CallId>,
    pub was_conference_previously_merged: bool,
    pub conferenceable_calls: Vec<CallId>,
}

impl Call {
    pub fn new(id: CallId, state: CallState) -> Self {
        Call {
            id,
            state,
            direction: CallDirection::Outgoing,
            capabilities: CallCapability::empty(),
            handle: None,
            gateway_original_address: None,
            target_phone_account: None,
            is_conference: false,
            parent: None,
            children: vec![],
            conference_level_active_call: None,
            was_conference_previously_merged: false,
            conferenceable_calls: vec![],
        }
    }

    pub fn can(&self, capability: CallCapability) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn is_incoming(&self) -> bool {
        self.direction == CallDirection::Incoming
    }

    /// Conference that reports its participants as child calls.
    pub fn has_conference_children(&self) -> bool {
        self.is_conference && !self.can(CallCapability::CONFERENCE_HAS_NO_CHILDREN)
    }

    /// Number of the remote party taken from the handle only.
    pub fn handle_number(&self) -> Option<String> {
        self.handle.as_deref().map(|uri| scheme_specific_part(uri).to_string())
    }

    /// Number to show for the call: the gateway's original address wins over the handle.
    pub fn display_number(&self) -> Option<String> {
        self.gateway_original_address
            .as_deref()
            .or(self.handle.as_deref())
            .map(|uri| scheme_specific_part(uri).to_string())
    }
}

/// Returns the part of `uri` after its scheme, without any fragment.
///
/// A string without a scheme (no `:` before the first `/`, `?` or `#`) is returned whole, so
/// `tel:555-0100` gives `555-0100` while `//example.com/1` stays unchanged.
pub fn scheme_specific_part(uri: &str) -> &str {
    let without_fragment = match uri.find('#') {
        Some(pos) => &uri[..pos],
        None => uri,
    };
    let scheme_end = without_fragment.find(|c: char| c == ':' || c == '/' || c == '?');
    match scheme_end {
        Some(pos) if without_fragment[pos..].starts_with(':') && pos > 0 => {
            &without_fragment[pos + 1..]
        }
        _ => without_fragment,
    }
}

/// Ordered collection of call records addressed by [`CallId`].
#[derive(Clone, Debug, Default)]
pub struct CallArena {
    calls: Vec<Call>,
}

impl CallArena {
    pub fn new() -> Self {
        CallArena { calls: vec![] }
    }

    /// Inserts a call at the end, or replaces the record with the same id in place.
    pub fn insert(&mut self, call: Call) {
        match self.calls.iter_mut().find(|c| c.id == call.id) {
            Some(existing) => *existing = call,
            None => self.calls.push(call),
        }
    }

    pub fn remove(&mut self, id: CallId) -> Option<Call> {
        let pos = self.calls.iter().position(|c| c.id == id)?;
        Some(self.calls.remove(pos))
    }

    pub fn get(&self, id: CallId) -> Option<&Call> {
        self.calls.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: CallId) -> Option<&mut Call> {
        self.calls.iter_mut().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Call> {
        self.calls.iter()
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn parent_of(&self, id: CallId) -> Option<&Call> {
        self.get(id)?.parent.and_then(|parent| self.get(parent))
    }

    pub fn children_of(&self, id: CallId) -> Vec<&Call> {
        match self.get(id) {
            Some(call) => call.children.iter().filter_map(|child| self.get(*child)).collect(),
            None => vec![],
        }
    }

    /// Makes `child` a member of `parent`, updating both records.
    pub fn link_child(&mut self, parent: CallId, child: CallId) -> bool {
        if self.get(parent).is_none() || self.get(child).is_none() {
            return false;
        }
        if let Some(call) = self.get_mut(child) {
            call.parent = Some(parent);
        }
        if let Some(call) = self.get_mut(parent) {
            call.is_conference = true;
            if !call.children.contains(&child) {
                call.children.push(child);
            }
        }
        true
    }

    /// Detaches `child` from whatever conference it belongs to.
    pub fn unlink_child(&mut self, child: CallId) {
        let parent = match self.get_mut(child) {
            Some(call) => call.parent.take(),
            None => None,
        };
        if let Some(call) = parent.and_then(|parent| self.get_mut(parent)) {
            call.children.retain(|c| *c != child);
        }
    }

    /// First call without a parent whose state is one of `states`.
    pub fn first_top_level_with_state(&self, states: &[CallState]) -> Option<CallId> {
        self.calls
            .iter()
            .find(|c| c.parent.is_none() && states.contains(&c.state))
            .map(|c| c.id)
    }

    pub fn count_top_level_with_state(&self, state: CallState) -> usize {
        self.calls.iter().filter(|c| c.parent.is_none() && c.state == state).count()
    }

    /// Whether the conference `id` and its children agree on their parent/child links.
    ///
    /// A conference that exposes children must have at least one, every listed child must exist
    /// and point back at it, and every call pointing at it must be listed.
    pub fn is_conference_consistent(&self, id: CallId) -> bool {
        let conference = match self.get(id) {
            Some(call) => call,
            None => return false,
        };
        if !conference.has_conference_children() {
            return true;
        }
        if conference.children.is_empty() {
            return false;
        }
        let children_point_back = conference
            .children
            .iter()
            .all(|child| self.get(*child).map_or(false, |c| c.parent == Some(id)));
        let claimants_listed = self
            .calls
            .iter()
            .filter(|c| c.parent == Some(id))
            .all(|c| conference.children.contains(&c.id));
        children_point_back && claimants_listed
    }

    /// Whether every conference and every parented call in the arena is consistently linked.
    pub fn is_topology_consistent(&self) -> bool {
        let parents_consistent = self
            .calls
            .iter()
            .filter(|c| c.has_conference_children())
            .all(|c| self.is_conference_consistent(c.id));
        let orphans = self.calls.iter().filter_map(|c| c.parent).any(|parent| {
            self.get(parent).map_or(true, |p| !p.has_conference_children())
        });
        parents_consistent && !orphans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARENT: CallId = CallId(1);
    const CHILD_1: CallId = CallId(2);
    const CHILD_2: CallId = CallId(3);

    fn conference_arena() -> CallArena {
        let mut arena = CallArena::new();
        arena.insert(Call::new(PARENT, CallState::Active));
        arena.insert(Call::new(CHILD_1, CallState::Active));
        arena.insert(Call::new(CHILD_2, CallState::Active));
        arena
    }

    #[test]
    fn test_scheme_specific_part() {
        assert_eq!(scheme_specific_part("tel:555-0000"), "555-0000");
        assert_eq!(scheme_specific_part("sip:alice@example.com"), "alice@example.com");
        assert_eq!(scheme_specific_part("tel:+15550100#frag"), "+15550100");
        assert_eq!(scheme_specific_part("//foo.com/0"), "//foo.com/0");
        assert_eq!(scheme_specific_part("555-0000"), "555-0000");
        assert_eq!(scheme_specific_part("tel:"), "");
    }

    #[test]
    fn test_display_number_prefers_gateway() {
        let mut call = Call::new(CHILD_1, CallState::Active);
        call.handle = Some("tel:555-0100".to_string());
        assert_eq!(call.display_number(), Some("555-0100".to_string()));

        call.gateway_original_address = Some("tel:555-0001".to_string());
        assert_eq!(call.display_number(), Some("555-0001".to_string()));
        assert_eq!(call.handle_number(), Some("555-0100".to_string()));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut arena = conference_arena();
        arena.insert(Call::new(PARENT, CallState::OnHold));

        assert_eq!(arena.len(), 3);
        assert_eq!(arena.iter().next().map(|c| c.state), Some(CallState::OnHold));
    }

    #[test]
    fn test_link_and_unlink_child() {
        let mut arena = conference_arena();
        assert!(arena.link_child(PARENT, CHILD_1));
        assert!(arena.link_child(PARENT, CHILD_2));

        assert!(arena.get(PARENT).unwrap().is_conference);
        assert_eq!(arena.parent_of(CHILD_1).map(|c| c.id), Some(PARENT));
        assert_eq!(arena.children_of(PARENT).len(), 2);
        assert!(arena.is_topology_consistent());

        arena.unlink_child(CHILD_1);
        assert_eq!(arena.get(CHILD_1).unwrap().parent, None);
        assert_eq!(arena.get(PARENT).unwrap().children, vec![CHILD_2]);
    }

    #[test]
    fn test_link_missing_call_fails() {
        let mut arena = conference_arena();
        assert!(!arena.link_child(PARENT, CallId(42)));
    }

    #[test]
    fn test_half_linked_conference_is_inconsistent() {
        let mut arena = conference_arena();
        arena.link_child(PARENT, CHILD_1);
        // CHILD_2 already claims the parent but is not listed yet.
        arena.get_mut(CHILD_2).unwrap().parent = Some(PARENT);

        assert!(!arena.is_conference_consistent(PARENT));
        assert!(!arena.is_topology_consistent());

        arena.link_child(PARENT, CHILD_2);
        assert!(arena.is_conference_consistent(PARENT));
        assert!(arena.is_topology_consistent());
    }

    #[test]
    fn test_childless_conference() {
        let mut arena = CallArena::new();
        let mut conference = Call::new(PARENT, CallState::Active);
        conference.is_conference = true;
        arena.insert(conference.clone());
        assert!(!arena.is_topology_consistent());

        conference.capabilities = CallCapability::CONFERENCE_HAS_NO_CHILDREN;
        arena.insert(conference);
        assert!(arena.is_topology_consistent());
    }

    #[test]
    fn test_top_level_queries_skip_children() {
        let mut arena = conference_arena();
        arena.insert(Call::new(CallId(4), CallState::OnHold));
        arena.get_mut(CHILD_2).unwrap().state = CallState::OnHold;
        arena.link_child(PARENT, CHILD_1);
        arena.link_child(PARENT, CHILD_2);

        assert_eq!(arena.first_top_level_with_state(&[CallState::Active]), Some(PARENT));
        assert_eq!(arena.first_top_level_with_state(&[CallState::OnHold]), Some(CallId(4)));
        assert_eq!(arena.count_top_level_with_state(CallState::OnHold), 1);
    }
}
