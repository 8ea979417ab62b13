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

//! Hands-free profile types exchanged with the headset.

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::cast::FromPrimitive;
use std::convert::TryFrom;

use crate::call::CallDirection;
use crate::error::TelephonyError;

/// Type of address for a number without international prefix.
pub const TOA_UNKNOWN: i32 = 0x81;
/// Type of address for a number starting with `+`.
pub const TOA_INTERNATIONAL: i32 = 0x91;
/// Number type sent with a phone state that carries no number.
pub const PHONE_STATE_NO_NUMBER_TYPE: i32 = 0x80;
/// Number type sent with a CLCC entry that carries no number.
pub const CLCC_NO_NUMBER_TYPE: i32 = -1;
/// CLCC mode for voice calls.
pub const CLCC_MODE_VOICE: i32 = 0;

/// Returns the type of address for a dialable number.
pub fn toa_from_number(number: &str) -> i32 {
    if number.starts_with('+') {
        TOA_INTERNATIONAL
    } else {
        TOA_UNKNOWN
    }
}

/// Call state codes understood by the headset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
#[repr(i32)]
pub enum BtCallState {
    Active = 0,
    Held,
    Dialing,
    Alerting,
    Incoming,
    Waiting,
    Idle,
}

/// AT+CHLD call handling commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(i32)]
pub enum CallHoldCommand {
    /// Releases all held calls or rejects a waiting call.
    ReleaseHeld = 0,
    /// Releases all active calls and accepts the waiting or held call.
    ReleaseActiveAcceptHeld,
    /// Holds all active calls and accepts the waiting or held call.
    HoldActiveAcceptHeld,
    /// Adds the held call to the conversation.
    AddHeldToConf,
}

impl TryFrom<i32> for CallHoldCommand {
    type Error = TelephonyError;

    fn try_from(chld: i32) -> Result<Self, Self::Error> {
        CallHoldCommand::from_i32(chld).ok_or(TelephonyError::UnknownChldType(chld))
    }
}

/// One line of a CLCC response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClccEntry {
    /// 1-based position in the listing; 0 marks the end of the list.
    pub index: u32,
    pub direction: CallDirection,
    pub state: BtCallState,
    pub mode: i32,
    pub multiparty: bool,
    pub number: Option<String>,
    pub number_type: i32,
}

impl ClccEntry {
    /// The entry that terminates a CLCC listing. Only the zero index is meaningful.
    pub fn end_marker() -> Self {
        ClccEntry {
            index: 0,
            direction: CallDirection::Outgoing,
            state: BtCallState::Active,
            mode: CLCC_MODE_VOICE,
            multiparty: false,
            number: None,
            number_type: 0,
        }
    }

    pub fn is_end_marker(&self) -> bool {
        self.index == 0
    }
}

/// Aggregate phone state broadcast to the headset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhoneStateSnapshot {
    pub num_active: u32,
    pub num_held: u32,
    pub state: BtCallState,
    /// Number of the ringing call, empty when nothing rings.
    pub number: String,
    pub number_type: i32,
}

impl PhoneStateSnapshot {
    pub fn idle() -> Self {
        PhoneStateSnapshot {
            num_active: 0,
            num_held: 0,
            state: BtCallState::Idle,
            number: String::new(),
            number_type: PHONE_STATE_NO_NUMBER_TYPE,
        }
    }
}

/// Outbound interface to the connected headset.
pub trait IBluetoothHeadset {
    /// Sends one CLCC line, including the terminating end marker.
    fn clcc_response(&mut self, entry: &ClccEntry);

    /// Sends the aggregate phone state.
    fn phone_state_changed(&mut self, state: &PhoneStateSnapshot);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toa_from_number() {
        assert_eq!(toa_from_number("555-0000"), 129);
        assert_eq!(toa_from_number("+15550100"), 145);
        assert_eq!(toa_from_number(""), 129);
    }

    #[test]
    fn test_chld_from_i32() {
        assert_eq!(CallHoldCommand::try_from(0).ok(), Some(CallHoldCommand::ReleaseHeld));
        assert_eq!(CallHoldCommand::try_from(3).ok(), Some(CallHoldCommand::AddHeldToConf));
        assert!(matches!(CallHoldCommand::try_from(4), Err(TelephonyError::UnknownChldType(4))));
        assert!(CallHoldCommand::try_from(-1).is_err());
    }

    #[test]
    fn test_call_state_codes() {
        assert_eq!(BtCallState::Active as i32, 0);
        assert_eq!(BtCallState::Incoming as i32, 4);
        assert_eq!(BtCallState::Idle as i32, 6);
    }

    #[test]
    fn test_end_marker() {
        let marker = ClccEntry::end_marker();
        assert!(marker.is_end_marker());
        assert_eq!(marker.number, None);
        assert_eq!(marker.number_type, 0);
        assert!(!marker.multiparty);
    }
}
