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

//! Mocked implementation of IBluetoothHeadset for use in test

use tokio::sync::mpsc::{self, unbounded_channel, UnboundedReceiver};

use crate::hfp::{ClccEntry, IBluetoothHeadset, PhoneStateSnapshot};

/// Routes calls to IBluetoothHeadset into a channel of MockHeadsetEvents
pub struct MockHeadset(mpsc::UnboundedSender<MockHeadsetEvents>);

impl MockHeadset {
    /// Constructor. Returns self and the RX side of the associated channel.
    pub fn new() -> (Self, UnboundedReceiver<MockHeadsetEvents>) {
        let (tx, rx) = unbounded_channel();
        (Self(tx), rx)
    }
}

/// Events representing calls to IBluetoothHeadset
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockHeadsetEvents {
    /// IBluetoothHeadset#clcc_response invoked
    ClccResponse(ClccEntry),
    /// IBluetoothHeadset#phone_state_changed invoked
    PhoneStateChanged(PhoneStateSnapshot),
}

impl IBluetoothHeadset for MockHeadset {
    fn clcc_response(&mut self, entry: &ClccEntry) {
        let _ = self.0.send(MockHeadsetEvents::ClccResponse(entry.clone()));
    }

    fn phone_state_changed(&mut self, state: &PhoneStateSnapshot) {
        let _ = self.0.send(MockHeadsetEvents::PhoneStateChanged(state.clone()));
    }
}
