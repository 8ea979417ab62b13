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

//! The telephony service exposed to the headset.
//!
//! [`BluetoothPhoneService`] owns nothing but the debounce memory: calls belong to the call
//! manager, accounts to the registrar and the headset connection to the transport. Callers are
//! expected to serialize every entry point (see [`crate::TelephonyStack::dispatch`]).

use log::{debug, info, warn};
use std::convert::TryFrom;

use crate::call::scheme_specific_part;
use crate::calls_manager::CallsManager;
use crate::chld::{apply, resolve_chld, CallOperation};
use crate::clcc;
use crate::config::TelephonyConfig;
use crate::error::TelephonyError;
use crate::hfp::{CallHoldCommand, IBluetoothHeadset, PhoneStateSnapshot};
use crate::listener::{CallEvent, LifecycleListener};
use crate::phone_account::{PhoneAccount, PhoneAccountRegistrar, SCHEME_TEL};

/// Requests coming from the headset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeadsetCommand {
    AnswerCall,
    HangupCall,
    SendDtmf(i32),
    GetNetworkOperator,
    GetSubscriberNumber,
    ListCurrentCalls,
    QueryPhoneState,
    CallHold(i32),
}

/// Result of a [`HeadsetCommand`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeadsetResponse {
    /// Whether the command applied to the current calls.
    Status(bool),
    Text(String),
}

/// Operations the headset can request.
pub trait IBluetoothPhoneService {
    /// Answers the ringing call.
    fn answer_call(&mut self) -> bool;

    /// Disconnects the foreground call.
    fn hangup_call(&mut self) -> bool;

    /// Plays a single DTMF pulse on the foreground call.
    fn send_dtmf(&mut self, tone: i32) -> bool;

    fn get_network_operator(&self) -> String;

    fn get_subscriber_number(&self) -> String;

    /// Sends the CLCC listing to the headset.
    fn list_current_calls(&mut self);

    /// Sends the current phone state to the headset, even if it did not change.
    fn query_phone_state(&mut self);

    /// Handles an AT+CHLD command.
    fn process_chld(&mut self, chld: i32) -> bool;
}

pub struct BluetoothPhoneService<M: CallsManager> {
    calls_manager: M,
    phone_account_registrar: Box<dyn PhoneAccountRegistrar + Send>,
    headset: Option<Box<dyn IBluetoothHeadset + Send>>,
    listener: LifecycleListener,
    config: TelephonyConfig,
}

impl<M: CallsManager> BluetoothPhoneService<M> {
    pub fn new(
        calls_manager: M,
        phone_account_registrar: Box<dyn PhoneAccountRegistrar + Send>,
        config: TelephonyConfig,
    ) -> Self {
        BluetoothPhoneService {
            calls_manager,
            phone_account_registrar,
            headset: None,
            listener: LifecycleListener::new(),
            config,
        }
    }

    /// Attaches or detaches the headset. Updates are only computed while one is attached.
    pub fn set_bluetooth_headset(&mut self, headset: Option<Box<dyn IBluetoothHeadset + Send>>) {
        info!("Headset {}", if headset.is_some() { "attached" } else { "detached" });
        self.headset = headset;
        self.listener.reset();
    }

    pub fn has_headset(&self) -> bool {
        self.headset.is_some()
    }

    pub fn calls_manager(&self) -> &M {
        &self.calls_manager
    }

    pub fn calls_manager_mut(&mut self) -> &mut M {
        &mut self.calls_manager
    }

    pub fn config(&self) -> &TelephonyConfig {
        &self.config
    }

    /// Handles a call manager lifecycle event.
    pub fn on_call_event(&mut self, event: CallEvent) {
        if self.headset.is_none() {
            debug!("No headset, ignoring {:?}", event);
            return;
        }
        if let Some(snapshot) = self.listener.on_call_event(&event, &self.calls_manager) {
            self.send_phone_state(&snapshot);
        }
    }

    /// Runs `command` and returns what the headset should be told.
    pub fn handle_headset_command(&mut self, command: HeadsetCommand) -> HeadsetResponse {
        match command {
            HeadsetCommand::AnswerCall => HeadsetResponse::Status(self.answer_call()),
            HeadsetCommand::HangupCall => HeadsetResponse::Status(self.hangup_call()),
            HeadsetCommand::SendDtmf(tone) => HeadsetResponse::Status(self.send_dtmf(tone)),
            HeadsetCommand::GetNetworkOperator => {
                HeadsetResponse::Text(self.get_network_operator())
            }
            HeadsetCommand::GetSubscriberNumber => {
                HeadsetResponse::Text(self.get_subscriber_number())
            }
            HeadsetCommand::ListCurrentCalls => {
                self.list_current_calls();
                HeadsetResponse::Status(true)
            }
            HeadsetCommand::QueryPhoneState => {
                self.query_phone_state();
                HeadsetResponse::Status(true)
            }
            HeadsetCommand::CallHold(chld) => HeadsetResponse::Status(self.process_chld(chld)),
        }
    }

    fn force_headset_update(&mut self) {
        if self.headset.is_none() {
            return;
        }
        let snapshot = self.listener.force_update(&self.calls_manager);
        self.send_phone_state(&snapshot);
    }

    fn send_phone_state(&mut self, snapshot: &PhoneStateSnapshot) {
        info!(
            "Phone state: numActive {}, numHeld {}, callState {:?}, number type {}",
            snapshot.num_active, snapshot.num_held, snapshot.state, snapshot.number_type
        );
        debug!("Phone state number: {:?}", snapshot.number);
        if let Some(headset) = self.headset.as_mut() {
            headset.phone_state_changed(snapshot);
        }
    }

    // The foreground call's account, else the default account for tel: calls.
    fn get_best_phone_account(&self) -> Option<PhoneAccount> {
        let calls = self.calls_manager.calls();
        let registrar = &self.phone_account_registrar;
        self.calls_manager
            .get_foreground_call()
            .and_then(|id| calls.get(id))
            .and_then(|call| call.target_phone_account.as_ref())
            .and_then(|handle| registrar.get_phone_account_check_calling_user(handle))
            .or_else(|| {
                registrar
                    .get_outgoing_phone_account_for_scheme(SCHEME_TEL)
                    .and_then(|handle| registrar.get_phone_account_check_calling_user(&handle))
            })
    }
}

impl<M: CallsManager> IBluetoothPhoneService for BluetoothPhoneService<M> {
    fn answer_call(&mut self) -> bool {
        match self.calls_manager.get_ringing_call() {
            Some(call) => {
                info!("Answering {:?} from headset", call);
                self.calls_manager.answer_call(call, self.config.default_video_state);
                true
            }
            None => {
                debug!("No ringing call to answer");
                false
            }
        }
    }

    fn hangup_call(&mut self) -> bool {
        match self.calls_manager.get_foreground_call() {
            Some(call) => {
                info!("Hanging up {:?} from headset", call);
                self.calls_manager.disconnect_call(call);
                true
            }
            None => {
                debug!("No foreground call to hang up");
                false
            }
        }
    }

    fn send_dtmf(&mut self, tone: i32) -> bool {
        let call = match self.calls_manager.get_foreground_call() {
            Some(call) => call,
            None => return false,
        };
        let digit = match u32::try_from(tone).ok().and_then(char::from_u32) {
            Some(digit) => digit,
            None => {
                warn!("{}", TelephonyError::InvalidDtmfTone(tone));
                return false;
            }
        };
        self.calls_manager.play_dtmf_tone(call, digit);
        self.calls_manager.stop_dtmf_tone(call);
        true
    }

    fn get_network_operator(&self) -> String {
        match self.get_best_phone_account().and_then(|account| account.label) {
            Some(label) => label,
            None => self.config.default_network_operator.clone(),
        }
    }

    fn get_subscriber_number(&self) -> String {
        let address = self
            .get_best_phone_account()
            .and_then(|account| account.address)
            .map(|address| scheme_specific_part(&address).to_string())
            .filter(|address| !address.is_empty());
        match address {
            Some(address) => address,
            None => self.config.default_subscriber_number.clone(),
        }
    }

    fn list_current_calls(&mut self) {
        let entries = clcc::list_current_calls(&self.calls_manager);
        let headset = match self.headset.as_mut() {
            Some(headset) => headset,
            None => return,
        };
        for entry in entries.iter() {
            debug!(
                "Sending CLCC {}, {:?}, {:?}, multiparty {}, number type {}",
                entry.index, entry.direction, entry.state, entry.multiparty, entry.number_type
            );
            headset.clcc_response(entry);
        }
    }

    fn query_phone_state(&mut self) {
        self.force_headset_update();
    }

    fn process_chld(&mut self, chld: i32) -> bool {
        let command = match CallHoldCommand::try_from(chld) {
            Ok(command) => command,
            Err(e) => {
                warn!("Rejecting AT+CHLD: {}", e);
                return false;
            }
        };
        let operations = resolve_chld(&self.calls_manager, command);
        if operations.is_empty() {
            debug!("{:?} does not apply to the current calls", command);
            return false;
        }
        apply(&mut self.calls_manager, &operations, self.config.default_video_state);

        if operations.iter().any(|op| matches!(op, CallOperation::SwapConference(_))) {
            info!("CDMA calls in conference swapped, updating headset");
            self.force_headset_update();
        }
        true
    }
}
