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

//! Telephony bridge between a call manager and a Bluetooth hands-free headset.
//!
//! The crate answers the headset's AT requests (answer, hang up, DTMF, call listing, hold
//! handling) against the device's call manager and pushes phone-state indicators to the headset
//! whenever the call topology changes.

pub mod at_command;
pub mod call;
pub mod calls_manager;
pub mod chld;
pub mod clcc;
pub mod config;
pub mod error;
pub mod hfp;
pub mod listener;
pub mod logging;
pub mod mocks;
pub mod phone_account;
pub mod phone_state;
pub mod service;

use std::sync::{Arc, Mutex};

use log::{debug, info, warn};
use tokio::sync::mpsc::channel;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::sync::oneshot;

use crate::calls_manager::CallsManager;
use crate::hfp::IBluetoothHeadset;
use crate::listener::CallEvent;
use crate::service::{BluetoothPhoneService, HeadsetCommand, HeadsetResponse};

/// Message types that are sent to the telephony dispatch loop.
pub enum Message {
    /// A call lifecycle notification from the call manager.
    CallEvent(CallEvent),
    /// A request from the headset, answered through the attached sender.
    HeadsetCommand(HeadsetCommand, oneshot::Sender<HeadsetResponse>),
    /// A raw AT command from the headset. Commands that cannot be parsed get `Status(false)`.
    AtCommand(String, oneshot::Sender<HeadsetResponse>),
    /// The headset connected (`Some`) or went away (`None`).
    SetHeadset(Option<Box<dyn IBluetoothHeadset + Send>>),
}

/// Umbrella class for the telephony service.
pub struct TelephonyStack {}

impl TelephonyStack {
    /// Creates an mpsc channel for passing messages to the main dispatch loop.
    pub fn create_channel() -> (Sender<Message>, Receiver<Message>) {
        channel::<Message>(16)
    }

    /// Runs the main dispatch loop. Every message is handled under the service lock, so call
    /// events and headset requests never interleave.
    pub async fn dispatch<M: CallsManager + Send>(
        mut rx: Receiver<Message>,
        service: Arc<Mutex<BluetoothPhoneService<M>>>,
    ) {
        loop {
            let m = match rx.recv().await {
                Some(m) => m,
                None => {
                    info!("Telephony dispatch loop quit");
                    break;
                }
            };

            let mut service = service.lock().unwrap_or_else(|e| e.into_inner());
            match m {
                Message::CallEvent(event) => {
                    service.on_call_event(event);
                }

                Message::HeadsetCommand(command, reply) => {
                    let response = service.handle_headset_command(command);
                    if reply.send(response).is_err() {
                        debug!("Headset command requester went away before the reply");
                    }
                }

                Message::AtCommand(raw, reply) => {
                    let response = match at_command::parse_headset_command(&raw) {
                        Ok(command) => service.handle_headset_command(command),
                        Err(e) => {
                            warn!("Rejecting AT command: {}", e);
                            HeadsetResponse::Status(false)
                        }
                    };
                    if reply.send(response).is_err() {
                        debug!("AT command requester went away before the reply");
                    }
                }

                Message::SetHeadset(headset) => {
                    service.set_bluetooth_headset(headset);
                }
            }
        }
    }
}
