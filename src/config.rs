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

//! Configuration read from a JSON file.

use log::{warn, LevelFilter};
use serde::Deserialize;
use std::path::Path;

use crate::calls_manager::VideoState;
use crate::error::TelephonyError;

/// Settings of the telephony service. Every field is optional in the file.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TelephonyConfig {
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: Option<String>,
    /// Reported as the network operator when no phone account provides a label.
    pub default_network_operator: String,
    /// Reported as the subscriber number when no phone account provides an address.
    pub default_subscriber_number: String,
    /// Video state requested when answering from the headset.
    pub default_video_state: VideoState,
}

impl TelephonyConfig {
    pub fn from_json(config: &str) -> Result<Self, TelephonyError> {
        Ok(serde_json::from_str::<TelephonyConfig>(config)?)
    }

    /// Configured log level; defaults to `info` when unset or unparsable.
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
            .as_deref()
            .and_then(|level| level.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Info)
    }
}

/// Reads the configuration at `path`. A missing file gives the defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<TelephonyConfig, TelephonyError> {
    match std::fs::read_to_string(path) {
        Ok(config) => TelephonyConfig::from_json(&config),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TelephonyConfig::default()),
        Err(e) => Err(e.into()),
    }
}

/// Like [`load_config`], but logs the problem and falls back to the defaults on error.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> TelephonyConfig {
    let path = path.as_ref();
    load_config(path).unwrap_or_else(|e| {
        warn!("Ignoring {}: {}", path.display(), e);
        TelephonyConfig::default()
    })
}
