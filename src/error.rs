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

//! Crate error type.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelephonyError {
    #[error("unknown CHLD type {0}")]
    UnknownChldType(i32),
    #[error("invalid DTMF tone {0}")]
    InvalidDtmfTone(i32),
    #[error("malformed AT command: {0}")]
    MalformedAtCommand(String),
    #[error("unsupported AT command: {0}")]
    UnsupportedAtCommand(String),
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}
