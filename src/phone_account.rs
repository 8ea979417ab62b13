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

//! Phone accounts a call can be placed through.

/// URI scheme of regular telephone numbers.
pub const SCHEME_TEL: &str = "tel";

/// Identifies a phone account registered by a connection service.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct PhoneAccountHandle {
    pub component: String,
    pub id: String,
}

impl PhoneAccountHandle {
    pub fn new<S: Into<String>>(component: S, id: S) -> Self {
        PhoneAccountHandle { component: component.into(), id: id.into() }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PhoneAccount {
    pub handle: PhoneAccountHandle,
    /// User visible name, reported as the network operator.
    pub label: Option<String>,
    /// Address URI of the subscriber on this account.
    pub address: Option<String>,
}

/// Registry of phone accounts, provided by the telephony framework.
pub trait PhoneAccountRegistrar {
    /// Returns the account for `handle` if it is visible to the current user.
    fn get_phone_account_check_calling_user(
        &self,
        handle: &PhoneAccountHandle,
    ) -> Option<PhoneAccount>;

    /// Returns the account used by default for outgoing calls with `scheme`.
    fn get_outgoing_phone_account_for_scheme(&self, _scheme: &str) -> Option<PhoneAccountHandle> {
        None
    }
}
