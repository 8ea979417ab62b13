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

//! Mocked implementation of PhoneAccountRegistrar for use in test

use std::collections::HashMap;

use crate::phone_account::{PhoneAccount, PhoneAccountHandle, PhoneAccountRegistrar};

/// Serves a fixed set of accounts.
#[derive(Clone, Debug, Default)]
pub struct MockPhoneAccountRegistrar {
    accounts: HashMap<PhoneAccountHandle, PhoneAccount>,
    default_outgoing: HashMap<String, PhoneAccountHandle>,
}

impl MockPhoneAccountRegistrar {
    pub fn new() -> Self {
        MockPhoneAccountRegistrar { accounts: HashMap::new(), default_outgoing: HashMap::new() }
    }

    pub fn add_account(&mut self, account: PhoneAccount) {
        self.accounts.insert(account.handle.clone(), account);
    }

    pub fn set_default_outgoing(&mut self, scheme: &str, handle: PhoneAccountHandle) {
        self.default_outgoing.insert(scheme.to_string(), handle);
    }
}

impl PhoneAccountRegistrar for MockPhoneAccountRegistrar {
    fn get_phone_account_check_calling_user(
        &self,
        handle: &PhoneAccountHandle,
    ) -> Option<PhoneAccount> {
        self.accounts.get(handle).cloned()
    }

    fn get_outgoing_phone_account_for_scheme(&self, scheme: &str) -> Option<PhoneAccountHandle> {
        self.default_outgoing.get(scheme).cloned()
    }
}
