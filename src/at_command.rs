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

// Parsing of the HFP AT commands serviced by the telephony layer. Everything else is handled by
// the lower layers of the profile and never reaches this module.

use crate::error::TelephonyError;
use crate::service::HeadsetCommand;

/// The AT command type indicated.
#[derive(Clone, Debug, PartialEq)]
pub enum AtCommandType {
    Set,
    Query,
    Test,
    Execute,
}

// Delimiters for AT commands. Execute has no delimiter.
const AT_COMMAND_DELIMITER_SET: &str = "=";
const AT_COMMAND_DELIMITER_QUERY: &str = "?";
const AT_COMMAND_DELIMITER_TEST: &str = "=?";

const AT_COMMAND_ARG_DELIMITER: &str = ",";

// Commands understood by the telephony layer.
const AT_COMMAND_ANSWER: &str = "A";
const AT_COMMAND_HANGUP: &str = "CHUP";
const AT_COMMAND_DTMF: &str = "VTS";
const AT_COMMAND_LIST_CALLS: &str = "CLCC";
const AT_COMMAND_INDICATORS: &str = "CIND";
const AT_COMMAND_CALL_HOLD: &str = "CHLD";
const AT_COMMAND_OPERATOR: &str = "COPS";
const AT_COMMAND_SUBSCRIBER_NUMBER: &str = "CNUM";

/// An AT command split into its parts.
#[derive(Clone, Debug, PartialEq)]
pub struct AtCommand {
    // Command as received from the headset
    pub raw: String,
    // Set, query, test or execute
    pub at_type: AtCommandType,
    // The actual command being sent (AT+<command>=?)
    pub command: String,
    // Unparsed arguments from the raw command string, in order
    pub raw_args: Option<Vec<String>>,
}

/// Splits an AT command into type, command name and arguments.
pub fn parse_at_command(at_string: &str) -> Result<AtCommand, TelephonyError> {
    // Commands arrive as AT+<command>, +<command>, ATA or plain <command>.
    let trimmed = at_string.trim();
    let clean_at_string = trimmed.strip_prefix("AT").unwrap_or(trimmed);
    let clean_at_string = clean_at_string.strip_prefix('+').unwrap_or(clean_at_string);
    if clean_at_string.is_empty() {
        return Err(TelephonyError::MalformedAtCommand("empty AT command".to_string()));
    }
    let at_type = parse_at_command_type(clean_at_string);
    let (command, arg_string) = match at_type {
        AtCommandType::Execute => (clean_at_string, None),
        AtCommandType::Test => split_once(clean_at_string, AT_COMMAND_DELIMITER_TEST),
        AtCommandType::Query => split_once(clean_at_string, AT_COMMAND_DELIMITER_QUERY),
        AtCommandType::Set => split_once(clean_at_string, AT_COMMAND_DELIMITER_SET),
    };
    let raw_args = match arg_string {
        Some(args) if !args.is_empty() => Some(
            args.split(AT_COMMAND_ARG_DELIMITER).map(|arg| arg.trim().to_string()).collect(),
        ),
        _ => None,
    };
    Ok(AtCommand {
        raw: at_string.to_string(),
        at_type,
        command: command.to_string(),
        raw_args,
    })
}

/// Parses an AT command and maps it to the headset request it carries.
pub fn parse_headset_command(at_string: &str) -> Result<HeadsetCommand, TelephonyError> {
    parse_at_command(at_string)?.to_headset_command()
}

impl AtCommand {
    pub fn to_headset_command(&self) -> Result<HeadsetCommand, TelephonyError> {
        match (self.command.as_str(), &self.at_type) {
            (AT_COMMAND_ANSWER, AtCommandType::Execute) => Ok(HeadsetCommand::AnswerCall),
            (AT_COMMAND_HANGUP, AtCommandType::Execute) => Ok(HeadsetCommand::HangupCall),
            (AT_COMMAND_LIST_CALLS, AtCommandType::Execute) => {
                Ok(HeadsetCommand::ListCurrentCalls)
            }
            (AT_COMMAND_INDICATORS, AtCommandType::Query) => Ok(HeadsetCommand::QueryPhoneState),
            (AT_COMMAND_OPERATOR, AtCommandType::Query) => Ok(HeadsetCommand::GetNetworkOperator),
            (AT_COMMAND_SUBSCRIBER_NUMBER, AtCommandType::Execute) => {
                Ok(HeadsetCommand::GetSubscriberNumber)
            }
            (AT_COMMAND_DTMF, AtCommandType::Set) => {
                let mut digits = self.single_arg()?.chars();
                match (digits.next(), digits.next()) {
                    (Some(digit), None) => Ok(HeadsetCommand::SendDtmf(digit as i32)),
                    _ => Err(TelephonyError::MalformedAtCommand(self.raw.clone())),
                }
            }
            (AT_COMMAND_CALL_HOLD, AtCommandType::Set) => self
                .single_arg()?
                .parse::<i32>()
                .map(HeadsetCommand::CallHold)
                .map_err(|_| TelephonyError::MalformedAtCommand(self.raw.clone())),
            _ => Err(TelephonyError::UnsupportedAtCommand(self.raw.clone())),
        }
    }

    fn single_arg(&self) -> Result<&str, TelephonyError> {
        match self.raw_args.as_deref() {
            Some([arg]) => Ok(arg.as_str()),
            _ => Err(TelephonyError::MalformedAtCommand(self.raw.clone())),
        }
    }
}

fn split_once<'a>(command: &'a str, delimiter: &str) -> (&'a str, Option<&'a str>) {
    match command.split_once(delimiter) {
        Some((command, args)) => (command, Some(args)),
        None => (command, None),
    }
}

fn parse_at_command_type(command: &str) -> AtCommandType {
    if command.contains(AT_COMMAND_DELIMITER_TEST) {
        return AtCommandType::Test;
    }
    if command.contains(AT_COMMAND_DELIMITER_QUERY) {
        return AtCommandType::Query;
    }
    if command.contains(AT_COMMAND_DELIMITER_SET) {
        return AtCommandType::Set;
    }
    AtCommandType::Execute
}
