use std::future::Future;

use bt_telephony::{
    call::{Call, CallId, CallState},
    config::TelephonyConfig,
    logging::init_logging,
    mocks::{
        mock_calls_manager::{MockCallsManager, MockCallsManagerEvents},
        mock_headset::{MockHeadset, MockHeadsetEvents},
        mock_phone_account_registrar::MockPhoneAccountRegistrar,
    },
    service::BluetoothPhoneService,
};
use log::LevelFilter;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::LocalSet;

pub fn start_test(f: impl Future<Output = ()>) {
    tokio_test::block_on(async move {
        init_logging(LevelFilter::Debug);
        LocalSet::new().run_until(f).await;
    });
}

pub struct TestHarness {
    pub service: BluetoothPhoneService<MockCallsManager>,
    pub calls_manager_rx: UnboundedReceiver<MockCallsManagerEvents>,
    pub headset_rx: UnboundedReceiver<MockHeadsetEvents>,
}

/// Service with a headset attached, backed by mocks.
pub fn start_service(registrar: MockPhoneAccountRegistrar) -> TestHarness {
    let (calls_manager, calls_manager_rx) = MockCallsManager::new();
    let (headset, headset_rx) = MockHeadset::new();
    let mut service =
        BluetoothPhoneService::new(calls_manager, Box::new(registrar), TelephonyConfig::default());
    service.set_bluetooth_headset(Some(Box::new(headset)));
    TestHarness { service, calls_manager_rx, headset_rx }
}

pub fn add_call(service: &mut BluetoothPhoneService<MockCallsManager>, call: Call) -> CallId {
    let id = call.id;
    service.calls_manager_mut().calls_mut().insert(call);
    id
}

pub fn call_with_number(id: u32, state: CallState, number: &str) -> Call {
    let mut call = Call::new(CallId(id), state);
    call.handle = Some(format!("tel:{}", number));
    call
}

pub fn set_state(
    service: &mut BluetoothPhoneService<MockCallsManager>,
    id: CallId,
    state: CallState,
) {
    if let Some(call) = service.calls_manager_mut().calls_mut().get_mut(id) {
        call.state = state;
    }
}

/// Everything sent on `rx` so far.
pub fn drain<T>(rx: &mut UnboundedReceiver<T>) -> Vec<T> {
    let mut events = vec![];
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
