// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android platform bridge via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. Everything goes through `android.bluetooth`:
// an SPP socket per write, and the adapter's bonded-device set for discovery.
//
// JNI calls block, so the async `Connection` methods hop onto the blocking
// pool and hold Java objects as `GlobalRef`s between calls.

#![cfg(target_os = "android")]

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jni::objects::{GlobalRef, JByteArray, JObject, JObjectArray, JString, JValue};
use jni::{JNIEnv, JavaVM};
use tracing::{debug, info, warn};

use labelwerk_core::AppConfig;
use labelwerk_core::error::{LabelwerkError, Result};
use labelwerk_core::types::{DiscoveredPrinter, PermissionStatus};
use labelwerk_print::connection::QUIET_PERIOD;
use labelwerk_print::discovery::is_printer_class;
use labelwerk_print::{Connection, ConnectionProvider, Discoverer, DiscoveryHandler};

use crate::traits::*;

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

/// Serial Port Profile service UUID.
const SPP_UUID: &str = "00001101-0000-1000-8000-00805F9B34FB";

/// First SDK level with the split BLUETOOTH_SCAN / BLUETOOTH_CONNECT permissions.
const SDK_BLUETOOTH_RUNTIME_PERMISSIONS: i32 = 31;

const PERMISSION_GRANTED: i32 = 0;

const BLUETOOTH_PERMISSIONS: [&str; 2] = [
    "android.permission.BLUETOOTH_CONNECT",
    "android.permission.BLUETOOTH_SCAN",
];

/// Request code passed to `requestPermissions`.
pub const REQUEST_BLUETOOTH_PERMISSIONS: i32 = 0x4C57_0001; // "LW" + 1

const READ_BUFFER_SIZE: i32 = 1024;
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Attach the current thread to the VM and run `f` with the hosting Activity.
///
/// A pending Java exception left behind by a failed call is described to
/// logcat and cleared before returning.
fn with_env<T>(f: impl FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> Result<T>) -> Result<T> {
    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` returns the `JavaVM*` set by the NDK glue code.
    // The pointer is valid for the lifetime of the process.
    let vm = unsafe { JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| LabelwerkError::Bridge(format!("failed to obtain JavaVM: {e}")))?;
    let mut env = vm
        .attach_current_thread()
        .map_err(|e| LabelwerkError::Bridge(format!("failed to attach JNI thread: {e}")))?;

    let ptr = ctx.context();
    if ptr.is_null() {
        return Err(LabelwerkError::Bridge(
            "Android context is null; native activity not initialised".into(),
        ));
    }
    // SAFETY: the NDK guarantees this pointer is a valid global jobject for
    // the hosting Activity.
    let activity = unsafe { JObject::from_raw(ptr.cast()) };

    let result = f(&mut env, &activity);
    if result.is_err() && env.exception_check().unwrap_or(false) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
    result
}

/// Map any `jni::errors::Error` into `LabelwerkError::Bridge`.
fn jni_err(context: &str, e: jni::errors::Error) -> LabelwerkError {
    LabelwerkError::Bridge(format!("{context}: {e}"))
}

/// Run a JNI closure on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || with_env(f))
        .await
        .map_err(|e| LabelwerkError::Bridge(format!("JNI task failed: {e}")))?
}

fn sdk_int(env: &mut JNIEnv<'_>) -> Result<i32> {
    env.get_static_field("android/os/Build$VERSION", "SDK_INT", "I")
        .map_err(|e| jni_err("Build.VERSION.SDK_INT", e))?
        .i()
        .map_err(|e| jni_err("SDK_INT->i", e))
}

/// `BluetoothAdapter.getDefaultAdapter()`, failing when the device has no
/// radio or it is switched off.
fn default_adapter<'local>(env: &mut JNIEnv<'local>) -> Result<JObject<'local>> {
    let adapter = env
        .call_static_method(
            "android/bluetooth/BluetoothAdapter",
            "getDefaultAdapter",
            "()Landroid/bluetooth/BluetoothAdapter;",
            &[],
        )
        .map_err(|e| jni_err("BluetoothAdapter.getDefaultAdapter", e))?
        .l()
        .map_err(|e| jni_err("getDefaultAdapter->l", e))?;
    if adapter.is_null() {
        return Err(LabelwerkError::Discovery("no Bluetooth adapter".into()));
    }

    let enabled = env
        .call_method(&adapter, "isEnabled", "()Z", &[])
        .map_err(|e| jni_err("BluetoothAdapter.isEnabled", e))?
        .z()
        .map_err(|e| jni_err("isEnabled->z", e))?;
    if !enabled {
        return Err(LabelwerkError::Discovery("Bluetooth adapter is not powered".into()));
    }
    Ok(adapter)
}

fn string_method(env: &mut JNIEnv<'_>, obj: &JObject<'_>, name: &str) -> Result<Option<String>> {
    let value = env
        .call_method(obj, name, "()Ljava/lang/String;", &[])
        .map_err(|e| jni_err(name, e))?
        .l()
        .map_err(|e| jni_err(name, e))?;
    if value.is_null() {
        return Ok(None);
    }
    let value = JString::from(value);
    let s: String = env
        .get_string(&value)
        .map_err(|e| jni_err("get_string", e))?
        .into();
    Ok(Some(s))
}

// ---------------------------------------------------------------------------
// Bridge struct
// ---------------------------------------------------------------------------

/// Android implementation of the Labelwerk platform bridge.
///
/// Zero-sized; all state lives on the Java side.
pub struct AndroidBridge;

impl AndroidBridge {
    /// Create a new Android bridge. Does not touch JNI.
    pub fn new() -> Self {
        Self
    }
}

impl Default for AndroidBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformBridge for AndroidBridge {
    fn platform_name(&self) -> &str {
        "Android"
    }
}

// ---------------------------------------------------------------------------
// NativePermissions: Activity.requestPermissions
// ---------------------------------------------------------------------------

impl NativePermissions for AndroidBridge {
    /// Below API 31 the install-time BLUETOOTH permissions cover everything.
    /// Otherwise missing permissions are requested; the user's answer arrives
    /// through the Activity's `onRequestPermissionsResult`.
    fn request_bluetooth_permissions(&self) -> Result<PermissionStatus> {
        with_env(|env, activity| {
            let sdk = sdk_int(env)?;
            if sdk < SDK_BLUETOOTH_RUNTIME_PERMISSIONS {
                debug!(sdk, "Android: Bluetooth runtime permissions not required");
                return Ok(PermissionStatus::NotRequired);
            }

            let mut missing = Vec::new();
            for permission in BLUETOOTH_PERMISSIONS {
                let j_perm = env
                    .new_string(permission)
                    .map_err(|e| jni_err("new_string(permission)", e))?;
                let granted = env
                    .call_method(
                        activity,
                        "checkSelfPermission",
                        "(Ljava/lang/String;)I",
                        &[JValue::Object(&j_perm)],
                    )
                    .map_err(|e| jni_err("checkSelfPermission", e))?
                    .i()
                    .map_err(|e| jni_err("checkSelfPermission->i", e))?;
                if granted != PERMISSION_GRANTED {
                    missing.push(permission);
                }
            }

            if missing.is_empty() {
                return Ok(PermissionStatus::Granted);
            }

            let array = env
                .new_object_array(missing.len() as i32, "java/lang/String", JObject::null())
                .map_err(|e| jni_err("new_object_array", e))?;
            for (i, permission) in missing.iter().enumerate() {
                let j_perm = env
                    .new_string(permission)
                    .map_err(|e| jni_err("new_string(permission)", e))?;
                env.set_object_array_element(&array, i as i32, j_perm)
                    .map_err(|e| jni_err("set_object_array_element", e))?;
            }
            env.call_method(
                activity,
                "requestPermissions",
                "([Ljava/lang/String;I)V",
                &[
                    JValue::Object(&array),
                    JValue::Int(REQUEST_BLUETOOTH_PERMISSIONS),
                ],
            )
            .map_err(|e| jni_err("Activity.requestPermissions", e))?;

            info!(?missing, "Android: requested Bluetooth permissions");
            Ok(PermissionStatus::Requested)
        })
    }
}

// ---------------------------------------------------------------------------
// NativeBluetoothPrint: android.bluetooth
// ---------------------------------------------------------------------------

impl NativeBluetoothPrint for AndroidBridge {
    fn connector(&self, _config: &AppConfig) -> Result<Arc<dyn ConnectionProvider>> {
        Ok(Arc::new(AndroidConnector))
    }

    fn discoverer(&self, config: &AppConfig) -> Result<Arc<dyn Discoverer>> {
        Ok(Arc::new(BondedDeviceDiscoverer {
            printers_only: config.printers_only,
        }))
    }
}

/// Hands out SPP socket connections.
pub struct AndroidConnector;

impl ConnectionProvider for AndroidConnector {
    fn connection(&self, address: &str) -> Box<dyn Connection> {
        Box::new(AndroidConnection {
            address: address.to_string(),
            socket: None,
        })
    }
}

/// A `BluetoothSocket` to one printer.
pub struct AndroidConnection {
    address: String,
    socket: Option<GlobalRef>,
}

impl AndroidConnection {
    fn socket(&self) -> Result<GlobalRef> {
        self.socket
            .clone()
            .ok_or_else(|| LabelwerkError::connection(&self.address, "not open"))
    }
}

#[async_trait]
impl Connection for AndroidConnection {
    fn address(&self) -> &str {
        &self.address
    }

    async fn open(&mut self) -> Result<()> {
        let address = self.address.clone();
        let socket = blocking(move |env, _activity| {
            let adapter = default_adapter(env)?;

            // Discovery slows down RFCOMM connects considerably.
            env.call_method(&adapter, "cancelDiscovery", "()Z", &[])
                .map_err(|e| jni_err("BluetoothAdapter.cancelDiscovery", e))?;

            let j_address = env
                .new_string(&address)
                .map_err(|e| jni_err("new_string(address)", e))?;
            let device = env
                .call_method(
                    &adapter,
                    "getRemoteDevice",
                    "(Ljava/lang/String;)Landroid/bluetooth/BluetoothDevice;",
                    &[JValue::Object(&j_address)],
                )
                .and_then(|v| v.l())
                .map_err(|e| {
                    LabelwerkError::connection(&address, format!("invalid Bluetooth address: {e}"))
                })?;

            let j_uuid_str = env
                .new_string(SPP_UUID)
                .map_err(|e| jni_err("new_string(SPP_UUID)", e))?;
            let uuid = env
                .call_static_method(
                    "java/util/UUID",
                    "fromString",
                    "(Ljava/lang/String;)Ljava/util/UUID;",
                    &[JValue::Object(&j_uuid_str)],
                )
                .map_err(|e| jni_err("UUID.fromString", e))?
                .l()
                .map_err(|e| jni_err("fromString->l", e))?;

            let socket = env
                .call_method(
                    &device,
                    "createRfcommSocketToServiceRecord",
                    "(Ljava/util/UUID;)Landroid/bluetooth/BluetoothSocket;",
                    &[JValue::Object(&uuid)],
                )
                .and_then(|v| v.l())
                .map_err(|e| LabelwerkError::connection(&address, e))?;

            env.call_method(&socket, "connect", "()V", &[])
                .map_err(|e| LabelwerkError::connection(&address, e))?;

            env.new_global_ref(&socket)
                .map_err(|e| jni_err("new_global_ref(socket)", e))
        })
        .await?;

        info!(address = %self.address, "Android: SPP socket connected");
        self.socket = Some(socket);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        let socket = self.socket()?;
        let address = self.address.clone();
        let data = data.to_vec();
        blocking(move |env, _activity| {
            let stream = env
                .call_method(socket.as_obj(), "getOutputStream", "()Ljava/io/OutputStream;", &[])
                .and_then(|v| v.l())
                .map_err(|e| LabelwerkError::connection(&address, e))?;
            let bytes = env
                .byte_array_from_slice(&data)
                .map_err(|e| jni_err("byte_array_from_slice", e))?;
            env.call_method(&stream, "write", "([B)V", &[JValue::Object(&bytes)])
                .map_err(|e| LabelwerkError::connection(&address, e))?;
            env.call_method(&stream, "flush", "()V", &[])
                .map_err(|e| LabelwerkError::connection(&address, e))?;
            Ok(())
        })
        .await
    }

    /// Polls `InputStream.available()` so a silent printer never blocks the
    /// pool thread past `max_wait`.
    async fn read_with_timeout(&mut self, max_wait: Duration) -> Result<Vec<u8>> {
        let socket = self.socket()?;
        let address = self.address.clone();
        blocking(move |env, _activity| {
            let stream = env
                .call_method(socket.as_obj(), "getInputStream", "()Ljava/io/InputStream;", &[])
                .and_then(|v| v.l())
                .map_err(|e| LabelwerkError::connection(&address, e))?;
            let buffer: JByteArray = env
                .new_byte_array(READ_BUFFER_SIZE)
                .map_err(|e| jni_err("new_byte_array", e))?;

            let deadline = Instant::now() + max_wait;
            let mut received = Vec::new();
            let mut last_data: Option<Instant> = None;

            loop {
                let now = Instant::now();
                if now >= deadline || last_data.is_some_and(|t| now - t >= QUIET_PERIOD) {
                    break;
                }

                let available = env
                    .call_method(&stream, "available", "()I", &[])
                    .and_then(|v| v.i())
                    .map_err(|e| LabelwerkError::connection(&address, e))?;
                if available <= 0 {
                    std::thread::sleep(POLL_INTERVAL);
                    continue;
                }

                let n = env
                    .call_method(
                        &stream,
                        "read",
                        "([BII)I",
                        &[
                            JValue::Object(&buffer),
                            JValue::Int(0),
                            JValue::Int(available.min(READ_BUFFER_SIZE)),
                        ],
                    )
                    .and_then(|v| v.i())
                    .map_err(|e| LabelwerkError::connection(&address, e))?;
                if n < 0 {
                    break;
                }
                let chunk = env
                    .convert_byte_array(&buffer)
                    .map_err(|e| jni_err("convert_byte_array", e))?;
                received.extend_from_slice(&chunk[..n as usize]);
                last_data = Some(Instant::now());
            }

            Ok(received)
        })
        .await
    }

    async fn close(&mut self) -> Result<()> {
        let Some(socket) = self.socket.take() else {
            return Ok(());
        };
        let address = self.address.clone();
        blocking(move |env, _activity| {
            env.call_method(socket.as_obj(), "close", "()V", &[])
                .map_err(|e| LabelwerkError::connection(&address, e))?;
            Ok(())
        })
        .await?;
        debug!(address = %self.address, "Android: SPP socket closed");
        Ok(())
    }
}

/// Reports the adapter's bonded devices.
///
/// Printers must be paired in system settings before they show up; an
/// inquiry scan would need a registered `BroadcastReceiver` on the Java side.
pub struct BondedDeviceDiscoverer {
    printers_only: bool,
}

#[async_trait]
impl Discoverer for BondedDeviceDiscoverer {
    async fn find_printers(&self, handler: &mut dyn DiscoveryHandler) -> Result<()> {
        let printers_only = self.printers_only;
        let found = blocking(move |env, _activity| {
            let adapter = default_adapter(env)?;
            let bonded = env
                .call_method(&adapter, "getBondedDevices", "()Ljava/util/Set;", &[])
                .and_then(|v| v.l())
                .map_err(|e| LabelwerkError::Discovery(format!("getBondedDevices: {e}")))?;
            let array = env
                .call_method(&bonded, "toArray", "()[Ljava/lang/Object;", &[])
                .and_then(|v| v.l())
                .map_err(|e| jni_err("Set.toArray", e))?;
            let array = JObjectArray::from(array);
            let len = env
                .get_array_length(&array)
                .map_err(|e| jni_err("get_array_length", e))?;

            let mut found = Vec::new();
            for i in 0..len {
                let device = env
                    .get_object_array_element(&array, i)
                    .map_err(|e| jni_err("get_object_array_element", e))?;

                if printers_only {
                    let class = env
                        .call_method(
                            &device,
                            "getBluetoothClass",
                            "()Landroid/bluetooth/BluetoothClass;",
                            &[],
                        )
                        .and_then(|v| v.l())
                        .map_err(|e| jni_err("getBluetoothClass", e))?;
                    let is_printer = !class.is_null()
                        && env
                            .call_method(&class, "getDeviceClass", "()I", &[])
                            .and_then(|v| v.i())
                            .map(|c| is_printer_class(c as u32))
                            .map_err(|e| jni_err("getDeviceClass", e))?;
                    if !is_printer {
                        continue;
                    }
                }

                let Some(address) = string_method(env, &device, "getAddress")? else {
                    continue;
                };
                let name = string_method(env, &device, "getName")?;
                found.push(DiscoveredPrinter::new(address, name));
            }
            Ok(found)
        })
        .await?;

        if found.is_empty() {
            warn!("Android: no bonded printers");
        }
        for printer in found {
            handler.found_printer(printer);
        }
        Ok(())
    }
}
