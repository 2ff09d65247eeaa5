// Copyright (C) 2025  Tom Waddington
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! The key-press action
//!
//! One full pass over the configured key sequence. Per-key failures are
//! isolated so the remaining keys still get pressed, and the whole pass
//! runs on its own task so nothing can leak out into the scheduler loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::keys::{KeyError, Keyboard};
use crate::status::{StatusSender, truncate};
use crate::types::KeyConfig;

/// Delay between the two presses of a press-twice key.
const REPEAT_DELAY: Duration = Duration::from_millis(500);
/// Delay between different keys.
const KEY_DELAY: Duration = Duration::from_millis(500);
/// Length cap for per-key error text in status lines.
const KEY_ERROR_CHARS: usize = 30;

/// Run one key-press action, converting any panic from inside it into a
/// generic error status instead of killing the scheduling loop.
pub(crate) async fn press_action<K>(
    keyboard: &Arc<K>,
    keys: &[KeyConfig],
    status: &Arc<StatusSender>,
) where
    K: Keyboard + 'static,
{
    let pass = tokio::spawn(press_keys(keyboard.clone(), keys.to_vec(), status.clone()));
    if let Err(err) = pass.await {
        error!("key-press action failed: {err}");
        status.send("Error pressing keys");
    }
}

/// Press the configured keys in order and report one consolidated summary.
pub async fn press_keys<K: Keyboard>(
    keyboard: Arc<K>,
    keys: Vec<KeyConfig>,
    status: Arc<StatusSender>,
) {
    if keys.is_empty() {
        warn!("no keys configured");
        return;
    }

    debug!("pressing {} key(s)", keys.len());

    let mut pressed: Vec<String> = Vec::new();
    for config in &keys {
        let outcome = async {
            keyboard.press_and_release(&config.key)?;
            pressed.push(config.key.to_uppercase());
            if config.press_twice {
                sleep(REPEAT_DELAY).await;
                keyboard.press_and_release(&config.key)?;
            }
            sleep(KEY_DELAY).await;
            Ok::<(), KeyError>(())
        }
        .await;

        if let Err(err) = outcome {
            error!("error pressing key '{}': {err}", config.key);
            status.send(&format!(
                "Error pressing {}: {}",
                config.key,
                truncate(&err.to_string(), KEY_ERROR_CHARS)
            ));
        }
    }

    if pressed.is_empty() {
        warn!("no keys were successfully pressed");
    } else {
        let summary = pressed.join(" + ");
        info!("pressed: {summary}");
        status.send(&format!("Pressed: {summary}"));
    }
}
