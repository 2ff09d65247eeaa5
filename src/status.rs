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

//! Status reporting boundary between the worker and its caller

use std::panic::{self, AssertUnwindSafe};

use tracing::error;

/// Callback invoked from the worker task for each status message.
/// Runs on the worker's own context, so it should hand off quickly.
pub type StatusCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Wraps the optional caller-supplied callback. A panicking callback is
/// logged and swallowed so it can never take down the scheduling loop.
pub struct StatusSender {
    callback: Option<StatusCallback>,
}

impl StatusSender {
    pub fn new(callback: Option<StatusCallback>) -> Self {
        Self { callback }
    }

    pub fn send(&self, message: &str) {
        let Some(callback) = &self.callback else {
            return;
        };
        if panic::catch_unwind(AssertUnwindSafe(|| callback(message))).is_err() {
            error!("status callback panicked on message: {message}");
        }
    }
}

/// Cap a message at `max_chars` characters to keep status lines short.
pub(crate) fn truncate(message: &str, max_chars: usize) -> String {
    message.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_send_without_callback_is_a_noop() {
        let sender = StatusSender::new(None);
        sender.send("nobody listening");
    }

    #[test]
    fn test_send_invokes_callback() {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = messages.clone();
        let sender = StatusSender::new(Some(Box::new(move |msg: &str| {
            sink.lock().unwrap().push(msg.to_string());
        })));

        sender.send("one");
        sender.send("two");

        assert_eq!(*messages.lock().unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn test_panicking_callback_is_contained() {
        let sender = StatusSender::new(Some(Box::new(|_msg: &str| {
            panic!("bad callback");
        })));

        // Must not propagate the panic.
        sender.send("first");
        sender.send("second");
    }

    #[test]
    fn test_truncate_short_message_unchanged() {
        assert_eq!(truncate("short", 50), "short");
    }

    #[test]
    fn test_truncate_caps_length() {
        let long = "x".repeat(80);
        assert_eq!(truncate(&long, 50).chars().count(), 50);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("åäö", 2), "åä");
    }
}
