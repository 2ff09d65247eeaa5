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

//! extended-afk: keep a session active by simulating key presses
//!
//! A background scheduler presses a small set of configured keys at
//! randomized intervals until stopped, reporting progress through a
//! status callback.

pub mod keys;
pub mod press;
pub mod presser;
pub mod settings;
pub mod status;
pub mod types;

pub use keys::{KeyError, Keyboard, RdevKeyboard};
pub use presser::KeyPresser;
pub use settings::Settings;
pub use status::StatusCallback;
pub use types::{ConfigError, IntervalBounds, KeyConfig, WorkerState};
