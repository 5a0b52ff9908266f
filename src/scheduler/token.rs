// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene execution token.

use std::fmt;

use uuid::Uuid;

/// Identifies one scene execution.
///
/// A token is minted each time a scene starts and is never reused. A scene
/// loop keeps running only while its token is the scheduler's active token.
///
/// # Examples
///
/// ```
/// use tuya_scenes::scheduler::SceneToken;
///
/// let a = SceneToken::new();
/// let b = SceneToken::new();
/// assert_ne!(a, b);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct SceneToken(Uuid);

impl SceneToken {
    /// Mints a new unique token.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SceneToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SceneToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Show only first 8 characters for readability
        let short = &self.0.to_string()[..8];
        write!(f, "SceneToken({short}...)")
    }
}

impl fmt::Display for SceneToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
