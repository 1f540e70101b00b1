// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::{SearchError, SearchIndex};
use log::{info, warn};
use std::time::Duration;

/// Bounded exponential backoff used while the search engine starts up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl ReadinessPolicy {
    /// Delay before attempt `attempt + 1`, doubling from the initial backoff.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// Polls [`SearchIndex::health`] until it succeeds or the attempts run out.
/// Returns the last error when the engine never became ready.
pub async fn wait_until_ready(
    index: &dyn SearchIndex,
    policy: ReadinessPolicy,
) -> Result<u32, SearchError> {
    let mut attempt = 1;
    loop {
        match index.health().await {
            Ok(()) => {
                info!("Search engine ready after {} attempt(s)", attempt);
                return Ok(attempt);
            }
            Err(err) if attempt >= policy.max_attempts => return Err(err),
            Err(err) => {
                let delay = policy.backoff_for(attempt);
                warn!(
                    "Search engine not ready (attempt {}/{}): {}; retrying in {:?}",
                    attempt, policy.max_attempts, err, delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
