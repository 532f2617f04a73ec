// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Time-derived booking identifiers.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Issues `bk_<unix nanos>` identifiers, strictly increasing within the process
/// even when the clock stalls or steps backwards.
#[derive(Debug, Default)]
pub struct BookingIdGenerator {
    last: AtomicU64,
}

impl BookingIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> String {
        let now = Utc::now()
            .timestamp_nanos_opt()
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or_default();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return format!("bk_{candidate}"),
                Err(actual) => prev = actual,
            }
        }
    }
}
