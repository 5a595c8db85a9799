// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::ProviderChain;

/// Shared handler state. The chain is built once at startup and injected
/// here; nothing looks it up globally.
#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<ProviderChain>,
}

impl AppState {
    pub fn new(chain: ProviderChain) -> Self {
        Self {
            chain: Arc::new(chain),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ProviderChain::new())
    }
}
