// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Balance Watcher
//!
//! Reactive ERC-20 balance fetcher. The caller feeds the current inputs
//! (connection, account, token contract address, token ABI) through
//! [`BalanceWatcher::observe`] whenever they may have changed; the watcher
//! issues one `balanceOf` call per change and publishes the result, scaled
//! to `mwei`, into a single-slot [`tokio::sync::watch`] channel.
//!
//! ## Re-evaluation
//!
//! Inputs are compared by identity: strings by value, the connection and
//! ABI by `Arc` pointer. Observing identical inputs again does nothing.
//! If any input is absent (or an address is empty) no call is made and the
//! published balance is left as it was.
//!
//! ## Out-of-order completion
//!
//! Fetches are never cancelled, so two may be in flight at once. Each fetch
//! is tagged with the generation of the inputs it was issued under. With
//! [`CompletionPolicy::DiscardStale`] (the default) only the latest
//! generation may publish. [`CompletionPolicy::LastCompletedWins`] keeps the
//! older behaviour where whichever call resolves last overwrites the value.
//!
//! ## Failures
//!
//! A failed fetch leaves the published value untouched. The error is logged
//! and returned through the [`FetchHandle`]; awaiting the handle is the
//! caller's error channel. There is no retry.

use std::sync::{Arc, Mutex, PoisonError};

use alloy::json_abi::JsonAbi;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::blockchain::{from_mwei, BalanceSource, ClientError};

/// Which fetch completions are allowed to overwrite the published balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompletionPolicy {
    /// Only a fetch issued under the most recently observed inputs publishes.
    #[default]
    DiscardStale,
    /// Every completion publishes; the last one to resolve wins.
    LastCompletedWins,
}

/// The four inputs a balance depends on.
pub struct BalanceInputs<C> {
    pub connection: Option<Arc<C>>,
    pub account: Option<String>,
    pub contract_address: Option<String>,
    pub contract_interface: Option<Arc<JsonAbi>>,
}

impl<C> BalanceInputs<C> {
    pub fn new(
        connection: Arc<C>,
        account: impl Into<String>,
        contract_address: impl Into<String>,
        contract_interface: Arc<JsonAbi>,
    ) -> Self {
        Self {
            connection: Some(connection),
            account: Some(account.into()),
            contract_address: Some(contract_address.into()),
            contract_interface: Some(contract_interface),
        }
    }

    /// True when no input changed identity between `self` and `other`.
    fn same_identity(&self, other: &Self) -> bool {
        same_arc(&self.connection, &other.connection)
            && self.account == other.account
            && self.contract_address == other.contract_address
            && same_arc(&self.contract_interface, &other.contract_interface)
    }

    /// Everything needed for a call, or `None` if any input is missing.
    fn request(&self) -> Option<FetchRequest<C>> {
        Some(FetchRequest {
            connection: Arc::clone(self.connection.as_ref()?),
            account: present(&self.account)?,
            contract_address: present(&self.contract_address)?,
            abi: Arc::clone(self.contract_interface.as_ref()?),
        })
    }
}

impl<C> Clone for BalanceInputs<C> {
    fn clone(&self) -> Self {
        Self {
            connection: self.connection.clone(),
            account: self.account.clone(),
            contract_address: self.contract_address.clone(),
            contract_interface: self.contract_interface.clone(),
        }
    }
}

impl<C> Default for BalanceInputs<C> {
    fn default() -> Self {
        Self {
            connection: None,
            account: None,
            contract_address: None,
            contract_interface: None,
        }
    }
}

fn same_arc<T>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
}

struct FetchRequest<C> {
    connection: Arc<C>,
    account: String,
    contract_address: String,
    abi: Arc<JsonAbi>,
}

/// How a fetch ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The balance was published.
    Published(String),
    /// Newer inputs were observed while the call was in flight.
    Discarded { generation: u64, latest: u64 },
}

/// Errors surfaced through a [`FetchHandle`].
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Fetch task aborted: {0}")]
    Aborted(String),
}

/// Handle to one in-flight fetch.
#[derive(Debug)]
pub struct FetchHandle {
    generation: u64,
    task: JoinHandle<Result<FetchOutcome, FetchError>>,
}

impl FetchHandle {
    /// Generation of the inputs this fetch was issued under.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wait for the fetch to complete.
    pub async fn join(self) -> Result<FetchOutcome, FetchError> {
        self.task
            .await
            .map_err(|e| FetchError::Aborted(e.to_string()))?
    }
}

/// State shared between the watcher and its in-flight fetches.
struct Shared {
    generation: Mutex<u64>,
    balance: watch::Sender<String>,
}

impl Shared {
    fn advance(&self) -> u64 {
        let mut generation = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        *generation += 1;
        *generation
    }

    fn latest(&self) -> u64 {
        *self.generation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish `balance` if `policy` accepts a completion from `generation`.
    ///
    /// The generation lock is held across the check and the write.
    fn publish(&self, policy: CompletionPolicy, generation: u64, balance: String) -> FetchOutcome {
        let latest = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        if policy == CompletionPolicy::DiscardStale && *latest != generation {
            return FetchOutcome::Discarded {
                generation,
                latest: *latest,
            };
        }
        self.balance.send_replace(balance.clone());
        FetchOutcome::Published(balance)
    }
}

/// Reactive ERC-20 balance fetcher with a single published value.
pub struct BalanceWatcher<C> {
    policy: CompletionPolicy,
    observed: Option<BalanceInputs<C>>,
    shared: Arc<Shared>,
}

impl<C: BalanceSource> BalanceWatcher<C> {
    /// Create a watcher whose published balance starts as `""`.
    pub fn new(policy: CompletionPolicy) -> Self {
        let (balance, _) = watch::channel(String::new());
        Self {
            policy,
            observed: None,
            shared: Arc::new(Shared {
                generation: Mutex::new(0),
                balance,
            }),
        }
    }

    /// Re-evaluate against the current inputs.
    ///
    /// Returns a handle when a fetch was issued, `None` when the inputs are
    /// unchanged or incomplete. Must be called from within a tokio runtime.
    pub fn observe(&mut self, inputs: BalanceInputs<C>) -> Option<FetchHandle> {
        if let Some(previous) = &self.observed {
            if previous.same_identity(&inputs) {
                return None;
            }
        }

        let generation = self.shared.advance();
        let request = inputs.request();
        self.observed = Some(inputs);

        let Some(request) = request else {
            debug!(generation, "Balance inputs incomplete, skipping fetch");
            return None;
        };

        debug!(
            generation,
            account = %request.account,
            contract = %request.contract_address,
            "Fetching token balance"
        );

        let shared = Arc::clone(&self.shared);
        let policy = self.policy;
        let task = tokio::spawn(fetch(shared, policy, generation, request));

        Some(FetchHandle { generation, task })
    }

    /// The currently published balance.
    pub fn balance(&self) -> String {
        self.shared.balance.borrow().clone()
    }

    /// Subscribe to balance updates.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.shared.balance.subscribe()
    }

    /// Generation of the most recently observed inputs.
    pub fn generation(&self) -> u64 {
        self.shared.latest()
    }

    pub fn policy(&self) -> CompletionPolicy {
        self.policy
    }
}

impl<C: BalanceSource> Default for BalanceWatcher<C> {
    fn default() -> Self {
        Self::new(CompletionPolicy::default())
    }
}

async fn fetch<C: BalanceSource>(
    shared: Arc<Shared>,
    policy: CompletionPolicy,
    generation: u64,
    request: FetchRequest<C>,
) -> Result<FetchOutcome, FetchError> {
    let raw = match request
        .connection
        .balance_of(&request.contract_address, request.abi, &request.account)
        .await
    {
        Ok(raw) => raw,
        Err(e) => {
            warn!(
                generation,
                account = %request.account,
                contract = %request.contract_address,
                error = %e,
                "Token balance fetch failed"
            );
            return Err(e.into());
        }
    };

    let outcome = shared.publish(policy, generation, from_mwei(raw));
    match &outcome {
        FetchOutcome::Published(balance) => info!(
            generation,
            account = %request.account,
            balance = %balance,
            "Token balance updated"
        ),
        FetchOutcome::Discarded { latest, .. } => debug!(
            generation,
            latest,
            "Discarding balance from stale inputs"
        ),
    }
    Ok(outcome)
}
