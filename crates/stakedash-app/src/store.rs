//! Staking store: owns dashboard state and drives chain reads and writes.
//!
//! State lives behind a lock and is only observed through [`StakingStore::snapshot`].
//! Each kind of asynchronous load issues a request token; a result is only
//! published if its token is still the latest for that kind, so a slow
//! response never overwrites a newer one.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::future::join_all;
use stakedash_chain::{AccountSigner, ChainError, Identity, StakingCall, StakingReader, StakingWriter};
use stakedash_core::{
    AppConfig, BagListInfo, Balance, DEFAULT_ACTIVE_ERA_TTL, DEFAULT_CACHE_CAPACITY, EraCache,
    EraIndex, NominatorStatus, SelectionChange, SelectionError, SortDirection, SortField,
    TransactionStatus, Validator, historical_eras, sort_validators,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::events::{Notification, StoreEvent};
use crate::state::{Section, StakingState};

/// Default bound on a single identity lookup.
pub const DEFAULT_IDENTITY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum StakingError {
    #[error("Failed to initialize staking data: {0}")]
    Initialization(String),

    #[error("Failed to load validator data: {0}")]
    Fetch(String),

    #[error("Missing {0}")]
    MissingInput(&'static str),
}

/// Result of a rebag request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rebag {
    Submitted(TransactionStatus),
    /// Nothing was submitted; the reason was also sent as a notice.
    Skipped(&'static str),
}

/// Why a rebag would not be submitted for `placement`.
pub fn rebag_skip_reason(placement: Option<&BagListInfo>) -> Option<&'static str> {
    match placement.and_then(|placement| placement.is_misplaced) {
        Some(true) => None,
        Some(false) => Some("You are already in the correct bag."),
        None => Some("Bag position unknown. Check your bag list position first."),
    }
}

/// Store tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// How long the active era's cached list stays fresh.
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
    pub identity_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_ACTIVE_ERA_TTL,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            identity_timeout: DEFAULT_IDENTITY_TIMEOUT,
        }
    }
}

impl From<&AppConfig> for StoreConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            cache_ttl: config.cache_ttl(),
            cache_capacity: config.cache_capacity,
            identity_timeout: config.identity_timeout(),
        }
    }
}

/// Current time on the tokio clock.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

/// Kinds of load whose results compete for the same piece of state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum RequestKey {
    Validators,
    NominatorStatus,
    BagList,
    CanNominate,
    MinStake,
}

struct Inner {
    state: StakingState,
    cache: EraCache,
    latest: HashMap<RequestKey, u64>,
    next_token: u64,
    in_flight: usize,
}

impl Inner {
    fn issue(&mut self, key: RequestKey) -> u64 {
        self.next_token += 1;
        self.latest.insert(key, self.next_token);
        self.next_token
    }

    fn is_latest(&self, key: RequestKey, token: u64) -> bool {
        self.latest.get(&key) == Some(&token)
    }

    fn begin(&mut self) {
        self.in_flight += 1;
        self.state.loading = true;
    }

    fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.state.loading = self.in_flight > 0;
    }
}

/// The dashboard's single source of truth for staking data.
pub struct StakingStore<C> {
    client: Arc<C>,
    inner: Arc<RwLock<Inner>>,
    config: StoreConfig,
    events: mpsc::UnboundedSender<StoreEvent>,
}

impl<C> Clone for StakingStore<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            inner: Arc::clone(&self.inner),
            config: self.config,
            events: self.events.clone(),
        }
    }
}

impl<C> StakingStore<C>
where
    C: StakingReader + StakingWriter + 'static,
{
    /// Create a store and the receiver for its notices and transaction progress.
    pub fn new(client: Arc<C>, config: StoreConfig) -> (Self, mpsc::UnboundedReceiver<StoreEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let inner = Inner {
            state: StakingState::default(),
            cache: EraCache::new(config.cache_capacity, config.cache_ttl),
            latest: HashMap::new(),
            next_token: 0,
            in_flight: 0,
        };
        let store = Self {
            client,
            inner: Arc::new(RwLock::new(inner)),
            config,
            events,
        };
        (store, rx)
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Current state, with `cached_eras` filled from the cache.
    pub fn snapshot(&self) -> StakingState {
        let inner = self.read();
        let mut state = inner.state.clone();
        state.cached_eras = inner.cache.eras();
        state
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, notification: Notification) {
        let _ = self.events.send(StoreEvent::Notice(notification));
    }

    // ---- Era and validator loading ----

    /// Load the active era and minimum bond, then the active era's validators.
    pub async fn fetch_initial_data(&self) -> Result<Vec<Validator>, StakingError> {
        let token = {
            let mut inner = self.write();
            inner.state.error = None;
            inner.begin();
            inner.issue(RequestKey::MinStake)
        };

        let (era, min_bond) = tokio::join!(self.client.active_era(), self.client.min_nominator_bond());
        let (era, min_bond) = match era.and_then(|era| min_bond.map(|bond| (era, bond))) {
            Ok(values) => values,
            Err(e) => {
                error!("Failed to fetch initial data: {}", e);
                let latest = {
                    let mut inner = self.write();
                    let latest = inner.is_latest(RequestKey::MinStake, token);
                    if latest {
                        inner.state.error = Some(e.to_string());
                    }
                    inner.finish();
                    latest
                };
                if latest {
                    self.notify(Notification::error(
                        "Connection",
                        "Failed to load validator data",
                    ));
                }
                return Err(StakingError::Initialization(e.to_string()));
            }
        };

        info!("Active era {}, minimum nominator bond {} planck", era, min_bond);
        {
            let mut inner = self.write();
            inner.state.current_era = Some(era);
            inner.state.historical_eras = historical_eras(era);
            if inner.is_latest(RequestKey::MinStake, token) {
                inner.state.min_stake = Some(min_bond);
            }
            inner.finish();
        }

        self.fetch_validators_for_era(era).await
    }

    /// Make `era` the selected era and load its validator list.
    ///
    /// A fresh cache entry is served without any chain reads.
    pub async fn fetch_validators_for_era(
        &self,
        era: EraIndex,
    ) -> Result<Vec<Validator>, StakingError> {
        let (token, previous_era) = {
            let mut inner = self.write();
            let token = inner.issue(RequestKey::Validators);
            let previous_era = inner.state.selected_era.replace(era);
            let active_era = inner.state.current_era;
            if let Some(cached) = inner.cache.get(era, active_era, now()) {
                debug!("Era {} served from cache ({} validators)", era, cached.len());
                let mut visible = cached.clone();
                sort_validators(&mut visible, inner.state.sort);
                inner.state.validators = visible;
                inner.state.last_updated = Some(Utc::now());
                return Ok(cached);
            }
            inner.state.error = None;
            inner.begin();
            (token, previous_era)
        };

        info!("Loading validators for era {}", era);
        let (addresses, points) = tokio::join!(
            self.client.active_validators(),
            self.client.era_reward_points(era)
        );
        let (addresses, points) = match addresses.and_then(|a| points.map(|p| (a, p))) {
            Ok(values) => values,
            Err(e) => {
                error!("Failed to load validators for era {}: {}", era, e);
                let latest = {
                    let mut inner = self.write();
                    let latest = inner.is_latest(RequestKey::Validators, token);
                    if latest {
                        // The visible list still belongs to the previous era.
                        inner.state.selected_era = previous_era;
                        inner.state.error = Some(e.to_string());
                    }
                    inner.finish();
                    latest
                };
                if latest {
                    self.notify(Notification::error(
                        "Validators",
                        "Failed to load validator data",
                    ));
                }
                return Err(StakingError::Fetch(e.to_string()));
            }
        };

        {
            let mut inner = self.write();
            if inner.is_latest(RequestKey::Validators, token) {
                inner.state.validators = addresses
                    .iter()
                    .map(|address| Validator::placeholder(address.clone(), era))
                    .collect();
            }
        }

        let points: HashMap<&str, u32> = points
            .individual
            .iter()
            .map(|(address, points)| (address.as_str(), *points))
            .collect();
        let mut validators = join_all(addresses.iter().map(|address| {
            let earned = points.get(address.as_str()).copied().unwrap_or(0);
            self.enrich_validator(era, address, earned)
        }))
        .await;

        let mut inner = self.write();
        sort_validators(&mut validators, inner.state.sort);
        inner.cache.insert(era, validators.clone(), now());
        if inner.is_latest(RequestKey::Validators, token) {
            inner.state.validators = validators.clone();
            inner.state.last_updated = Some(Utc::now());
        } else {
            debug!("Discarding superseded validator list for era {}", era);
        }
        inner.finish();
        info!("Loaded {} validators for era {}", validators.len(), era);

        Ok(validators)
    }

    /// Switch the visible list to `era`.
    pub async fn handle_era_change(&self, era: EraIndex) -> Result<Vec<Validator>, StakingError> {
        debug!("Era changed to {}", era);
        self.fetch_validators_for_era(era).await
    }

    async fn enrich_validator(&self, era: EraIndex, address: &str, reward_points: u32) -> Validator {
        let (prefs, identity) = tokio::join!(
            self.client.validator_prefs(era, address),
            self.lookup_identity(address)
        );
        match (prefs, identity) {
            (Ok(prefs), Ok(identity)) => Validator::from_chain(
                address.to_string(),
                era,
                reward_points,
                prefs.commission_perbill,
                prefs.blocked,
                identity.map(|identity| identity.display_name),
            ),
            (Err(e), _) | (_, Err(e)) => {
                warn!("Error fetching validator information for {}: {}", address, e);
                Validator::zeroed(address.to_string(), era)
            }
        }
    }

    /// Identity lookup bounded by the configured timeout; a timeout reads as absent.
    async fn lookup_identity(&self, address: &str) -> Result<Option<Identity>, ChainError> {
        if !self.client.supports_identity() {
            return Ok(None);
        }
        match tokio::time::timeout(self.config.identity_timeout, self.client.identity_of(address))
            .await
        {
            Ok(result) => result,
            Err(_) => {
                debug!("Timeout fetching identity for {}", address);
                Ok(None)
            }
        }
    }

    /// Drop the cached list for `era`.
    pub fn invalidate_era(&self, era: EraIndex) -> bool {
        self.write().cache.invalidate(era)
    }

    // ---- Account derivations ----

    /// Derive whether `address` nominates and whether any target is active.
    pub async fn check_nominator_status(&self, address: &str) -> NominatorStatus {
        let token = {
            let mut inner = self.write();
            inner.begin();
            inner.issue(RequestKey::NominatorStatus)
        };

        let (ledger, nominations, era, active) = tokio::join!(
            self.client.staking_ledger(address),
            self.client.nominations(address),
            self.client.active_era(),
            self.client.active_validators()
        );
        let derived = (|| -> Result<(EraIndex, NominatorStatus), ChainError> {
            let ledger = ledger?;
            let nominations = nominations?;
            let active: HashSet<String> = active?.into_iter().collect();
            let status = NominatorStatus::derive(
                ledger.map(|ledger| ledger.active),
                nominations.map(|nominations| nominations.targets),
                &active,
            );
            Ok((era?, status))
        })();

        let mut inner = self.write();
        let status = match derived {
            Ok((era, status)) => {
                if inner.state.current_era != Some(era) {
                    info!("Active era advanced to {}", era);
                    inner.state.current_era = Some(era);
                    inner.state.historical_eras = historical_eras(era);
                }
                status
            }
            Err(e) => {
                error!("Failed to check nominator status for {}: {}", address, e);
                if inner.is_latest(RequestKey::NominatorStatus, token) {
                    inner.state.error = Some(e.to_string());
                }
                NominatorStatus::unknown()
            }
        };
        if inner.is_latest(RequestKey::NominatorStatus, token) {
            inner.state.nominator_status = Some(status.clone());
        }
        inner.finish();
        status
    }

    /// Whether the free balance of `address` exceeds the minimum nominator bond.
    pub async fn check_can_nominate(&self, address: &str) -> bool {
        let token = {
            let mut inner = self.write();
            inner.begin();
            inner.issue(RequestKey::CanNominate)
        };

        let (free, min_bond) = tokio::join!(
            self.client.free_balance(address),
            self.client.min_nominator_bond()
        );

        let mut inner = self.write();
        let can_nominate = match free.and_then(|free| min_bond.map(|bond| free > bond)) {
            Ok(can_nominate) => can_nominate,
            Err(e) => {
                error!("Failed to check nomination eligibility for {}: {}", address, e);
                if inner.is_latest(RequestKey::CanNominate, token) {
                    inner.state.error = Some(e.to_string());
                }
                false
            }
        };
        if inner.is_latest(RequestKey::CanNominate, token) {
            inner.state.can_nominate = Some(can_nominate);
        }
        inner.finish();
        can_nominate
    }

    /// Read the minimum nominator bond into state.
    pub async fn fetch_minimum_stake(&self) -> Option<Balance> {
        let token = {
            let mut inner = self.write();
            inner.begin();
            inner.issue(RequestKey::MinStake)
        };

        let result = self.client.min_nominator_bond().await;

        let mut inner = self.write();
        let min_stake = match result {
            Ok(bond) => {
                if inner.is_latest(RequestKey::MinStake, token) {
                    inner.state.min_stake = Some(bond);
                }
                Some(bond)
            }
            Err(e) => {
                error!("Failed to fetch minimum stake: {}", e);
                if inner.is_latest(RequestKey::MinStake, token) {
                    inner.state.error = Some(e.to_string());
                }
                None
            }
        };
        inner.finish();
        min_stake
    }

    /// Derive the bags-list placement of `address`.
    pub async fn check_bag_list_position(&self, address: &str) -> BagListInfo {
        let token = {
            let mut inner = self.write();
            inner.begin();
            inner.issue(RequestKey::BagList)
        };

        let (thresholds, ledger, node) = tokio::join!(
            self.client.bag_thresholds(),
            self.client.staking_ledger(address),
            self.client.list_node(address)
        );
        let derived = (|| -> Result<BagListInfo, ChainError> {
            let thresholds = thresholds?;
            let node = node?;
            Ok(match ledger? {
                Some(ledger) => {
                    BagListInfo::derive(thresholds, ledger.active, node.map(|n| n.bag_upper))
                }
                None => BagListInfo::cleared(thresholds),
            })
        })();

        let mut inner = self.write();
        let placement = match derived {
            Ok(placement) => {
                if placement.is_misplaced == Some(true) {
                    info!(
                        "{} is in bag {:?} but belongs in {:?}",
                        address, placement.current_bag, placement.correct_bag
                    );
                }
                placement
            }
            Err(e) => {
                error!("Failed to check bag list position for {}: {}", address, e);
                if inner.is_latest(RequestKey::BagList, token) {
                    inner.state.error = Some(e.to_string());
                }
                BagListInfo::unknown()
            }
        };
        if inner.is_latest(RequestKey::BagList, token) {
            inner.state.bag_list_info = Some(placement.clone());
        }
        inner.finish();
        placement
    }

    // ---- UI state ----

    /// Add or remove `validator` from the pending nomination set.
    pub fn toggle_validator_selection(
        &self,
        validator: Validator,
    ) -> Result<SelectionChange, SelectionError> {
        let result = self.write().state.selected_validators.toggle(validator);
        if let Err(e) = &result {
            warn!("{}", e);
            self.notify(Notification::warning("Selection", e.to_string()));
        }
        result
    }

    /// Toggle by address, using the visible record when there is one.
    pub fn toggle_validator_address(
        &self,
        address: &str,
    ) -> Result<SelectionChange, SelectionError> {
        let validator = {
            let inner = self.read();
            inner
                .state
                .validators
                .iter()
                .find(|v| v.address == address)
                .cloned()
                .unwrap_or_else(|| {
                    Validator::zeroed(address.to_string(), inner.state.selected_era.unwrap_or(0))
                })
        };
        self.toggle_validator_selection(validator)
    }

    pub fn clear_selection(&self) {
        self.write().state.selected_validators.clear();
    }

    /// Select a sort field and re-sort the visible list.
    pub fn set_sort_field(&self, field: SortField) {
        let mut inner = self.write();
        inner.state.sort.select(field);
        let sort = inner.state.sort;
        sort_validators(&mut inner.state.validators, sort);
    }

    pub fn set_sort_direction(&self, direction: SortDirection) {
        let mut inner = self.write();
        inner.state.sort.direction = direction;
        let sort = inner.state.sort;
        sort_validators(&mut inner.state.validators, sort);
    }

    pub fn toggle_section(&self, section: Section) {
        self.write().state.expanded.toggle(section);
    }

    pub fn set_terminal_ready(&self, ready: bool) {
        self.write().state.terminal_ready = ready;
    }

    pub fn set_loading(&self, loading: bool) {
        self.write().state.loading = loading;
    }

    // ---- Transactions ----

    /// Nominate the current selection.
    pub async fn submit_nominations(
        &self,
        signer: Option<&C::Signer>,
    ) -> Result<TransactionStatus, StakingError> {
        let signer = self.require_signer(signer)?;
        let targets = self.read().state.selected_validators.addresses();
        if targets.is_empty() {
            return Err(self.missing_input("validator selection"));
        }
        Ok(self.submit(StakingCall::Nominate(targets), signer).await)
    }

    /// Bond `amount` planck on top of the existing stake.
    pub async fn bond_more_tokens(
        &self,
        signer: Option<&C::Signer>,
        amount: Balance,
    ) -> Result<TransactionStatus, StakingError> {
        let signer = self.require_signer(signer)?;
        if amount == 0 {
            return Err(self.missing_input("amount"));
        }
        Ok(self.submit(StakingCall::BondExtra(amount), signer).await)
    }

    /// Schedule `amount` planck for unbonding.
    pub async fn unbond_tokens(
        &self,
        signer: Option<&C::Signer>,
        amount: Balance,
    ) -> Result<TransactionStatus, StakingError> {
        let signer = self.require_signer(signer)?;
        if amount == 0 {
            return Err(self.missing_input("amount"));
        }
        Ok(self.submit(StakingCall::Unbond(amount), signer).await)
    }

    /// Move the signer's account to its correct bag.
    ///
    /// Nothing is submitted unless the last derived placement says the
    /// account is misplaced.
    pub async fn rebag_nominator(
        &self,
        signer: Option<&C::Signer>,
    ) -> Result<Rebag, StakingError> {
        let signer = self.require_signer(signer)?;
        let skip = rebag_skip_reason(self.read().state.bag_list_info.as_ref());
        if let Some(reason) = skip {
            self.notify(Notification::info("Rebag", reason));
            return Ok(Rebag::Skipped(reason));
        }
        let call = StakingCall::Rebag {
            dislocated: signer.address(),
        };
        Ok(Rebag::Submitted(self.submit(call, signer).await))
    }

    fn require_signer<'a>(
        &self,
        signer: Option<&'a C::Signer>,
    ) -> Result<&'a C::Signer, StakingError> {
        signer.ok_or_else(|| self.missing_input("signer"))
    }

    fn missing_input(&self, what: &'static str) -> StakingError {
        warn!("Transaction rejected: missing {}", what);
        self.notify(Notification::warning("Transaction", format!("Missing {}", what)));
        StakingError::MissingInput(what)
    }

    /// Submit `call`, forwarding progress, and report the terminal status.
    async fn submit(&self, call: StakingCall, signer: &C::Signer) -> TransactionStatus {
        let tx_type = call.transaction_type();
        self.notify(Notification::info(tx_type.label(), tx_type.description()));

        let (progress, mut progress_rx) = mpsc::unbounded_channel();
        let forward = async {
            while let Some(status) = progress_rx.recv().await {
                let _ = self.events.send(StoreEvent::Transaction { tx_type, status });
            }
        };
        let (result, ()) = tokio::join!(self.client.submit(call, signer, progress), forward);

        let status = match result {
            Ok(block_hash) => {
                info!("{} finalized in {}", tx_type.label(), block_hash);
                self.notify(Notification::success(
                    tx_type.label(),
                    tx_type.success_message(),
                ));
                TransactionStatus::Finalized(block_hash)
            }
            Err(e) => {
                error!("{} failed: {}", tx_type.label(), e);
                self.notify(Notification::error(
                    tx_type.label(),
                    tx_type.failure_message(),
                ));
                TransactionStatus::Failed(e.to_string())
            }
        };
        let _ = self.events.send(StoreEvent::Transaction {
            tx_type,
            status: status.clone(),
        });
        status
    }
}
