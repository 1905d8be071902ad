use crate::api::{DeliveryApi, Preferences, RecoPayload, Recommendation};
use crate::identity::SessionStore;
use crate::{Error, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Snapshot of everything the render layer needs. `loading`, `saving`, and
/// `reco_loading` are independent flags; a single error slot is shared across
/// all actions, newest error winning.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub loading: bool,
    pub saving: bool,
    pub reco_loading: bool,
    pub error: Option<String>,
    pub preferences: Preferences,
    pub recommendation: Option<Recommendation>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            loading: true,
            saving: false,
            reco_loading: false,
            error: None,
            preferences: Preferences::default(),
            recommendation: None,
        }
    }
}

/// View-model for the preference form and recommendation card.
///
/// Each action type (load, save, recommend) carries a generation token so a
/// slow stale completion cannot overwrite the outcome of a newer request of
/// the same type. Different action types never block each other.
pub struct OrderSession {
    api: Arc<dyn DeliveryApi>,
    store: Arc<dyn SessionStore>,
    base_url: String,
    state: Mutex<ViewState>,
    load_gen: AtomicU64,
    save_gen: AtomicU64,
    reco_gen: AtomicU64,
}

impl OrderSession {
    pub fn new(
        api: Arc<dyn DeliveryApi>,
        store: Arc<dyn SessionStore>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api,
            store,
            base_url: base_url.into(),
            state: Mutex::new(ViewState::default()),
            load_gen: AtomicU64::new(0),
            save_gen: AtomicU64::new(0),
            reco_gen: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> ViewState {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ViewState> {
        // View state is never held across an await; poisoning only happens
        // if a render panicked, in which case the state is still usable.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn issue(counter: &AtomicU64) -> u64 {
        counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(counter: &AtomicU64, generation: u64) -> bool {
        counter.load(Ordering::SeqCst) == generation
    }

    async fn device_id(&self) -> Result<String> {
        self.store.device_id().await
    }

    /// Entry point on startup: a missing base URL is fatal to the whole view
    /// and short-circuits before any network call.
    pub async fn bootstrap(&self) -> Result<()> {
        if self.base_url.is_empty() {
            warn!("No API base URL configured");
            let mut state = self.lock();
            state.error = Some("Missing api.base_url".to_string());
            state.loading = false;
            return Ok(());
        }
        self.load().await
    }

    /// Fetches preferences and overwrites the local editable copy.
    pub async fn load(&self) -> Result<()> {
        let generation = Self::issue(&self.load_gen);
        {
            let mut state = self.lock();
            state.error = None;
            state.loading = true;
        }

        let outcome = match self.device_id().await {
            Ok(device_id) => self.api.load_preferences(&device_id).await,
            Err(e) => Err(e),
        };

        if !Self::is_current(&self.load_gen, generation) {
            debug!("Discarding stale preference load (generation {})", generation);
            return Ok(());
        }

        let mut state = self.lock();
        match outcome {
            Ok(Some(preferences)) => state.preferences = preferences,
            Ok(None) => {} // new device, keep the local defaults
            Err(e) => state.error = Some(e.display_message()),
        }
        state.loading = false;
        Ok(())
    }

    /// Saves the full preference object, then re-loads to pick up any
    /// server-side normalization. Overlapping saves are not queued; the
    /// generation token keeps an out-of-order completion from clobbering a
    /// newer one.
    pub async fn save(&self, preferences: Preferences) -> Result<()> {
        if self.base_url.is_empty() {
            return Ok(());
        }
        let generation = Self::issue(&self.save_gen);
        {
            let mut state = self.lock();
            state.error = None;
            state.saving = true;
            state.preferences = preferences.clone();
        }

        let outcome = match self.device_id().await {
            Ok(device_id) => self.api.save_preferences(&device_id, &preferences).await,
            Err(e) => Err(e),
        };

        if !Self::is_current(&self.save_gen, generation) {
            debug!("Discarding stale preference save (generation {})", generation);
            return Ok(());
        }

        match outcome {
            Ok(()) => {
                self.load().await?;
            }
            Err(e) => {
                self.lock().error = Some(e.display_message());
            }
        }
        self.lock().saving = false;
        Ok(())
    }

    /// Requests a recommendation. On failure the previously displayed
    /// recommendation stays visible; only the error slot changes.
    pub async fn recommend(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Ok(());
        }
        let generation = Self::issue(&self.reco_gen);
        {
            let mut state = self.lock();
            state.error = None;
            state.reco_loading = true;
        }

        let outcome = match self.device_id().await {
            Ok(device_id) => self.api.get_recommendation(&device_id).await,
            Err(e) => Err(e),
        };

        if !Self::is_current(&self.reco_gen, generation) {
            debug!("Discarding stale recommendation (generation {})", generation);
            return Ok(());
        }

        let mut state = self.lock();
        match outcome {
            Ok(reco) => state.recommendation = Some(reco),
            Err(e) => state.error = Some(e.display_message()),
        }
        state.reco_loading = false;
        Ok(())
    }

    /// Minimal variant: unauthenticated fetch returning whatever JSON the
    /// service produces. The payload is handed straight to the caller; the
    /// structured recommendation state is left untouched.
    pub async fn recommend_raw(&self) -> Result<RecoPayload> {
        if self.base_url.is_empty() {
            return Err(Error::config("Missing api.base_url"));
        }
        let generation = Self::issue(&self.reco_gen);
        self.lock().reco_loading = true;

        let outcome = self.api.get_recommendation_raw().await;

        if Self::is_current(&self.reco_gen, generation) {
            let mut state = self.lock();
            state.reco_loading = false;
            if let Err(ref e) = outcome {
                state.error = Some(e.display_message());
            }
        }
        outcome
    }
}

/// Budget shown in the form, in whole dollars.
pub fn budget_dollars(cents: u32) -> u32 {
    (f64::from(cents) / 100.0).round() as u32
}

/// Inverse form transform; clamps negatives to zero and caps amounts that
/// would overflow the cents representation.
pub fn dollars_to_cents(dollars: i64) -> u32 {
    let dollars = u32::try_from(dollars.max(0)).unwrap_or(u32::MAX);
    dollars.min(u32::MAX / 100) * 100
}
