use async_trait::async_trait;
use dinebot::api::{
    Alternative, DeliveryApi, Preferences, RecoPayload, Recommendation, RecommendedOrder,
};
use dinebot::{Error, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn sample_preferences() -> Preferences {
    Preferences {
        cuisine: "thai".to_string(),
        max_eta_minutes: 30,
        budget_max_cents: 2500,
    }
}

pub fn sample_recommendation(restaurant: &str) -> Recommendation {
    Recommendation {
        recommended: RecommendedOrder {
            restaurant: restaurant.to_string(),
            items: vec!["Pad Thai".to_string()],
            eta_minutes: 25,
            estimated_total_usd: 18.75,
            deal: None,
            why: None,
        },
        alternatives: vec![Alternative {
            restaurant: "Curry House".to_string(),
            why_not: "Over budget".to_string(),
        }],
    }
}

/// A scripted response for one preference-load call: wait, then succeed with
/// the given preferences or fail with an API error message.
pub struct ScriptedLoad {
    pub delay: Duration,
    pub result: std::result::Result<Option<Preferences>, String>,
}

/// Mock service for view-model tests. Calls are counted so "no network
/// activity" can be asserted; optional delays let tests observe in-flight
/// state.
pub struct MockDeliveryApi {
    preferences: Mutex<Option<Preferences>>,
    scripted_loads: Mutex<VecDeque<ScriptedLoad>>,
    saved: Mutex<Vec<Preferences>>,
    save_error: Mutex<Option<String>>,
    recommendation: Mutex<Result<Recommendation>>,
    save_delay: Mutex<Duration>,
    reco_delay: Mutex<Duration>,
    pub calls: AtomicUsize,
}

impl MockDeliveryApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            preferences: Mutex::new(Some(sample_preferences())),
            scripted_loads: Mutex::new(VecDeque::new()),
            saved: Mutex::new(Vec::new()),
            save_error: Mutex::new(None),
            recommendation: Mutex::new(Ok(sample_recommendation("Thai Basil"))),
            save_delay: Mutex::new(Duration::ZERO),
            reco_delay: Mutex::new(Duration::ZERO),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn set_preferences(&self, preferences: Option<Preferences>) {
        *self.preferences.lock().unwrap() = preferences;
    }

    pub fn script_load(&self, load: ScriptedLoad) {
        self.scripted_loads.lock().unwrap().push_back(load);
    }

    pub fn set_save_error(&self, message: &str) {
        *self.save_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn set_recommendation(&self, result: Result<Recommendation>) {
        *self.recommendation.lock().unwrap() = result;
    }

    pub fn set_save_delay(&self, delay: Duration) {
        *self.save_delay.lock().unwrap() = delay;
    }

    pub fn set_reco_delay(&self, delay: Duration) {
        *self.reco_delay.lock().unwrap() = delay;
    }

    pub fn saved(&self) -> Vec<Preferences> {
        self.saved.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeliveryApi for MockDeliveryApi {
    async fn load_preferences(&self, _device_id: &str) -> Result<Option<Preferences>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let scripted = self.scripted_loads.lock().unwrap().pop_front();
        if let Some(load) = scripted {
            tokio::time::sleep(load.delay).await;
            return load.result.map_err(Error::api);
        }

        Ok(self.preferences.lock().unwrap().clone())
    }

    async fn save_preferences(&self, _device_id: &str, preferences: &Preferences) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.save_delay.lock().unwrap();
        tokio::time::sleep(delay).await;

        if let Some(message) = self.save_error.lock().unwrap().clone() {
            return Err(Error::api(message));
        }

        self.saved.lock().unwrap().push(preferences.clone());
        *self.preferences.lock().unwrap() = Some(preferences.clone());
        Ok(())
    }

    async fn get_recommendation(&self, _device_id: &str) -> Result<Recommendation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.reco_delay.lock().unwrap();
        tokio::time::sleep(delay).await;

        match &*self.recommendation.lock().unwrap() {
            Ok(reco) => Ok(reco.clone()),
            Err(e) => Err(Error::api(e.display_message())),
        }
    }

    async fn get_recommendation_raw(&self) -> Result<RecoPayload> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &*self.recommendation.lock().unwrap() {
            Ok(reco) => Ok(RecoPayload::Structured(reco.clone())),
            Err(e) => Err(Error::api(e.display_message())),
        }
    }
}
