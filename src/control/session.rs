//! The control session: store connection plus the active run.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::catalog;
use crate::config::SynthConfig;
use crate::control::error::ControlError;
use crate::control::types::{
    ConnectRequest, ConnectResponse, GenerateRequest, GenerateResponse, HealthResponse,
    IndustryListing, IndustrySummary, ScenarioListing, ScenarioSummary, StopResponse,
};
use crate::lifecycle::StopToken;
use crate::scheduler::{GenerationCounters, GenerationRun, GenerationStats, RunReport, RunSettings};
use crate::sink::elasticsearch::Credentials;
use crate::sink::{ClusterInfo, DocumentSink, ElasticsearchSink, MemorySink};
use crate::synth::Generator;

/// Narrative providers accepted by the start request.
pub const LLM_PROVIDERS: &[&str] = &["openai", "anthropic"];

/// A connected store.
#[derive(Debug)]
pub struct StoreHandle {
    pub sink: Arc<dyn DocumentSink>,
    pub info: ClusterInfo,
    /// Set for dry-run connections.
    pub memory: Option<Arc<MemorySink>>,
}

struct ActiveRun {
    stop: StopToken,
    counters: Arc<GenerationCounters>,
    task: Option<JoinHandle<RunReport>>,
}

impl ActiveRun {
    fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

/// Shared state behind every control operation.
pub struct ControlSession {
    config: Arc<SynthConfig>,
    store: ArcSwapOption<StoreHandle>,
    run: Mutex<Option<ActiveRun>>,
}

impl ControlSession {
    pub fn new(config: Arc<SynthConfig>) -> Self {
        Self {
            config,
            store: ArcSwapOption::empty(),
            run: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub fn store(&self) -> Option<Arc<StoreHandle>> {
        self.store.load_full()
    }

    /// Connect to a store, replacing any previous connection.
    ///
    /// A failed read check leaves the session disconnected. A failed write probe
    /// only warns.
    pub async fn connect(&self, request: ConnectRequest) -> Result<ConnectResponse, ControlError> {
        if request.dry_run {
            let memory = Arc::new(MemorySink::new(self.config.generation.dry_run_capacity));
            let info = ClusterInfo {
                cluster_name: "dry-run".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            };
            tracing::info!(capacity = self.config.generation.dry_run_capacity, "Connected dry-run sink");
            return Ok(self.install(StoreHandle {
                sink: memory.clone(),
                info,
                memory: Some(memory),
            }));
        }

        let credentials = Credentials {
            cloud_id: request.cloud_id,
            endpoint: request.endpoint,
            api_key: request.api_key,
        };
        let client = ElasticsearchSink::new(&credentials, &self.config.store)?;

        let info = match client.info().await {
            Ok(info) => info,
            Err(e) => {
                self.store.store(None);
                tracing::error!(endpoint = %client.base_url(), error = %e, "Store connection failed");
                return Err(ControlError::ConnectionFailed(e));
            }
        };

        if self.config.store.verify_write {
            if let Err(e) = client.verify_write(&self.config.store.probe_index).await {
                tracing::warn!(
                    index = %self.config.store.probe_index,
                    error = %e,
                    "Write check failed, continuing; writes may fail during generation"
                );
            }
        }

        tracing::info!(
            endpoint = %client.base_url(),
            cluster = %info.cluster_name,
            version = %info.version,
            "Connected to store"
        );

        Ok(self.install(StoreHandle {
            sink: Arc::new(client),
            info,
            memory: None,
        }))
    }

    fn install(&self, handle: StoreHandle) -> ConnectResponse {
        let response = ConnectResponse {
            success: true,
            cluster_name: handle.info.cluster_name.clone(),
            version: handle.info.version.clone(),
        };
        self.store.store(Some(Arc::new(handle)));
        response
    }

    pub fn list_industries(&self) -> IndustryListing {
        catalog::industries()
            .iter()
            .map(|p| {
                (
                    p.key.to_string(),
                    IndustrySummary {
                        name: p.display_name.to_string(),
                        icon: p.icon.to_string(),
                        service_count: p.services.len(),
                        has_dependencies: p.has_dependencies(),
                    },
                )
            })
            .collect()
    }

    pub fn list_scenarios(&self, industry: Option<&str>) -> Result<ScenarioListing, ControlError> {
        let industry = industry
            .filter(|i| !i.is_empty())
            .ok_or(ControlError::MissingIndustry)?;
        let scenarios = catalog::scenarios_for(industry)
            .ok_or_else(|| ControlError::UnknownIndustry(industry.to_string()))?;

        Ok(scenarios
            .iter()
            .map(|s| {
                (
                    s.key.to_string(),
                    ScenarioSummary {
                        name: s.name.to_string(),
                        description: s.description.to_string(),
                        story: s.narrative.to_string(),
                        error_rate: s.error_rate,
                        latency_multiplier: s.latency_multiplier,
                    },
                )
            })
            .collect())
    }

    /// Validate a start request and spawn the run.
    pub async fn start(&self, request: GenerateRequest) -> Result<GenerateResponse, ControlError> {
        let store = self.store().ok_or(ControlError::NotConnected)?;
        let generation = &self.config.generation;

        let industry_key = request
            .industry
            .as_deref()
            .filter(|i| !i.is_empty())
            .ok_or(ControlError::MissingIndustry)?;
        let industry = catalog::industry(industry_key)
            .ok_or_else(|| ControlError::UnknownIndustry(industry_key.to_string()))?;

        let rate = request.rate.unwrap_or(generation.default_events_per_second);
        if rate == 0 || rate > generation.max_events_per_second {
            return Err(ControlError::InvalidRequest(format!(
                "rate must be between 1 and {} events per second",
                generation.max_events_per_second
            )));
        }

        let minutes = request.duration.unwrap_or(generation.default_duration_minutes);
        if minutes == 0 || minutes > generation.max_duration_minutes {
            return Err(ControlError::InvalidRequest(format!(
                "duration must be between 1 and {} minutes",
                generation.max_duration_minutes
            )));
        }

        if request.use_llm {
            validate_narrative_settings(&request)?;
        }

        let perturbation = catalog::resolve_perturbation(industry_key, request.scenario.as_deref())?;

        let mut run = self.run.lock().await;
        if run.as_ref().is_some_and(ActiveRun::is_running) {
            return Err(ControlError::AlreadyRunning);
        }

        let counters = Arc::new(GenerationCounters::new());
        let stop = StopToken::new();
        let generator = Generator::new(
            industry,
            perturbation.clone(),
            store.sink.clone(),
            self.config.indices.clone(),
            counters.clone(),
        );
        let duration = Duration::from_secs(minutes.saturating_mul(60));
        let settings = RunSettings::new(rate, duration, generation);
        let task = tokio::spawn(GenerationRun::new(generator, settings, stop.clone()).run());

        tracing::info!(
            industry = industry_key,
            scenario = perturbation.scenario.as_deref().unwrap_or("baseline"),
            error_rate = perturbation.error_rate,
            latency_multiplier = perturbation.latency_multiplier,
            rate,
            minutes,
            use_llm = request.use_llm,
            "Generation started"
        );

        *run = Some(ActiveRun {
            stop,
            counters,
            task: Some(task),
        });

        Ok(GenerateResponse {
            success: true,
            message: "Generation started".to_string(),
        })
    }

    /// Ask the active run to stop. Idempotent; a no-op without a run.
    pub async fn stop(&self) -> StopResponse {
        if let Some(run) = self.run.lock().await.as_ref() {
            run.stop.cancel();
            tracing::info!("Stop requested");
        }
        StopResponse { success: true }
    }

    /// Counters of the current or most recent run; zeros before the first run.
    pub async fn stats(&self) -> GenerationStats {
        match self.run.lock().await.as_ref() {
            Some(run) => run.counters.snapshot(),
            None => GenerationStats::default(),
        }
    }

    pub async fn is_generating(&self) -> bool {
        self.run.lock().await.as_ref().is_some_and(ActiveRun::is_running)
    }

    pub async fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "healthy".to_string(),
            es_connected: self.store.load().is_some(),
            generating: self.is_generating().await,
        }
    }

    /// Stop the active run and wait for it to finish its current batch.
    pub async fn shutdown(&self) -> Option<RunReport> {
        let task = {
            let mut run = self.run.lock().await;
            let run = run.as_mut()?;
            run.stop.cancel();
            run.task.take()?
        };

        match task.await {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::error!(error = %e, "Generation task failed");
                None
            }
        }
    }
}

fn validate_narrative_settings(request: &GenerateRequest) -> Result<(), ControlError> {
    let provider = request.llm_provider.as_deref().unwrap_or("openai");
    if !LLM_PROVIDERS.contains(&provider) {
        return Err(ControlError::InvalidRequest(format!(
            "unknown llm_provider '{}', expected one of {}",
            provider,
            LLM_PROVIDERS.join(", ")
        )));
    }

    let has_key = request.llm_api_key.as_deref().is_some_and(|k| !k.trim().is_empty());
    if !has_key {
        return Err(ControlError::InvalidRequest("llm_api_key is required when use_llm is set".into()));
    }
    Ok(())
}
