//! # Application State
//!
//! Shared state handed to every handler through `State<AppState>`:
//!
//! - **scores**: persisted score records, keyed by record id.
//! - **issuer**: the configured claim issuer (keyed or transparent).
//! - **keyed_verifier**: present when the issuer is keyed; checks MAC
//!   bindings on presented claims.
//! - **policy**: which commitment schemes verification endpoints accept.
//! - **metrics**: handle for rendering `/metrics`.
//!
//! Score records live in memory only; restarting the service drops them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use sovc_core::{ScoreRecordId, SubjectId, Timestamp};
use sovc_scoring::{CreditFactors, SovereignScore};
use sovc_zkp::{ClaimIssuer, CommitmentKey, KeyedScheme, KeyedVerifier, ProofPolicy, SchemeKind};

use crate::config::ServiceConfig;

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// The lock is `parking_lot` and is never held across an `.await`.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// Records matching `pred`, cloned out under a single read lock.
    pub fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.data
            .read()
            .values()
            .filter(|v| pred(v))
            .cloned()
            .collect()
    }

    /// Atomically read-validate-update a record.
    ///
    /// Returns `None` if the record doesn't exist, or `Some(result)` with
    /// the closure's `Result`. The whole closure runs under one write lock.
    pub fn try_update<R, E>(
        &self,
        id: &Uuid,
        f: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        self.data.write().get_mut(id).map(f)
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Score Records --------------------------------------------------------------

/// How a stored score was corroborated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VerificationMethod {
    /// A claim or proof accompanies the score.
    Zkp,
    /// Score only.
    Basic,
}

impl VerificationMethod {
    pub fn for_proof(proof: Option<&serde_json::Value>) -> Self {
        if proof.is_some() {
            Self::Zkp
        } else {
            Self::Basic
        }
    }
}

/// A persisted sovereign score.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScoreRecord {
    #[schema(value_type = String, format = Uuid)]
    pub id: ScoreRecordId,
    #[schema(value_type = String)]
    pub subject_id: SubjectId,
    #[schema(value_type = u16, minimum = 300, maximum = 1000)]
    pub sovereign_score: SovereignScore,
    #[schema(value_type = Object)]
    pub credit_factors: CreditFactors,
    #[schema(value_type = Option<Object>)]
    pub zkp_proof: Option<serde_json::Value>,
    pub is_verified: bool,
    pub verification_method: VerificationMethod,
    #[schema(value_type = String, format = DateTime)]
    pub calculated_at: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Timestamp,
    /// Insertion order; breaks ties between records created in the same
    /// millisecond.
    #[serde(skip)]
    pub(crate) sequence: u64,
}

// -- AppState -----------------------------------------------------------------

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub scores: Store<ScoreRecord>,
    pub issuer: ClaimIssuer,
    pub keyed_verifier: Option<KeyedVerifier>,
    pub policy: ProofPolicy,
    pub config: ServiceConfig,
    metrics: PrometheusHandle,
    sequence: Arc<AtomicU64>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("scores", &self.scores.len())
            .field("issuer", &self.issuer)
            .field("policy", &self.policy)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Build state from configuration with a metrics handle that is not
    /// installed as the global recorder. Used by tests and embedders.
    pub fn new(config: ServiceConfig) -> Self {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        Self::with_metrics(config, handle)
    }

    /// Build state from configuration, rendering `/metrics` from `metrics`.
    pub fn with_metrics(config: ServiceConfig, metrics: PrometheusHandle) -> Self {
        let (issuer, keyed_verifier) = match config.commitment_scheme {
            SchemeKind::Keyed => {
                let key = match &config.commitment_key {
                    Some(key) => key.clone(),
                    None => {
                        let key = CommitmentKey::generate();
                        tracing::warn!(
                            fingerprint = %key.fingerprint(),
                            "no commitment key configured; generated an ephemeral key, \
                             claims will not verify after restart"
                        );
                        key
                    }
                };
                tracing::info!(fingerprint = %key.fingerprint(), "keyed commitment scheme active");
                let scheme = KeyedScheme::new(key);
                let verifier = scheme.verifier();
                (ClaimIssuer::new(scheme), Some(verifier))
            }
            SchemeKind::Transparent => {
                tracing::warn!("transparent commitment scheme active; claims reveal credit factors");
                (ClaimIssuer::transparent(), None)
            }
        };

        Self {
            scores: Store::new(),
            issuer: issuer.with_report_verification(config.report_verification),
            keyed_verifier,
            policy: ProofPolicy::new(config.proof_policy),
            config,
            metrics,
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn metrics(&self) -> &PrometheusHandle {
        &self.metrics
    }

    pub(crate) fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    /// Store a new score record for `subject`.
    pub fn record_score(
        &self,
        subject: SubjectId,
        sovereign_score: SovereignScore,
        credit_factors: CreditFactors,
        zkp_proof: Option<serde_json::Value>,
        is_verified: bool,
    ) -> ScoreRecord {
        let now = Timestamp::now();
        let record = ScoreRecord {
            id: ScoreRecordId::new(),
            subject_id: subject,
            sovereign_score,
            credit_factors,
            verification_method: VerificationMethod::for_proof(zkp_proof.as_ref()),
            zkp_proof,
            is_verified,
            calculated_at: now,
            updated_at: now,
            sequence: self.next_sequence(),
        };
        self.scores.insert(*record.id.as_uuid(), record.clone());
        record
    }

    /// The caller's most recent score record.
    pub fn latest_score(&self, subject: &SubjectId) -> Option<ScoreRecord> {
        self.scores
            .filter(|r| &r.subject_id == subject)
            .into_iter()
            .max_by_key(|r| (r.calculated_at, r.sequence))
    }
}
