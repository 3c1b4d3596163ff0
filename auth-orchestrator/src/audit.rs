//! Decision audit log
//!
//! Append-only JSON-lines record of every risk decision, hash chained so
//! that edited, removed or reordered entries are detected.
//!
//! Records carry the score, level, required factors and factor tags.
//! Biometric confidence values are never written.

use chrono::{DateTime, Utc};
use risk_engine::{AuthFactor, RiskAssessment, RiskLevel};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::flow::BiometricStatus;
use crate::{Error, Result};

/// One audited decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// Unique record ID
    pub record_id: Uuid,

    /// Record timestamp
    pub timestamp: DateTime<Utc>,

    /// Transaction assessed
    pub transaction_id: Uuid,

    /// User who initiated it
    pub user_id: Uuid,

    /// Risk score
    pub risk_score: u32,

    /// Risk level
    pub level: RiskLevel,

    /// Required factors
    pub required_auth: Vec<AuthFactor>,

    /// Triggered factor tags
    pub factors: Vec<String>,

    /// Outcome of the biometric step
    pub biometric_status: BiometricStatus,

    /// Previous record hash (for hash chain)
    pub previous_hash: String,

    /// Current record hash
    pub hash: String,
}

impl DecisionRecord {
    /// Create record for an assessment
    pub fn new(user_id: Uuid, assessment: &RiskAssessment, biometric_status: BiometricStatus) -> Self {
        let mut record = Self {
            record_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            transaction_id: assessment.transaction_id,
            user_id,
            risk_score: assessment.decision.score.value(),
            level: assessment.decision.level,
            required_auth: assessment.decision.required_auth.iter().copied().collect(),
            factors: assessment.factor_tags().into_iter().map(str::to_string).collect(),
            biometric_status,
            previous_hash: String::new(),
            hash: String::new(),
        };

        record.hash = record.compute_hash();
        record
    }

    /// Compute record hash
    fn compute_hash(&self) -> String {
        let mut hasher = Sha256::new();

        // Include all fields except hash itself
        hasher.update(self.record_id.as_bytes());
        hasher.update(self.timestamp.to_rfc3339().as_bytes());
        hasher.update(self.transaction_id.as_bytes());
        hasher.update(self.user_id.as_bytes());
        hasher.update(self.risk_score.to_be_bytes());
        hasher.update(self.level.as_str().as_bytes());
        for factor in &self.required_auth {
            hasher.update(factor.as_str().as_bytes());
            hasher.update([0u8]);
        }
        for tag in &self.factors {
            hasher.update(tag.as_bytes());
            hasher.update([0u8]);
        }
        hasher.update(self.biometric_status.as_str().as_bytes());
        hasher.update(self.previous_hash.as_bytes());

        hex::encode(hasher.finalize())
    }

    /// Verify record hash
    pub fn verify_hash(&self) -> bool {
        self.hash == self.compute_hash()
    }

    /// Set previous hash (for hash chain)
    pub fn set_previous_hash(&mut self, previous_hash: String) {
        self.previous_hash = previous_hash;
        self.hash = self.compute_hash();
    }
}

/// Audit log configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogConfig {
    /// Log file path
    pub log_path: PathBuf,

    /// Enable hash chain
    pub enable_hash_chain: bool,
}

impl Default for AuditLogConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("./data/decisions.log"),
            enable_hash_chain: true,
        }
    }
}

/// Decision audit log
#[derive(Debug)]
pub struct DecisionAuditLog {
    config: AuditLogConfig,
    // Holds the file and the hash of the last record together so that
    // concurrent writers cannot interleave and fork the chain.
    state: Arc<Mutex<LogState>>,
}

#[derive(Debug)]
struct LogState {
    file: File,
    last_hash: String,
}

impl DecisionAuditLog {
    /// Open (or create) the log
    pub fn open(config: AuditLogConfig) -> Result<Self> {
        if let Some(parent) = config.log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let last_hash = Self::read_last_hash(&config.log_path)?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_path)?;

        Ok(Self {
            config,
            state: Arc::new(Mutex::new(LogState { file, last_hash })),
        })
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.config.log_path
    }

    fn read_last_hash(path: &Path) -> Result<String> {
        if !path.exists() {
            return Ok(String::new());
        }

        let reader = BufReader::new(File::open(path)?);
        let mut last_line = None;
        for line in reader.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                last_line = Some(line);
            }
        }

        match last_line {
            Some(line) => {
                let record: DecisionRecord =
                    serde_json::from_str(&line).map_err(|e| Error::Serialization(e.to_string()))?;
                Ok(record.hash)
            }
            None => Ok(String::new()),
        }
    }

    /// Append a record
    pub async fn record(&self, mut record: DecisionRecord) -> Result<()> {
        let mut state = self.state.lock().await;

        if self.config.enable_hash_chain {
            record.set_previous_hash(state.last_hash.clone());
        }

        let mut json = serde_json::to_string(&record).map_err(|e| Error::Serialization(e.to_string()))?;
        json.push('\n');

        state.file.write_all(json.as_bytes())?;
        state.file.flush()?;

        if self.config.enable_hash_chain {
            state.last_hash = record.hash;
        }

        Ok(())
    }

    fn read_all(&self) -> Result<Vec<DecisionRecord>> {
        let reader = BufReader::new(File::open(&self.config.log_path)?);
        let mut records = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: DecisionRecord =
                serde_json::from_str(&line).map_err(|e| Error::Serialization(e.to_string()))?;
            records.push(record);
        }

        Ok(records)
    }

    /// Verify log integrity (hash chain)
    pub async fn verify_integrity(&self) -> Result<bool> {
        if !self.config.enable_hash_chain {
            return Ok(true);
        }

        // Hold the lock so no record is appended mid-scan.
        let _state = self.state.lock().await;
        let mut previous_hash = String::new();

        for (i, record) in self.read_all()?.into_iter().enumerate() {
            if !record.verify_hash() {
                return Err(Error::IntegrityFailure(format!(
                    "Record hash mismatch at line {}",
                    i + 1
                )));
            }

            if record.previous_hash != previous_hash {
                return Err(Error::IntegrityFailure(format!(
                    "Hash chain broken at line {}",
                    i + 1
                )));
            }

            previous_hash = record.hash;
        }

        Ok(true)
    }

    /// Search records by transaction and/or level
    pub async fn search(&self, transaction_id: Option<Uuid>, level: Option<RiskLevel>) -> Result<Vec<DecisionRecord>> {
        let _state = self.state.lock().await;

        Ok(self
            .read_all()?
            .into_iter()
            .filter(|r| transaction_id.map_or(true, |id| r.transaction_id == id))
            .filter(|r| level.map_or(true, |l| r.level == l))
            .collect())
    }
}
