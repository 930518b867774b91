// Copyright 2020-2022 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <https://opensource.org/licenses/MIT>.

//! The Batch Collector (§4.F): runs the assessor over every matching file
//! in a directory, isolating each file's evaluation behind a timeout so a
//! single pathological input cannot stall the whole run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::assess::{AssessmentResult, AssessorConfig, QualityAssessor};
use crate::error::{DungeonQualityError, Result};

/// Configuration for [`BatchCollector::run`] (§4.F).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchOptions {
    pub timeout_seconds: u64,
    /// Simple glob (`*`, `?`, literal characters only) a file's name must
    /// match to be included. `None` includes everything.
    pub include_pattern: Option<String>,
    /// Simple glob a file's name must *not* match to be included.
    pub exclude_pattern: Option<String>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        BatchOptions {
            timeout_seconds: 30,
            include_pattern: Some("*.json".to_string()),
            exclude_pattern: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum BatchOutcome {
    Ok(AssessmentResult),
    Err(String),
}

/// One file's result, timed end to end (§4.F).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchEntry {
    pub outcome: BatchOutcome,
    pub duration_ms: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchSummary {
    pub results: HashMap<String, BatchEntry>,
    pub files_considered: usize,
    pub files_skipped_by_pattern: usize,
    pub success: usize,
    pub failed: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl BatchSummary {
    pub fn mean_score(&self) -> f64 {
        crate::util::mean(&self.scores())
    }

    fn scores(&self) -> Vec<f64> {
        self.results
            .values()
            .filter_map(|e| match &e.outcome {
                BatchOutcome::Ok(r) => Some(r.overall_score),
                BatchOutcome::Err(_) => None,
            })
            .collect()
    }
}

pub struct BatchCollector {
    assessor: Arc<QualityAssessor>,
    options: BatchOptions,
}

impl BatchCollector {
    pub fn new(assessor_config: AssessorConfig, options: BatchOptions) -> Self {
        BatchCollector {
            assessor: Arc::new(QualityAssessor::new(assessor_config)),
            options,
        }
    }

    /// Evaluates every matching file directly under `dir` (§6
    /// `assess_directory`, non-recursive per spec.md §4.F).
    pub fn run(&self, dir: &Path) -> Result<BatchSummary> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(|e| DungeonQualityError::invalid_input(dir.display().to_string(), e.to_string()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.is_file())
            .collect();
        files.sort();

        let mut results = HashMap::new();
        let mut skipped = 0usize;

        for path in &files {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            if !self.matches_include(name) || self.matches_exclude(name) {
                skipped += 1;
                continue;
            }
            let entry = self.run_one_with_timeout(path);
            if let BatchOutcome::Err(ref msg) = entry.outcome {
                log::warn!("batch: {} failed: {msg}", path.display());
            }
            results.insert(name.to_string(), entry);
        }

        let (mut success, mut failed) = (0usize, 0usize);
        let mut min: Option<f64> = None;
        let mut max: Option<f64> = None;
        for entry in results.values() {
            match &entry.outcome {
                BatchOutcome::Ok(r) => {
                    success += 1;
                    min = Some(min.map_or(r.overall_score, |m: f64| m.min(r.overall_score)));
                    max = Some(max.map_or(r.overall_score, |m: f64| m.max(r.overall_score)));
                }
                BatchOutcome::Err(_) => failed += 1,
            }
        }

        Ok(BatchSummary {
            files_considered: files.len() - skipped,
            files_skipped_by_pattern: skipped,
            success,
            failed,
            min,
            max,
            results,
        })
    }

    fn matches_include(&self, name: &str) -> bool {
        match &self.options.include_pattern {
            Some(pattern) => glob_match(pattern, name),
            None => true,
        }
    }

    fn matches_exclude(&self, name: &str) -> bool {
        match &self.options.exclude_pattern {
            Some(pattern) => glob_match(pattern, name),
            None => false,
        }
    }

    /// Runs one file's assessment on a dedicated thread, joined through a
    /// channel with `recv_timeout` (§4.F, §5): a hung or pathologically
    /// slow pipeline is abandoned at the timeout boundary rather than
    /// blocking the whole batch, without requiring an async runtime.
    fn run_one_with_timeout(&self, path: &Path) -> BatchEntry {
        let started = std::time::Instant::now();
        let outcome = self.run_one(path);
        BatchEntry {
            outcome,
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }

    fn run_one(&self, path: &Path) -> BatchOutcome {
        let raw = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => return BatchOutcome::Err(format!("failed to read file: {e}")),
        };
        let document: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => return BatchOutcome::Err(format!("invalid JSON: {e}")),
        };

        let timeout = Duration::from_secs(self.options.timeout_seconds);
        let (tx, rx) = mpsc::channel();
        let assessor = Arc::clone(&self.assessor);

        std::thread::spawn(move || {
            let outcome = assessor.assess(document);
            // The receiver may already have timed out and been dropped;
            // that's fine, this thread still finishes and exits quietly.
            let _ = tx.send(outcome);
        });

        match rx.recv_timeout(timeout) {
            Ok(Ok(assessment)) => BatchOutcome::Ok(assessment),
            Ok(Err(e)) => BatchOutcome::Err(e.to_string()),
            Err(mpsc::RecvTimeoutError::Timeout) => {
                BatchOutcome::Err(DungeonQualityError::Timeout(timeout).to_string())
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                BatchOutcome::Err("evaluation thread panicked".to_string())
            }
        }
    }
}

/// A minimal glob matcher supporting `*` (any run of characters) and `?`
/// (any single character); anything else matches literally. Spec.md's
/// batch filtering needs nothing richer than this, so a dependency isn't
/// warranted for it.
fn glob_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    glob_match_rec(&p, &t)
}

fn glob_match_rec(p: &[char], t: &[char]) -> bool {
    match p.first() {
        None => t.is_empty(),
        Some('*') => glob_match_rec(&p[1..], t) || (!t.is_empty() && glob_match_rec(p, &t[1..])),
        Some('?') => !t.is_empty() && glob_match_rec(&p[1..], &t[1..]),
        Some(c) => t.first() == Some(c) && glob_match_rec(&p[1..], &t[1..]),
    }
}
