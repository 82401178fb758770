//! Global leaderboard, local personal best and score submission
//!
//! The leaderboard server is an external collaborator: this module builds
//! request bodies, interprets responses and ranks what comes back. Server
//! ordering is not trusted; entries are filtered, sorted and truncated here.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identity::ANONYMOUS;
use crate::persistence::KeyValueStore;
use crate::shorten_address;

/// Maximum number of leaderboard rows shown
pub const MAX_HIGH_SCORES: usize = 10;

/// Errors from fetching or submitting scores
#[derive(Debug)]
pub enum ScoreError {
    /// Request never completed (offline, CORS, aborted)
    Network(String),
    /// Server answered with a non-success status
    Http { status: u16 },
    /// Server answered `success: false`
    Rejected(String),
    /// Response body was not the expected JSON
    Decode(String),
    /// Submission was malformed before it left the client
    Invalid(String),
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::Network(msg) => write!(f, "Network error: {msg}"),
            ScoreError::Http { status } => write!(f, "HTTP error! status: {status}"),
            ScoreError::Rejected(msg) => write!(f, "Score rejected: {msg}"),
            ScoreError::Decode(msg) => write!(f, "Decoding error: {msg}"),
            ScoreError::Invalid(msg) => write!(f, "Invalid submission: {msg}"),
        }
    }
}

impl std::error::Error for ScoreError {}

impl From<serde_json::Error> for ScoreError {
    fn from(e: serde_json::Error) -> Self {
        ScoreError::Decode(e.to_string())
    }
}

/// One ranked row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub wallet: String,
    /// Seconds survived; servers may send fractional values
    pub score: f64,
    /// Milliseconds since the epoch when numeric on the wire
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

impl LeaderboardEntry {
    /// Lenient conversion from one element of the server's array.
    /// Anything without a numeric `score` is dropped.
    fn from_value(value: &Value) -> Option<Self> {
        let score = value.get("score")?.as_f64()?;
        if !score.is_finite() {
            return None;
        }
        let wallet = value
            .get("wallet")
            .and_then(Value::as_str)
            .filter(|w| !w.is_empty())
            .unwrap_or(ANONYMOUS)
            .to_string();
        let timestamp = value.get("timestamp").and_then(Value::as_f64);
        Some(Self {
            wallet,
            score,
            timestamp,
        })
    }

    /// `"{short wallet} - {whole seconds}s"`
    pub fn display(&self) -> String {
        format!("{} - {}s", short_wallet(&self.wallet), self.score.floor() as i64)
    }
}

fn short_wallet(wallet: &str) -> String {
    if wallet.is_empty() || wallet == ANONYMOUS {
        ANONYMOUS.to_string()
    } else {
        shorten_address(wallet)
    }
}

/// Top-N leaderboard, highest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rank arbitrary entries: sort descending by score and keep `limit`
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>, limit: usize) -> Self {
        entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        entries.truncate(limit);
        Self { entries }
    }

    /// Parse a `GET /api/highscores` body. The top level must be an array;
    /// malformed elements inside it are skipped.
    pub fn from_json(json: &str, limit: usize) -> Result<Self, ScoreError> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Array(items) = value else {
            return Err(ScoreError::Decode("expected an array of scores".into()));
        };
        let entries = items.iter().filter_map(LeaderboardEntry::from_value).collect();
        Ok(Self::from_entries(entries, limit))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<f64> {
        self.entries.first().map(|e| e.score)
    }

    /// `"1. 0x1234...abcd - 42s"` per row
    pub fn display_lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{}. {}", i + 1, e.display()))
            .collect()
    }
}

/// `POST /api/highscores` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub wallet: String,
    pub score: u32,
}

impl ScoreSubmission {
    pub fn new(wallet: impl Into<String>, score: u32) -> Self {
        Self {
            wallet: wallet.into(),
            score,
        }
    }

    pub fn validate(&self) -> Result<(), ScoreError> {
        if self.wallet.trim().is_empty() {
            return Err(ScoreError::Invalid("missing wallet".into()));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, ScoreError> {
        self.validate()?;
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Interpret the status and body of a submission response
pub fn parse_submit_response(status: u16, body: &str) -> Result<(), ScoreError> {
    if !(200..300).contains(&status) {
        return Err(ScoreError::Http { status });
    }
    let response: SubmitResponse = serde_json::from_str(body)?;
    if response.success {
        Ok(())
    } else {
        Err(ScoreError::Rejected(
            response.error.unwrap_or_else(|| "Failed to save high score".into()),
        ))
    }
}

/// Server-side score storage
pub trait ScoreStore {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<(), ScoreError>;
    fn top(&self, limit: usize) -> Leaderboard;
}

/// In-process store with upsert-by-wallet-if-higher semantics
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    rows: Vec<LeaderboardEntry>,
    clock_ms: f64,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn submit(&mut self, submission: &ScoreSubmission) -> Result<(), ScoreError> {
        submission.validate()?;
        self.clock_ms += 1.0;
        let score = submission.score as f64;

        match self.rows.iter_mut().find(|r| r.wallet == submission.wallet) {
            Some(row) if score > row.score => {
                row.score = score;
                row.timestamp = Some(self.clock_ms);
            }
            Some(_) => {}
            None => self.rows.push(LeaderboardEntry {
                wallet: submission.wallet.clone(),
                score,
                timestamp: Some(self.clock_ms),
            }),
        }
        Ok(())
    }

    fn top(&self, limit: usize) -> Leaderboard {
        Leaderboard::from_entries(self.rows.clone(), limit)
    }
}

/// Best score ever reached on this device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersonalBest {
    pub best: u32,
}

impl PersonalBest {
    pub const STORAGE_KEY: &'static str = "personalBest";

    /// Missing or unparsable values count as zero
    pub fn load(store: &impl KeyValueStore) -> Self {
        let best = store
            .get(Self::STORAGE_KEY)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v > 0.0)
            .map(|v| v.floor() as u32)
            .unwrap_or(0);
        Self { best }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) {
        store.set(Self::STORAGE_KEY, &self.best.to_string());
    }

    /// Record a finished run. Returns true if it beat the previous best.
    pub fn record(&mut self, score: u32) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }
}

/// Next step after a failed submission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStep {
    RetryIn { delay_ms: u32 },
    GiveUp,
}

/// Bounded fixed-delay retry budget for one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitRetry {
    pub retries_left: u32,
    pub delay_ms: u32,
}

impl SubmitRetry {
    pub fn new(retries: u32, delay_ms: u32) -> Self {
        Self {
            retries_left: retries,
            delay_ms,
        }
    }

    pub fn on_failure(&mut self, error: &ScoreError) -> RetryStep {
        log::error!("Error saving high score: {}", error);
        if self.retries_left == 0 {
            log::warn!("Giving up on score submission");
            return RetryStep::GiveUp;
        }
        log::info!("Retrying... ({} attempts left)", self.retries_left);
        self.retries_left -= 1;
        RetryStep::RetryIn {
            delay_ms: self.delay_ms,
        }
    }
}

/// Drive a submission against a synchronous store, retrying without delay.
/// Returns whether it was eventually accepted.
pub fn submit_with_retry(
    store: &mut impl ScoreStore,
    submission: &ScoreSubmission,
    mut retry: SubmitRetry,
) -> bool {
    loop {
        match store.submit(submission) {
            Ok(()) => {
                log::info!("High score saved successfully");
                return true;
            }
            Err(e) => {
                if retry.on_failure(&e) == RetryStep::GiveUp {
                    return false;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    const ADDR: &str = "0x1234567890abcdef1234567890abcdef12345678";

    #[test]
    fn test_score_error_display_http() {
        let err = ScoreError::Http { status: 503 };
        let msg = format!("{err}");
        assert!(msg.contains("503"), "got: {msg}");
    }

    #[test]
    fn test_score_error_display_rejected() {
        let err = ScoreError::Rejected("Invalid score".to_string());
        let msg = format!("{err}");
        assert!(msg.contains("rejected"), "got: {msg}");
        assert!(msg.contains("Invalid score"), "got: {msg}");
    }

    #[test]
    fn test_score_error_from_json() {
        let json_err = serde_json::from_str::<Value>("{").unwrap_err();
        let err: ScoreError = json_err.into();
        assert!(matches!(err, ScoreError::Decode(_)));
    }

    #[test]
    fn test_leaderboard_filters_sorts_truncates() {
        let mut rows = vec![
            r#"{"wallet":"0xnoscore"}"#.to_string(),
            r#"{"wallet":"0xtext","score":"99"}"#.to_string(),
            r#"null"#.to_string(),
        ];
        for i in 0..12 {
            rows.push(format!(r#"{{"wallet":"{ADDR}","score":{i}.5}}"#));
        }
        let json = format!("[{}]", rows.join(","));

        let board = Leaderboard::from_json(&json, MAX_HIGH_SCORES).unwrap();
        assert_eq!(board.entries.len(), 10);
        assert_eq!(board.top_score(), Some(11.5));
        assert_eq!(board.entries.last().map(|e| e.score), Some(2.5));
    }

    #[test]
    fn test_leaderboard_rejects_non_array() {
        let result = Leaderboard::from_json(r#"{"error":"down"}"#, 10);
        assert!(matches!(result, Err(ScoreError::Decode(_))));
    }

    #[test]
    fn test_display_lines() {
        let json = format!(
            r#"[{{"wallet":"{ADDR}","score":42.9,"timestamp":"2024-01-01T00:00:00Z"}},{{"score":7}}]"#
        );
        let board = Leaderboard::from_json(&json, 10).unwrap();
        assert_eq!(
            board.display_lines(),
            vec!["1. 0x1234...5678 - 42s", "2. Anonymous - 7s"]
        );
        assert_eq!(board.entries[0].timestamp, None);
    }

    #[test]
    fn test_submission_body() {
        let body = ScoreSubmission::new("Anonymous", 12).to_json().unwrap();
        assert_eq!(body, r#"{"wallet":"Anonymous","score":12}"#);
        assert!(matches!(
            ScoreSubmission::new("  ", 3).to_json(),
            Err(ScoreError::Invalid(_))
        ));
    }

    #[test]
    fn test_parse_submit_response() {
        assert!(parse_submit_response(200, r#"{"success":true}"#).is_ok());
        assert!(matches!(
            parse_submit_response(500, ""),
            Err(ScoreError::Http { status: 500 })
        ));
        assert!(matches!(
            parse_submit_response(200, r#"{"success":false,"error":"Invalid score"}"#),
            Err(ScoreError::Rejected(msg)) if msg == "Invalid score"
        ));
        assert!(matches!(
            parse_submit_response(200, "<html>"),
            Err(ScoreError::Decode(_))
        ));
    }

    #[test]
    fn test_memory_store_upserts_if_higher() {
        let mut store = MemoryScoreStore::new();
        store.submit(&ScoreSubmission::new(ADDR, 20)).unwrap();
        store.submit(&ScoreSubmission::new(ADDR, 10)).unwrap();
        assert_eq!(store.top(10).top_score(), Some(20.0));
        store.submit(&ScoreSubmission::new(ADDR, 35)).unwrap();
        store.submit(&ScoreSubmission::new("Anonymous", 5)).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.top(10).top_score(), Some(35.0));
    }

    #[test]
    fn test_personal_best_persists() {
        let mut store = MemoryStore::new();
        let mut best = PersonalBest::load(&store);
        assert_eq!(best.best, 0);
        assert!(best.record(14));
        assert!(!best.record(14));
        assert!(!best.record(3));
        best.save(&mut store);
        assert_eq!(store.get(PersonalBest::STORAGE_KEY).as_deref(), Some("14"));
        assert_eq!(PersonalBest::load(&store).best, 14);

        store.set(PersonalBest::STORAGE_KEY, "garbage");
        assert_eq!(PersonalBest::load(&store).best, 0);
    }

    #[test]
    fn test_retry_budget() {
        let mut retry = SubmitRetry::new(3, 1000);
        let err = ScoreError::Network("offline".into());
        for _ in 0..3 {
            assert_eq!(retry.on_failure(&err), RetryStep::RetryIn { delay_ms: 1000 });
        }
        assert_eq!(retry.on_failure(&err), RetryStep::GiveUp);
    }

    struct FlakyStore {
        failures: u32,
        attempts: u32,
        inner: MemoryScoreStore,
    }

    impl ScoreStore for FlakyStore {
        fn submit(&mut self, submission: &ScoreSubmission) -> Result<(), ScoreError> {
            self.attempts += 1;
            if self.attempts <= self.failures {
                return Err(ScoreError::Http { status: 500 });
            }
            self.inner.submit(submission)
        }

        fn top(&self, limit: usize) -> Leaderboard {
            self.inner.top(limit)
        }
    }

    #[test]
    fn test_submit_with_retry_bounded() {
        let submission = ScoreSubmission::new(ADDR, 9);

        let mut recovers = FlakyStore {
            failures: 3,
            attempts: 0,
            inner: MemoryScoreStore::new(),
        };
        assert!(submit_with_retry(&mut recovers, &submission, SubmitRetry::new(3, 0)));
        assert_eq!(recovers.attempts, 4);

        let mut dead = FlakyStore {
            failures: u32::MAX,
            attempts: 0,
            inner: MemoryScoreStore::new(),
        };
        assert!(!submit_with_retry(&mut dead, &submission, SubmitRetry::new(3, 0)));
        assert_eq!(dead.attempts, 4);
        assert!(dead.top(10).is_empty());
    }

    proptest! {
        #[test]
        fn prop_leaderboard_sorted_and_bounded(scores in prop::collection::vec(0.0f64..10_000.0, 0..40)) {
            let entries = scores
                .iter()
                .map(|&score| LeaderboardEntry { wallet: ADDR.into(), score, timestamp: None })
                .collect();
            let board = Leaderboard::from_entries(entries, MAX_HIGH_SCORES);
            prop_assert!(board.entries.len() <= MAX_HIGH_SCORES);
            prop_assert!(board.entries.windows(2).all(|w| w[0].score >= w[1].score));
        }
    }
}
