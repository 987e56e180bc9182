// src/scanner.rs
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::audio::SoundKind;
use crate::state::AppState;

/// Pause after the last keystroke that ends a scan when no terminator arrives.
pub const QUIESCENCE: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerState {
    Idle,
    Listening,
    Processing,
}

/// Keystroke buffer for a barcode gun acting as a keyboard.
///
/// A scan is submitted on `\n` / `\r`, or once input has been quiet for
/// [`QUIESCENCE`]. Keystrokes arriving while a scan is processing are dropped.
#[derive(Debug)]
pub struct ScannerInput {
    buffer: String,
    state: ScannerState,
    last_input: Option<Instant>,
}

impl Default for ScannerInput {
    fn default() -> Self {
        Self::new()
    }
}

impl ScannerInput {
    pub fn new() -> Self {
        Self { buffer: String::new(), state: ScannerState::Idle, last_input: None }
    }

    #[cfg(test)]
    pub fn state(&self) -> ScannerState {
        self.state
    }

    pub fn push(&mut self, ch: char, now: Instant) -> Option<String> {
        if self.state == ScannerState::Processing {
            return None;
        }
        if ch == '\n' || ch == '\r' {
            return self.submit();
        }
        if ch.is_control() {
            return None;
        }
        self.buffer.push(ch);
        self.state = ScannerState::Listening;
        self.last_input = Some(now);
        None
    }

    pub fn poll(&mut self, now: Instant) -> Option<String> {
        if self.state != ScannerState::Listening {
            return None;
        }
        match self.last_input {
            Some(last) if now.duration_since(last) >= QUIESCENCE => self.submit(),
            _ => None,
        }
    }

    /// Back to idle once the submitted scan has completed, successfully or not.
    pub fn finish(&mut self) {
        self.buffer.clear();
        self.last_input = None;
        self.state = ScannerState::Idle;
    }

    fn submit(&mut self) -> Option<String> {
        let code = self.buffer.trim().to_string();
        if code.is_empty() {
            self.finish();
            return None;
        }
        self.buffer.clear();
        self.state = ScannerState::Processing;
        Some(code)
    }
}

/// Allows one scan in flight per process. Further attempts are turned away
/// until the [`ScanPermit`] is dropped.
#[derive(Debug, Default)]
pub struct ScanGate {
    busy: AtomicBool,
}

impl ScanGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_begin(&self) -> Option<ScanPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ScanPermit { gate: self })
    }

    #[cfg(test)]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct ScanPermit<'a> {
    gate: &'a ScanGate,
}

impl Drop for ScanPermit<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

/// Scanning station loop: reads keystrokes from stdin and records each
/// submitted code until stdin closes.
pub async fn run_stdin_scanner(state: AppState) {
    info!("Scanner listening on stdin");
    run_scanner(tokio::io::stdin(), &state).await;
}

/// Drives [`ScannerInput`] from `reader`. Every keystroke of a chunk is fed in
/// order, so several codes arriving in one read are all recorded. Input still
/// buffered when the reader closes is submitted.
pub async fn run_scanner<R>(mut reader: R, state: &AppState)
where
    R: AsyncRead + Unpin,
{
    let mut input = ScannerInput::new();
    let mut buf = [0u8; 256];

    loop {
        let read = tokio::time::timeout(QUIESCENCE, reader.read(&mut buf)).await;
        let now = Instant::now();
        match read {
            Ok(Ok(0)) => {
                if let Some(code) = input.poll(now + QUIESCENCE) {
                    submit_scan(state, &code).await;
                }
                info!("Scanner input closed");
                break;
            }
            Ok(Ok(n)) => {
                let chunk: Vec<char> = String::from_utf8_lossy(&buf[..n]).chars().collect();
                for ch in chunk {
                    if let Some(code) = input.push(ch, now) {
                        submit_scan(state, &code).await;
                        input.finish();
                    }
                }
            }
            Ok(Err(e)) => {
                error!(error = %e, "Failed to read scanner input");
                break;
            }
            Err(_) => {
                if let Some(code) = input.poll(now) {
                    submit_scan(state, &code).await;
                    input.finish();
                }
            }
        }
    }
}

async fn submit_scan(state: &AppState, code: &str) {
    let Some(_permit) = state.scan_gate.try_begin() else {
        warn!(%code, "Scan ignored, another scan is in progress");
        return;
    };

    let result = state.recorder.record_scan(code).await;
    let sounds = state.sounds.read().await;
    match result {
        Ok(outcome) => info!(
            %code,
            product = %outcome.product.product.name,
            current_quantity = outcome.product.current_quantity,
            total_scanned = outcome.total_scanned,
            sound = %sounds.resolve(SoundKind::Success),
            "Scanned"
        ),
        Err(e) => warn!(%code, error = %e, sound = %sounds.resolve(SoundKind::Error), "Scan failed"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::state::tests::state_with;
    use crate::store::memory::MemoryStore;

    fn type_str(input: &mut ScannerInput, text: &str, now: Instant) -> Option<String> {
        text.chars().find_map(|ch| input.push(ch, now))
    }

    #[test]
    fn terminator_submits_trimmed_code() {
        let mut input = ScannerInput::new();
        let now = Instant::now();

        assert_eq!(type_str(&mut input, " abc123 ", now), None);
        assert_eq!(input.state(), ScannerState::Listening);
        assert_eq!(input.push('\n', now), Some("abc123".to_string()));
        assert_eq!(input.state(), ScannerState::Processing);
    }

    #[test]
    fn quiet_input_submits_after_quiescence() {
        let mut input = ScannerInput::new();
        let start = Instant::now();
        type_str(&mut input, "XYZ", start);

        assert_eq!(input.poll(start + Duration::from_millis(49)), None);
        assert_eq!(input.poll(start + QUIESCENCE), Some("XYZ".to_string()));
    }

    #[test]
    fn new_keystroke_restarts_the_quiet_period() {
        let mut input = ScannerInput::new();
        let start = Instant::now();
        type_str(&mut input, "AB", start);
        input.push('C', start + Duration::from_millis(40));

        assert_eq!(input.poll(start + Duration::from_millis(60)), None);
        assert_eq!(input.poll(start + Duration::from_millis(90)), Some("ABC".to_string()));
    }

    #[test]
    fn input_is_ignored_while_processing() {
        let mut input = ScannerInput::new();
        let now = Instant::now();
        type_str(&mut input, "A1\n", now);

        assert_eq!(type_str(&mut input, "B2\n", now), None);
        assert_eq!(input.poll(now + QUIESCENCE * 2), None);

        input.finish();
        assert_eq!(input.state(), ScannerState::Idle);
        assert_eq!(type_str(&mut input, "B2\n", now), Some("B2".to_string()));
    }

    #[test]
    fn blank_submission_returns_to_idle() {
        let mut input = ScannerInput::new();
        let now = Instant::now();
        assert_eq!(type_str(&mut input, "   \r", now), None);
        assert_eq!(input.state(), ScannerState::Idle);
        assert_eq!(input.poll(now + QUIESCENCE), None);
    }

    #[tokio::test]
    async fn every_code_in_one_chunk_is_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::new());
        store.seed_product("A1", "Apple", 0);
        store.seed_product("B2", "Banana", 5);
        let state = state_with(store.clone(), dir.path());

        run_scanner(&b"a1\nB2\r\nA1"[..], &state).await;

        assert_eq!(store.scan_count(), 3);
        let catalog = state.catalog.read().await;
        assert_eq!(catalog.find_by_normalized_code("A1").unwrap().current_quantity, 2);
        assert_eq!(catalog.find_by_normalized_code("B2").unwrap().current_quantity, 6);
    }

    #[tokio::test]
    async fn unknown_codes_do_not_stop_the_station() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::new());
        store.seed_product("A1", "Apple", 0);
        let state = state_with(store.clone(), dir.path());

        run_scanner(&b"NOPE\nA1\n"[..], &state).await;

        assert_eq!(store.scan_count(), 1);
        assert!(!state.scan_gate.is_busy());
    }

    #[test]
    fn gate_admits_one_scan_at_a_time() {
        let gate = ScanGate::new();
        let permit = gate.try_begin().unwrap();
        assert!(gate.is_busy());
        assert!(gate.try_begin().is_none());

        drop(permit);
        assert!(!gate.is_busy());
        assert!(gate.try_begin().is_some());
    }
}
