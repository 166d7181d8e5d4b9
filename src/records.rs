//! Best completion times per level
//!
//! Persisted to LocalStorage, one entry per cleared level.

use serde::{Deserialize, Serialize};

/// Fastest clear of a single level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestTime {
    pub level: u32,
    /// Seconds from load to the last pickup
    pub seconds: f32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Best times, sorted by level
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BestTimes {
    pub entries: Vec<BestTime>,
}

impl BestTimes {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "roll_a_ball_best_times";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn best(&self, level: u32) -> Option<f32> {
        self.entries
            .iter()
            .find(|e| e.level == level)
            .map(|e| e.seconds)
    }

    /// Record a clear. Returns true if it is a new best for the level.
    pub fn record(&mut self, level: u32, seconds: f32, timestamp: f64) -> bool {
        if !seconds.is_finite() || seconds < 0.0 {
            return false;
        }

        let entry = BestTime {
            level,
            seconds,
            timestamp,
        };
        match self.entries.iter_mut().find(|e| e.level == level) {
            Some(existing) if seconds < existing.seconds => *existing = entry,
            Some(_) => return false,
            None => {
                self.entries.push(entry);
                self.entries.sort_by_key(|e| e.level);
            }
        }
        true
    }

    /// Number of levels cleared at least once
    pub fn cleared(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load best times from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<BestTimes>(&json) {
                    Ok(times) => {
                        log::info!("Loaded best times for {} levels", times.entries.len());
                        return times;
                    }
                    Err(e) => log::warn!("Discarding unreadable best times: {}", e),
                }
            }
        }

        log::info!("No best times found, starting fresh");
        Self::new()
    }

    /// Save best times to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Best times saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_clear_is_best() {
        let mut times = BestTimes::new();
        assert!(times.record(3, 45.0, 0.0));
        assert_eq!(times.best(3), Some(45.0));
        assert_eq!(times.best(4), None);
    }

    #[test]
    fn test_only_faster_clears_replace() {
        let mut times = BestTimes::new();
        times.record(1, 30.0, 0.0);
        assert!(!times.record(1, 31.0, 1.0));
        assert!(!times.record(1, 30.0, 1.0));
        assert!(times.record(1, 12.5, 2.0));
        assert_eq!(times.best(1), Some(12.5));
        assert_eq!(times.cleared(), 1);
    }

    #[test]
    fn test_sorted_by_level() {
        let mut times = BestTimes::new();
        times.record(7, 80.0, 0.0);
        times.record(2, 20.0, 0.0);
        times.record(5, 50.0, 0.0);
        let levels: Vec<u32> = times.entries.iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![2, 5, 7]);
    }

    #[test]
    fn test_rejects_nonsense_times() {
        let mut times = BestTimes::new();
        assert!(!times.record(1, f32::NAN, 0.0));
        assert!(!times.record(1, -1.0, 0.0));
        assert!(times.is_empty());
    }

    #[test]
    fn test_json_roundtrip_keeps_entries() {
        let mut times = BestTimes::new();
        times.record(9, 99.0, 1234.0);
        let json = serde_json::to_string(&times).unwrap();
        let back: BestTimes = serde_json::from_str(&json).unwrap();
        assert_eq!(back.best(9), Some(99.0));
    }
}
