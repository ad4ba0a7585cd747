//! Platform-neutral glue between JS-shaped requests and the engine.
//!
//! Everything here works on plain serde types so it can be exercised natively;
//! `lib.rs` only converts to and from `JsValue`.

use serde::{Deserialize, Serialize};
use spinlab_engine::{
    BatchRequest, BatchResult, CatalogEntry, DrawSource, SessionRun, SimError, SimSettings,
    roulette_bets, run_batch, run_simulation, slot_profiles,
};

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Engine error: {0}")]
    Engine(#[from] SimError),
    #[error("Invalid request: {0}")]
    Decode(String),
    #[error("Draw callback failed: {0}")]
    Draw(String),
}

/// Batch result plus the headline numbers the results table shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchView {
    #[serde(flatten)]
    pub result: BatchResult,
    pub mean_final_net: f64,
    pub best_run: Option<u32>,
    pub worst_run: Option<u32>,
}

impl From<BatchResult> for BatchView {
    fn from(result: BatchResult) -> Self {
        let best_run = result.best_run().map(|record| record.index);
        let worst_run = result.worst_run().map(|record| record.index);
        Self {
            mean_final_net: result.mean_final_net(),
            best_run,
            worst_run,
            result,
        }
    }
}

/// Static choices for the settings form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogView {
    pub slot_profiles: Vec<CatalogEntry>,
    pub roulette_bets: Vec<CatalogEntry>,
    pub default_settings: SimSettings,
}

/// Batch request as sent by the UI; missing fields fall back to defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchParams {
    #[serde(default)]
    pub settings: Option<SimSettings>,
    #[serde(default = "default_run_count")]
    pub run_count: u32,
    #[serde(default)]
    pub base_seed: u32,
    #[serde(default)]
    pub display_cap: Option<usize>,
}

const fn default_run_count() -> u32 {
    1
}

impl BatchParams {
    #[must_use]
    pub fn into_request(self) -> BatchRequest {
        let settings = self.settings.unwrap_or_default();
        let request = BatchRequest::new(settings, self.run_count, self.base_seed);
        match self.display_cap {
            Some(cap) => request.with_display_cap(cap),
            None => request,
        }
    }
}

#[must_use]
pub fn catalog() -> CatalogView {
    CatalogView {
        slot_profiles: slot_profiles(),
        roulette_bets: roulette_bets(),
        default_settings: SimSettings::default(),
    }
}

/// # Errors
///
/// Returns an error if the settings are invalid.
pub fn simulate(
    settings: &SimSettings,
    source: Option<&mut dyn DrawSource>,
) -> Result<SessionRun, BridgeError> {
    Ok(run_simulation(settings, source)?)
}

/// # Errors
///
/// Returns an error if the batch settings are invalid.
pub fn simulate_batch(params: BatchParams) -> Result<BatchView, BridgeError> {
    let request = params.into_request();
    log::debug!(
        "ui batch request: {} x {} spins",
        request.effective_run_count(),
        request.settings.spins
    );
    Ok(run_batch(&request)?.into())
}

fn check_draw(value: f64) -> Result<f64, BridgeError> {
    if (0.0..1.0).contains(&value) {
        Ok(value)
    } else {
        Err(BridgeError::Draw(format!("value {value} is outside [0, 1)")))
    }
}

/// Run one session against a caller-supplied draw function.
///
/// The first failed or out-of-range draw aborts the result: later draws are
/// not requested and the session is reported as an error.
///
/// # Errors
///
/// Returns an error if the settings are invalid or any draw fails.
pub fn simulate_with_draw<F>(settings: &SimSettings, mut fetch: F) -> Result<SessionRun, BridgeError>
where
    F: FnMut() -> Result<f64, String>,
{
    let mut failure: Option<BridgeError> = None;
    let run = {
        let mut source = || {
            if failure.is_some() {
                return 0.0;
            }
            match fetch().map_err(BridgeError::Draw).and_then(check_draw) {
                Ok(value) => value,
                Err(err) => {
                    failure = Some(err);
                    0.0
                }
            }
        };
        simulate(settings, Some(&mut source))?
    };
    failure.map_or(Ok(run), Err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spinlab_engine::{RouletteBet, SeededRandom};

    #[test]
    fn catalog_lists_defaults_and_choices() {
        let view = catalog();
        assert_eq!(view.slot_profiles.len(), 3);
        assert_eq!(view.roulette_bets.len(), 5);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["defaultSettings"]["profile"], "balanced");
        assert_eq!(json["defaultSettings"]["spins"], 200);
    }

    #[test]
    fn batch_params_fill_defaults() {
        let params: BatchParams = serde_json::from_str("{}").unwrap();
        let request = params.into_request();
        assert_eq!(request.run_count, 1);
        assert_eq!(request.base_seed, 0);
        assert_eq!(request.display_cap, spinlab_engine::DEFAULT_DISPLAY_CAP);
        assert_eq!(request.settings, SimSettings::default());
    }

    #[test]
    fn batch_view_flattens_result_and_headlines() {
        let params: BatchParams = serde_json::from_str(
            r#"{"settings":{"machine":"roulette","bet":"even-money","spins":20,"betSize":5},
                "runCount":6,"baseSeed":99,"displayCap":4}"#,
        )
        .unwrap();
        let view = simulate_batch(params).unwrap();
        assert_eq!(view.result.runs.len(), 4);
        assert!(view.best_run.is_some());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["runCount"], 6);
        assert_eq!(json["tail"]["runCount"], 2);
        assert!(json["meanFinalNet"].is_number());
    }

    #[test]
    fn simulate_accepts_seeded_source() {
        let settings = SimSettings::roulette(RouletteBet::Dozen).with_spins(5);
        let mut rng = SeededRandom::new(99);
        let run = simulate(&settings, Some(&mut rng)).unwrap();
        assert_eq!(run.points, vec![0.0, 2.0, 1.0, 0.0, -1.0, 1.0]);
    }

    #[test]
    fn invalid_settings_surface_as_bridge_errors() {
        let err = simulate(&SimSettings::default().with_bet_size(0.0), None).unwrap_err();
        assert!(err.to_string().starts_with("Engine error"));
        assert!(matches!(err, BridgeError::Engine(SimError::InvalidBetSize(_))));
    }

    #[test]
    fn caller_draws_reproduce_seeded_session() {
        let settings = SimSettings::roulette(RouletteBet::Dozen).with_spins(5);
        let mut rng = SeededRandom::new(99);
        let run = simulate_with_draw(&settings, || Ok(rng.draw())).unwrap();
        assert_eq!(run.points, vec![0.0, 2.0, 1.0, 0.0, -1.0, 1.0]);
    }

    #[test]
    fn failing_draw_callback_fails_the_session() {
        let settings = SimSettings::roulette(RouletteBet::SingleNumber).with_spins(10);
        let mut calls = 0;
        let err = simulate_with_draw(&settings, || {
            calls += 1;
            Err("thrown: 1".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, BridgeError::Draw(_)));
        assert_eq!(calls, 1);
    }

    #[test]
    fn out_of_range_draws_are_rejected() {
        let settings = SimSettings::default().with_spins(3);
        for bad in [f64::NAN, f64::INFINITY, -0.1, 1.0] {
            let mut values = [0.5, bad, 0.5].into_iter();
            let result = simulate_with_draw(&settings, || Ok(values.next().unwrap_or(0.5)));
            assert!(matches!(result, Err(BridgeError::Draw(_))), "{bad}");
        }
    }
}
