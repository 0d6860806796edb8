//! Per-call forecast overrides and the query-string rewrite they drive.

use url::form_urlencoded;

use crate::options::{clamp_daily_steps, clamp_hourly_steps};

pub(crate) const LANG: &str = "lang";
pub(crate) const UNIT: &str = "unit";
pub(crate) const HOURLY_STEPS: &str = "hourlysteps";
pub(crate) const DAILY_STEPS: &str = "dailysteps";
pub(crate) const ALERT: &str = "alert";

/// Known parameters are always encoded in this order; anything else follows
/// in the order it appeared.
const KEY_ORDER: [&str; 5] = [LANG, UNIT, HOURLY_STEPS, DAILY_STEPS, ALERT];

/// Overrides for a single forecast call.
///
/// ```
/// use caiyun_core::ForecastOverrides;
///
/// let overrides = ForecastOverrides::new()
///     .hourly_steps(Some(6))
///     .daily_steps(Some(3))
///     .include_alerts(true);
/// assert_eq!(overrides.hourly_steps, Some(6));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForecastOverrides {
    pub hourly_steps: Option<u16>,
    pub daily_steps: Option<u8>,
    pub include_alerts: bool,
}

impl ForecastOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request hourly steps; `None` selects 48. Clamped to `1..=360`.
    pub fn hourly_steps(mut self, steps: Option<i64>) -> Self {
        self.hourly_steps = Some(clamp_hourly_steps(steps));
        self
    }

    /// Request daily steps; `None` selects 5. Clamped to `1..=15`.
    pub fn daily_steps(mut self, steps: Option<i64>) -> Self {
        self.daily_steps = Some(clamp_daily_steps(steps));
        self
    }

    pub fn include_alerts(mut self, include: bool) -> Self {
        self.include_alerts = include;
        self
    }
}

/// Build the target for one forecast call from the shared base target.
///
/// Step counts are replaced only when the override carries them. `alert` is
/// always rewritten, to `false` when no overrides are given.
pub(crate) fn apply_overrides(base: &str, overrides: Option<&ForecastOverrides>) -> String {
    let (path, query) = base.split_once('?').unwrap_or((base, ""));

    let mut pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();

    match overrides {
        Some(overrides) => {
            // Fields are public, so clamp again before they hit the wire.
            if let Some(steps) = overrides.hourly_steps {
                let steps = clamp_hourly_steps(Some(i64::from(steps)));
                set_param(&mut pairs, HOURLY_STEPS, steps.to_string());
            }
            if let Some(steps) = overrides.daily_steps {
                let steps = clamp_daily_steps(Some(i64::from(steps)));
                set_param(&mut pairs, DAILY_STEPS, steps.to_string());
            }
            set_param(&mut pairs, ALERT, overrides.include_alerts.to_string());
        }
        None => set_param(&mut pairs, ALERT, false.to_string()),
    }

    format!("{path}?{}", encode_query(pairs))
}

/// Encode `pairs` with the known keys first, in [`KEY_ORDER`].
pub(crate) fn encode_query(mut pairs: Vec<(String, String)>) -> String {
    // Stable sort keeps unknown keys in their original relative order.
    pairs.sort_by_key(|(key, _)| {
        KEY_ORDER
            .iter()
            .position(|known| known == key)
            .unwrap_or(KEY_ORDER.len())
    });

    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

/// Replace every occurrence of `key` with a single `key=value` pair.
fn set_param(pairs: &mut Vec<(String, String)>, key: &str, value: String) {
    pairs.retain(|(k, _)| k != key);
    pairs.push((key.to_string(), value));
}
