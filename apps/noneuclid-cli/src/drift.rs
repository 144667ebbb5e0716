use glam::Vec2;
use noneuclid_kernel::{ConfigError, Flight, FlightConfig};
use noneuclid_tools::{PoseInspector, PoseSummary};
use serde::Serialize;

/// Splitmix64 step: deterministic across platforms.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Uniform in `[-1, 1)`.
fn unit(state: &mut u64) -> f32 {
    let bits = splitmix64(state) >> 40;
    (bits as f32 / (1u64 << 24) as f32) * 2.0 - 1.0
}

/// Outcome of a random look/move soak.
#[derive(Debug, Clone, Serialize)]
pub struct DriftReport {
    pub steps: u64,
    pub seed: u64,
    pub crossings: u64,
    pub capped_steps: u64,
    /// Largest residual seen after any step.
    pub worst_residual: f32,
    pub last: PoseSummary,
}

/// Fly `steps` ticks with pseudo-random pointer deltas and key intents.
pub fn run(steps: u64, seed: u64, config: FlightConfig) -> Result<DriftReport, ConfigError> {
    let mut flight = Flight::new(config)?;
    let mut state = seed;
    let mut crossings = 0;
    let mut capped_steps = 0;
    let mut worst_residual = 0.0f32;

    for _ in 0..steps {
        flight.look(unit(&mut state) * 40.0, unit(&mut state) * 40.0);
        // Keys are released about a quarter of the time.
        let intent = if unit(&mut state) < -0.5 {
            Vec2::ZERO
        } else {
            Vec2::new(unit(&mut state), unit(&mut state))
        };
        if let Some(report) = flight.tick(intent) {
            crossings += u64::from(report.crossings);
            if report.remainder > 0.0 {
                capped_steps += 1;
            }
        }
        worst_residual = worst_residual.max(PoseInspector::residuals(flight.pose()).worst());
    }

    Ok(DriftReport {
        steps,
        seed,
        crossings,
        capped_steps,
        worst_residual,
        last: PoseInspector::summary(flight.pose()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_stays_in_range() {
        let mut state = 7;
        for _ in 0..10_000 {
            let u = unit(&mut state);
            assert!((-1.0..1.0).contains(&u));
        }
    }

    #[test]
    fn same_seed_same_flight() {
        let a = run(500, 42, FlightConfig::default()).unwrap();
        let b = run(500, 42, FlightConfig::default()).unwrap();
        assert_eq!(a.last.position, b.last.position);
        assert_eq!(a.crossings, b.crossings);
    }

    #[test]
    fn soak_keeps_frame_orthonormal() {
        let report = run(3_000, 1, FlightConfig::default()).unwrap();
        assert!(report.worst_residual < 1e-4, "{}", report.worst_residual);
        assert_eq!(report.capped_steps, 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = FlightConfig {
            move_speed: 0.0,
            ..FlightConfig::default()
        };
        assert!(run(10, 0, cfg).is_err());
    }
}
