//! Batch-cycle properties that must hold for any tick size.

use pb_plant::{
    BaseColor, Plant, PlantConfig, ProcessState, RunOptions, StartCommand, run_until_idle,
};
use proptest::prelude::*;

const EPS: f64 = 1e-6;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    // The delivered volumes are clamped against the remaining target, so
    // recipe conservation cannot depend on the driver's tick size.
    #[test]
    fn celeste_batch_conserves_volume_for_any_tick_size(dt in 0.1f64..2.0) {
        let mut plant = Plant::new(PlantConfig::default()).unwrap();
        plant.set_start_command(StartCommand::On);
        let options = RunOptions {
            dt_s: dt,
            max_ticks: 50_000,
        };
        run_until_idle(&mut plant, options).unwrap();

        prop_assert_eq!(plant.state(), ProcessState::Idle);
        prop_assert!((plant.pumped_liters(BaseColor::White) - 75.0).abs() < EPS);
        prop_assert!((plant.pumped_liters(BaseColor::Blue) - 75.0).abs() < EPS);
        prop_assert_eq!(plant.pumped_liters(BaseColor::Black), 0.0);
        prop_assert!((plant.base_tank(BaseColor::White).level_liters() - 175.0).abs() < EPS);
        prop_assert!(plant.mixer_tank().is_effectively_empty());
        prop_assert!(plant.mixer().elapsed_s() >= 30.0);
    }
}
