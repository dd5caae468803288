//! Environment testing utilities
use super::{Environment, EnvStructure, VehicleEnvironment};
use crate::sensors::{SensorFrame, VehiclePose};
use crate::spaces::{SampleSpace, Space};
use crate::Prng;
use rand::distributions::Distribution;
use rand::{Rng, SeedableRng};

/// A frame with the vehicle at `(x, y)` (m) and every range reading equal to `range`.
pub fn frame(x: f64, y: f64, yaw: f64, range: f32) -> SensorFrame {
    SensorFrame {
        pose: VehiclePose { x, y, yaw },
        ranges: vec![range; 360],
    }
}

/// A random frame with the vehicle inside a 20 x 20 m world.
pub fn random_frame(rng: &mut Prng) -> SensorFrame {
    let ranges = (0..360)
        .map(|_| {
            if rng.gen_bool(0.05) {
                f32::INFINITY
            } else {
                rng.gen_range(0.0..20.0)
            }
        })
        .collect();
    SensorFrame {
        pose: VehiclePose {
            x: rng.gen_range(-19.0..19.0),
            y: rng.gen_range(-19.0..19.0),
            yaw: rng.gen_range(-3.1..3.1),
        },
        ranges,
    }
}

/// Step an environment with random sensor frames and actions and check that invariants hold.
pub fn check_random_steps<E>(env: &mut E, num_steps: u64, seed: u64)
where
    E: VehicleEnvironment,
    E::ObservationSpace: Space<Element = E::Observation>,
    E::ActionSpace: SampleSpace<Element = E::Action>,
{
    let mut rng = Prng::seed_from_u64(seed);
    let observation_space = env.observation_space();
    let action_space = env.action_space();
    let (min_reward, max_reward) = env.reward_range();
    let discount_factor = env.discount_factor();
    assert!(discount_factor >= 0.0);
    assert!(discount_factor <= 1.0);

    assert!(observation_space.contains(&env.reset()));
    let mut episode_steps = 0;
    for _ in 0..num_steps {
        env.update_sensors(random_frame(&mut rng));
        let action = action_space.sample(&mut rng);
        let step = env.step(&action, episode_steps);
        assert!(observation_space.contains(&step.observation));
        assert!(step.reward >= min_reward);
        assert!(step.reward <= max_reward);
        assert_eq!(step.done, step.outcome.is_terminal());
        if !step.done {
            assert!((-1.0..=0.0).contains(&step.reward));
        }
        if step.done {
            env.reset();
            episode_steps = 0;
        } else {
            episode_steps += 1;
        }
    }
}
