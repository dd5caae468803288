use super::{Options, Update, WithUpdate};
use crate::config::EnvConfig;

impl From<&Options> for EnvConfig {
    fn from(opts: &Options) -> Self {
        Self::default().with_update(opts)
    }
}

impl Update<&Options> for EnvConfig {
    fn update(&mut self, opts: &Options) {
        if let Some(ref model_name) = opts.model_name {
            self.model_name = model_name.clone();
        }
        if let Some(max_velocity) = opts.max_velocity {
            self.max_velocity = max_velocity;
        }
        if let Some(max_steering) = opts.max_steering {
            self.max_steering = max_steering;
        }
        if let Some(max_x) = opts.max_x {
            self.max_x = max_x;
        }
        if let Some(max_y) = opts.max_y {
            self.max_y = max_y;
        }
        if let Some(max_range) = opts.max_range {
            self.max_range = max_range;
        }
        if let Some(x) = opts.target_x {
            self.target.0 = x;
        }
        if let Some(y) = opts.target_y {
            self.target.1 = y;
        }
        if let Some(collision_threshold) = opts.collision_threshold {
            self.collision_threshold = collision_threshold;
        }
        if let Some(goal_distance) = opts.goal_distance {
            self.goal_distance = goal_distance;
        }
        if let Some(discount_factor) = opts.discount_factor {
            self.discount_factor = discount_factor;
        }
    }
}
