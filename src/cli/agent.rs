use super::{Options, Update, WithUpdate};
use crate::config::AgentConfig;

impl From<&Options> for AgentConfig {
    fn from(opts: &Options) -> Self {
        Self::default().with_update(opts)
    }
}

impl Update<&Options> for AgentConfig {
    fn update(&mut self, opts: &Options) {
        if let Some(policy) = opts.policy {
            self.policy = policy.into();
        }
        if let Some(gamma) = opts.gamma {
            self.gamma = gamma;
        }
        if let Some(tau) = opts.tau {
            self.tau = tau;
        }
        if let Some(lr) = opts.lr {
            self.learning_rate = lr;
        }
        if let Some(alpha) = opts.alpha {
            self.alpha = alpha;
        }
        if opts.automatic_entropy_tuning {
            self.automatic_entropy_tuning = true;
        }
        if let Some(hidden_size) = opts.hidden_size {
            self.hidden_size = hidden_size;
        }
        if let Some(target_update_interval) = opts.target_update_interval {
            self.target_update_interval = target_update_interval;
        }
        if let Some(eval) = opts.eval {
            self.eval = eval;
        }
        if opts.cuda {
            self.cuda = true;
        }
    }
}
