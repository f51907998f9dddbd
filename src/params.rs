use crate::allocate::AllocationPolicy;
use crate::cli::EffectiveConfig;

pub fn build_policy(cfg: &EffectiveConfig) -> AllocationPolicy {
  AllocationPolicy {
    full_day_hours: cfg.full_day_hours,
    lower_limit_ratio: cfg.lower_limit_ratio,
    grace_days: cfg.grace_days,
    min_man_hours: cfg.min_man_hours,
  }
}
