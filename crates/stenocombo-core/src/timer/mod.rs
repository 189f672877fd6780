mod cooldown;

pub use cooldown::CooldownTimer;
