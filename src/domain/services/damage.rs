//! Damage calculation for successful attacks

use crate::domain::value_objects::{MoveType, WarSettings};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageCalculator {
    base_normal: f64,
    base_heavy: f64,
    critical_multiplier: f64,
    critical_chance: f64,
}

impl DamageCalculator {
    pub fn new(settings: &WarSettings) -> Self {
        Self {
            base_normal: settings.base_damage_normal_attack,
            base_heavy: settings.base_damage_heavy_attack,
            critical_multiplier: settings.critical_damage_multiplier,
            critical_chance: settings.critical_chance,
        }
    }

    pub fn base_damage(&self, move_type: MoveType) -> f64 {
        match move_type {
            MoveType::NormalAttack => self.base_normal,
            MoveType::HeavyAttack => self.base_heavy,
            MoveType::Defend | MoveType::Bribe => 0.0,
        }
    }

    /// Whether a uniform `sample` in `[0, 1)` lands a critical hit.
    pub fn is_critical_roll(&self, sample: f64) -> bool {
        sample < self.critical_chance
    }

    /// Final damage after the critical bonus and the defending team's
    /// pass-through fraction. Never negative.
    pub fn compute(&self, move_type: MoveType, is_critical: bool, pass_through: f64) -> f64 {
        let mut damage = self.base_damage(move_type);
        if is_critical {
            damage *= self.critical_multiplier;
        }
        (damage * pass_through.clamp(0.0, 1.0)).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator() -> DamageCalculator {
        DamageCalculator::new(&WarSettings {
            base_damage_normal_attack: 10.0,
            base_damage_heavy_attack: 40.0,
            critical_damage_multiplier: 2.0,
            critical_chance: 0.25,
            ..WarSettings::default()
        })
    }

    #[test]
    fn test_critical_with_half_pass_through() {
        assert_eq!(calculator().compute(MoveType::NormalAttack, true, 0.5), 10.0);
    }

    #[test]
    fn test_undefended_normal_and_heavy() {
        let calc = calculator();
        assert_eq!(calc.compute(MoveType::NormalAttack, false, 1.0), 10.0);
        assert_eq!(calc.compute(MoveType::HeavyAttack, false, 1.0), 40.0);
        assert_eq!(calc.compute(MoveType::HeavyAttack, true, 1.0), 80.0);
    }

    #[test]
    fn test_fully_blocked_is_zero_not_negative() {
        let calc = calculator();
        assert_eq!(calc.compute(MoveType::HeavyAttack, true, 0.0), 0.0);
        assert_eq!(calc.compute(MoveType::HeavyAttack, true, -0.5), 0.0);
    }

    #[test]
    fn test_non_attacks_deal_nothing() {
        let calc = calculator();
        assert_eq!(calc.compute(MoveType::Defend, true, 1.0), 0.0);
        assert_eq!(calc.compute(MoveType::Bribe, false, 1.0), 0.0);
    }

    #[test]
    fn test_critical_roll_is_strict() {
        let calc = calculator();
        assert!(calc.is_critical_roll(0.0));
        assert!(calc.is_critical_roll(0.2499));
        assert!(!calc.is_critical_roll(0.25));
    }
}
