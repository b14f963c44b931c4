use crate::constants::*;

/// The round's score. Earned by destroying things, spent on abilities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreLedger {
    value: u32,
}

impl ScoreLedger {
    pub fn new(value: u32) -> Self {
        ScoreLedger { value }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn award(&mut self, points: u32) {
        self.value = self.value.saturating_add(points);
    }

    /// Deducts `cost` if the balance covers it. Returns whether it did.
    pub fn try_spend(&mut self, cost: u32) -> bool {
        match self.value.checked_sub(cost) {
            Some(rest) => {
                self.value = rest;
                true
            }
            None => false,
        }
    }
}

/// Score-gated abilities the player can trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ability {
    Emp,
    Hyper,
    Shield,
    Gravity,
}

impl Ability {
    pub const fn cost(self) -> u32 {
        match self {
            Ability::Emp => EMP_COST,
            Ability::Hyper => HYPER_COST,
            Ability::Shield => SHIELD_COST,
            Ability::Gravity => GRAVITY_COST,
        }
    }

    /// Abilities that may not be stacked with a live instance of themselves.
    pub const fn exclusive(self) -> bool {
        matches!(self, Ability::Emp | Ability::Shield)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL: [Ability; 4] = [Ability::Emp, Ability::Hyper, Ability::Shield, Ability::Gravity];

    #[test]
    fn test_spend_exact_balance() {
        let mut ledger = ScoreLedger::new(100);
        assert!(ledger.try_spend(Ability::Hyper.cost()));
        assert_eq!(ledger.value(), 0);
    }

    #[test]
    fn test_insufficient_balance_is_a_no_op() {
        let mut ledger = ScoreLedger::new(5);
        assert!(!ledger.try_spend(Ability::Shield.cost()));
        assert_eq!(ledger.value(), 5);
    }

    #[test]
    fn test_costs() {
        assert_eq!(Ability::Emp.cost(), 20);
        assert_eq!(Ability::Hyper.cost(), 100);
        assert_eq!(Ability::Shield.cost(), 50);
        assert_eq!(Ability::Gravity.cost(), 10);
        assert!(Ability::Emp.exclusive() && Ability::Shield.exclusive());
        assert!(!Ability::Hyper.exclusive() && !Ability::Gravity.exclusive());
    }

    fn ledger_op() -> impl Strategy<Value = Result<u32, usize>> {
        prop_oneof![
            (0u32..200).prop_map(Ok),
            (0usize..ALL.len()).prop_map(Err),
        ]
    }

    proptest! {
        // Ok = award points, Err = attempt to buy an ability.
        #[test]
        fn prop_spending_matches_balance(
            start in 0u32..300,
            ops in prop::collection::vec(ledger_op(), 0..64),
        ) {
            let mut ledger = ScoreLedger::new(start);
            let mut expected = start as i64;
            for op in ops {
                match op {
                    Ok(points) => {
                        ledger.award(points);
                        expected += points as i64;
                    }
                    Err(index) => {
                        let cost = ALL[index].cost();
                        let before = ledger.value();
                        let spent = ledger.try_spend(cost);
                        prop_assert_eq!(spent, before >= cost);
                        if spent {
                            expected -= cost as i64;
                        }
                    }
                }
                prop_assert!(expected >= 0);
                prop_assert_eq!(ledger.value() as i64, expected);
            }
        }
    }
}
