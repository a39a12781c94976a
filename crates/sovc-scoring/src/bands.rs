//! # Point Bands
//!
//! Each factor maps to an absolute number of points through a threshold
//! table. Thresholds are checked in the listed order and the first match
//! wins; a value matching no threshold earns the table's floor.
//!
//! | Factor | Thresholds | Points | Floor |
//! |---|---|---|---|
//! | paymentHistory | `>=` .95 / .90 / .80 / .70 | 350 / 280 / 200 / 100 | 50 |
//! | creditUtilization | `<=` .10 / .20 / .30 / .50 | 300 / 250 / 200 / 150 | 100 |
//! | creditAge (years) | `>=` 10 / 7 / 5 / 3 | 150 / 120 / 90 / 60 | 30 |
//! | creditMix | `>=` 4 / 3 / 2 | 100 / 80 / 60 | 40 |
//! | newCredit | `<=` 0 / 2 / 4 | 100 / 80 / 60 | 40 |
//!
//! Categorical payment history reuses the four payment tiers
//! (`excellent` → tier 0, … `poor` → tier 3); `unrated` earns 0 points,
//! not the floor.

use crate::factors::PaymentCategory;

/// Direction of a band comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Matches when `value >= threshold`.
    AtLeast,
    /// Matches when `value <= threshold`.
    AtMost,
}

/// A single threshold tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub threshold: f64,
    pub points: u32,
}

/// An ordered threshold table with a floor.
#[derive(Debug, Clone, Copy)]
pub struct BandTable {
    pub direction: Direction,
    pub bands: &'static [Band],
    pub floor: u32,
}

impl BandTable {
    /// Points for `value`: the first matching tier, else the floor.
    pub fn points(&self, value: f64) -> u32 {
        self.bands
            .iter()
            .find(|band| match self.direction {
                Direction::AtLeast => value >= band.threshold,
                Direction::AtMost => value <= band.threshold,
            })
            .map_or(self.floor, |band| band.points)
    }

    /// Highest attainable points.
    pub fn max_points(&self) -> u32 {
        self.bands
            .iter()
            .map(|b| b.points)
            .chain(std::iter::once(self.floor))
            .max()
            .unwrap_or(self.floor)
    }
}

pub const PAYMENT_HISTORY: BandTable = BandTable {
    direction: Direction::AtLeast,
    bands: &[
        Band { threshold: 0.95, points: 350 },
        Band { threshold: 0.90, points: 280 },
        Band { threshold: 0.80, points: 200 },
        Band { threshold: 0.70, points: 100 },
    ],
    floor: 50,
};

pub const CREDIT_UTILIZATION: BandTable = BandTable {
    direction: Direction::AtMost,
    bands: &[
        Band { threshold: 0.10, points: 300 },
        Band { threshold: 0.20, points: 250 },
        Band { threshold: 0.30, points: 200 },
        Band { threshold: 0.50, points: 150 },
    ],
    floor: 100,
};

pub const CREDIT_AGE: BandTable = BandTable {
    direction: Direction::AtLeast,
    bands: &[
        Band { threshold: 10.0, points: 150 },
        Band { threshold: 7.0, points: 120 },
        Band { threshold: 5.0, points: 90 },
        Band { threshold: 3.0, points: 60 },
    ],
    floor: 30,
};

pub const CREDIT_MIX: BandTable = BandTable {
    direction: Direction::AtLeast,
    bands: &[
        Band { threshold: 4.0, points: 100 },
        Band { threshold: 3.0, points: 80 },
        Band { threshold: 2.0, points: 60 },
    ],
    floor: 40,
};

pub const NEW_CREDIT: BandTable = BandTable {
    direction: Direction::AtMost,
    bands: &[
        Band { threshold: 0.0, points: 100 },
        Band { threshold: 2.0, points: 80 },
        Band { threshold: 4.0, points: 60 },
    ],
    floor: 40,
};

/// Points for a categorical payment history.
pub fn payment_category_points(category: PaymentCategory) -> u32 {
    let tier = match category {
        PaymentCategory::Excellent => 0,
        PaymentCategory::Good => 1,
        PaymentCategory::Fair => 2,
        PaymentCategory::Poor => 3,
        PaymentCategory::Unrated => return 0,
    };
    PAYMENT_HISTORY.bands.get(tier).map_or(0, |band| band.points)
}

/// Intended proportional contribution of each factor.
///
/// Documentation only: the band points already encode these proportions as
/// absolute maxima, and no code path multiplies by them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorWeights {
    pub payment_history: f64,
    pub credit_utilization: f64,
    pub credit_age: f64,
    pub credit_mix: f64,
    pub new_credit: f64,
}

pub const WEIGHTS: FactorWeights = FactorWeights {
    payment_history: 0.35,
    credit_utilization: 0.30,
    credit_age: 0.15,
    credit_mix: 0.10,
    new_credit: 0.10,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_history_tiers() {
        assert_eq!(PAYMENT_HISTORY.points(1.0), 350);
        assert_eq!(PAYMENT_HISTORY.points(0.95), 350);
        assert_eq!(PAYMENT_HISTORY.points(0.94), 280);
        assert_eq!(PAYMENT_HISTORY.points(0.90), 280);
        assert_eq!(PAYMENT_HISTORY.points(0.85), 200);
        assert_eq!(PAYMENT_HISTORY.points(0.70), 100);
        assert_eq!(PAYMENT_HISTORY.points(0.69), 50);
        assert_eq!(PAYMENT_HISTORY.points(0.0), 50);
    }

    #[test]
    fn utilization_tiers() {
        assert_eq!(CREDIT_UTILIZATION.points(0.0), 300);
        assert_eq!(CREDIT_UTILIZATION.points(0.10), 300);
        assert_eq!(CREDIT_UTILIZATION.points(0.15), 250);
        assert_eq!(CREDIT_UTILIZATION.points(0.30), 200);
        assert_eq!(CREDIT_UTILIZATION.points(0.50), 150);
        assert_eq!(CREDIT_UTILIZATION.points(0.51), 100);
        assert_eq!(CREDIT_UTILIZATION.points(1.0), 100);
    }

    #[test]
    fn age_mix_and_new_credit_tiers() {
        assert_eq!(CREDIT_AGE.points(12.0), 150);
        assert_eq!(CREDIT_AGE.points(7.0), 120);
        assert_eq!(CREDIT_AGE.points(6.0), 90);
        assert_eq!(CREDIT_AGE.points(3.0), 60);
        assert_eq!(CREDIT_AGE.points(2.9), 30);

        assert_eq!(CREDIT_MIX.points(5.0), 100);
        assert_eq!(CREDIT_MIX.points(3.0), 80);
        assert_eq!(CREDIT_MIX.points(2.0), 60);
        assert_eq!(CREDIT_MIX.points(0.0), 40);

        assert_eq!(NEW_CREDIT.points(0.0), 100);
        assert_eq!(NEW_CREDIT.points(1.0), 80);
        assert_eq!(NEW_CREDIT.points(4.0), 60);
        assert_eq!(NEW_CREDIT.points(5.0), 40);
    }

    #[test]
    fn categories_share_payment_tiers() {
        assert_eq!(payment_category_points(PaymentCategory::Excellent), 350);
        assert_eq!(payment_category_points(PaymentCategory::Good), 280);
        assert_eq!(payment_category_points(PaymentCategory::Fair), 200);
        assert_eq!(payment_category_points(PaymentCategory::Poor), 100);
        assert_eq!(payment_category_points(PaymentCategory::Unrated), 0);
    }

    #[test]
    fn max_points_match_documented_maxima() {
        assert_eq!(PAYMENT_HISTORY.max_points(), 350);
        assert_eq!(CREDIT_UTILIZATION.max_points(), 300);
        assert_eq!(CREDIT_AGE.max_points(), 150);
        assert_eq!(CREDIT_MIX.max_points(), 100);
        assert_eq!(NEW_CREDIT.max_points(), 100);
    }

    #[test]
    fn weights_sum_to_one() {
        let w = WEIGHTS;
        let sum = w.payment_history + w.credit_utilization + w.credit_age + w.credit_mix + w.new_credit;
        assert!((sum - 1.0).abs() < 1e-9);
    }
}
