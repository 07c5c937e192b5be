use crate::region::Tier;

/// Base rate: one dollar per canvas pixel, in cents.
pub const BASIC_CENTS_PER_CELL: i64 = 100;
/// Premium carries a 1.5x multiplier for media/highlight support.
pub const PREMIUM_CENTS_PER_CELL: i64 = 150;

impl Tier {
    pub const fn cents_per_cell(self) -> i64 {
        match self {
            Tier::Basic => BASIC_CENTS_PER_CELL,
            Tier::Premium => PREMIUM_CENTS_PER_CELL,
        }
    }
}

/// Price quote in cents for a `width x height` claim. Dimensions are taken
/// at face value; validation happens before anything is quoted.
pub fn quote_cents(width: i32, height: i32, tier: Tier) -> i64 {
    width as i64 * height as i64 * tier.cents_per_cell()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_block_costs_a_hundred_dollars() {
        assert_eq!(quote_cents(10, 10, Tier::Basic), 10_000);
    }

    #[test]
    fn premium_is_one_and_a_half_times_basic() {
        assert_eq!(quote_cents(20, 30, Tier::Premium), 90_000);
        assert_eq!(
            quote_cents(20, 30, Tier::Premium) * 2,
            quote_cents(20, 30, Tier::Basic) * 3
        );
    }

    #[test]
    fn quote_scales_with_area() {
        assert_eq!(quote_cents(10, 20, Tier::Basic), 2 * quote_cents(10, 10, Tier::Basic));
    }
}
