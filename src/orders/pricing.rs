use sqlx::types::Decimal;

/// Order totals strictly above this amount qualify for the flat discount.
fn discount_threshold() -> Decimal {
    Decimal::new(500, 0)
}

// 5% off, i.e. pay 95%.
fn discount_multiplier() -> Decimal {
    Decimal::new(95, 2)
}

/// Total for an order: unit price times quantity, discounted by 5% when the
/// undiscounted total exceeds 500. The result is the price snapshot stored
/// on the order row; later catalog price changes never touch it.
pub fn total_price(unit_price: Decimal, quantity: i32) -> Decimal {
    let total = unit_price * Decimal::from(quantity);
    if total > discount_threshold() {
        (total * discount_multiplier()).round_dp(2)
    } else {
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_orders_pay_full_price() {
        assert_eq!(total_price(Decimal::new(1050, 2), 2), Decimal::new(21, 0));
        assert_eq!(total_price(Decimal::new(999, 2), 1), Decimal::new(999, 2));
    }

    #[test]
    fn exactly_500_is_not_discounted() {
        assert_eq!(total_price(Decimal::new(100, 0), 5), Decimal::new(500, 0));
        assert_eq!(total_price(Decimal::new(250, 0), 2), Decimal::new(500, 0));
    }

    #[test]
    fn totals_above_500_get_five_percent_off() {
        // 6 x 100 = 600 -> 570
        assert_eq!(total_price(Decimal::new(100, 0), 6), Decimal::new(570, 0));
        // 2 x 255 = 510 -> 484.50
        assert_eq!(total_price(Decimal::new(255, 0), 2), Decimal::new(48450, 2));
    }

    #[test]
    fn discounted_totals_are_rounded_to_cents() {
        // 3 x 170.01 = 510.03 -> 484.5285 -> 484.53
        assert_eq!(
            total_price(Decimal::new(17001, 2), 3),
            Decimal::new(48453, 2)
        );
    }
}
