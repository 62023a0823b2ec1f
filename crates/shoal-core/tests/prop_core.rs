// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PROPERTY-BASED TESTS — shoal-core
//
// Mathematical invariants of truncation and slippage bounds that MUST
// hold for all inputs. proptest generates thousands of random inputs
// per property.
//
// Run: cargo test --release -p shoal-core --test prop_core
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use proptest::prelude::*;
use rust_decimal::Decimal;
use shoal_core::amounts::{exact_amount, max_input, min_output, truncate};

/// Positive amount with up to 12 fractional digits.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=1_000_000_000_000, 0u32..=12).prop_map(|(m, s)| Decimal::new(m, s))
}

/// Slippage fraction in [0, 1), 4 fractional digits.
fn arb_slippage() -> impl Strategy<Value = Decimal> {
    (0i64..10_000).prop_map(|bps| Decimal::new(bps, 4))
}

proptest! {
    // ── Truncation ──────────────────────────────────────────────

    #[test]
    fn prop_truncate_never_exceeds_input(amount in arb_amount(), precision in 0u32..=12) {
        let cut = truncate(amount, precision);
        prop_assert!(cut <= amount);
    }

    #[test]
    fn prop_truncate_respects_precision(amount in arb_amount(), precision in 0u32..=12) {
        let cut = truncate(amount, precision);
        prop_assert!(cut.scale() <= precision);
    }

    #[test]
    fn prop_truncate_drops_less_than_one_ulp(amount in arb_amount(), precision in 0u32..=12) {
        let cut = truncate(amount, precision);
        let ulp = Decimal::new(1, precision);
        prop_assert!(amount - cut < ulp);
    }

    #[test]
    fn prop_truncate_is_idempotent(amount in arb_amount(), precision in 0u32..=12) {
        let once = truncate(amount, precision);
        prop_assert_eq!(truncate(once, precision), once);
    }

    // ── Slippage bounds ─────────────────────────────────────────

    #[test]
    fn prop_min_output_below_unadjusted_amount(
        amount in arb_amount(),
        slippage in arb_slippage(),
        precision in 0u32..=12,
    ) {
        // trunc(a * (1 - s)) <= a * (1 - s) <= a, strictly below for s > 0
        if let Ok(bound) = min_output(amount, slippage, precision) {
            prop_assert!(bound <= amount);
            if slippage > Decimal::ZERO {
                prop_assert!(bound < amount);
            }
        }
    }

    #[test]
    fn prop_zero_slippage_bounds_equal_truncated_amount(
        amount in arb_amount(),
        precision in 0u32..=12,
    ) {
        let exact = exact_amount(amount, precision);
        prop_assert_eq!(min_output(amount, Decimal::ZERO, precision), exact.clone());
        prop_assert_eq!(max_input(amount, Decimal::ZERO, precision), exact);
    }

    #[test]
    fn prop_max_input_never_below_min_output(
        amount in arb_amount(),
        slippage in arb_slippage(),
        precision in 0u32..=12,
    ) {
        if let (Ok(min), Ok(max)) = (
            min_output(amount, slippage, precision),
            max_input(amount, slippage, precision),
        ) {
            prop_assert!(min <= max);
        }
    }

    // Strict ordering holds once the slippage margin exceeds one ulp of
    // the target precision: amounts >= 1 with >= 1 bps slippage against
    // 6-digit precision.
    #[test]
    fn prop_strict_bounds_for_material_slippage(
        whole in 1i64..=1_000_000,
        cents in 0i64..=99,
        bps in 1i64..=9_999,
    ) {
        let amount = Decimal::new(whole, 0) + Decimal::new(cents, 2);
        let slippage = Decimal::new(bps, 4);
        let exact = exact_amount(amount, 6).unwrap();
        let min = min_output(amount, slippage, 6).unwrap();
        let max = max_input(amount, slippage, 6).unwrap();
        prop_assert!(min < exact, "min {} !< exact {}", min, exact);
        prop_assert!(max > exact, "max {} !> exact {}", max, exact);
    }
}
