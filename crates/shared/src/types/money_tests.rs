use super::*;
use rstest::rstest;
use rust_decimal_macros::dec;

#[rstest]
#[case(dec!(10.125), dec!(10.12))]
#[case(dec!(10.135), dec!(10.14))]
#[case(dec!(0.005), dec!(0.00))]
#[case(dec!(99.999), dec!(100.00))]
fn test_round_money_bankers(#[case] input: Decimal, #[case] expected: Decimal) {
    assert_eq!(round_money(input), expected);
}

#[rstest]
#[case(dec!(100), true)]
#[case(dec!(0.5), true)]
#[case(dec!(12.34), true)]
#[case(dec!(10.500), true)]
#[case(dec!(0.001), false)]
#[case(dec!(1.235), false)]
fn test_has_money_scale(#[case] amount: Decimal, #[case] expected: bool) {
    assert_eq!(has_money_scale(amount), expected);
}
