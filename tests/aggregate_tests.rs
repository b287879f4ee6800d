//! Totals over a processed run

use pricectl::aggregate::{aggregate, AggregateInput, UNSPECIFIED_GROUP};

#[test]
fn test_prod_and_dev_totals() {
    let rows = vec![
        AggregateInput {
            total_monthly: Some(37.44),
            group: Some("prod"),
        },
        AggregateInput {
            total_monthly: Some(12.00),
            group: Some("dev"),
        },
    ];

    let totals = aggregate(rows, true);

    assert_eq!(totals.group("prod"), Some(37.44));
    assert_eq!(totals.group("dev"), Some(12.00));
    assert!((totals.grand_total.unwrap() - 49.44).abs() < 1e-9);
}

#[test]
fn test_mixed_rows_only_sum_numbers() {
    let rows = vec![
        AggregateInput {
            total_monthly: Some(10.0),
            group: Some("prod"),
        },
        AggregateInput {
            total_monthly: None,
            group: Some("prod"),
        },
        AggregateInput {
            total_monthly: Some(2.5),
            group: None,
        },
    ];

    let totals = aggregate(rows, true);

    assert_eq!(totals.group("prod"), Some(10.0));
    assert_eq!(totals.group(UNSPECIFIED_GROUP), Some(2.5));
    assert_eq!(totals.grand_total, Some(12.5));
}
