//! Shopping-list aggregation through the public API.

use larder_core::{aggregate, render_report, CartLine};

fn line(name: &str, unit: &str, amount: i64) -> CartLine {
    CartLine {
        name: name.to_string(),
        measurement_unit: unit.to_string(),
        amount,
    }
}

fn pancakes() -> Vec<CartLine> {
    vec![line("flour", "g", 200), line("egg", "pcs", 2)]
}

fn crepes() -> Vec<CartLine> {
    vec![line("flour", "g", 100), line("milk", "ml", 50)]
}

#[test]
fn test_two_recipe_cart() {
    let lines = pancakes().into_iter().chain(crepes());
    let report = render_report(&aggregate(lines));
    assert_eq!(
        report,
        "Shopping list:\negg\t2 (pcs)\nflour\t300 (g)\nmilk\t50 (ml)\n"
    );
}

#[test]
fn test_cart_order_does_not_matter() {
    let forward = render_report(&aggregate(pancakes().into_iter().chain(crepes())));
    let backward = render_report(&aggregate(crepes().into_iter().chain(pancakes())));
    assert_eq!(forward, backward);
}

#[test]
fn test_rerun_is_byte_identical() {
    let first = render_report(&aggregate(pancakes()));
    let second = render_report(&aggregate(pancakes()));
    assert_eq!(first.as_bytes(), second.as_bytes());
}
