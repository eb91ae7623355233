//! FizzBuzz driven by a predicate map.
//!
//! There is no rule for "divisible by 15": both the fizz and buzz rules
//! match and their labels are joined.
//!
//! ```text
//! cargo run --example fizzbuzz -- 15
//! ```

use anyhow::{bail, Context};
use u_predicate_map::map::PredicateMap;

fn sequence_map() -> PredicateMap<u64, &'static str> {
    let mut map = PredicateMap::new(Some(""));
    map.add(|i: &u64| i % 3 == 0, "fizz");
    map.add(|i: &u64| i % 5 == 0, "buzz");
    map
}

/// Lines for `0..=limit`.
fn run(map: &PredicateMap<u64, &'static str>, limit: u64) -> Vec<String> {
    (0..=limit)
        .map(|i| {
            let mut labels = map.all_matches(&i);
            if labels.is_empty() {
                return i.to_string();
            }
            // fizz before buzz regardless of evaluation order
            labels.sort_by_key(|label| **label != "fizz");
            labels.into_iter().copied().collect::<Vec<_>>().join(" ")
        })
        .collect()
}

fn print_usage() {
    println!("Available calls:");
    println!("FizzBuzz to number: fizzbuzz {{number to count to}}");
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let Some(arg) = std::env::args().nth(1) else {
        print_usage();
        return Ok(());
    };
    if arg == "?" {
        print_usage();
        return Ok(());
    }
    let limit: u64 = arg
        .parse()
        .with_context(|| format!("not a number to count to: {arg}"))?;
    if limit > 1_000_000 {
        bail!("refusing to count past 1000000");
    }

    for line in run(&sequence_map(), limit) {
        println!("{line}");
    }
    Ok(())
}
