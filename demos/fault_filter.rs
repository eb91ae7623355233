//! Classifies faults with a first-match predicate map.
//!
//! Faults are created by name through a fixed registry of constructors;
//! names outside the registry become [`Fault::Unrecognised`], which the
//! filter classifies like any other fault.
//!
//! ```text
//! cargo run --example fault_filter -- NotImplemented "not done yet"
//! ```

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;
use u_predicate_map::map::PredicateFnMap;

/// Faults the demo knows how to raise.
#[derive(Debug, Error)]
enum Fault {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    NotImplemented(String),
    #[error("{0}")]
    NullReference(String),
    #[error("unrecognised fault type: {0}")]
    Unrecognised(String),
}

type Constructor = fn(String) -> Fault;

/// Name to constructor lookup, built once at startup.
struct FaultRegistry {
    constructors: HashMap<&'static str, Constructor>,
}

impl FaultRegistry {
    fn new() -> Self {
        let constructors: HashMap<&'static str, Constructor> = HashMap::from([
            ("InvalidArgument", Fault::InvalidArgument as Constructor),
            ("NotImplemented", Fault::NotImplemented as Constructor),
            ("NullReference", Fault::NullReference as Constructor),
        ]);
        Self { constructors }
    }

    fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.constructors.keys().copied().collect();
        names.sort_unstable();
        names
    }

    fn create(&self, name: &str, message: &str) -> Fault {
        match self.constructors.get(name) {
            Some(construct) => construct(message.to_string()),
            None => Fault::Unrecognised(name.to_string()),
        }
    }
}

fn is_invalid_argument(fault: &Fault) -> bool {
    matches!(fault, Fault::InvalidArgument(_))
}

fn is_not_implemented(fault: &Fault) -> bool {
    matches!(fault, Fault::NotImplemented(msg) if !msg.contains("yet"))
}

fn is_not_implemented_yet(fault: &Fault) -> bool {
    matches!(fault, Fault::NotImplemented(msg) if msg.contains("yet"))
}

fn is_null_reference(fault: &Fault) -> bool {
    matches!(fault, Fault::NullReference(_))
}

fn is_unrecognised(fault: &Fault) -> bool {
    matches!(fault, Fault::Unrecognised(_))
}

/// Builds the classification rules.
fn fault_filter() -> PredicateFnMap<Fault, String> {
    let mut filter = PredicateFnMap::new(Some("Unable to handle the passed fault.".to_string()));
    filter.add(is_invalid_argument, |f: &Fault| {
        format!("An argument was rejected: {f}")
    });
    filter.add(is_not_implemented, |_: &Fault| {
        "This feature will not be implemented.".to_string()
    });
    filter.add(is_not_implemented_yet, |f: &Fault| {
        format!("This feature is coming: {f}")
    });
    filter.add(is_null_reference, |_: &Fault| {
        "Something was missing where a value was required.".to_string()
    });
    filter.add(is_unrecognised, |f: &Fault| format!("{f}; see usage for known names."));
    filter
}

fn respond(filter: &PredicateFnMap<Fault, String>, fault: &Fault) -> String {
    debug!(?fault, "classifying fault");
    filter.first_match(fault).unwrap_or_default()
}

fn print_usage(registry: &FaultRegistry) {
    println!("Available calls:");
    println!(
        "Raise a fault to demonstrate classification: fault_filter {{fault name}} {{message}}"
    );
    println!();
    println!("Fault names with special handling:");
    for name in registry.names() {
        println!("  {name}");
    }
    println!("NotImplemented faults are split on whether the message contains 'yet'.");
    println!("Unknown names are reported as unrecognised faults.");
}

fn main() {
    tracing_subscriber::fmt::init();

    let registry = FaultRegistry::new();
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [name, message, ..] if name != "?" => {
            let fault = registry.create(name, message);
            println!("{}", respond(&fault_filter(), &fault));
        }
        _ => print_usage(&registry),
    }
}
