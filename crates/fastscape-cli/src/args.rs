//! Positional argument parsing for the four fixed arguments this program
//! takes. The interface is rigidly positional, not flag-shaped, so a small
//! hand-rolled parser fits better here than a `clap::Parser` derive.

pub struct Args {
    pub dimension: usize,
    pub steps: usize,
    pub output_path: String,
    pub seed: u64,
}

pub const USAGE: &str = "usage: fastscape <dimension> <steps> <output-path> <seed>";

/// Parse `argv` (including the program name at index 0). Any argc mismatch
/// or unparseable number returns the one-line syntax message verbatim —
/// the caller is responsible for printing it to stderr and exiting
/// non-zero before any simulation state is allocated.
pub fn parse(argv: &[String]) -> Result<Args, String> {
    if argv.len() != 5 {
        return Err(USAGE.to_string());
    }

    let dimension: usize = argv[1].parse().map_err(|_| USAGE.to_string())?;
    let steps: usize = argv[2].parse().map_err(|_| USAGE.to_string())?;
    let output_path = argv[3].clone();
    let seed: u64 = argv[4].parse().map_err(|_| USAGE.to_string())?;

    Ok(Args { dimension, steps, output_path, seed })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("fastscape".to_string())
            .chain(args.iter().map(|s| s.to_string()))
            .collect()
    }

    #[test]
    fn parses_four_valid_arguments() {
        let parsed = parse(&argv(&["50", "10", "out.asc", "42"])).unwrap();
        assert_eq!(parsed.dimension, 50);
        assert_eq!(parsed.steps, 10);
        assert_eq!(parsed.output_path, "out.asc");
        assert_eq!(parsed.seed, 42);
    }

    #[test]
    fn rejects_wrong_argument_count() {
        assert!(parse(&argv(&["50", "10", "out.asc"])).is_err());
        assert!(parse(&argv(&["50", "10", "out.asc", "42", "extra"])).is_err());
    }

    #[test]
    fn rejects_unparseable_numbers() {
        assert!(parse(&argv(&["fifty", "10", "out.asc", "42"])).is_err());
        assert!(parse(&argv(&["50", "ten", "out.asc", "42"])).is_err());
        assert!(parse(&argv(&["50", "10", "out.asc", "-1"])).is_err());
    }
}
