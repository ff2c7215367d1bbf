//! Bounded integer engine options.
//!
//! A fixed table of named spin options. Writes clamp to the declared range
//! rather than fail, so a caller always ends up with a usable value.

pub const OPT_HASH: &str = "hash";
pub const OPT_SOFT_TIME_PCT: &str = "soft_time_pct";
pub const OPT_ABORT_TIME_PCT: &str = "abort_time_pct";
pub const OPT_DETERMINISTIC: &str = "deterministic";

/// Declaration of one spin option.
struct OptionSpec {
    name: &'static str,
    default: i64,
    min: i64,
    max: i64,
}

const SPECS: [OptionSpec; 4] = [
    // Hash table size in megabytes.
    OptionSpec { name: OPT_HASH, default: 16, min: 1, max: 4096 },
    // Soft time threshold: no new depth starts past this share of the budget.
    OptionSpec { name: OPT_SOFT_TIME_PCT, default: 50, min: 1, max: 100 },
    // Hard threshold: the abort timer fires at this share of the budget.
    OptionSpec { name: OPT_ABORT_TIME_PCT, default: 90, min: 1, max: 100 },
    // Reproducible node counts at the cost of speculative parallelism.
    OptionSpec { name: OPT_DETERMINISTIC, default: 0, min: 0, max: 1 },
];

/// What a write against the registry produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// The value, after clamping, under the option's canonical name.
    Applied { name: &'static str, value: i64 },
    /// No option with that name exists.
    Unknown,
}

/// Current values for every declared option.
pub struct OptionRegistry {
    values: [i64; SPECS.len()],
}

impl OptionRegistry {
    #[must_use]
    pub fn new() -> Self {
        let mut values = [0i64; SPECS.len()];
        for (slot, spec) in values.iter_mut().zip(SPECS.iter()) {
            assert!(
                spec.min <= spec.default && spec.default <= spec.max,
                "option '{}' has a default outside its range",
                spec.name
            );
            *slot = spec.default;
        }
        OptionRegistry { values }
    }

    /// Set `name` to `value`, clamped into the declared range. Names match
    /// case-insensitively.
    pub fn set(&mut self, name: &str, value: i64) -> SetOutcome {
        for (slot, spec) in self.values.iter_mut().zip(SPECS.iter()) {
            if spec.name.eq_ignore_ascii_case(name) {
                *slot = value.clamp(spec.min, spec.max);
                return SetOutcome::Applied { name: spec.name, value: *slot };
            }
        }
        SetOutcome::Unknown
    }

    /// Current value of `name`.
    ///
    /// # Panics
    /// When `name` is not a declared option; internal callers always use
    /// the `OPT_*` constants.
    #[must_use]
    pub fn get(&self, name: &str) -> i64 {
        self.values
            .iter()
            .zip(SPECS.iter())
            .find(|(_, spec)| spec.name.eq_ignore_ascii_case(name))
            .map(|(value, _)| *value)
            .unwrap_or_else(|| panic!("no option named '{name}'"))
    }

    /// The full option table in announcement form, one line per option,
    /// with a trailing newline.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (value, spec) in self.values.iter().zip(SPECS.iter()) {
            out.push_str(&format!(
                "option name {} type spin value {} default {} min {} max {}\n",
                spec.name, value, spec.default, spec.min, spec.max
            ));
        }
        out
    }
}

impl Default for OptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
