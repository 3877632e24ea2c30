use tracing_subscriber::{EnvFilter, fmt};

/// Debug-level event tagged with the calling module. Expands to an
/// expression, so it can sit directly in a match arm.
#[macro_export]
macro_rules! dlog {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

/// Crate log level for `-v`/`-q` counts. INFO by default, each `-v` one
/// step louder (DEBUG, TRACE), each `-q` one step quieter (WARN, ERROR).
pub fn log_level(verbose: u8, quiet: u8) -> &'static str {
    match i16::from(verbose) - i16::from(quiet) {
        i16::MIN..=-2 => "error",
        -1 => "warn",
        0 => "info",
        1 => "debug",
        2..=i16::MAX => "trace",
    }
}

/// Dependencies stay at WARN; only this crate follows the flags.
fn default_directives(level: &str) -> String {
    format!("warn,{}={level}", env!("CARGO_CRATE_NAME"))
}

/// Install the stderr subscriber. `RUST_LOG`, when set, replaces the
/// flag-derived filter entirely.
pub fn init_logging(verbose: u8, quiet: u8) {
    let level = log_level(verbose, quiet);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));
    let with_source = verbose > quiet;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::ChronoLocal::rfc_3339())
        .with_file(with_source)
        .with_line_number(with_source)
        .compact()
        .init();
}

/// Number conversion for form text, matching what a browser's unary `+`
/// gives for an input value: blank is `0`; decimal literals with optional
/// sign, fraction and exponent; unsigned `0x`/`0o`/`0b` integers; a signed
/// or bare `Infinity`. Everything else, `inf` and `nan` included, is NaN.
pub fn parse_form_number(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix_digits(&s[2..], radix);
    }

    match s.strip_prefix(['+', '-']).unwrap_or(s) {
        "Infinity" if s.starts_with('-') => return f64::NEG_INFINITY,
        "Infinity" => return f64::INFINITY,
        _ => {}
    }

    if !s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_radix_digits(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix)
                .map(|d| acc.mul_add(f64::from(radix), f64::from(d)))
        })
        .unwrap_or(f64::NAN)
}

/// One decimal place, without a trailing `.0`.
pub fn format_value(v: f64) -> String {
    let s = format!("{v:.1}");
    match s.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => s,
    }
}
