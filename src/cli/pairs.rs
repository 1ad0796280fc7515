use std::collections::BTreeMap;

pub type Pairs = BTreeMap<String, String>;

/// Parse `key=value,key=value`. The value is everything after the first `=`.
pub fn parse_pairs(raw: &str) -> Result<Pairs, String> {
    let mut pairs = Pairs::new();
    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got '{}'", pair))?;
        if key.is_empty() {
            return Err(format!("missing key in '{}'", pair));
        }
        pairs.insert(key.to_string(), value.to_string());
    }
    Ok(pairs)
}

/// Anything but a literal `false` turns the flag on
pub fn coerce_flag(raw: &str) -> Result<bool, String> {
    Ok(raw != "false")
}
