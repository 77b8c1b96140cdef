//! Deterministic token cost estimate
//!
//! Approximates a subword tokenizer without depending on one: alphanumeric
//! runs cost one token per four characters rounded up, every other visible
//! character costs one, and a line never costs less than one.

/// Estimate the token cost of one line
pub fn estimate_tokens(line: &str) -> u32 {
    let mut cost = 0u32;
    let mut run = 0u32;
    for ch in line.chars() {
        if ch.is_alphanumeric() {
            run += 1;
        } else {
            if run > 0 {
                cost += run.div_ceil(4);
                run = 0;
            }
            if !ch.is_whitespace() {
                cost += 1;
            }
        }
    }
    if run > 0 {
        cost += run.div_ceil(4);
    }
    cost.max(1)
}
