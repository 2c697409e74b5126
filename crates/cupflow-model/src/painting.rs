// SPDX-License-Identifier: Apache-2.0

/// Finishes that require manual paint work before printing.
const PAINTING_KEYWORDS: [&str; 4] = ["degradê", "degrade", "bicolor", "borda"];

/// Whether an order needs the painting step, judged from the real
/// description when present, else the raw marketplace product name.
/// Plain case-insensitive substring containment, nothing fuzzy.
#[must_use]
pub fn needs_painting(real_description: Option<&str>, product_name: &str) -> bool {
    let desc = real_description.unwrap_or(product_name).to_lowercase();
    PAINTING_KEYWORDS.iter().any(|kw| desc.contains(kw))
}
