// SPDX-License-Identifier: Apache-2.0

//! Chat message texts sent to the production group. Pure formatting; the
//! server decides where they go.

use crate::order::Order;
use crate::painting::needs_painting;
use chrono::NaiveDate;

/// Drops the trailing color clause from a description: everything from the
/// first whitespace-delimited "em" on. "Copão 770ml Degradê em preto"
/// becomes "Copão 770ml Degradê"; list-style descriptions with embedded
/// newlines are cut the same way.
fn strip_color_clause(desc: &str) -> &str {
    let bytes = desc.as_bytes();
    let mut i = 0;
    while i + 3 < bytes.len() {
        if bytes[i].is_ascii_whitespace()
            && bytes[i + 1] == b'e'
            && bytes[i + 2] == b'm'
            && bytes[i + 3].is_ascii_whitespace()
            && i > 0
        {
            return &desc[..i];
        }
        i += 1;
    }
    desc
}

fn last_four(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    let start = chars.len().saturating_sub(4);
    chars[start..].iter().collect()
}

fn unique_id_suffixes(orders: &[&Order]) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for order in orders {
        let id = order.marketplace_order_id.as_str();
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen.into_iter()
        .map(last_four)
        .collect::<Vec<_>>()
        .join(" / ")
}

/// The "send for painting" request: only orders the classifier flags, one
/// quantity+description item each, joined with " e ", plus the last four
/// digits of each distinct marketplace id. `None` when nothing in the
/// batch needs painting.
#[must_use]
pub fn painting_message(orders: &[Order], today: NaiveDate) -> Option<String> {
    let painting: Vec<&Order> = orders
        .iter()
        .filter(|o| needs_painting(o.real_description.as_deref(), &o.product_name))
        .collect();
    if painting.is_empty() {
        return None;
    }

    let items: Vec<String> = painting
        .iter()
        .map(|o| {
            format!(
                "{} {}",
                o.effective_cup_count(),
                strip_color_clause(o.effective_description())
            )
        })
        .collect();
    let content = items.join(" e ");
    let ids = unique_id_suffixes(&painting);

    let urgent_suffix = if painting.iter().any(|o| o.effective_urgency(today)) {
        " *URGENTE*"
    } else {
        ""
    };

    // Descriptions carrying a "-" list keep the id line on its own row.
    if content.contains("\n-") {
        Some(format!("Pintar {content}\nshopee {ids}{urgent_suffix}"))
    } else {
        Some(format!("Pintar {content} - shopee {ids}{urgent_suffix}"))
    }
}

/// The daily-batch summary: one line per queued order, already in priority
/// order. `None` for an empty queue.
#[must_use]
pub fn daily_batch_message(orders: &[Order], today: NaiveDate) -> Option<String> {
    if orders.is_empty() {
        return None;
    }
    let mut lines = vec![format!("Fila do dia ({} pedidos):", orders.len())];
    for order in orders {
        let urgent = if order.effective_urgency(today) {
            " *URGENTE*"
        } else {
            ""
        };
        lines.push(format!(
            "- {} {} - shopee {}{}",
            order.effective_cup_count(),
            strip_color_clause(order.effective_description()),
            last_four(&order.marketplace_order_id),
            urgent
        ));
    }
    Some(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::strip_color_clause;

    #[test]
    fn color_clause_is_cut_at_first_em() {
        assert_eq!(
            strip_color_clause("Copão 770ml Degradê em preto"),
            "Copão 770ml Degradê"
        );
        assert_eq!(
            strip_color_clause("Copão 770ml Bicolor\n-cores\nem preto"),
            "Copão 770ml Bicolor\n-cores"
        );
        // "em" must stand alone; no clause, no cut.
        assert_eq!(strip_color_clause("Tempo de festa"), "Tempo de festa");
        assert_eq!(strip_color_clause("sem cor"), "sem cor");
    }
}
