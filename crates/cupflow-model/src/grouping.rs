// SPDX-License-Identifier: Apache-2.0

use crate::order::Order;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Identity of one visual/printed group: a customer plus one of their art
/// groups. Group id 0 is the customer's default (merged) group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub customer_handle: String,
    pub art_group_id: i64,
}

/// Derived grouping of orders sharing one piece of artwork. Never
/// persisted; recomputed from the current order list on every read.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderGroup {
    pub key: GroupKey,
    pub orders: Vec<Order>,
    pub total_items: u32,
    pub earliest_shipping: NaiveDate,
    pub is_urgent: bool,
    pub display_name: String,
    // Customer-wide aggregates, identical across all of one customer's
    // groups; these drive the coarse comparator rules.
    pub customer_earliest_shipping: NaiveDate,
    pub customer_has_urgent: bool,
}

/// Partitions a flat order list into (customer, art group) groups and fills
/// in the per-group and per-customer aggregates. Output order follows
/// first appearance in the input; callers sort with [`sort_groups`].
#[must_use]
pub fn group_for_priority(orders: &[Order], today: NaiveDate) -> Vec<OrderGroup> {
    let mut groups: Vec<OrderGroup> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for order in orders {
        let key = GroupKey {
            customer_handle: order.customer_handle.clone(),
            art_group_id: order.art_group_id,
        };
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(OrderGroup {
                display_name: order
                    .art_name
                    .clone()
                    .unwrap_or_else(|| format!("@{}", order.customer_handle)),
                key,
                orders: Vec::new(),
                total_items: 0,
                earliest_shipping: order.shipping_date,
                is_urgent: false,
                customer_earliest_shipping: order.shipping_date,
                customer_has_urgent: false,
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.total_items += order.quantity;
        if order.shipping_date < group.earliest_shipping {
            group.earliest_shipping = order.shipping_date;
        }
        if order.effective_urgency(today) {
            group.is_urgent = true;
        }
        group.orders.push(order.clone());
    }

    let mut customer_earliest: HashMap<&str, NaiveDate> = HashMap::new();
    let mut customer_urgent: HashMap<&str, bool> = HashMap::new();
    for group in &groups {
        let handle = group.key.customer_handle.as_str();
        customer_earliest
            .entry(handle)
            .and_modify(|d| {
                if group.earliest_shipping < *d {
                    *d = group.earliest_shipping;
                }
            })
            .or_insert(group.earliest_shipping);
        *customer_urgent.entry(handle).or_insert(false) |= group.is_urgent;
    }

    let earliest: HashMap<String, NaiveDate> = customer_earliest
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    let urgent: HashMap<String, bool> = customer_urgent
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    for group in &mut groups {
        group.customer_earliest_shipping = earliest[&group.key.customer_handle];
        group.customer_has_urgent = urgent[&group.key.customer_handle];
    }

    groups
}

/// Total order over groups. First rule with a verdict wins:
/// 1. customers with any effectively urgent order come first;
/// 2. earlier customer-wide shipping date first;
/// 3. within one customer, the urgent group first;
/// 4. earlier group shipping date first.
///
/// Rules 1-2 keep a customer's groups adjacent in every output; rules 3-4
/// order the groups inside that block.
#[must_use]
pub fn priority_cmp(a: &OrderGroup, b: &OrderGroup) -> Ordering {
    b.customer_has_urgent
        .cmp(&a.customer_has_urgent)
        .then_with(|| a.customer_earliest_shipping.cmp(&b.customer_earliest_shipping))
        .then_with(|| b.is_urgent.cmp(&a.is_urgent))
        .then_with(|| a.earliest_shipping.cmp(&b.earliest_shipping))
}

/// Applies [`priority_cmp`]; the sort is stable, so fully tied groups keep
/// their input order.
pub fn sort_groups(groups: &mut [OrderGroup]) {
    groups.sort_by(priority_cmp);
}
