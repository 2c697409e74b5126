use chrono::{Duration, NaiveDate, TimeZone, Utc};
use cupflow_model::{group_for_priority, sort_groups, ArtStatus, Order};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashSet;
use uuid::Uuid;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()
}

fn arb_order() -> impl Strategy<Value = Order> {
    (
        prop::sample::select(vec!["ana", "bea", "cid", "duda"]),
        0i64..4,
        0i64..30,
        any::<bool>(),
        1u32..50,
    )
        .prop_map(|(handle, group_id, ship_in_days, urgent, quantity)| {
            let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
            Order {
                id: Uuid::new_v4(),
                marketplace_order_id: format!("{handle}{group_id}{ship_in_days}{quantity}"),
                customer_handle: handle.to_string(),
                customer_name: handle.to_uppercase(),
                product_name: "Kit Copos".to_string(),
                variation: None,
                quantity,
                total_value: Decimal::ZERO,
                customer_note: None,
                shipping_date: today() + Duration::days(ship_in_days),
                order_date: today(),
                art_status: ArtStatus::Pending,
                art_name: None,
                art_group_id: group_id,
                cup_quantity: None,
                real_description: None,
                internal_note: None,
                is_urgent: urgent,
                urgent_from: None,
                in_daily_queue: false,
                art_png_url: None,
                art_cdr_url: None,
                sent_to_production_at: None,
                shipped_at: None,
                created_at: now,
                updated_at: now,
            }
        })
}

proptest! {
    #[test]
    fn grouping_partitions_every_input_order(orders in prop::collection::vec(arb_order(), 0..40)) {
        let groups = group_for_priority(&orders, today());

        let member_count: usize = groups.iter().map(|g| g.orders.len()).sum();
        prop_assert_eq!(member_count, orders.len());

        let item_count: u32 = groups.iter().map(|g| g.total_items).sum();
        prop_assert_eq!(item_count, orders.iter().map(|o| o.quantity).sum::<u32>());

        let grouped_ids: HashSet<Uuid> = groups
            .iter()
            .flat_map(|g| g.orders.iter().map(|o| o.id))
            .collect();
        prop_assert_eq!(grouped_ids.len(), orders.len());

        for group in &groups {
            prop_assert!(!group.orders.is_empty());
            for member in &group.orders {
                prop_assert_eq!(&member.customer_handle, &group.key.customer_handle);
                prop_assert_eq!(member.art_group_id, group.key.art_group_id);
                prop_assert!(group.earliest_shipping <= member.shipping_date);
            }
        }
    }

    #[test]
    fn sorted_output_respects_the_comparator_pairwise(orders in prop::collection::vec(arb_order(), 0..40)) {
        let mut groups = group_for_priority(&orders, today());
        sort_groups(&mut groups);

        for pair in groups.windows(2) {
            prop_assert_ne!(
                cupflow_model::priority_cmp(&pair[0], &pair[1]),
                std::cmp::Ordering::Greater
            );
        }
    }

    #[test]
    fn sorting_twice_changes_nothing(orders in prop::collection::vec(arb_order(), 0..40)) {
        let mut groups = group_for_priority(&orders, today());
        sort_groups(&mut groups);
        let once = groups.clone();
        sort_groups(&mut groups);
        prop_assert_eq!(groups, once);
    }
}
