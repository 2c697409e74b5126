use chrono::{NaiveDate, TimeZone, Utc};
use cupflow_model::{daily_batch_message, painting_message, ArtStatus, Order};
use rust_decimal::Decimal;
use uuid::Uuid;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()
}

fn mk_order(marketplace_id: &str, description: &str, cups: u32) -> Order {
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    Order {
        id: Uuid::new_v4(),
        marketplace_order_id: marketplace_id.to_string(),
        customer_handle: "ana".to_string(),
        customer_name: "Ana".to_string(),
        product_name: "Kit Copos".to_string(),
        variation: None,
        quantity: 1,
        total_value: Decimal::ZERO,
        customer_note: None,
        shipping_date: today(),
        order_date: today(),
        art_status: ArtStatus::Approved,
        art_name: None,
        art_group_id: 0,
        cup_quantity: Some(cups),
        real_description: Some(description.to_string()),
        internal_note: None,
        is_urgent: false,
        urgent_from: None,
        in_daily_queue: false,
        art_png_url: None,
        art_cdr_url: None,
        sent_to_production_at: None,
        shipped_at: None,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn painting_message_formats_one_order() {
    let order = mk_order("260300AB1234", "Copão 770ml Degradê em preto", 500);
    let msg = painting_message(&[order], today()).expect("needs painting");
    assert_eq!(msg, "Pintar 500 Copão 770ml Degradê - shopee 1234");
}

#[test]
fn painting_message_joins_orders_and_dedups_ids() {
    let orders = vec![
        mk_order("260300AB1234", "Copão 770ml Degradê em preto", 500),
        mk_order("260300AB1234", "Copos 500ml Bicolor em preto", 100),
        mk_order("260300CD5678", "Copos 300ml com Borda em preto", 50),
    ];
    let msg = painting_message(&orders, today()).expect("needs painting");
    assert_eq!(
        msg,
        "Pintar 500 Copão 770ml Degradê e 100 Copos 500ml Bicolor e 50 Copos 300ml com Borda - shopee 1234 / 5678"
    );
}

#[test]
fn painting_message_skips_orders_without_painting() {
    let orders = vec![
        mk_order("260300AB1234", "Copos 500ml em preto", 100),
        mk_order("260300CD5678", "Copão 770ml Degradê em preto", 500),
    ];
    let msg = painting_message(&orders, today()).expect("one needs painting");
    assert_eq!(msg, "Pintar 500 Copão 770ml Degradê - shopee 5678");

    let none = painting_message(
        &[mk_order("260300AB1234", "Copos 500ml em preto", 100)],
        today(),
    );
    assert!(none.is_none());
}

#[test]
fn painting_message_flags_effective_urgency() {
    let mut order = mk_order("260300AB1234", "Copão 770ml Degradê em preto", 500);
    order.is_urgent = true;
    let msg = painting_message(std::slice::from_ref(&order), today()).expect("msg");
    assert!(msg.ends_with("*URGENTE*"));

    // Not yet active: no flag.
    order.urgent_from = Some(NaiveDate::from_ymd_opt(2026, 3, 9).unwrap());
    let msg = painting_message(&[order], today()).expect("msg");
    assert!(!msg.contains("URGENTE"));
}

#[test]
fn painting_message_breaks_line_for_list_descriptions() {
    let order = mk_order(
        "260300AB1234",
        "Copão 770ml Bicolor\n-rosa\n-laranja\nem preto",
        200,
    );
    let msg = painting_message(&[order], today()).expect("msg");
    assert_eq!(
        msg,
        "Pintar 200 Copão 770ml Bicolor\n-rosa\n-laranja\nshopee 1234"
    );
}

#[test]
fn daily_batch_message_lists_orders_in_given_order() {
    let orders = vec![
        mk_order("260300AB1234", "Copão 770ml Degradê em preto", 500),
        mk_order("260300CD5678", "Copos 500ml em preto", 100),
    ];
    let msg = daily_batch_message(&orders, today()).expect("msg");
    assert_eq!(
        msg,
        "Fila do dia (2 pedidos):\n- 500 Copão 770ml Degradê - shopee 1234\n- 100 Copos 500ml - shopee 5678"
    );
    assert!(daily_batch_message(&[], today()).is_none());
}
