use common::{Money, OrderId, ProductId, UserId};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{Cart, Order};

fn bench_cart_add_items(c: &mut Criterion) {
    c.bench_function("domain/cart_add_100_items", |b| {
        b.iter(|| {
            let mut cart = Cart::new(UserId::new());
            for i in 0..100u32 {
                cart.add_item(
                    ProductId::new(format!("SKU-{i:03}")),
                    Money::from_cents(1000),
                    2,
                )
                .unwrap();
            }
            cart.total()
        });
    });
}

fn bench_cart_merge_and_update(c: &mut Criterion) {
    c.bench_function("domain/cart_merge_and_update", |b| {
        b.iter(|| {
            let mut cart = Cart::new(UserId::new());
            let id = ProductId::new("SKU-001");
            cart.add_item(id.clone(), Money::from_cents(999), 1).unwrap();
            cart.add_item(id.clone(), Money::from_cents(999), 1).unwrap();
            cart.set_item_quantity(&id, 7).unwrap();
            cart.total()
        });
    });
}

fn bench_order_snapshot(c: &mut Criterion) {
    let mut cart = Cart::new(UserId::new());
    for i in 0..20u32 {
        cart.add_item(
            ProductId::new(format!("SKU-{i:03}")),
            Money::from_cents(500),
            3,
        )
        .unwrap();
    }

    c.bench_function("domain/order_snapshot_20_items", |b| {
        b.iter(|| Order::from_cart(OrderId::new(), &cart));
    });
}

criterion_group!(
    benches,
    bench_cart_add_items,
    bench_cart_merge_and_update,
    bench_order_snapshot
);
criterion_main!(benches);
