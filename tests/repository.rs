use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime};
use pushkind_pricefeed::domain::product::{NewProduct, SaveOutcome};
use pushkind_pricefeed::domain::types::{PageLimit, ProductName, ProductPrice};
use pushkind_pricefeed::repository::{
    DieselRepository, ListOptions, ProductReader, ProductWriter, SortDirection, SortField,
};
use pushkind_pricefeed::services::ingest::FeedIngestor;

mod common;

fn at(secs: i64) -> NaiveDateTime {
    DateTime::from_timestamp(secs, 0)
        .expect("valid timestamp")
        .naive_utc()
}

fn new_product(name: &str, price: f64, updated: i64) -> NewProduct {
    NewProduct {
        name: ProductName::new(name).expect("valid name"),
        price: ProductPrice::new(price).expect("valid price"),
        updated_at: at(updated),
    }
}

fn name(value: &str) -> ProductName {
    ProductName::new(value).expect("valid name")
}

#[test]
fn find_by_name_returns_none_for_unknown_products() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    assert!(
        repo.find_by_name(&name("Missing"))
            .expect("lookup should succeed")
            .is_none()
    );
}

#[test]
fn saving_an_unchanged_price_is_a_no_op() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let first = repo
        .save_product(&new_product("Apple MacBook Pro", 1299.0, 0))
        .expect("should create product");
    assert!(matches!(first, SaveOutcome::Created(_)));

    let second = repo
        .save_product(&new_product("Apple MacBook Pro", 1299.0, 3600))
        .expect("should accept unchanged price");
    assert_eq!(second, SaveOutcome::Unchanged(first.product_id()));

    let stored = repo
        .find_by_name(&name("Apple MacBook Pro"))
        .expect("lookup should succeed")
        .expect("product should exist");
    assert!(stored.changes.is_empty());
    assert_eq!(stored.updated_at, at(0));
}

#[test]
fn changing_the_price_appends_the_previous_one() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    repo.save_product(&new_product("Apple iPhone 12 PRO", 1099.0, 0))
        .expect("should create product");
    let outcome = repo
        .save_product(&new_product("Apple iPhone 12 PRO", 999.0, 3600))
        .expect("should reprice product");
    assert!(matches!(outcome, SaveOutcome::Updated(_)));

    let stored = repo
        .find_by_name(&name("Apple iPhone 12 PRO"))
        .expect("lookup should succeed")
        .expect("product should exist");
    assert_eq!(stored.price, 999.0);
    assert_eq!(stored.changes, vec![ProductPrice::new(1099.0).unwrap()]);
    assert!(stored.updated_at > at(0));

    repo.save_product(&new_product("Apple iPhone 12 PRO", 899.0, 7200))
        .expect("should reprice product again");
    let stored = repo
        .find_by_name(&name("Apple iPhone 12 PRO"))
        .expect("lookup should succeed")
        .expect("product should exist");
    assert_eq!(
        stored.changes,
        vec![
            ProductPrice::new(1099.0).unwrap(),
            ProductPrice::new(999.0).unwrap()
        ]
    );
    assert_eq!(stored.id, outcome.product_id());
}

#[test]
fn default_listing_returns_natural_order_and_respects_limit() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    for (i, (name, price)) in [("Product1", 1000.0), ("Product2", 3000.0), ("Product3", 2000.0)]
        .into_iter()
        .enumerate()
    {
        repo.save_product(&new_product(name, price, i as i64 * 3600))
            .expect("should create product");
    }

    let all = repo
        .list_products(&ListOptions::default())
        .expect("should list products");
    assert_eq!(all.len(), 3);
    assert!(all.windows(2).all(|w| w[0].id < w[1].id));

    let one = repo
        .list_products(&ListOptions::default().limit(PageLimit::new(1).unwrap()))
        .expect("should list products");
    assert_eq!(one.len(), 1);
    assert_eq!(one[0].name, "Product1");
}

#[test]
fn listing_sorts_by_each_field_and_direction() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    for (i, (name, price)) in [("Apple", 1000.0), ("Juice", 3000.0), ("Banana", 2000.0)]
        .into_iter()
        .enumerate()
    {
        repo.save_product(&new_product(name, price, i as i64 * 3600))
            .expect("should create product");
    }

    for direction in [SortDirection::Asc, SortDirection::Desc] {
        let by_name = repo
            .list_products(&ListOptions::default().sort_by(SortField::Name, direction))
            .expect("should list by name");
        let by_price = repo
            .list_products(&ListOptions::default().sort_by(SortField::Price, direction))
            .expect("should list by price");
        let by_updated = repo
            .list_products(&ListOptions::default().sort_by(SortField::UpdatedAt, direction))
            .expect("should list by update time");

        match direction {
            SortDirection::Asc => {
                assert!(by_name.windows(2).all(|w| w[0].name <= w[1].name));
                assert!(by_price.windows(2).all(|w| w[0].price <= w[1].price));
                assert!(by_updated.windows(2).all(|w| w[0].updated_at <= w[1].updated_at));
            }
            SortDirection::Desc => {
                assert!(by_name.windows(2).all(|w| w[0].name >= w[1].name));
                assert!(by_price.windows(2).all(|w| w[0].price >= w[1].price));
                assert!(by_updated.windows(2).all(|w| w[0].updated_at >= w[1].updated_at));
            }
        }
        assert_eq!(by_name.len(), 3);
    }
}

#[test]
fn cursor_pagination_visits_every_product_once_in_id_order() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    for i in 0..23 {
        repo.save_product(&new_product(&format!("Product{i:02}"), f64::from(i), 0))
            .expect("should create product");
    }

    let limit = PageLimit::new(5).unwrap();
    let mut options = ListOptions::default().limit(limit);
    let mut seen = Vec::new();
    loop {
        let page = repo.list_products(&options).expect("should list page");
        assert!(page.len() as i64 <= limit.get());
        let Some(last) = page.last() else {
            break;
        };
        options = options.clone().after(last.id);
        seen.extend(page.into_iter().map(|p| p.id));
    }

    assert_eq!(seen.len(), 23);
    assert!(seen.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(seen.iter().collect::<HashSet<_>>().len(), 23);
}

#[test]
fn cursor_skips_products_up_to_and_including_the_cursor() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let first = repo
        .save_product(&new_product("Product1", 1000.0, 0))
        .expect("should create product")
        .product_id();
    repo.save_product(&new_product("Product2", 3000.0, 0))
        .expect("should create product");
    repo.save_product(&new_product("Product3", 2000.0, 0))
        .expect("should create product");

    let page = repo
        .list_products(
            &ListOptions::default()
                .after(first)
                .limit(PageLimit::new(1).unwrap()),
        )
        .expect("should list page");

    assert_eq!(page.len(), 1);
    assert_eq!(page[0].name, "Product2");
}

#[test]
fn listing_includes_price_history() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    repo.save_product(&new_product("Apple", 1.0, 0)).unwrap();
    repo.save_product(&new_product("Banana", 2.0, 0)).unwrap();
    repo.save_product(&new_product("Apple", 3.0, 10)).unwrap();
    repo.save_product(&new_product("Apple", 4.0, 20)).unwrap();

    let products = repo
        .list_products(&ListOptions::default())
        .expect("should list products");

    assert_eq!(products[0].name, "Apple");
    assert_eq!(products[0].changes.len(), 2);
    assert_eq!(products[1].name, "Banana");
    assert!(products[1].changes.is_empty());
}

#[test]
fn ingesting_a_feed_twice_records_the_price_change() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    FeedIngestor::new(&repo, at(0))
        .ingest("PRODUCT NAME;PRICE\nApple;1000\nBanana;2000\n".as_bytes())
        .expect("first feed should ingest");
    let listed = repo
        .list_products(&ListOptions::default())
        .expect("should list products");
    assert_eq!(listed.len(), 2);

    FeedIngestor::new(&repo, at(60))
        .ingest("PRODUCT NAME;PRICE\nApple;1500\n".as_bytes())
        .expect("second feed should ingest");

    let apple = repo
        .find_by_name(&name("Apple"))
        .expect("lookup should succeed")
        .expect("product should exist");
    assert_eq!(apple.price, 1500.0);
    assert_eq!(apple.changes, vec![ProductPrice::new(1000.0).unwrap()]);
}

#[test]
fn rejected_header_writes_nothing() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    assert!(
        FeedIngestor::new(&repo, at(0))
            .ingest("PRODUCT;PRICE\nApple;1000\n".as_bytes())
            .is_err()
    );
    assert!(
        repo.list_products(&ListOptions::default())
            .expect("should list products")
            .is_empty()
    );
}

#[test]
fn concurrent_saves_of_one_name_record_each_change_once() {
    const THREADS: usize = 8;
    const SAVES: usize = 25;

    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());

    let outcomes: Vec<SaveOutcome> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let repo = repo.clone();
                scope.spawn(move || {
                    (0..SAVES)
                        .map(|i| {
                            let price = (t * SAVES + i + 1) as f64;
                            repo.save_product(&new_product("Apple", price, i as i64))
                                .expect("concurrent save should succeed")
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|h| h.join().expect("save thread should not panic"))
            .collect()
    });

    assert_eq!(outcomes.len(), THREADS * SAVES);
    let created = outcomes
        .iter()
        .filter(|o| matches!(o, SaveOutcome::Created(_)))
        .count();
    let updated = outcomes
        .iter()
        .filter(|o| matches!(o, SaveOutcome::Updated(_)))
        .count();
    assert_eq!(created, 1);
    assert_eq!(updated, THREADS * SAVES - 1);

    let apple = repo
        .find_by_name(&name("Apple"))
        .expect("lookup should succeed")
        .expect("product should exist");
    assert_eq!(apple.changes.len(), updated);
}
