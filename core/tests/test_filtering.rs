mod common;

use common::{names, Product, TagFilter};
use sift_core::{
    compile, compile_filter, parse, CustomHandlers, FieldKind, FieldMap, FilterError,
    ParseError,
};

fn filtered(filter: &str) -> Result<Vec<Product>, FilterError> {
    let map = common::product_map();
    let handlers = CustomHandlers::new().with_filter("tag-filter", TagFilter);
    let predicate = compile_filter(filter, &map, &handlers)?.expect("non-empty filter");
    let mut items = common::catalog();
    items.retain(|p| predicate(p));
    Ok(items)
}

fn filtered_names(filter: &str) -> Vec<String> {
    names(&filtered(filter).expect("filter applies"))
        .into_iter()
        .map(String::from)
        .collect()
}

#[test]
fn scenario_name_equals_apple() {
    assert_eq!(filtered_names("Name==Apple"), ["Apple"]);
}

#[test]
fn scenario_price_at_least_twenty() {
    assert_eq!(
        filtered_names("Price>=20"),
        ["Laptop", "Desk", "Headphones", "Jeans"]
    );
}

#[test]
fn scenario_category_food() {
    assert_eq!(filtered_names("Category==Food"), ["Apple", "Banana", "Orange"]);
}

#[test]
fn scenario_desk_or_food() {
    assert_eq!(
        filtered_names("Name==Desk|Category==Food"),
        ["Apple", "Desk", "Banana", "Orange"]
    );
}

#[test]
fn scenario_category_group_and_price() {
    assert_eq!(
        filtered_names("Category==(Food|Electronics),Price>=2.00"),
        ["Laptop", "Headphones", "Orange"]
    );
}

#[test]
fn scenario_unmapped_property_is_rejected_by_name() {
    let err = filtered("IsAvailable==true").unwrap_err();
    assert_eq!(
        err,
        FilterError::UnmappedProperties(vec!["IsAvailable".into()])
    );
}

#[test]
fn empty_filter_means_no_filter() {
    let map = common::product_map();
    let handlers = CustomHandlers::new();
    assert!(compile_filter("", &map, &handlers).unwrap().is_none());
    assert!(compile_filter("   ", &map, &handlers).unwrap().is_none());
}

#[test]
fn validation_aggregates_every_offender() {
    let err = filtered("Foo==1,Bar==2|Name==Apple").unwrap_err();
    // Mixed connectives would also fail, but authorization runs on the
    // built tree, so use consistent connectives here.
    assert!(matches!(err, FilterError::Parse(_)));

    let err = filtered("Foo==1,Bar==2,Name==Apple").unwrap_err();
    assert_eq!(
        err,
        FilterError::UnmappedProperties(vec!["Foo".into(), "Bar".into()])
    );
}

#[test]
fn string_operators() {
    assert_eq!(filtered_names("Name@=ea"), ["Headphones", "Jeans"]);
    assert_eq!(filtered_names("Name_=Ban"), ["Banana"]);
    assert_eq!(filtered_names("Name_-=top"), ["Laptop"]);
    assert_eq!(
        filtered_names("Name!@=an"),
        ["Apple", "Laptop", "T-Shirt", "Desk", "Headphones"]
    );
    assert_eq!(
        filtered_names("Name!_=T"),
        ["Apple", "Laptop", "Desk", "Banana", "Headphones", "Jeans", "Orange"]
    );
    assert_eq!(
        filtered_names("Name!_-=s"),
        ["Apple", "Laptop", "T-Shirt", "Desk", "Banana", "Orange"]
    );
}

#[test]
fn case_insensitive_string_operators() {
    assert_eq!(filtered_names("Name==*apple"), ["Apple"]);
    assert!(filtered_names("Name==apple").is_empty());
    assert_eq!(filtered_names("Name@=*SHIRT"), ["T-Shirt"]);
    assert_eq!(filtered_names("Name_=*ban"), ["Banana"]);
    assert_eq!(filtered_names("Name_-=*TOP"), ["Laptop"]);
    assert_eq!(
        filtered_names("Name!=*apple"),
        ["Laptop", "T-Shirt", "Desk", "Banana", "Headphones", "Jeans", "Orange"]
    );
}

#[test]
fn quoted_literals_unquote_before_comparison() {
    assert_eq!(filtered_names("Name=='Apple'"), ["Apple"]);
    assert_eq!(filtered_names("Name==\"Apple\""), ["Apple"]);
    assert_eq!(filtered_names("Name=='T-Shirt'"), ["T-Shirt"]);
}

#[test]
fn enum_literals_resolve_case_insensitively() {
    assert_eq!(filtered_names("Category==food"), ["Apple", "Banana", "Orange"]);
    assert_eq!(
        filtered_names("Category!=FOOD"),
        ["Laptop", "T-Shirt", "Desk", "Headphones", "Jeans"]
    );
}

#[test]
fn date_time_comparisons_with_quoted_literals() {
    assert_eq!(
        filtered_names("CreatedAt>='2024-03-01'"),
        ["T-Shirt", "Desk", "Banana", "Headphones", "Jeans", "Orange"]
    );
    assert_eq!(filtered_names("CreatedAt<'2024-02-01'"), ["Apple"]);
    assert_eq!(filtered_names("CreatedAt=='2024-04-01'"), ["Desk"]);
}

#[test]
fn membership_and_its_complement_partition_the_catalog() {
    let catalog = common::catalog();
    let inside = filtered("Category=|(Food|Electronics)").unwrap();
    let outside = filtered("Category!=|(Food|Electronics)").unwrap();
    assert_eq!(inside.len() + outside.len(), catalog.len());
    assert_eq!(
        names(&inside),
        ["Apple", "Laptop", "Banana", "Headphones", "Orange"]
    );
    assert_eq!(names(&outside), ["T-Shirt", "Desk", "Jeans"]);

    // Complement must hold per record, not just in aggregate.
    let map = common::product_map();
    let handlers = CustomHandlers::new();
    let node_in = parse("Price=|(1.99|39.99|120.00)").unwrap();
    let node_not_in = parse("Price!=|(1.99|39.99|120.00)").unwrap();
    let p_in = compile(&node_in, &map, &handlers).unwrap();
    let p_not_in = compile(&node_not_in, &map, &handlers).unwrap();
    for product in &catalog {
        assert_ne!(p_in(product), p_not_in(product), "complement violated for {}", product.name);
    }
}

#[test]
fn equality_group_promotion_matches_comparison_chain() {
    // `Name==(A|B)` must behave exactly like `Name==A|Name==B`.
    assert_eq!(
        filtered_names("Name==(Apple|Desk)"),
        filtered_names("Name==Apple|Name==Desk")
    );
    assert_eq!(
        filtered_names("Name!=(T-Shirt|Jeans)"),
        ["Apple", "Laptop", "Desk", "Banana", "Headphones", "Orange"]
    );
}

#[test]
fn null_ratings_satisfy_only_negative_operators() {
    // T-Shirt and Jeans have no rating.
    assert_eq!(
        filtered_names("Rating>=4"),
        ["Apple", "Laptop", "Desk", "Banana", "Orange"]
    );
    assert_eq!(
        filtered_names("Rating!=4.5"),
        ["Laptop", "T-Shirt", "Desk", "Banana", "Headphones", "Jeans", "Orange"]
    );
    assert_eq!(filtered_names("Rating==4.5"), ["Apple"]);
    assert_eq!(filtered_names("Rating!=|(4.5|4.8)"),
        ["T-Shirt", "Desk", "Banana", "Headphones", "Jeans", "Orange"]
    );
}

#[test]
fn unsupported_operator_on_non_string_field() {
    let err = filtered("Price@=9").unwrap_err();
    assert_eq!(
        err,
        FilterError::UnsupportedOperator {
            property: "Price".into(),
            operator: "@=".into(),
            kind: FieldKind::Decimal,
        }
    );

    let err = filtered("Category>Food").unwrap_err();
    assert_eq!(
        err,
        FilterError::UnsupportedOperator {
            property: "Category".into(),
            operator: ">".into(),
            kind: FieldKind::Enum,
        }
    );

    let err = filtered("Category@=*foo").unwrap_err();
    assert!(matches!(err, FilterError::UnsupportedOperator { .. }));
}

#[test]
fn coercion_failures_name_property_literal_and_kind() {
    let err = filtered("Price==abc").unwrap_err();
    assert_eq!(
        err,
        FilterError::ValueCoercion {
            property: "Price".into(),
            value: "abc".into(),
            target: FieldKind::Decimal,
        }
    );

    let err = filtered("Category==Toys").unwrap_err();
    assert_eq!(
        err,
        FilterError::ValueCoercion {
            property: "Category".into(),
            value: "Toys".into(),
            target: FieldKind::Enum,
        }
    );

    let err = filtered("Id==1.5").unwrap_err();
    assert!(matches!(err, FilterError::ValueCoercion { .. }));
}

#[test]
fn bool_fields_accept_equality_only() {
    let map = FieldMap::<Product>::builder()
        .boolean("IsAvailable", |p: &Product| p.is_available)
        .filterable()
        .build()
        .unwrap();
    let handlers = CustomHandlers::new();
    let mut items = common::catalog();
    let predicate = compile_filter("IsAvailable==true", &map, &handlers)
        .unwrap()
        .expect("non-empty");
    items.retain(|p| predicate(p));
    assert_eq!(names(&items).len(), 7);
    assert!(!names(&items).contains(&"T-Shirt"));

    let predicate = compile_filter("IsAvailable!=TRUE", &map, &handlers)
        .unwrap()
        .expect("non-empty");
    let mut items = common::catalog();
    items.retain(|p| predicate(p));
    assert_eq!(names(&items), ["T-Shirt"]);

    let err = compile_filter("IsAvailable>false", &map, &handlers).err().unwrap();
    assert!(matches!(err, FilterError::UnsupportedOperator { .. }));
}

#[test]
fn custom_filter_owns_its_field() {
    assert_eq!(
        filtered_names("Tags@=fruit"),
        ["Apple", "Banana", "Orange"]
    );
    // The handler sees the raw operator and value and ignores the
    // operator; equality behaves identically here.
    assert_eq!(filtered_names("Tags==audio"), ["Headphones"]);
}

#[test]
fn custom_filter_group_membership_folds_per_value() {
    assert_eq!(
        filtered_names("Tags=|(citrus|denim)"),
        ["Jeans", "Orange"]
    );
}

#[test]
fn missing_custom_filter_is_reported() {
    let map = common::product_map();
    let handlers = CustomHandlers::new(); // nothing registered
    let err = compile_filter("Tags@=fruit", &map, &handlers).err().unwrap();
    assert_eq!(
        err,
        FilterError::CustomFilterNotRegistered {
            property: "Tags".into(),
            handler: "tag-filter".into(),
        }
    );
}

#[test]
fn mixed_connectives_surface_as_parse_errors() {
    let err = filtered("Name==Apple,Price>1|Category==Food").unwrap_err();
    assert_eq!(
        err,
        FilterError::Parse(ParseError::MixedLogicalOperators { position: 19 })
    );
}

#[test]
fn logical_grouping_overrides_left_to_right() {
    assert_eq!(
        filtered_names("(Name==Desk|Category==Food),Price>=2.00"),
        ["Desk", "Orange"]
    );
}

#[test]
fn compiling_twice_yields_agreeing_predicates() {
    let map = common::product_map();
    let handlers = CustomHandlers::new().with_filter("tag-filter", TagFilter);
    let node = parse("Category==(Food|Electronics),Price>=2.00").unwrap();
    let first = compile(&node, &map, &handlers).unwrap();
    let second = compile(&node, &map, &handlers).unwrap();
    for product in &common::catalog() {
        assert_eq!(first(product), second(product));
    }
}

#[test]
fn serialized_tree_evaluates_identically() {
    let map = common::product_map();
    let handlers = CustomHandlers::new().with_filter("tag-filter", TagFilter);
    for filter in [
        "Name==Apple",
        "Price>=20",
        "Category==(Food|Electronics),Price>=2.00",
        "(Name==Desk|Category==Food),Price>=2.00",
        "Rating!=|(4.5|4.8)",
    ] {
        let node = parse(filter).unwrap();
        let reparsed = parse(&node.to_filter_string()).unwrap();
        let original = compile(&node, &map, &handlers).unwrap();
        let round_tripped = compile(&reparsed, &map, &handlers).unwrap();
        for product in &common::catalog() {
            assert_eq!(
                original(product),
                round_tripped(product),
                "round-trip changed semantics of '{}' for {}",
                filter,
                product.name
            );
        }
    }
}
