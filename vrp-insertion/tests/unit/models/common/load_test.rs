use super::*;

parameterized_test! {can_calculate_demand_change_and_size, (demand, change, size), {
    assert_eq!(demand.change(), change);
    assert_eq!(demand.size(), size);
}}

can_calculate_demand_change_and_size! {
    case01_static_pickup: (Demand::pickup(2), 2, 2),
    case02_static_delivery: (Demand::delivery(3), -3, 3),
    case03_dynamic_pickup: (Demand::pickup_dynamic(1), 1, 1),
    case04_dynamic_delivery: (Demand::delivery_dynamic(1), -1, 1),
    case05_empty: (Demand::default(), 0, 0),
}

#[test]
fn can_set_and_get_capacity_and_demand() {
    let mut dimens = Dimensions::default();

    dimens.set_capacity(10).set_demand(Demand::delivery(2));

    assert_eq!(dimens.get_capacity(), Some(&10));
    assert_eq!(dimens.get_demand(), Some(&Demand::delivery(2)));
}
