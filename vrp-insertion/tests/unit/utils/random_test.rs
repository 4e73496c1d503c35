use super::*;

#[test]
fn can_shuffle_indices() {
    let random = DefaultRandom::default();

    let mut indices = random.shuffled_indices(10);
    assert_eq!(indices.len(), 10);

    indices.sort();
    assert_eq!(indices, (0..10).collect::<Vec<_>>());
}
