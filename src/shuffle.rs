use rand::Rng;

/// Returns a shuffled copy of `items` using Fisher–Yates.
///
/// The input slice is left untouched so callers can keep sharing it.
pub fn shuffle_items<T: Clone, R: Rng + ?Sized>(rng: &mut R, items: &[T]) -> Vec<T> {
    let mut shuffled = items.to_vec();

    for i in (1..shuffled.len()).rev() {
        let j = rng.gen_range(0..=i);
        shuffled.swap(i, j);
    }

    shuffled
}
