/// Calls `callback` with every `k`-combination of `items`, in lexicographic
/// order of positions.
pub fn for_each_combination<T, F>(items: &[T], k: usize, mut callback: F)
where
    T: Copy,
    F: FnMut(&[T]),
{
    if k == 0 || k > items.len() {
        return;
    }
    let mut current = Vec::with_capacity(k);
    generate_combinations_recursive(items, k, 0, &mut current, &mut callback);
}

fn generate_combinations_recursive<T, F>(
    items: &[T],
    k: usize,
    start: usize,
    current: &mut Vec<T>,
    callback: &mut F,
) where
    T: Copy,
    F: FnMut(&[T]),
{
    if current.len() == k {
        callback(current);
        return;
    }

    // Stop early once too few items remain to fill the combination.
    for i in start..=items.len() - (k - current.len()) {
        current.push(items[i]);
        generate_combinations_recursive(items, k, i + 1, current, callback);
        current.pop();
    }
}
