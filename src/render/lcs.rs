/// Longest common subsequence of `first` and `second` under `eq`.
///
/// Returns the matched `(first_index, second_index)` pairs, increasing in both indices.
/// The table is filled from the end of both sequences; the walk back from the start advances
/// `second` only when that keeps a strictly larger score, so ties advance `first`.
pub fn longest_common_subsequence<T, U>(
    first: &[T],
    second: &[U],
    mut eq: impl FnMut(&T, &U) -> bool,
) -> Vec<(usize, usize)> {
    let rows = first.len();
    let cols = second.len();
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    let width = cols + 1;
    let mut table = vec![0usize; (rows + 1) * width];
    let at = |row: usize, col: usize| row * width + col;

    for row in (0..rows).rev() {
        for col in (0..cols).rev() {
            table[at(row, col)] = if eq(&first[row], &second[col]) {
                table[at(row + 1, col + 1)] + 1
            } else {
                table[at(row, col + 1)].max(table[at(row + 1, col)])
            };
        }
    }

    let mut pairs = Vec::with_capacity(table[at(0, 0)]);
    let (mut row, mut col) = (0, 0);
    while row < rows && col < cols {
        if eq(&first[row], &second[col]) {
            pairs.push((row, col));
            row += 1;
            col += 1;
        } else if table[at(row, col + 1)] > table[at(row + 1, col)] {
            col += 1;
        } else {
            row += 1;
        }
    }
    pairs
}
