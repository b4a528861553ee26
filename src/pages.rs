/// Groups page numbers into rows that share a tens bucket (`page / 10`),
/// in ascending order with duplicates removed.
#[must_use]
pub fn group_by_tens(pages: &[i64]) -> Vec<Vec<i64>> {
    let mut pages = pages.to_vec();
    pages.sort_unstable();
    pages.dedup();

    pages
        .chunk_by(|a, b| a.div_euclid(10) == b.div_euclid(10))
        .map(<[i64]>::to_vec)
        .collect()
}
