//! Text results file: first line `num_queries`, then one line per query of
//! whitespace-separated candidate positions.

use std::fmt::Write as _;

#[must_use]
pub fn format_results(positions_by_query: &[Vec<u64>]) -> String {
    let mut out = String::new();
    writeln!(out, "{}", positions_by_query.len()).expect("writing to a String cannot fail");
    for positions in positions_by_query {
        let line = positions
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{line}").expect("writing to a String cannot fail");
    }
    out
}

#[must_use]
pub fn parse_results(text: &str) -> Vec<Vec<u64>> {
    let mut lines = text.lines();
    let Some(count_line) = lines.next() else {
        return Vec::new();
    };
    let num_queries: usize = count_line.trim().parse().unwrap_or(0);
    (0..num_queries)
        .map(|_| {
            lines
                .next()
                .unwrap_or("")
                .split_whitespace()
                .filter_map(|token| token.parse().ok())
                .collect()
        })
        .collect()
}
