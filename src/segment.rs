/// Split reference text into practice lines.
///
/// Lines that are blank after trimming are dropped; surviving lines keep
/// their original whitespace.
pub fn segment(text: &str) -> Vec<String> {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Reverse the raw line order, blank lines included.
pub fn reverse(text: &str) -> String {
    let mut lines: Vec<&str> = text.split('\n').collect();
    lines.reverse();
    lines.join("\n")
}

/// Swap every pair of raw lines (1<->2, 3<->4, ...). An odd trailing line stays put.
pub fn swap_odd_even(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let pairs = lines.chunks_exact(2);
    let tail = pairs.remainder();
    pairs
        .flat_map(|pair| [pair[1], pair[0]])
        .chain(tail.iter().copied())
        .collect::<Vec<_>>()
        .join("\n")
}
