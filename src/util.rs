/// Finds the length of the common prefix between a key and an edge label.
///
/// Returns the number of leading bytes the two slices share.
pub fn common_prefix_len(key: &[u8], label: &[u8]) -> usize {
    let mut i = 0;

    while i < key.len() && i < label.len() && key[i] == label[i] {
        i += 1;
    }

    i
}
