use std::collections::HashMap;

use super::model::SampleGroup;

/// Sample key of a filename: its first `key_len` characters, or the whole
/// name when it is shorter.
pub fn sample_key(name: &str, key_len: usize) -> &str {
    match name.char_indices().nth(key_len) {
        Some((end, _)) => &name[..end],
        None => name,
    }
}

/// Partition filenames into groups sharing a sample key.
///
/// Groups appear in the order their key was first seen; members keep their
/// input order. Every name lands in exactly one group.
pub fn group_by_key<I, S>(names: I, key_len: usize) -> Vec<SampleGroup>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut groups: Vec<SampleGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for name in names {
        let name = name.as_ref();
        let key = sample_key(name, key_len);
        let slot = match index.get(key) {
            Some(&i) => i,
            None => {
                index.insert(key.to_string(), groups.len());
                groups.push(SampleGroup::new(key));
                groups.len() - 1
            }
        };
        groups[slot].members.push(name.to_string());
    }

    groups
}
