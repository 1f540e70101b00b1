// This file is part of the product Groceries.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

/// Number of leading hex digits of the MD5 digest kept in an item id.
const ID_HEX_DIGITS: usize = 5;

pub type ItemId = u32;

/// Derives the catalog and search index key for an item name.
///
/// The id is the first five hex digits of the MD5 digest of the UTF-8 bytes,
/// so it lies in `0..=0xFFFFF`. The value is shared with the search engine as
/// its primary key and must stay stable across releases. Distinct names can
/// collide; nothing here detects that.
///
/// The name is hashed as given. Callers canonicalize first.
pub fn derive_id(name: &str) -> ItemId {
    let digest = format!("{:x}", md5::compute(name.as_bytes()));
    digest[..ID_HEX_DIGITS]
        .chars()
        .filter_map(|c| c.to_digit(16))
        .fold(0, |acc, digit| acc * 16 + digit)
}

/// Title case of `c`. Differs from upper case for ligatures and digraphs
/// ("ß" gives "Ss", "ǆ" gives "ǅ").
fn to_titlecase(c: char) -> impl Iterator<Item = char> {
    let mapped: Vec<char> = unicode_case_mapping::to_titlecase(c)
        .into_iter()
        .filter(|&code| code != 0)
        .filter_map(char::from_u32)
        .collect();
    if mapped.is_empty() {
        vec![c].into_iter()
    } else {
        mapped.into_iter()
    }
}

/// Trims the name, title-cases its first character and lower-cases the rest
/// ("  mILK " becomes "Milk"). Applying it twice changes nothing.
pub fn canonicalize(name: &str) -> String {
    let trimmed = name.trim();
    let Some(first) = trimmed.chars().next() else {
        return String::new();
    };
    // Lower-case the whole name so a final sigma sees its preceding letter,
    // then drop the lowered first character.
    let lowered = trimmed.to_lowercase();
    let skip: usize = first.to_lowercase().map(char::len_utf8).sum();
    let mut canonical: String = to_titlecase(first).collect();
    canonical.push_str(&lowered[skip..]);
    canonical
}
