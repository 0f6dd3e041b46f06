//! Greedy recipe-book builder.
//!
//! Items are grouped by category and scanned in input order. A working group
//! collects items while the union of their resource ids stays within
//! `capacity`; an item that would overflow it closes (flushes) the group first
//! and then starts the next one. The incoming item itself is never rejected,
//! so an item that alone exceeds `capacity` still gets a group.
//!
//! Flushing a group:
//!
//! - empty group: nothing happens
//! - at least `min_group_size` items: a new book
//! - fewer items, previous book exists: merged into that book if the union of
//!   their resource ids fits in `capacity`, otherwise dropped
//! - fewer items, no previous book: a capacity-triggered flush keeps it as the
//!   category's seed book; the end-of-category flush drops it
//!
//! Books keep whatever size they reached through seeding or merging; only
//! categories that end with no books at all are omitted. The output map is
//! ordered by category key and books keep their emission order.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use tracing::debug;

use crate::domain::{Book, Item, MISC_CATEGORY, Partition, PartitionConfig};

/// Partition `items` into books, discarding the dropped-item accounting.
pub fn partition(items: &[Item], capacity: usize, min_group_size: usize) -> BTreeMap<String, Vec<Book>> {
    partition_with_report(
        items,
        &PartitionConfig {
            capacity,
            min_group_size,
        },
    )
    .books
}

/// Partition `items` into books and report which items were dropped.
pub fn partition_with_report(items: &[Item], config: &PartitionConfig) -> Partition {
    let mut groups: BTreeMap<String, Vec<&Item>> = BTreeMap::new();
    for item in items {
        groups
            .entry(normalize_category(&item.category))
            .or_default()
            .push(item);
    }

    // Categories are independent; rayon keeps the result in key order.
    let built: Vec<(String, CategoryBooks)> = groups
        .into_par_iter()
        .map(|(category, members)| {
            let out = build_category(&category, &members, config);
            (category, out)
        })
        .collect();

    let mut partition = Partition::default();
    for (category, out) in built {
        partition.dropped.extend(out.dropped);
        if out.books.is_empty() {
            debug!(%category, "no books built; category omitted");
            continue;
        }
        partition.books.insert(category, out.books);
    }
    partition
}

/// Map a raw category to its bucket key: trimmed, blank mapped to `Misc`.
pub fn normalize_category(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        MISC_CATEGORY.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Lowercased category with whitespace runs replaced by `_`; book ids are `fav_<slug>`.
pub fn category_slug(category: &str) -> String {
    let words: Vec<String> = category.split_whitespace().map(str::to_lowercase).collect();
    words.join("_")
}

#[derive(Debug, Default)]
struct CategoryBooks {
    books: Vec<Book>,
    dropped: Vec<Item>,
}

#[derive(Debug, Default)]
struct Working {
    items: Vec<Item>,
    resource_ids: BTreeSet<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlushCause {
    Capacity,
    EndOfCategory,
}

fn build_category(category: &str, members: &[&Item], config: &PartitionConfig) -> CategoryBooks {
    let mut out = CategoryBooks::default();
    let mut working = Working::default();

    for item in members {
        let grown = working.resource_ids.union(&item.resource_ids).count();
        if grown > config.capacity {
            let full = std::mem::take(&mut working);
            flush(category, full, FlushCause::Capacity, config, &mut out);
        }
        working.resource_ids.extend(item.resource_ids.iter().copied());
        working.items.push((*item).clone());
    }
    flush(category, working, FlushCause::EndOfCategory, config, &mut out);

    out
}

fn flush(category: &str, working: Working, cause: FlushCause, config: &PartitionConfig, out: &mut CategoryBooks) {
    if working.items.is_empty() {
        return;
    }

    if working.items.len() >= config.min_group_size {
        debug!(%category, items = working.items.len(), "emit book");
        emit(category, working, out);
        return;
    }

    if let Some(prev) = out.books.last_mut() {
        let union: BTreeSet<i64> = prev.resource_ids.union(&working.resource_ids).copied().collect();
        if union.len() <= config.capacity {
            debug!(%category, items = working.items.len(), book = %prev.id, "merge leftovers into previous book");
            prev.items.extend(working.items);
            prev.resource_ids = union;
        } else {
            debug!(%category, items = working.items.len(), "drop leftovers; merge would exceed capacity");
            out.dropped.extend(working.items);
        }
    } else if cause == FlushCause::Capacity {
        debug!(%category, items = working.items.len(), "emit undersized seed book");
        emit(category, working, out);
    } else {
        debug!(%category, items = working.items.len(), "drop leftovers; category too small");
        out.dropped.extend(working.items);
    }
}

fn emit(category: &str, working: Working, out: &mut CategoryBooks) {
    let n = out.books.len() + 1;
    let slug = category_slug(category);
    let (id, label) = if n == 1 {
        (format!("fav_{slug}"), format!("{category} Picks"))
    } else {
        (format!("fav_{slug}_{n}"), format!("{category} Picks #{n}"))
    };
    out.books.push(Book {
        id,
        label,
        description: format!("Popular {} cocktails.", category.to_lowercase()),
        items: working.items,
        resource_ids: working.resource_ids,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, cat: &str, res: &[i64]) -> Item {
        Item::new(id, cat, res.iter().copied())
    }

    fn ids(set: &BTreeSet<i64>) -> Vec<i64> {
        set.iter().copied().collect()
    }

    #[test]
    fn trailing_item_dropped_when_merge_overflows() {
        let items = vec![
            item(1, "A", &[1, 2]),
            item(2, "A", &[3, 4]),
            item(3, "A", &[5, 6]),
        ];
        let out = partition_with_report(
            &items,
            &PartitionConfig {
                capacity: 4,
                min_group_size: 3,
            },
        );

        let books = &out.books["A"];
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].item_ids(), vec![1, 2]);
        assert_eq!(ids(&books[0].resource_ids), vec![1, 2, 3, 4]);
        assert_eq!(out.dropped.iter().map(|i| i.id).collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn leftovers_merge_into_previous_book_when_they_fit() {
        let items = vec![
            item(1, "A", &[1]),
            item(2, "A", &[1, 2]),
            item(3, "A", &[2]),
            item(4, "A", &[3, 4, 5]),
            item(5, "A", &[9]),
        ];
        let books = partition(&items, 4, 3);
        let a = &books["A"];
        // {1,2} ∪ {3,4,5} = 5 > 4: flush items 1-3 as a book.
        // Working {3,4,5} + {9} = 4 <= 4: items 4,5 form a 2-item leftover.
        // Merge {1,2} ∪ {3,4,5,9} = 6 > 4: dropped.
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].item_ids(), vec![1, 2, 3]);

        let items = vec![
            item(1, "A", &[1]),
            item(2, "A", &[1]),
            item(3, "A", &[2]),
            item(4, "A", &[3, 4, 5]),
        ];
        let books = partition(&items, 5, 3);
        // {1,2} ∪ {3,4,5} = 5 <= 5 so everything fits in one group.
        assert_eq!(books["A"][0].item_ids(), vec![1, 2, 3, 4]);

        let items = vec![
            item(1, "A", &[1]),
            item(2, "A", &[2]),
            item(3, "A", &[3]),
            item(4, "A", &[4, 5]),
            item(5, "A", &[6]),
        ];
        let books = partition(&items, 4, 3);
        // {1,2,3} ∪ {4,5} = 5 > 4: book {1,2,3}; leftover item 4 {4,5} + item 5 {6}.
        // Leftover of 2 items cannot merge ({1..6} = 6 > 4): dropped.
        assert_eq!(books["A"].len(), 1);

        let items = vec![
            item(1, "A", &[1]),
            item(2, "A", &[2]),
            item(3, "A", &[3]),
            item(4, "A", &[1, 2, 3, 4, 5]),
            item(5, "A", &[1]),
        ];
        let books = partition(&items, 4, 3);
        // Oversized item 4 is admitted alone, then flushed by item 5 and dropped
        // (merge would exceed capacity). Item 5 merges into the first book.
        let a = &books["A"];
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].item_ids(), vec![1, 2, 3, 5]);
        assert_eq!(ids(&a[0].resource_ids), vec![1, 2, 3]);
    }

    #[test]
    fn oversized_single_item_is_admitted() {
        let items = vec![item(1, "A", &[1, 2, 3, 4, 5, 6]), item(2, "A", &[7])];
        let out = partition_with_report(
            &items,
            &PartitionConfig {
                capacity: 4,
                min_group_size: 1,
            },
        );
        let a = &out.books["A"];
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].item_ids(), vec![1]);
        assert_eq!(a[0].resource_ids.len(), 6);
        assert_eq!(a[1].item_ids(), vec![2]);
        assert!(out.dropped.is_empty());
    }

    #[test]
    fn capacity_flush_seeds_an_undersized_first_book() {
        let config = PartitionConfig {
            capacity: 4,
            min_group_size: 3,
        };

        let lone_seed = vec![item(1, "A", &[1, 2, 3]), item(2, "A", &[4, 5])];
        let out = partition_with_report(&lone_seed, &config);
        assert_eq!(out.books["A"][0].item_ids(), vec![1]);
        assert_eq!(out.dropped.iter().map(|i| i.id).collect::<Vec<_>>(), vec![2]);

        let with_full = vec![
            item(1, "A", &[1, 2, 3]),
            item(2, "A", &[4, 5]),
            item(3, "A", &[6]),
            item(4, "A", &[7]),
        ];
        let out = partition_with_report(&with_full, &config);
        let a = &out.books["A"];
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].item_ids(), vec![1]);
        assert_eq!(a[1].item_ids(), vec![2, 3, 4]);
        assert!(out.dropped.is_empty());
    }

    #[test]
    fn blank_categories_share_misc_bucket() {
        let items = vec![
            item(1, "", &[1]),
            item(2, "   ", &[2]),
            item(3, "\t", &[3]),
        ];
        let books = partition(&items, 15, 3);
        assert_eq!(books.keys().collect::<Vec<_>>(), vec![MISC_CATEGORY]);
        assert_eq!(books[MISC_CATEGORY][0].item_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn small_categories_are_omitted_and_keys_sorted() {
        let items = vec![
            item(1, "Tiki", &[1]),
            item(2, "Sour", &[1]),
            item(3, "Tiki", &[2]),
            item(4, "Sour", &[2]),
            item(5, "Tiki", &[3]),
            item(6, "Highball", &[4]),
            item(7, "Sour", &[3]),
        ];
        let out = partition_with_report(&items, &PartitionConfig::default());
        assert_eq!(out.books.keys().collect::<Vec<_>>(), vec!["Sour", "Tiki"]);
        assert_eq!(out.books["Sour"][0].item_ids(), vec![2, 4, 7]);
        assert_eq!(out.dropped.len(), 1);
        assert_eq!(out.dropped[0].id, 6);
    }

    #[test]
    fn books_are_labelled_by_category_and_position() {
        let items: Vec<Item> = (0..6).map(|i| item(i, "Late Night", &[i, i + 100])).collect();
        let books = partition(&items, 6, 3);
        let b = &books["Late Night"];
        assert_eq!(b.len(), 2);
        assert_eq!(b[0].id, "fav_late_night");
        assert_eq!(b[0].label, "Late Night Picks");
        assert_eq!(b[1].id, "fav_late_night_2");
        assert_eq!(b[1].label, "Late Night Picks #2");
        assert_eq!(b[0].description, "Popular late night cocktails.");
    }

    #[test]
    fn invariants_hold_on_mixed_catalog() {
        let items: Vec<Item> = (0..200)
            .map(|i| {
                let cat = ["Sour", "Tiki", "", "Classic"][(i % 4) as usize];
                let res: Vec<i64> = (0..(i % 5 + 1)).map(|k| (i * 7 + k * 13) % 40).collect();
                item(i, cat, &res)
            })
            .collect();
        let config = PartitionConfig {
            capacity: 12,
            min_group_size: 3,
        };
        let out = partition_with_report(&items, &config);

        assert_eq!(out.placed_item_count() + out.dropped.len(), items.len());

        let mut seen = BTreeSet::new();
        for books in out.books.values() {
            for book in books {
                let union: BTreeSet<i64> = book
                    .items
                    .iter()
                    .flat_map(|i| i.resource_ids.iter().copied())
                    .collect();
                assert_eq!(union, book.resource_ids);
                assert!(book.resource_ids.len() <= config.capacity);
                for i in &book.items {
                    assert!(seen.insert(i.id), "item {} placed twice", i.id);
                }
            }
        }
        for i in &out.dropped {
            assert!(seen.insert(i.id), "item {} both placed and dropped", i.id);
        }

        assert_eq!(partition_with_report(&items, &config), out);
    }

    #[test]
    fn parallel_categories_match_sequential_build() {
        let items: Vec<Item> = (0..120)
            .map(|i| {
                let cat = ["Tiki", "Sour", "Classic", " "][(i % 4) as usize];
                item(i, cat, &[i % 9, (i * 5) % 17])
            })
            .collect();
        let config = PartitionConfig {
            capacity: 6,
            min_group_size: 2,
        };

        let mut groups: BTreeMap<String, Vec<&Item>> = BTreeMap::new();
        for i in &items {
            groups.entry(normalize_category(&i.category)).or_default().push(i);
        }
        let mut expected = Partition::default();
        for (category, members) in &groups {
            let out = build_category(category, members, &config);
            expected.dropped.extend(out.dropped);
            if !out.books.is_empty() {
                expected.books.insert(category.clone(), out.books);
            }
        }

        assert_eq!(partition_with_report(&items, &config), expected);
    }

    #[test]
    fn slug_collapses_whitespace() {
        assert_eq!(category_slug("Late   Night Mix"), "late_night_mix");
        assert_eq!(normalize_category("  Sour "), "Sour");
    }
}
