//! Product performance ranking by category order volume

use super::grouping::{count_rows, rank, GroupKey, Ranking, SortOrder};
use crate::data::Dataset;

/// Categories shown in each product ranking
pub const CATEGORY_LIMIT: usize = 5;

/// Rank categories by row count.
///
/// Every line item counts, so an order with two items in one category adds
/// two. Equal counts keep the order in which categories first appear in
/// `subset`. Rows without a category are ignored.
pub fn rank_categories(subset: &Dataset, order: SortOrder, limit: usize) -> Ranking {
    let groups = count_rows(subset, GroupKey::Category);
    log::debug!("Ranking {} categories ({:?})", groups.len(), order);
    rank(groups, GroupKey::Category, order, limit)
}

/// Five categories with the most rows
pub fn best_performing(subset: &Dataset) -> Ranking {
    rank_categories(subset, SortOrder::Descending, CATEGORY_LIMIT)
}

/// Five categories with the fewest rows
pub fn worst_performing(subset: &Dataset) -> Ranking {
    rank_categories(subset, SortOrder::Ascending, CATEGORY_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::OrderRecord;
    use crate::types::parse_timestamp;

    fn dataset(categories: &[&str]) -> Dataset {
        let ts = parse_timestamp("2018-05-01 12:00:00").unwrap();
        categories
            .iter()
            .enumerate()
            .map(|(i, c)| OrderRecord::new(format!("o{}", i), "c1", ts).with_category(*c))
            .collect()
    }

    #[test]
    fn test_toys_example() {
        let ds = dataset(&["toys", "books", "toys", "games", "food", "toys", "art", "music"]);

        let best = best_performing(&ds);
        assert_eq!(best.len(), 5);
        assert_eq!(best.first().map(|g| (g.name.as_str(), g.count)), Some(("toys", 3)));
        assert_eq!(best.names(), vec!["toys", "books", "games", "food", "art"]);

        // Ties resolve to first-encountered order
        let worst = worst_performing(&ds);
        assert_eq!(worst.names(), vec!["books", "games", "food", "art", "music"]);
        assert!(worst.entries.iter().all(|g| g.count == 1));
    }

    #[test]
    fn test_best_and_worst_differ_with_six_categories() {
        let ds = dataset(&["a", "a", "a", "b", "b", "c", "d", "e", "f", "f"]);
        assert_ne!(best_performing(&ds).first(), worst_performing(&ds).first());
    }

    #[test]
    fn test_fewer_categories_than_limit() {
        let ds = dataset(&["x", "y", "x"]);
        assert_eq!(best_performing(&ds).names(), vec!["x", "y"]);
        assert_eq!(worst_performing(&ds).names(), vec!["y", "x"]);
    }

    #[test]
    fn test_line_items_count_separately() {
        let ts = parse_timestamp("2018-05-01").unwrap();
        let ds = Dataset::new(vec![
            OrderRecord::new("o1", "c1", ts).with_category("toys"),
            OrderRecord::new("o1", "c1", ts).with_category("toys"),
        ]);
        assert_eq!(best_performing(&ds).count_of("toys"), Some(2));
    }

    #[test]
    fn test_missing_category_ignored() {
        let ts = parse_timestamp("2018-05-01").unwrap();
        let ds = Dataset::new(vec![
            OrderRecord::new("o1", "c1", ts),
            OrderRecord::new("o2", "c1", ts).with_category("toys"),
        ]);
        assert_eq!(best_performing(&ds).names(), vec!["toys"]);
    }

    #[test]
    fn test_empty_subset() {
        assert!(best_performing(&Dataset::default()).is_empty());
        assert!(worst_performing(&Dataset::default()).is_empty());
    }
}
