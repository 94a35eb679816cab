//! Seller quality ranking by 4 and 5 star reviews

use super::grouping::{count_rows, rank, GroupKey, Ranking, SortOrder};
use crate::data::Dataset;

/// Sellers shown in the quality ranking
pub const SELLER_LIMIT: usize = 10;

/// Rank sellers by the number of rows reviewed with 4 or 5 stars.
///
/// Unreviewed rows and rows scored 1-3 are dropped before counting, so a
/// seller with no high reviews never appears.
pub fn rank_sellers(subset: &Dataset, limit: usize) -> Ranking {
    let groups = count_rows(subset.iter().filter(|r| r.has_high_review()), GroupKey::Seller);
    log::debug!("Ranking {} sellers with high reviews", groups.len());
    rank(groups, GroupKey::Seller, SortOrder::Descending, limit)
}

/// Ten sellers with the most 4 and 5 star reviews
pub fn best_sellers(subset: &Dataset) -> Ranking {
    rank_sellers(subset, SELLER_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::OrderRecord;
    use crate::types::parse_timestamp;

    fn reviewed(seller: &str, score: Option<u8>) -> OrderRecord {
        let record =
            OrderRecord::new("o", "c", parse_timestamp("2018-05-01").unwrap()).with_seller(seller);
        match score {
            Some(s) => record.with_review(s),
            None => record,
        }
    }

    #[test]
    fn test_only_high_reviews_count() {
        let ds = Dataset::new(vec![
            reviewed("s1", Some(5)),
            reviewed("s1", Some(4)),
            reviewed("s1", Some(3)),
            reviewed("s2", Some(1)),
            reviewed("s2", None),
            reviewed("s3", Some(5)),
        ]);

        let ranking = best_sellers(&ds);
        assert_eq!(ranking.names(), vec!["s1", "s3"]);
        assert_eq!(ranking.count_of("s1"), Some(2));
        assert_eq!(ranking.count_of("s2"), None);
    }

    #[test]
    fn test_top_ten_descending() {
        let mut rows = Vec::new();
        for seller in 0..12 {
            for _ in 0..=seller {
                rows.push(reviewed(&format!("s{:02}", seller), Some(5)));
            }
        }
        let ranking = best_sellers(&Dataset::new(rows));
        assert_eq!(ranking.len(), 10);
        assert_eq!(ranking.first().map(|g| g.count), Some(12));
        assert!(ranking.entries.windows(2).all(|w| w[0].count >= w[1].count));
        assert_eq!(ranking.count_of("s01"), None);
    }

    #[test]
    fn test_no_high_reviews() {
        let ds = Dataset::new(vec![reviewed("s1", Some(2)), reviewed("s2", None)]);
        assert!(best_sellers(&ds).is_empty());
    }
}
