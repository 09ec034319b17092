//! Batch planning: split a requested lead count into bounded upstream
//! requests.

/// Businesses requested per upstream call. Larger batches save calls
/// but push the model past the point where it stays grounded.
pub const BATCH_SIZE: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch {
    pub index: usize,
    pub target_count: usize,
}

/// Cover `limit` with batches of at most [`BATCH_SIZE`]; the last batch
/// absorbs the remainder. Targets always sum to exactly `limit`.
pub fn plan_batches(limit: usize) -> Vec<Batch> {
    let mut batches = Vec::new();
    let mut remaining = limit;
    let mut index = 0;
    while remaining > 0 {
        let target_count = remaining.min(BATCH_SIZE);
        batches.push(Batch {
            index,
            target_count,
        });
        remaining -= target_count;
        index += 1;
    }
    batches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_cover_limit_exactly() {
        for limit in [1, 7, 14, 15, 16, 29, 30, 31, 100, 1000] {
            let plan = plan_batches(limit);
            let total: usize = plan.iter().map(|b| b.target_count).sum();
            assert_eq!(total, limit, "limit {limit}");
            assert!(plan.iter().all(|b| b.target_count <= BATCH_SIZE));
            assert!(plan.iter().all(|b| b.target_count > 0));
        }
    }

    #[test]
    fn indices_are_sequential() {
        let plan = plan_batches(100);
        for (i, batch) in plan.iter().enumerate() {
            assert_eq!(batch.index, i);
        }
    }

    #[test]
    fn limit_30_plans_two_full_batches() {
        let plan = plan_batches(30);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].target_count, 15);
        assert_eq!(plan[1].target_count, 15);
    }

    #[test]
    fn last_batch_absorbs_remainder() {
        let plan = plan_batches(31);
        assert_eq!(plan.len(), 3);
        assert_eq!(plan[2].target_count, 1);
    }

    #[test]
    fn zero_limit_plans_nothing() {
        assert!(plan_batches(0).is_empty());
    }
}
