use itertools::Itertools;

use crate::domain::{SortType, SupportLevel};

/// Returns a sorted copy of `levels`. Stable: ties keep input order.
pub fn sort_levels(levels: &[SupportLevel], sort_type: SortType) -> Vec<SupportLevel> {
    let view = levels.iter().cloned();

    match sort_type {
        SortType::Strength => view.sorted_by(|a, b| b.strength.total_cmp(&a.strength)).collect(),
        SortType::Price => view.sorted_by(|a, b| b.price.total_cmp(&a.price)).collect(),
        SortType::Distance => view
            .sorted_by(|a, b| a.distance.abs().total_cmp(&b.distance.abs()))
            .collect(),
        // Never tested sorts as epoch 0
        SortType::Recent => view
            .sorted_by_key(|l| std::cmp::Reverse(l.last_test.unwrap_or(0)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(price: f64, strength: f64, last_test: Option<i64>) -> SupportLevel {
        SupportLevel::new(price, strength, 0, last_test)
    }

    fn prices(levels: &[SupportLevel]) -> Vec<f64> {
        levels.iter().map(|l| l.price).collect()
    }

    #[test]
    fn strength_descending() {
        let input = vec![level(1.0, 10.0, None), level(2.0, 90.0, None), level(3.0, 50.0, None)];
        assert_eq!(prices(&sort_levels(&input, SortType::Strength)), vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn price_sort_is_stable_for_ties() {
        let input = vec![
            level(100.0, 1.0, None),
            level(200.0, 2.0, None),
            level(100.0, 3.0, None),
            level(200.0, 4.0, None),
        ];
        let once = sort_levels(&input, SortType::Price);
        let strengths: Vec<f64> = once.iter().map(|l| l.strength).collect();
        assert_eq!(strengths, vec![2.0, 4.0, 1.0, 3.0]);
        assert_eq!(sort_levels(&input, SortType::Price), once);
    }

    #[test]
    fn distance_uses_absolute_value() {
        let mut a = level(1.0, 0.0, None);
        a.distance = -4.0;
        let mut b = level(2.0, 0.0, None);
        b.distance = 1.5;
        let mut c = level(3.0, 0.0, None);
        c.distance = -0.5;
        assert_eq!(prices(&sort_levels(&[a, b, c], SortType::Distance)), vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn recent_puts_untested_last() {
        let input = vec![level(1.0, 0.0, None), level(2.0, 0.0, Some(1_000)), level(3.0, 0.0, Some(5_000))];
        assert_eq!(prices(&sort_levels(&input, SortType::Recent)), vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn input_is_not_reordered() {
        let input = vec![level(1.0, 10.0, None), level(2.0, 90.0, None)];
        let _ = sort_levels(&input, SortType::Strength);
        assert_eq!(prices(&input), vec![1.0, 2.0]);
    }
}
