use crate::models::ProgressStats;

impl ProgressStats {
    /// Percentage is left unrounded; display code formats it.
    pub fn compute(total: usize, completed: usize) -> Self {
        let percentage = if total > 0 {
            completed as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total,
            completed,
            remaining: total.saturating_sub(completed),
            percentage,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }

    pub fn percentage_label(&self) -> String {
        format!("{:.1}", self.percentage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_progress_is_zero() {
        let stats = ProgressStats::compute(104, 0);
        assert_eq!(stats.percentage, 0.0);
        assert_eq!(stats.remaining, 104);
        assert!(!stats.is_complete());
    }

    #[test]
    fn full_progress_is_hundred() {
        let stats = ProgressStats::compute(104, 104);
        assert_eq!(stats.percentage, 100.0);
        assert_eq!(stats.remaining, 0);
        assert!(stats.is_complete());
    }

    #[test]
    fn half_progress() {
        let stats = ProgressStats::compute(104, 52);
        assert!((stats.percentage - 50.0).abs() < 1e-9);
        assert_eq!(stats.remaining, 52);
        assert_eq!(stats.percentage_label(), "50.0");
    }

    #[test]
    fn no_rounding_until_display() {
        let stats = ProgressStats::compute(104, 1);
        assert!((stats.percentage - 100.0 / 104.0).abs() < 1e-12);
        assert_eq!(stats.percentage_label(), "1.0");
    }

    #[test]
    fn zero_total_never_divides() {
        let stats = ProgressStats::compute(0, 0);
        assert_eq!(stats.percentage, 0.0);
        assert!(!stats.is_complete());
    }
}
