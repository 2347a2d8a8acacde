use std::cmp::Ordering;

use itertools::Itertools;
use ndarray::ArrayView1;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct BinaryMetrics {
    pub pr_auc: f64,
    pub roc_auc: f64,
    pub n: f64,
    pub positives: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub val: BinaryMetrics,
    pub test: BinaryMetrics,
}

pub fn evaluate_binary(scores: ArrayView1<f64>, labels: ArrayView1<f64>) -> BinaryMetrics {
    let scores: Vec<f64> = scores.iter().copied().collect();
    let labels: Vec<bool> = labels.iter().map(|&l| l > 0.5).collect();

    BinaryMetrics {
        pr_auc: average_precision(&scores, &labels),
        roc_auc: roc_auc(&scores, &labels),
        n: labels.len() as f64,
        positives: labels.iter().filter(|&&l| l).count() as f64,
    }
}

/// Rank-statistic ROC AUC: tied scores share their average rank. NaN when
/// only one class is present.
fn roc_auc(scores: &[f64], labels: &[bool]) -> f64 {
    let n_pos = labels.iter().filter(|&&l| l).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return f64::NAN;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].partial_cmp(&scores[b]).unwrap_or(Ordering::Equal));

    let mut rank_sum_pos = 0.0;
    let mut rank = 0usize;
    for (_, grp) in &order.iter().group_by(|&&idx| scores[idx]) {
        let members: Vec<usize> = grp.copied().collect();
        let avg_rank = (rank + 1 + rank + members.len()) as f64 / 2.0;
        for idx in &members {
            if labels[*idx] {
                rank_sum_pos += avg_rank;
            }
        }
        rank += members.len();
    }

    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    (rank_sum_pos - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg)
}

/// Average precision over the score-descending sweep, with tied scores
/// handled as a single threshold. NaN when only one class is present.
fn average_precision(scores: &[f64], labels: &[bool]) -> f64 {
    let n_pos = labels.iter().filter(|&&l| l).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return f64::NAN;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal));

    let mut tp = 0.0;
    let mut fp = 0.0;
    let mut ap = 0.0;
    for (_, grp) in &order.iter().group_by(|&&idx| scores[idx]) {
        let members: Vec<usize> = grp.copied().collect();
        let grp_tp = members.iter().filter(|idx| labels[**idx]).count() as f64;
        let grp_fp = members.len() as f64 - grp_tp;

        tp += grp_tp;
        fp += grp_fp;
        if grp_tp > 0.0 {
            let precision = tp / (tp + fp);
            let recall_delta = grp_tp / n_pos as f64;
            ap += precision * recall_delta;
        }
    }
    ap
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    fn eval(scores: &[f64], labels: &[f64]) -> BinaryMetrics {
        let scores = Array1::from(scores.to_vec());
        let labels = Array1::from(labels.to_vec());
        evaluate_binary(scores.view(), labels.view())
    }

    #[test]
    fn test_perfect_separation() {
        let metrics = eval(&[0.9, 0.8, 0.2, 0.1], &[1.0, 1.0, 0.0, 0.0]);
        assert_eq!(metrics.roc_auc, 1.0);
        assert_eq!(metrics.pr_auc, 1.0);
        assert_eq!(metrics.n, 4.0);
        assert_eq!(metrics.positives, 2.0);
    }

    #[test]
    fn test_interleaved_scores() {
        let metrics = eval(&[0.9, 0.8, 0.7, 0.6], &[1.0, 0.0, 1.0, 0.0]);
        assert!((metrics.roc_auc - 0.75).abs() < 1e-12);
        // precisions at the two positives: 1/1 and 2/3
        assert!((metrics.pr_auc - (1.0 + 2.0 / 3.0) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_reversed_ranking() {
        let metrics = eval(&[0.1, 0.2, 0.8, 0.9], &[1.0, 1.0, 0.0, 0.0]);
        assert_eq!(metrics.roc_auc, 0.0);
    }

    #[test]
    fn test_tied_scores_share_rank() {
        // one positive and one negative at the same score
        let metrics = eval(&[0.5, 0.5], &[1.0, 0.0]);
        assert!((metrics.roc_auc - 0.5).abs() < 1e-12);
        assert!((metrics.pr_auc - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_single_class_is_nan() {
        let all_pos = eval(&[0.9, 0.8], &[1.0, 1.0]);
        assert!(all_pos.roc_auc.is_nan());
        assert!(all_pos.pr_auc.is_nan());

        let all_neg = eval(&[0.9, 0.8], &[0.0, 0.0]);
        assert!(all_neg.roc_auc.is_nan());

        let empty = eval(&[], &[]);
        assert!(empty.roc_auc.is_nan());
        assert_eq!(empty.n, 0.0);
    }
}
