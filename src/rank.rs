use crate::types::Recommendation;

/// Round to two decimal places, half away from zero.
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Order classes by probability and keep the top `k`.
///
/// Ties break on ascending label so identical inputs always produce
/// identical output, even when vote shares collide (common with small
/// forests). Ranks are 1-based and contiguous.
pub fn rank(labels: &[String], probs: &[f64], k: usize) -> Vec<Recommendation> {
    let mut order: Vec<usize> = (0..labels.len()).collect();
    order.sort_by(|&a, &b| {
        probs[b]
            .partial_cmp(&probs[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| labels[a].cmp(&labels[b]))
    });

    order
        .into_iter()
        .take(k)
        .enumerate()
        .map(|(i, idx)| Recommendation {
            crop: labels[idx].clone(),
            confidence: round2(probs[idx] * 100.0),
            rank: i + 1,
        })
        .collect()
}

/// Advisory soil label derived from pH alone, independent of the model.
pub fn soil_status(ph: f32) -> &'static str {
    if (6.0..=7.5).contains(&ph) {
        "Optimal"
    } else {
        "Needs Adjustment"
    }
}
