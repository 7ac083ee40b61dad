/// Calculate the arithmetic mean of a slice, `None` if it's empty
#[inline]
pub fn mean(slice: &[f64]) -> Option<f64> {
    if slice.is_empty() {
        return None;
    }
    let (sum, len) = slice.iter().fold((0.0, 0), |acc, x| (acc.0 + x, acc.1 + 1));
    Some(sum / len as f64)
}

/// Divide each value by the sum of the slice. A slice summing to zero
/// normalizes to all zeroes.
#[inline]
pub fn normalize(slice: &[f64]) -> Vec<f64> {
    let sum = slice.iter().sum::<f64>();
    if sum == 0.0 {
        return vec![0.0; slice.len()];
    }
    slice.iter().map(|x| x / sum).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mean_of_slice() {
        assert_eq!(mean(&[4.0, 3.0, 2.0]), Some(3.0));
        assert_eq!(mean(&[5.0, 4.0]), Some(4.5));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn normalize_slice() {
        assert_eq!(normalize(&[1.0, 3.0]), vec![0.25, 0.75]);
        assert_eq!(normalize(&[0.0, 0.0]), vec![0.0, 0.0]);
        assert!(normalize(&[]).is_empty());
    }
}
